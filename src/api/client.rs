use std::future::Future;

use reqwest::{StatusCode, Url};
use tokio_util::sync::CancellationToken;

use super::{CharacterSource, FetchError, ResultPage};

/// The public character-listing endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://rickandmortyapi.com/api/character";

/// Fetches listing pages over HTTP.
#[derive(Debug, Clone)]
pub struct HttpCharacterSource {
    client: reqwest::Client,
    endpoint: Url,
}

impl HttpCharacterSource {
    pub const fn new(client: reqwest::Client, endpoint: Url) -> Self {
        Self { client, endpoint }
    }

    /// Build a source for `endpoint` with a default client.
    ///
    /// # Errors
    /// Returns an error if `endpoint` is not an absolute URL or the HTTP
    /// client cannot be built.
    pub fn from_endpoint(endpoint: &str) -> anyhow::Result<Self> {
        use anyhow::Context;

        let endpoint =
            Url::parse(endpoint).with_context(|| format!("Invalid API URL: {endpoint}"))?;
        let client = reqwest::Client::builder()
            .user_agent(concat!("charsearch/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self::new(client, endpoint))
    }

    /// The request URL for `query` and `page`; `name` is omitted when the
    /// query is empty.
    pub fn request_url(&self, query: &str, page: u32) -> Url {
        let mut url = self.endpoint.clone();
        {
            let mut pairs = url.query_pairs_mut();
            if !query.is_empty() {
                pairs.append_pair("name", query);
            }
            pairs.append_pair("page", &page.to_string());
        }
        url
    }

    async fn fetch_url(&self, url: Url) -> Result<ResultPage, FetchError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|err| FetchError::Network(err.to_string()))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            tracing::debug!(%url, "listing returned 404, treating as no results");
            return Ok(ResultPage::empty());
        }
        if !status.is_success() {
            tracing::warn!(%url, status = status.as_u16(), "listing request failed");
            return Err(FetchError::remote(status.as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|err| FetchError::Network(err.to_string()))?;
        serde_json::from_slice(&body).map_err(|err| FetchError::Decode(err.to_string()))
    }
}

impl CharacterSource for HttpCharacterSource {
    fn fetch_page(
        &self,
        query: &str,
        page: u32,
        cancel: CancellationToken,
    ) -> impl Future<Output = Result<ResultPage, FetchError>> + Send {
        let url = self.request_url(query, page);
        async move {
            tracing::debug!(%url, "fetching listing page");
            tokio::select! {
                biased;
                () = cancel.cancelled() => Err(FetchError::Cancelled),
                result = self.fetch_url(url) => result,
            }
        }
    }
}
