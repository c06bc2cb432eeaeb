//! Remote data fetching for the character-listing API.
//!
//! - [`CharacterSource`]: the seam the controller fetches through
//! - [`HttpCharacterSource`]: reqwest-backed implementation
//! - [`FetchError`]: every way a fetch can end without a [`ResultPage`]

mod client;
mod types;

pub use client::{DEFAULT_ENDPOINT, HttpCharacterSource};
pub use types::{ApiInfo, CharacterRecord, NamedLocation, ResultPage};

use std::future::Future;

use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// Failure of a single page fetch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// Non-success HTTP status other than 404
    #[error("{message}")]
    Remote { message: String, status: u16 },
    /// Transport failure (DNS, connect, reset, ...)
    #[error("network error: {0}")]
    Network(String),
    /// A success response whose body is not a listing page
    #[error("unexpected response: {0}")]
    Decode(String),
    /// The request was superseded before it finished
    #[error("request cancelled")]
    Cancelled,
}

impl FetchError {
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    pub const fn is_network(&self) -> bool {
        matches!(self, Self::Network(_))
    }

    /// HTTP status carried by a [`FetchError::Remote`].
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Remote { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub(crate) fn remote(status: u16) -> Self {
        Self::Remote {
            message: format!("API error ({status})"),
            status,
        }
    }
}

/// Something that can fetch one page of characters.
///
/// Implementations must return [`FetchError::Cancelled`] once `cancel`
/// fires, without waiting for the underlying request.
pub trait CharacterSource: Send + Sync {
    fn fetch_page(
        &self,
        query: &str,
        page: u32,
        cancel: CancellationToken,
    ) -> impl Future<Output = Result<ResultPage, FetchError>> + Send;
}
