use serde::{Deserialize, Serialize};

/// A name-only reference to a location (origin or last known location).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NamedLocation {
    pub name: String,
}

/// One character as returned by the listing endpoint.
///
/// Treated as an opaque display payload: fields missing from the response
/// default to empty and nothing is validated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CharacterRecord {
    pub id: u64,
    pub name: String,
    pub status: String,
    pub species: String,
    pub gender: String,
    pub image: String,
    pub origin: NamedLocation,
    pub location: NamedLocation,
}

/// Pagination metadata of a listing response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiInfo {
    pub count: u64,
    pub pages: u32,
    pub next: Option<String>,
    pub prev: Option<String>,
}

/// One page of results.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultPage {
    #[serde(default)]
    pub info: ApiInfo,
    #[serde(default)]
    pub results: Vec<CharacterRecord>,
}

impl ResultPage {
    /// The "no matches" page: zero count, zero pages, no items.
    pub fn empty() -> Self {
        Self::default()
    }

    pub const fn total_count(&self) -> u64 {
        self.info.count
    }

    pub const fn total_pages(&self) -> u32 {
        self.info.pages
    }

    pub fn items(&self) -> &[CharacterRecord] {
        &self.results
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}
