// Provider adapters: one per external catalog, all behind CatalogProvider.
//
// Each adapter builds its own request, maps the native schema into
// RawResource, and lets normalize fill in the defaults. Adapters hold no
// mutable state; the only side effect is the outbound call.

mod devto;
mod free_books;
mod google_books;
mod open_library;
mod youtube;

pub use devto::DevToProvider;
pub use free_books::FreeBooksProvider;
pub use google_books::GoogleBooksProvider;
pub use open_library::OpenLibraryProvider;
pub use youtube::YouTubeProvider;

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use devshelf_common::{Resource, ResourceQuery};
use serde::de::DeserializeOwned;

use crate::error::{CatalogError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    DevTo,
    YouTube,
    GoogleBooks,
    OpenLibrary,
    FreeBooks,
}

impl ProviderKind {
    pub const ALL: [ProviderKind; 5] = [
        ProviderKind::DevTo,
        ProviderKind::YouTube,
        ProviderKind::GoogleBooks,
        ProviderKind::OpenLibrary,
        ProviderKind::FreeBooks,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::DevTo => "devto",
            ProviderKind::YouTube => "youtube",
            ProviderKind::GoogleBooks => "googlebooks",
            ProviderKind::OpenLibrary => "openlibrary",
            ProviderKind::FreeBooks => "freebooks",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        ProviderKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == lower)
            .ok_or_else(|| format!("unknown provider: {lower}"))
    }
}

/// How much the upstream told us about the size of the full result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpstreamCount {
    /// No count at all; pagination has to look at the next page.
    Unknown,
    Exact(u64),
    /// A count the upstream itself labels as a ballpark.
    Approximate(u64),
}

/// One page of normalized results from a single provider.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderPage {
    pub items: Vec<Resource>,
    pub count: UpstreamCount,
    /// Set when the provider knows for certain whether another page exists.
    pub has_more: Option<bool>,
}

impl ProviderPage {
    pub fn new(items: Vec<Resource>, count: UpstreamCount) -> Self {
        Self {
            items,
            count,
            has_more: None,
        }
    }

    /// Nothing here and nothing after. The size of the result set is not
    /// known, only that it ends before this page.
    pub fn past_end() -> Self {
        Self {
            items: Vec::new(),
            count: UpstreamCount::Unknown,
            has_more: Some(false),
        }
    }
}

#[async_trait]
pub trait CatalogProvider: Send + Sync {
    fn kind(&self) -> ProviderKind;

    /// False when a required credential is missing.
    fn is_available(&self) -> bool {
        true
    }

    /// Fetch one page for `query`. Fails on network, status, parse, or
    /// missing-credential errors; callers decide whether that is fatal.
    async fn fetch_page(&self, query: &ResourceQuery) -> Result<ProviderPage>;
}

pub(crate) fn http_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!("devshelf/", env!("CARGO_PKG_VERSION")))
        .build()
        .unwrap_or_default()
}

/// Send a request and decode a JSON body, mapping non-2xx to `CatalogError::Api`.
pub(crate) async fn get_json<T: DeserializeOwned>(request: reqwest::RequestBuilder) -> Result<T> {
    let resp = request.send().await?;

    let status = resp.status();
    if !status.is_success() {
        let message = resp.text().await.unwrap_or_default();
        return Err(CatalogError::Api {
            status: status.as_u16(),
            message,
        });
    }

    let body = resp.text().await?;
    Ok(serde_json::from_str(&body)?)
}

/// Provider page size: what the caller asked for, capped at the upstream maximum.
pub(crate) fn capped(page_size: u32, max: u32) -> u32 {
    page_size.clamp(1, max)
}
