use std::time::Duration;

use async_trait::async_trait;
use devshelf_common::{Config, ResourceQuery, ResourceType};
use serde::Deserialize;
use tracing::debug;
use url::Url;

use super::{
    capped, get_json, http_client, CatalogProvider, ProviderKind, ProviderPage, UpstreamCount,
};
use crate::error::{CatalogError, Result};
use crate::normalize::RawResource;

const MAX_PAGE: u32 = 50;

/// dbooks.org free-book listing. The upstream returns one unpaginated list
/// (a search or the recent feed); pages are sliced out locally.
pub struct FreeBooksProvider {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct ListResponse {
    status: Option<String>,
    #[serde(default)]
    books: Vec<Book>,
}

#[derive(Debug, Deserialize)]
struct Book {
    id: String,
    title: Option<String>,
    subtitle: Option<String>,
    authors: Option<String>,
    url: Option<String>,
}

impl FreeBooksProvider {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: http_client(timeout),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            &config.free_books_base_url,
            Duration::from_secs(config.provider_timeout_secs),
        )
    }

    /// `/search/{term}` when the caller searched for something, else `/recent`.
    fn list_url(&self, query: &ResourceQuery) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)?;
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| CatalogError::Parse(format!("not a base URL: {}", self.base_url)))?;
            segments.pop_if_empty();
            if query.query.is_some() || !query.tags.is_empty() {
                segments.push("search").push(query.search_term());
            } else {
                segments.push("recent");
            }
        }
        Ok(url)
    }
}

impl Book {
    fn into_raw(self) -> RawResource {
        RawResource {
            title: self.title,
            description: self.subtitle,
            url: self.url,
            resource_type: Some(ResourceType::Pdf),
            author: self.authors,
            tags: vec!["free".to_string()],
            ..RawResource::new(format!("freebooks-{}", self.id))
        }
    }
}

#[async_trait]
impl CatalogProvider for FreeBooksProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::FreeBooks
    }

    async fn fetch_page(&self, query: &ResourceQuery) -> Result<ProviderPage> {
        let url = self.list_url(query)?;
        debug!(url = %url, page = query.page, "Listing free books");
        let resp: ListResponse = get_json(self.client.get(url)).await?;

        // "not found" comes back as a 200 with a non-ok status.
        if resp.status.as_deref().is_some_and(|s| s != "ok") {
            return Ok(ProviderPage::new(Vec::new(), UpstreamCount::Unknown));
        }

        let per_page = capped(query.page_size, MAX_PAGE) as usize;
        let skip = (query.page.max(1) as usize - 1).saturating_mul(per_page);
        let items = resp
            .books
            .into_iter()
            .skip(skip)
            .take(per_page)
            .map(|b| b.into_raw().into_resource())
            .collect();
        Ok(ProviderPage::new(items, UpstreamCount::Unknown))
    }
}
