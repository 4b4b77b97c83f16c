use std::time::Duration;

use async_trait::async_trait;
use devshelf_common::{Config, ResourceQuery, ResourceType};
use serde::Deserialize;
use tracing::debug;

use super::{
    capped, get_json, http_client, CatalogProvider, ProviderKind, ProviderPage, UpstreamCount,
};
use crate::error::Result;
use crate::normalize::RawResource;

const MAX_RESULTS: u32 = 40;
const FREE_EBOOKS: &str = "free-ebooks";

/// Google Books volume search. Offset-paginated with an exact `totalItems`.
pub struct GoogleBooksProvider {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VolumesResponse {
    #[serde(default)]
    total_items: u64,
    #[serde(default)]
    items: Vec<Volume>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Volume {
    id: String,
    #[serde(default)]
    volume_info: VolumeInfo,
    access_info: Option<AccessInfo>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VolumeInfo {
    title: Option<String>,
    description: Option<String>,
    #[serde(default)]
    authors: Vec<String>,
    #[serde(default)]
    categories: Vec<String>,
    average_rating: Option<f32>,
    canonical_volume_link: Option<String>,
    info_link: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AccessInfo {
    pdf: Option<Availability>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Availability {
    #[serde(default)]
    is_available: bool,
}

impl GoogleBooksProvider {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>, timeout: Duration) -> Self {
        Self {
            client: http_client(timeout),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            &config.google_books_base_url,
            config.google_books_api_key.clone(),
            Duration::from_secs(config.provider_timeout_secs),
        )
    }
}

/// "Computers / Programming Languages / Python" becomes
/// ["computers", "programming languages", "python"].
fn category_tags(categories: &[String]) -> Vec<String> {
    categories
        .iter()
        .flat_map(|c| c.split('/'))
        .map(|part| part.trim().to_lowercase())
        .filter(|part| !part.is_empty())
        .collect()
}

/// Zero-based offset of `page`. Any `u32` page is accepted.
fn start_index(page: u32, max_results: u32) -> u64 {
    u64::from(page.max(1) - 1).saturating_mul(u64::from(max_results))
}

impl Volume {
    fn into_raw(self) -> RawResource {
        let info = self.volume_info;
        let has_pdf = self
            .access_info
            .and_then(|a| a.pdf)
            .is_some_and(|pdf| pdf.is_available);

        RawResource {
            title: info.title,
            description: info.description,
            url: info.canonical_volume_link.or(info.info_link),
            resource_type: Some(if has_pdf {
                ResourceType::Pdf
            } else {
                ResourceType::Book
            }),
            tags: category_tags(&info.categories),
            author: (!info.authors.is_empty()).then(|| info.authors.join(", ")),
            rating: info.average_rating,
            ..RawResource::new(format!("googlebooks-{}", self.id))
        }
    }
}

#[async_trait]
impl CatalogProvider for GoogleBooksProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::GoogleBooks
    }

    async fn fetch_page(&self, query: &ResourceQuery) -> Result<ProviderPage> {
        let max_results = capped(query.page_size, MAX_RESULTS);
        let start_index = start_index(query.page, max_results);
        let term = query.search_term();

        let mut params = vec![
            ("q", term.to_string()),
            ("startIndex", start_index.to_string()),
            ("maxResults", max_results.to_string()),
        ];
        if query.resource_type == Some(ResourceType::Pdf) || query.wants_free() {
            params.push(("filter", FREE_EBOOKS.to_string()));
        }
        if let Some(key) = &self.api_key {
            params.push(("key", key.clone()));
        }

        debug!(term, start_index, max_results, "Searching Google Books");
        let url = format!("{}/volumes", self.base_url);
        let resp: VolumesResponse = get_json(self.client.get(&url).query(&params)).await?;

        let items = resp
            .items
            .into_iter()
            .map(|v| v.into_raw().into_resource())
            .collect();
        Ok(ProviderPage::new(items, UpstreamCount::Exact(resp.total_items)))
    }
}
