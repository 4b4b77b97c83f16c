use std::time::Duration;

use async_trait::async_trait;
use devshelf_common::{Config, ResourceQuery, ResourceType};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use super::{
    capped, get_json, http_client, CatalogProvider, ProviderKind, ProviderPage, UpstreamCount,
};
use crate::error::Result;
use crate::normalize::RawResource;

const MAX_LIMIT: u32 = 50;
const MAX_SUBJECT_TAGS: usize = 8;

/// Public links always point at the real site, whatever base URL the
/// search is pointed at.
const SITE_URL: &str = "https://openlibrary.org";

const FIELDS: &str = "key,title,author_name,subject,first_sentence,ratings_average";

/// Open Library search. Page-numbered with an exact `numFound`.
pub struct OpenLibraryProvider {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchResponse {
    #[serde(default)]
    num_found: u64,
    #[serde(default)]
    docs: Vec<Doc>,
}

#[derive(Debug, Deserialize)]
struct Doc {
    key: String,
    title: Option<String>,
    #[serde(default)]
    author_name: Vec<String>,
    #[serde(default)]
    subject: Vec<String>,
    /// A string on some records, a list of strings on others.
    first_sentence: Option<Value>,
    ratings_average: Option<f32>,
}

impl OpenLibraryProvider {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: http_client(timeout),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            &config.open_library_base_url,
            Duration::from_secs(config.provider_timeout_secs),
        )
    }
}

fn first_text(value: Option<Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s),
        Value::Array(values) => values.into_iter().find_map(|v| match v {
            Value::String(s) => Some(s),
            _ => None,
        }),
        _ => None,
    }
}

impl Doc {
    fn into_raw(self, resource_type: ResourceType) -> RawResource {
        let id = self.key.rsplit('/').next().unwrap_or(&self.key).to_string();
        RawResource {
            title: self.title,
            description: first_text(self.first_sentence),
            url: Some(format!("{SITE_URL}{}", self.key)),
            resource_type: Some(resource_type),
            tags: self.subject.into_iter().take(MAX_SUBJECT_TAGS).collect(),
            author: (!self.author_name.is_empty()).then(|| self.author_name.join(", ")),
            rating: self.ratings_average,
            ..RawResource::new(format!("openlibrary-{id}"))
        }
    }
}

#[async_trait]
impl CatalogProvider for OpenLibraryProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::OpenLibrary
    }

    async fn fetch_page(&self, query: &ResourceQuery) -> Result<ProviderPage> {
        let limit = capped(query.page_size, MAX_LIMIT);
        let term = query.search_term();
        let params = [
            ("q", term.to_string()),
            ("page", query.page.to_string()),
            ("limit", limit.to_string()),
            ("fields", FIELDS.to_string()),
        ];

        let resource_type = match query.resource_type {
            Some(ResourceType::Doc) => ResourceType::Doc,
            _ => ResourceType::Book,
        };

        debug!(term, page = query.page, limit, "Searching Open Library");
        let url = format!("{}/search.json", self.base_url);
        let resp: SearchResponse = get_json(self.client.get(&url).query(&params)).await?;

        let items = resp
            .docs
            .into_iter()
            .map(|doc| doc.into_raw(resource_type).into_resource())
            .collect();
        Ok(ProviderPage::new(items, UpstreamCount::Exact(resp.num_found)))
    }
}
