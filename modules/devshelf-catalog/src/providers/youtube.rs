use std::time::Duration;

use async_trait::async_trait;
use devshelf_common::{Config, ResourceQuery, ResourceType};
use serde::Deserialize;
use tracing::{debug, warn};

use super::{
    capped, get_json, http_client, CatalogProvider, ProviderKind, ProviderPage, UpstreamCount,
};
use crate::error::{CatalogError, Result};
use crate::normalize::RawResource;

const MAX_RESULTS: u32 = 50;
const WATCH_URL: &str = "https://www.youtube.com/watch?v=";

/// YouTube Data API v3 video search. Paginated by opaque continuation
/// tokens, so page N means walking N-1 tokens from the start.
pub struct YouTubeProvider {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
    next_page_token: Option<String>,
    page_info: Option<PageInfo>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageInfo {
    total_results: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    id: ItemId,
    snippet: Option<Snippet>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ItemId {
    video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Snippet {
    title: Option<String>,
    description: Option<String>,
    channel_title: Option<String>,
}

impl YouTubeProvider {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>, timeout: Duration) -> Self {
        Self {
            client: http_client(timeout),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            &config.youtube_base_url,
            config.youtube_api_key.clone(),
            Duration::from_secs(config.provider_timeout_secs),
        )
    }

    async fn search(
        &self,
        api_key: &str,
        term: &str,
        max_results: u32,
        page_token: Option<&str>,
    ) -> Result<SearchResponse> {
        let mut params = vec![
            ("part", "snippet".to_string()),
            ("type", "video".to_string()),
            ("q", term.to_string()),
            ("maxResults", max_results.to_string()),
            ("key", api_key.to_string()),
        ];
        if let Some(token) = page_token {
            params.push(("pageToken", token.to_string()));
        }

        let url = format!("{}/search", self.base_url);
        get_json(self.client.get(&url).query(&params)).await
    }

    /// Follow continuation tokens from page 1 up to `page`. `None` when the
    /// chain ends (or a hop fails) before getting there.
    async fn token_for_page(
        &self,
        api_key: &str,
        term: &str,
        max_results: u32,
        page: u32,
    ) -> Option<String> {
        let mut token: Option<String> = None;
        for hop in 1..page {
            let resp = match self.search(api_key, term, max_results, token.as_deref()).await {
                Ok(resp) => resp,
                Err(e) => {
                    warn!(hop, error = %e, "YouTube cursor walk failed");
                    return None;
                }
            };
            match resp.next_page_token {
                Some(next) => token = Some(next),
                None => {
                    debug!(hop, page, "YouTube results end before requested page");
                    return None;
                }
            }
        }
        token
    }
}

impl SearchItem {
    fn into_raw(self) -> Option<RawResource> {
        let video_id = self.id.video_id?;
        let snippet = self.snippet;
        let (title, description, author) = match snippet {
            Some(s) => (s.title, s.description, s.channel_title),
            None => (None, None, None),
        };
        Some(RawResource {
            title,
            description,
            author,
            url: Some(format!("{WATCH_URL}{video_id}")),
            resource_type: Some(ResourceType::Video),
            ..RawResource::new(format!("youtube-{video_id}"))
        })
    }
}

#[async_trait]
impl CatalogProvider for YouTubeProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::YouTube
    }

    fn is_available(&self) -> bool {
        self.api_key.is_some()
    }

    async fn fetch_page(&self, query: &ResourceQuery) -> Result<ProviderPage> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(CatalogError::MissingCredential("YOUTUBE_API_KEY"))?;
        let term = query.search_term();
        let max_results = capped(query.page_size, MAX_RESULTS);

        let token = if query.page > 1 {
            match self
                .token_for_page(api_key, term, max_results, query.page)
                .await
            {
                Some(token) => Some(token),
                None => return Ok(ProviderPage::past_end()),
            }
        } else {
            None
        };

        debug!(page = query.page, term, "Searching YouTube");
        let resp = self
            .search(api_key, term, max_results, token.as_deref())
            .await?;

        let items = resp
            .items
            .into_iter()
            .filter_map(SearchItem::into_raw)
            .map(RawResource::into_resource)
            .collect();
        let count = resp
            .page_info
            .and_then(|info| info.total_results)
            .map(UpstreamCount::Approximate)
            .unwrap_or(UpstreamCount::Unknown);

        Ok(ProviderPage {
            items,
            count,
            has_more: Some(resp.next_page_token.is_some()),
        })
    }
}
