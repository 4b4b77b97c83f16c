use std::time::Duration;

use async_trait::async_trait;
use devshelf_common::{Config, ResourceQuery};
use serde::Deserialize;
use tracing::debug;

use super::{
    capped, get_json, http_client, CatalogProvider, ProviderKind, ProviderPage, UpstreamCount,
};
use crate::error::Result;
use crate::normalize::RawResource;

const MAX_PER_PAGE: u32 = 100;

/// dev.to article feed. No free-text search and no total count: the feed is
/// filtered by a single tag and paginated by page number.
pub struct DevToProvider {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct Article {
    id: u64,
    title: Option<String>,
    description: Option<String>,
    url: Option<String>,
    #[serde(default)]
    tag_list: Vec<String>,
    user: Option<Author>,
    public_reactions_count: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct Author {
    name: Option<String>,
}

impl DevToProvider {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: http_client(timeout),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            &config.devto_base_url,
            Duration::from_secs(config.provider_timeout_secs),
        )
    }
}

/// The feed tag for a query: first requested tag, else the first word of the
/// text reduced to a slug. `None` means the untagged latest feed.
pub(crate) fn feed_tag(query: &ResourceQuery) -> Option<String> {
    if let Some(tag) = query.tags.first() {
        return slug(tag);
    }
    query
        .query
        .as_deref()
        .and_then(|text| text.split_whitespace().next())
        .and_then(slug)
}

fn slug(word: &str) -> Option<String> {
    let slug: String = word
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect();
    (!slug.is_empty()).then_some(slug)
}

/// Reactions mapped onto a 0-5 scale, saturating at 100.
fn reactions_rating(reactions: u32) -> f32 {
    (reactions.min(100) as f32) / 20.0
}

impl Article {
    fn into_raw(self) -> RawResource {
        RawResource {
            title: self.title,
            description: self.description,
            url: self.url,
            tags: self.tag_list,
            author: self.user.and_then(|u| u.name),
            rating: self.public_reactions_count.map(reactions_rating),
            ..RawResource::new(format!("devto-{}", self.id))
        }
    }
}

#[async_trait]
impl CatalogProvider for DevToProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::DevTo
    }

    async fn fetch_page(&self, query: &ResourceQuery) -> Result<ProviderPage> {
        let per_page = capped(query.page_size, MAX_PER_PAGE);
        let mut params = vec![
            ("page", query.page.to_string()),
            ("per_page", per_page.to_string()),
        ];
        let tag = feed_tag(query);
        if let Some(tag) = &tag {
            params.push(("tag", tag.clone()));
        }

        debug!(page = query.page, per_page, tag = ?tag, "Fetching dev.to articles");
        let url = format!("{}/articles", self.base_url);
        let articles: Vec<Article> = get_json(self.client.get(&url).query(&params)).await?;

        let items = articles
            .into_iter()
            .map(|a| a.into_raw().into_resource())
            .collect();
        Ok(ProviderPage::new(items, UpstreamCount::Unknown))
    }
}
