// Test mocks for the aggregation layer.
//
// MockProvider (CatalogProvider): page-number → items map, optional
// failures, and a log of every query it was asked. No network.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use devshelf_common::{Difficulty, Resource, ResourceQuery, ResourceType};

use crate::error::{CatalogError, Result};
use crate::providers::{CatalogProvider, ProviderKind, ProviderPage, UpstreamCount};

// ---------------------------------------------------------------------------
// Resource helpers
// ---------------------------------------------------------------------------

/// An article with every optional field empty.
pub fn resource(id: &str, url: &str) -> Resource {
    typed_resource(id, url, ResourceType::Article)
}

pub fn typed_resource(id: &str, url: &str, resource_type: ResourceType) -> Resource {
    Resource {
        id: id.to_string(),
        title: format!("Resource {id}"),
        description: String::new(),
        url: url.to_string(),
        resource_type,
        language: "general".to_string(),
        framework: None,
        difficulty: Difficulty::Intermediate,
        tags: Vec::new(),
        author: None,
        rating: None,
    }
}

// ---------------------------------------------------------------------------
// MockProvider
// ---------------------------------------------------------------------------

/// Builder pattern: `.on_page()`, `.with_count()`, `.failing()`, `.unavailable()`.
/// Unregistered pages come back empty.
pub struct MockProvider {
    kind: ProviderKind,
    available: bool,
    pages: HashMap<u32, Vec<Resource>>,
    count: UpstreamCount,
    fail_all: bool,
    failing_pages: HashSet<u32>,
    calls: Mutex<Vec<ResourceQuery>>,
}

impl MockProvider {
    pub fn new(kind: ProviderKind) -> Self {
        Self {
            kind,
            available: true,
            pages: HashMap::new(),
            count: UpstreamCount::Unknown,
            fail_all: false,
            failing_pages: HashSet::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn on_page(mut self, page: u32, items: Vec<Resource>) -> Self {
        self.pages.insert(page, items);
        self
    }

    pub fn with_count(mut self, count: UpstreamCount) -> Self {
        self.count = count;
        self
    }

    /// Every call fails with a network error.
    pub fn failing(mut self) -> Self {
        self.fail_all = true;
        self
    }

    pub fn failing_on_page(mut self, page: u32) -> Self {
        self.failing_pages.insert(page);
        self
    }

    /// Behaves like an adapter with no credential configured.
    pub fn unavailable(mut self) -> Self {
        self.available = false;
        self
    }

    pub fn calls(&self) -> Vec<ResourceQuery> {
        self.calls.lock().unwrap().clone()
    }

    pub fn requested_pages(&self) -> Vec<u32> {
        self.calls().iter().map(|q| q.page).collect()
    }
}

#[async_trait]
impl CatalogProvider for MockProvider {
    fn kind(&self) -> ProviderKind {
        self.kind
    }

    fn is_available(&self) -> bool {
        self.available
    }

    async fn fetch_page(&self, query: &ResourceQuery) -> Result<ProviderPage> {
        self.calls.lock().unwrap().push(query.clone());

        if !self.available {
            return Err(CatalogError::MissingCredential("MOCK_API_KEY"));
        }
        if self.fail_all || self.failing_pages.contains(&query.page) {
            return Err(CatalogError::Network(format!(
                "mock {} failure on page {}",
                self.kind, query.page
            )));
        }

        let mut items = self.pages.get(&query.page).cloned().unwrap_or_default();
        items.truncate(query.page_size as usize);
        Ok(ProviderPage::new(items, self.count))
    }
}
