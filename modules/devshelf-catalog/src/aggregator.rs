use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use devshelf_common::{Config, PaginatedResult, Resource, ResourceQuery, Total};
use futures::future::join_all;
use tracing::{info, warn};

use crate::error::{CatalogError, Result};
use crate::fallback;
use crate::filter::retain_type;
use crate::normalize::MISSING_URL;
use crate::paginator::paginate;
use crate::providers::{
    CatalogProvider, DevToProvider, FreeBooksProvider, GoogleBooksProvider, OpenLibraryProvider,
    ProviderKind, YouTubeProvider,
};
use crate::router::{route, Route, MIXED_LINEUP};

/// Adapters invoked in mixed mode share the page between them.
const MIXED_SHARE: u32 = 3;

/// Routing table plus the two aggregation modes. Holds no per-request state,
/// so one instance serves every request.
#[derive(Default, Clone)]
pub struct Aggregator {
    providers: HashMap<ProviderKind, Arc<dyn CatalogProvider>>,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every adapter, wired to the configured base URLs and credentials.
    pub fn from_config(config: &Config) -> Self {
        Self::new()
            .with(Arc::new(DevToProvider::from_config(config)))
            .with(Arc::new(YouTubeProvider::from_config(config)))
            .with(Arc::new(GoogleBooksProvider::from_config(config)))
            .with(Arc::new(OpenLibraryProvider::from_config(config)))
            .with(Arc::new(FreeBooksProvider::from_config(config)))
    }

    pub fn with(mut self, provider: Arc<dyn CatalogProvider>) -> Self {
        self.register(provider);
        self
    }

    /// Add or replace the adapter for `provider.kind()`.
    pub fn register(&mut self, provider: Arc<dyn CatalogProvider>) {
        self.providers.insert(provider.kind(), provider);
    }

    pub fn provider(&self, kind: ProviderKind) -> Option<&Arc<dyn CatalogProvider>> {
        self.providers.get(&kind)
    }

    /// Registered adapters in routing-table order, with their availability.
    pub fn availability(&self) -> Vec<(ProviderKind, bool)> {
        ProviderKind::ALL
            .into_iter()
            .filter_map(|kind| self.provider(kind).map(|p| (kind, p.is_available())))
            .collect()
    }

    /// Route, fetch, and paginate. Errors are returned as-is; see `search` for
    /// the variant that never fails.
    pub async fn aggregate(
        &self,
        query: &ResourceQuery,
        selection: Option<ProviderKind>,
    ) -> Result<PaginatedResult> {
        match route(selection, query) {
            Route::Single(kind) => self.single(kind, query).await,
            Route::Mixed => self.mixed(query).await,
        }
    }

    /// `aggregate`, with any failure absorbed by the built-in catalog.
    pub async fn search(
        &self,
        query: &ResourceQuery,
        selection: Option<ProviderKind>,
    ) -> PaginatedResult {
        match self.aggregate(query, selection).await {
            Ok(result) => result,
            Err(e) => {
                warn!(error = %e, "Provider lookup failed, serving built-in catalog");
                fallback::respond(query)
            }
        }
    }

    async fn single(&self, kind: ProviderKind, query: &ResourceQuery) -> Result<PaginatedResult> {
        let provider = self
            .provider(kind)
            .ok_or_else(|| CatalogError::NotRegistered(kind.to_string()))?;

        let page = provider.fetch_page(query).await?;
        let mut result = paginate(provider.as_ref(), query, page).await;

        // Upstreams don't all honor the type filter.
        result.items = retain_type(std::mem::take(&mut result.items), query.resource_type);

        info!(
            provider = %kind,
            page = query.page,
            count = result.items.len(),
            "Single-provider page"
        );
        Ok(result)
    }

    /// Fan out to the mixed lineup concurrently. A failed adapter contributes
    /// nothing; only all of them failing is an error. Results are not
    /// re-filtered locally and `totalPages` is always 1.
    async fn mixed(&self, query: &ResourceQuery) -> Result<PaginatedResult> {
        let lineup: Vec<&Arc<dyn CatalogProvider>> = MIXED_LINEUP
            .iter()
            .filter_map(|kind| self.provider(*kind))
            .filter(|p| p.is_available())
            .collect();
        if lineup.is_empty() {
            return Err(CatalogError::AllProvidersFailed);
        }

        let share = query.page_size.div_ceil(MIXED_SHARE);
        let sub_query = query.clone().page_size(share);

        let outcomes = join_all(lineup.iter().map(|p| p.fetch_page(&sub_query))).await;

        let mut merged: Vec<Resource> = Vec::new();
        let mut failures = 0;
        for (provider, outcome) in lineup.iter().zip(outcomes) {
            match outcome {
                Ok(page) => merged.extend(page.items),
                Err(e) => {
                    warn!(provider = %provider.kind(), error = %e, "Mixed-mode provider failed");
                    failures += 1;
                }
            }
        }
        if failures == lineup.len() {
            return Err(CatalogError::AllProvidersFailed);
        }

        let items = dedupe_by_url(merged);
        let on_page = items.len().min(query.page_size as usize) as u64;
        info!(providers = lineup.len(), failures, count = on_page, "Mixed page");

        Ok(PaginatedResult::new(
            items,
            Total::Estimated(on_page),
            query.page,
            query.page_size,
            1,
            false,
        ))
    }
}

/// Drop later copies of a URL; the first-seen copy keeps its position.
/// Items without a real link are never considered duplicates of each other.
pub fn dedupe_by_url(items: Vec<Resource>) -> Vec<Resource> {
    let mut seen: HashSet<String> = HashSet::new();
    items
        .into_iter()
        .filter(|r| r.url == MISSING_URL || seen.insert(r.url.clone()))
        .collect()
}
