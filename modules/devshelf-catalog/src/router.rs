// Provider routing: which adapter(s) serve a query.
//
//   explicit provider          → that provider alone
//   no provider, type unset    → mixed (article + video + book)
//   video                      → youtube
//   pdf, or book/doc + "free"  → googlebooks
//   book/doc                   → openlibrary
//   article                    → devto

use devshelf_common::{ResourceQuery, ResourceType};
use tracing::debug;

use crate::providers::ProviderKind;

/// Adapters invoked in mixed mode, in invocation order. De-duplication keeps
/// the copy from whichever comes first.
pub const MIXED_LINEUP: [ProviderKind; 3] = [
    ProviderKind::DevTo,
    ProviderKind::YouTube,
    ProviderKind::GoogleBooks,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Single(ProviderKind),
    Mixed,
}

/// Parse the `provider` request parameter. "mixed", blank, and unknown names
/// all mean "no explicit provider".
pub fn parse_selection(raw: Option<&str>) -> Option<ProviderKind> {
    let raw = raw.map(str::trim).filter(|s| !s.is_empty())?;
    if raw.eq_ignore_ascii_case("mixed") {
        return None;
    }
    raw.parse::<ProviderKind>()
        .map_err(|e| debug!(error = %e, "Ignoring provider selection"))
        .ok()
}

pub fn route(selection: Option<ProviderKind>, query: &ResourceQuery) -> Route {
    if let Some(kind) = selection {
        return Route::Single(kind);
    }

    match query.resource_type {
        None => Route::Mixed,
        Some(ResourceType::Video) => Route::Single(ProviderKind::YouTube),
        Some(ResourceType::Pdf) => Route::Single(ProviderKind::GoogleBooks),
        Some(ResourceType::Book | ResourceType::Doc) if query.wants_free() => {
            Route::Single(ProviderKind::GoogleBooks)
        }
        Some(ResourceType::Book | ResourceType::Doc) => Route::Single(ProviderKind::OpenLibrary),
        Some(ResourceType::Article) => Route::Single(ProviderKind::DevTo),
    }
}
