pub mod aggregator;
pub mod error;
pub mod fallback;
pub mod filter;
pub mod infer;
pub mod normalize;
pub mod paginator;
pub mod providers;
pub mod router;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use aggregator::Aggregator;
pub use error::{CatalogError, Result};
pub use providers::{CatalogProvider, ProviderKind, ProviderPage, UpstreamCount};
pub use router::Route;
