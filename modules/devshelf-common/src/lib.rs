pub mod types;
pub mod query;
pub mod config;
pub mod error;

pub use types::*;
pub use query::{ResourceParams, ResourceQuery};
pub use config::Config;
pub use error::DevShelfError;
