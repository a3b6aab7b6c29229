//! Asset lookup and caching
//!
//! - Resource names resolved against the configured folders
//! - Shared, path-keyed caching of decoded assets

mod cache;
mod locator;

pub use cache::AssetCache;
pub use locator::{ResourceError, ResourceKind, Resources};
