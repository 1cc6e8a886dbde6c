//! Catalog Adapter - 远端音色目录客户端

mod dto;
mod http_catalog_client;

pub use dto::{normalize_catalog, normalize_entry, RawCatalogEntry};
pub use http_catalog_client::*;
