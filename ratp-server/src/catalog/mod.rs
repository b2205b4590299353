//! Reference line dataset client.
//!
//! Downloads the operator's line catalog: one record per line, with its
//! opaque id, display name, transport mode and operator metadata.

mod client;
mod error;

pub use client::{
    CatalogClient, CatalogClientConfig, DEFAULT_CATALOG_URL, RawLineEntry, parse_catalog,
};
pub use error::CatalogError;
