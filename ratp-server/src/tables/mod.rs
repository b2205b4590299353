//! Line lookup tables.
//!
//! Ingestion turns the reference catalog into a per-category conversion
//! table (display name → opaque line id) and per-category line catalogs
//! (opaque line id → metadata), then persists them through a
//! [`TableStore`]. At query time the tables are a read-only snapshot.

mod builder;
mod ingest;
mod store;

pub use builder::{
    ConversionTable, LineCatalog, LineMatch, LineTables, TableBuilder, build_tables,
};
pub use ingest::{IngestError, ingest};
pub use store::{
    CONVERSION_TABLE_FILE, JsonDirStore, MemoryStore, StoreError, TableStore, catalog_file,
};

#[cfg(test)]
pub(crate) use builder::test_support;
