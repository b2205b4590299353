//! The ingestion batch: fetch, build, persist.

use tracing::info;

use crate::catalog::{CatalogClient, CatalogError};
use crate::domain::UnknownTransportMode;

use super::builder::{LineTables, TableBuilder};
use super::store::{StoreError, TableStore};

/// Errors that abort an ingestion run.
///
/// Nothing is persisted unless every step before the save succeeded.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    UnknownMode(#[from] UnknownTransportMode),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Fetch the reference catalog, build the tables and save them.
///
/// Returns the tables that were saved.
pub async fn ingest<S: TableStore>(
    client: &CatalogClient,
    builder: &TableBuilder,
    store: &S,
) -> Result<LineTables, IngestError> {
    info!("starting line ingestion");

    let entries = client.fetch_all().await?;
    let tables = builder.build(&entries)?;
    store.save(&tables)?;

    info!(lines = tables.len(), "line ingestion complete");
    Ok(tables)
}
