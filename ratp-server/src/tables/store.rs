//! Durable storage for line tables.
//!
//! A build produces five JSON documents: one catalog per category
//! (`{category}_lines.json`) and the combined `conversion_table.json`.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::domain::Category;

use super::builder::{ConversionTable, LineCatalog, LineTables};

/// File name of the combined conversion table.
pub const CONVERSION_TABLE_FILE: &str = "conversion_table.json";

/// Errors from a table store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No tables have been written yet
    #[error("no line tables at {path} (run ingestion first)")]
    NotFound { path: PathBuf },

    /// Filesystem operation failed
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to serialize an artifact
    #[error("failed to serialize {name}: {message}")]
    Serialize { name: String, message: String },

    /// A persisted artifact is not valid
    #[error("invalid artifact {path}: {message}")]
    Deserialize { path: PathBuf, message: String },
}

/// Somewhere line tables can be saved to and loaded from.
pub trait TableStore {
    /// Persist a complete set of tables, replacing any previous one.
    fn save(&self, tables: &LineTables) -> Result<(), StoreError>;

    /// Load the last saved tables.
    fn load(&self) -> Result<LineTables, StoreError>;
}

/// File name of a category catalog.
pub fn catalog_file(category: Category) -> String {
    format!("{}_lines.json", category.as_str())
}

/// Stores tables as JSON documents in a directory.
///
/// Each document is written to a temporary file next to its target and
/// renamed into place, so readers never see a half-written artifact.
#[derive(Debug, Clone)]
pub struct JsonDirStore {
    dir: PathBuf,
}

impl JsonDirStore {
    /// Create a store rooted at the given directory.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The directory artifacts are written to.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn write_atomic(&self, name: &str, contents: &str) -> Result<(), StoreError> {
        let path = self.dir.join(name);
        let io_err = |source| StoreError::Io {
            path: path.clone(),
            source,
        };

        let mut file = NamedTempFile::new_in(&self.dir).map_err(io_err)?;
        file.write_all(contents.as_bytes()).map_err(io_err)?;
        file.as_file().sync_all().map_err(io_err)?;
        file.persist(&path).map_err(|e| io_err(e.error))?;

        debug!(path = %path.display(), bytes = contents.len(), "wrote artifact");
        Ok(())
    }

    fn read<T: DeserializeOwned>(&self, name: &str) -> Result<T, StoreError> {
        let path = self.dir.join(name);

        let contents = match std::fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StoreError::NotFound { path });
            }
            Err(source) => return Err(StoreError::Io { path, source }),
        };

        serde_json::from_str(&contents).map_err(|e| StoreError::Deserialize {
            path,
            message: e.to_string(),
        })
    }
}

fn to_json<T: Serialize>(name: &str, value: &T) -> Result<String, StoreError> {
    serde_json::to_string_pretty(value).map_err(|e| StoreError::Serialize {
        name: name.to_string(),
        message: e.to_string(),
    })
}

impl TableStore for JsonDirStore {
    fn save(&self, tables: &LineTables) -> Result<(), StoreError> {
        // Serialize everything before touching the disk
        let mut documents = Vec::with_capacity(Category::ALL.len() + 1);
        for category in Category::ALL {
            let name = catalog_file(category);
            let json = to_json(&name, tables.catalog(category))?;
            documents.push((name, json));
        }
        documents.push((
            CONVERSION_TABLE_FILE.to_string(),
            to_json(CONVERSION_TABLE_FILE, tables.conversion())?,
        ));

        std::fs::create_dir_all(&self.dir).map_err(|source| StoreError::Io {
            path: self.dir.clone(),
            source,
        })?;

        for (name, json) in &documents {
            self.write_atomic(name, json)?;
        }

        info!(dir = %self.dir.display(), lines = tables.len(), "saved line tables");
        Ok(())
    }

    fn load(&self) -> Result<LineTables, StoreError> {
        let conversion: ConversionTable = self.read(CONVERSION_TABLE_FILE)?;

        let mut catalogs = BTreeMap::new();
        for category in Category::ALL {
            let catalog: LineCatalog = self.read(&catalog_file(category))?;
            catalogs.insert(category, catalog);
        }

        let tables = LineTables::from_parts(conversion, catalogs);
        info!(dir = %self.dir.display(), lines = tables.len(), "loaded line tables");
        Ok(tables)
    }
}

/// Keeps tables in memory. Counts saves so callers can check that a failed
/// run wrote nothing.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<Option<LineTables>>,
    saves: Mutex<usize>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful saves so far.
    pub fn saves(&self) -> usize {
        *self.saves.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl TableStore for MemoryStore {
    fn save(&self, tables: &LineTables) -> Result<(), StoreError> {
        *self.tables.lock().unwrap_or_else(|e| e.into_inner()) = Some(tables.clone());
        *self.saves.lock().unwrap_or_else(|e| e.into_inner()) += 1;
        Ok(())
    }

    fn load(&self) -> Result<LineTables, StoreError> {
        self.tables
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
            .ok_or_else(|| StoreError::NotFound {
                path: PathBuf::from("<memory>"),
            })
    }
}
