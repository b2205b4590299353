//! Build lookup tables from the reference catalog.

use std::collections::BTreeMap;

use tracing::{info, warn};

use crate::catalog::RawLineEntry;
use crate::domain::{Category, LineRecord, ModeTable, UnknownTransportMode};

/// Category → (display name → opaque line id).
pub type ConversionTable = BTreeMap<Category, BTreeMap<String, String>>;

/// Opaque line id → metadata, for one category.
pub type LineCatalog = BTreeMap<String, LineRecord>;

/// Immutable snapshot of everything ingestion produces.
///
/// Built once per ingestion run, then shared read-only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineTables {
    conversion: ConversionTable,
    catalogs: BTreeMap<Category, LineCatalog>,
}

impl LineTables {
    /// Assemble tables from their parts.
    ///
    /// Every category gets an entry in both maps, empty if absent.
    pub fn from_parts(
        mut conversion: ConversionTable,
        mut catalogs: BTreeMap<Category, LineCatalog>,
    ) -> Self {
        for category in Category::ALL {
            conversion.entry(category).or_default();
            catalogs.entry(category).or_default();
        }
        Self {
            conversion,
            catalogs,
        }
    }

    /// Empty tables (no lines in any category).
    pub fn empty() -> Self {
        Self::from_parts(BTreeMap::new(), BTreeMap::new())
    }

    /// The combined name → id table.
    pub fn conversion(&self) -> &ConversionTable {
        &self.conversion
    }

    /// Catalog of one category, keyed by opaque line id.
    pub fn catalog(&self, category: Category) -> &LineCatalog {
        // from_parts guarantees every category is present
        &self.catalogs[&category]
    }

    /// Look up the opaque id of a line by its display name.
    pub fn line_id(&self, category: Category, display_name: &str) -> Option<&str> {
        self.conversion
            .get(&category)
            .and_then(|names| names.get(display_name))
            .map(String::as_str)
    }

    /// Every line of a category, sorted by display name.
    pub fn lines(&self, category: Category) -> Vec<(&str, &LineRecord)> {
        let mut lines: Vec<_> = self
            .catalog(category)
            .iter()
            .map(|(id, record)| (id.as_str(), record))
            .collect();
        lines.sort_by(|a, b| a.1.display_name.cmp(&b.1.display_name).then(a.0.cmp(b.0)));
        lines
    }

    /// Find a line by opaque id, whatever its category.
    pub fn line(&self, line_id: &str) -> Option<(Category, &LineRecord)> {
        self.catalogs
            .iter()
            .find_map(|(category, catalog)| catalog.get(line_id).map(|r| (*category, r)))
    }

    /// Lines whose display name contains `name` (case-insensitive).
    ///
    /// Returns at most `limit` matches, in category then display-name order.
    pub fn search(&self, name: &str, limit: usize) -> Vec<LineMatch<'_>> {
        let needle = name.to_lowercase();

        Category::ALL
            .into_iter()
            .flat_map(|category| {
                self.lines(category)
                    .into_iter()
                    .map(move |(id, record)| LineMatch {
                        category,
                        line_id: id,
                        record,
                    })
            })
            .filter(|m| m.record.display_name.to_lowercase().contains(&needle))
            .take(limit)
            .collect()
    }

    /// Total number of lines across all categories.
    pub fn len(&self) -> usize {
        self.catalogs.values().map(BTreeMap::len).sum()
    }

    /// Check if no line was ingested.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A line returned by [`LineTables::search`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineMatch<'a> {
    pub category: Category,
    pub line_id: &'a str,
    pub record: &'a LineRecord,
}

/// Transforms raw catalog entries into [`LineTables`].
#[derive(Debug, Clone, Default)]
pub struct TableBuilder {
    modes: ModeTable,
}

impl TableBuilder {
    /// Create a builder using the given mode table.
    pub fn new(modes: ModeTable) -> Self {
        Self { modes }
    }

    /// Build tables from catalog entries, in input order.
    ///
    /// A display name repeated within a category keeps the id of its last
    /// occurrence. Any unknown transport mode aborts the whole build.
    pub fn build(&self, entries: &[RawLineEntry]) -> Result<LineTables, UnknownTransportMode> {
        let mut conversion = ConversionTable::new();
        let mut catalogs: BTreeMap<Category, LineCatalog> = BTreeMap::new();

        for entry in entries {
            let category = self.modes.normalize(&entry.transport_mode)?;

            let previous = conversion
                .entry(category)
                .or_default()
                .insert(entry.name_line.clone(), entry.id_line.clone());

            if let Some(previous) = previous
                && previous != entry.id_line
            {
                warn!(
                    %category,
                    name = %entry.name_line,
                    replaced = %previous,
                    by = %entry.id_line,
                    "duplicate line name, keeping the later id"
                );
            }

            catalogs.entry(category).or_default().insert(
                entry.id_line.clone(),
                LineRecord {
                    group_name: entry.group_name.clone(),
                    display_name: entry.name_line.clone(),
                    operator_name: entry.operator_name.clone(),
                    network_name: entry.network_name.clone(),
                },
            );
        }

        let tables = LineTables::from_parts(conversion, catalogs);
        info!(lines = tables.len(), entries = entries.len(), "built line tables");
        Ok(tables)
    }
}

/// Build tables with the default mode table.
pub fn build_tables(entries: &[RawLineEntry]) -> Result<LineTables, UnknownTransportMode> {
    TableBuilder::default().build(entries)
}
