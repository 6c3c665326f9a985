//! History service and view state.
//!
//! The service wraps the store; the view holds the loaded records with the
//! current search text and sort order, and derives the summary cards.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::domain::history::{self, HistoricalRecord, SortKey, Trend};
use crate::ports::HistoryStore;
use crate::CardioError;

/// Thin service over the history store.
pub struct HistoryService<S: ?Sized = dyn HistoryStore> {
    store: Arc<S>,
}

impl<S: ?Sized> Clone for HistoryService<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S> HistoryService<S>
where
    S: HistoryStore + ?Sized,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// # Errors
    /// Returns `CardioError::Store` if the store cannot be read.
    pub fn load(&self) -> Result<Vec<HistoricalRecord>, CardioError> {
        let records = self.store.load_records()?;
        tracing::info!("Loaded {} history records", records.len());
        Ok(records)
    }

    /// # Errors
    /// Returns `CardioError::Store` if the store cannot be written.
    pub fn delete(&self, id: &str) -> Result<bool, CardioError> {
        let removed = self.store.delete_record(id)?;
        tracing::debug!(removed, "History delete");
        Ok(removed)
    }
}

/// Summary cards above the history list.
#[derive(Debug, Clone, PartialEq)]
pub struct HistorySummary<'a> {
    pub total: usize,
    pub latest: Option<&'a HistoricalRecord>,
    pub trend: Option<Trend>,
}

/// Loaded records plus filter state.
#[derive(Debug, Clone, Default)]
pub struct HistoryView {
    records: Vec<HistoricalRecord>,
    pub search: String,
    pub sort: SortKey,
}

impl HistoryView {
    #[must_use]
    pub fn new(records: Vec<HistoricalRecord>) -> Self {
        Self {
            records,
            search: String::new(),
            sort: SortKey::default(),
        }
    }

    #[must_use]
    pub fn records(&self) -> &[HistoricalRecord] {
        &self.records
    }

    /// Records matching the search, in the current sort order.
    #[must_use]
    pub fn visible(&self) -> Vec<&HistoricalRecord> {
        history::query(&self.records, &self.search, self.sort)
    }

    /// Summary over all loaded records, ignoring the search.
    #[must_use]
    pub fn summary(&self) -> HistorySummary<'_> {
        HistorySummary {
            total: self.records.len(),
            latest: history::latest(&self.records),
            trend: history::trend(&self.records),
        }
    }

    pub fn cycle_sort(&mut self) {
        self.sort = self.sort.next();
    }

    /// Drop a record from the local list.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.records.len();
        self.records.retain(|r| r.id != id);
        self.records.len() != before
    }

    /// Write the visible records as pretty JSON into `dir`.
    ///
    /// # Errors
    /// Returns `CardioError::Io` or `CardioError::Serialization` on failure.
    pub fn export_json(&self, dir: &Path) -> Result<PathBuf, CardioError> {
        let stamp = chrono::Local::now().format("%Y%m%d-%H%M%S");
        let path = dir.join(format!("cardiopredict-history-{stamp}.json"));

        let file = File::create(&path)?;
        serde_json::to_writer_pretty(BufWriter::new(file), &self.visible())?;

        tracing::info!("Exported {} history records", self.visible().len());
        Ok(path)
    }
}
