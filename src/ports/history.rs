//! History port: Trait for the store of past assessments.

use crate::domain::HistoricalRecord;

/// Errors that can occur while reading or changing history.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("History unavailable: {0}")]
    Unavailable(String),

    #[error("History store lock poisoned")]
    Poisoned,
}

pub trait HistoryStore: Send + Sync {
    /// Load every stored record, in storage order.
    ///
    /// # Errors
    /// Returns `StoreError` if the backing store cannot be read.
    fn load_records(&self) -> Result<Vec<HistoricalRecord>, StoreError>;

    /// Delete a record by id.
    ///
    /// # Returns
    /// `true` if a record was removed.
    ///
    /// # Errors
    /// Returns `StoreError` if the backing store cannot be written.
    fn delete_record(&self, id: &str) -> Result<bool, StoreError>;
}
