//! Record store seam between the HTTP handlers and the spreadsheet document.
//!
//! Handlers only ever see a [`Ledger`], which either wraps a connected
//! [`SheetStore`] or is the unavailable sentinel left behind by a failed
//! startup.

pub mod google;
pub mod memory;
pub mod service_account;

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use derive_more::Display;
use strum_macros::{AsRefStr, Display as StrumDisplay};

/// One data row keyed by the table's header cells.
pub type Record = HashMap<String, String>;

/// The two logical tables of the attendance document.
#[derive(Debug, Copy, Clone, PartialEq, Eq, StrumDisplay, AsRefStr)]
pub enum Table {
    Registrations,
    Attendance,
}

#[derive(Debug, Display)]
pub enum StoreError {
    #[display(fmt = "spreadsheet store is not connected")]
    Unavailable,
    #[display(fmt = "store misconfigured: {}", _0)]
    Config(String),
    #[display(fmt = "authentication failed: {}", _0)]
    Auth(String),
    #[display(fmt = "http error: {}", _0)]
    Http(reqwest::Error),
    #[display(fmt = "sheets api returned {}: {}", status, body)]
    Api { status: u16, body: String },
    #[display(fmt = "unexpected response: {}", _0)]
    Decode(String),
}

impl std::error::Error for StoreError {}

impl From<reqwest::Error> for StoreError {
    fn from(e: reqwest::Error) -> Self {
        StoreError::Http(e)
    }
}

/// Row-level access to the document tables.
///
/// Column and row indices are zero-based and count the header row, so row 0
/// is always the header.
#[async_trait]
pub trait SheetStore: Send + Sync {
    /// Every cell of one column, top to bottom, header included.
    async fn read_column(&self, table: Table, column: usize) -> Result<Vec<String>, StoreError>;

    /// Cells of one row; empty when the row holds nothing.
    async fn read_row(&self, table: Table, row: usize) -> Result<Vec<String>, StoreError>;

    /// Data rows as header-keyed records, in sheet order.
    async fn read_all_records(&self, table: Table) -> Result<Vec<Record>, StoreError>;

    async fn append_row(&self, table: Table, row: Vec<String>) -> Result<(), StoreError>;
}

/// Handle shared by every request; `None` once setup has failed.
#[derive(Clone)]
pub struct Ledger {
    store: Option<Arc<dyn SheetStore>>,
}

impl Ledger {
    pub fn connected(store: Arc<dyn SheetStore>) -> Self {
        Self { store: Some(store) }
    }

    pub fn unavailable() -> Self {
        Self { store: None }
    }

    pub fn is_available(&self) -> bool {
        self.store.is_some()
    }

    pub fn store(&self) -> Result<&dyn SheetStore, StoreError> {
        self.store.as_deref().ok_or(StoreError::Unavailable)
    }
}

/// Turns raw sheet rows into header-keyed records.
///
/// The first row is the header. Short rows are padded with blanks and cells
/// beyond the header are dropped.
pub fn records_from_rows(rows: Vec<Vec<String>>) -> Vec<Record> {
    let mut rows = rows.into_iter();
    let Some(header) = rows.next() else {
        return Vec::new();
    };

    rows.map(|row| {
        header
            .iter()
            .enumerate()
            .map(|(i, key)| (key.clone(), row.get(i).cloned().unwrap_or_default()))
            .collect()
    })
    .collect()
}
