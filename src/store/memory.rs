//! Process-local tables for trying the form without Google, and for tests.
//!
//! Tags are only ever assigned by hand in the real sheet, so a memory-backed
//! server accepts registrations but answers every scan with 404.

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{Record, SheetStore, StoreError, Table, records_from_rows};
use crate::model::attendance::ATTENDANCE_HEADER;
use crate::model::registration::{REGISTRATION_HEADER, column};

type Rows = Vec<Vec<String>>;

#[derive(Default)]
pub struct MemoryStore {
    registrations: RwLock<Rows>,
    attendance: RwLock<Rows>,
}

impl MemoryStore {
    /// Empty tables carrying their header rows, as the sheets connector leaves them.
    pub fn with_headers() -> Self {
        let header = |cells: &[&str]| vec![cells.iter().map(|c| c.to_string()).collect()];
        Self {
            registrations: RwLock::new(header(&REGISTRATION_HEADER)),
            attendance: RwLock::new(header(&ATTENDANCE_HEADER)),
        }
    }

    fn table(&self, table: Table) -> &RwLock<Rows> {
        match table {
            Table::Registrations => &self.registrations,
            Table::Attendance => &self.attendance,
        }
    }

    /// Snapshot of every row, header included.
    pub async fn rows(&self, table: Table) -> Rows {
        self.table(table).read().await.clone()
    }

    /// Writes `tag` into the registration row of `reg_number`, the way an
    /// operator fills the tag cell in the sheet. Returns false if no such row.
    #[cfg(test)]
    pub async fn assign_tag(&self, reg_number: &str, tag: &str) -> bool {
        let mut rows = self.registrations.write().await;
        let Some(row) = rows
            .iter_mut()
            .skip(1)
            .find(|row| row.get(column::REG_NUMBER).map(String::as_str) == Some(reg_number))
        else {
            return false;
        };

        if row.len() <= column::RFID_TAG {
            row.resize(column::RFID_TAG + 1, String::new());
        }
        row[column::RFID_TAG] = tag.to_string();
        true
    }
}

#[async_trait]
impl SheetStore for MemoryStore {
    async fn read_column(&self, table: Table, column: usize) -> Result<Vec<String>, StoreError> {
        let rows = self.table(table).read().await;
        let mut cells: Vec<String> = rows
            .iter()
            .map(|row| row.get(column).cloned().unwrap_or_default())
            .collect();

        // Sheets trims trailing blanks off a column read
        while cells.last().is_some_and(String::is_empty) {
            cells.pop();
        }
        Ok(cells)
    }

    async fn read_row(&self, table: Table, row: usize) -> Result<Vec<String>, StoreError> {
        let rows = self.table(table).read().await;
        Ok(rows.get(row).cloned().unwrap_or_default())
    }

    async fn read_all_records(&self, table: Table) -> Result<Vec<Record>, StoreError> {
        Ok(records_from_rows(self.rows(table).await))
    }

    async fn append_row(&self, table: Table, row: Vec<String>) -> Result<(), StoreError> {
        self.table(table).write().await.push(row);
        Ok(())
    }
}
