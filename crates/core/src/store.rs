//! CSV response store.
//!
//! All completed surveys live in one CSV file. The first record written fixes the header; every
//! later record is aligned to it. Appending reads the whole table, adds the row and rewrites the
//! file:
//!
//! 1. The table is loaded (an absent or empty file is an empty table). Rows shorter than the
//!    header are padded with empty cells; rows longer than the header are refused.
//! 2. Record keys missing from the header are added as new columns, existing rows are padded
//!    with empty cells, and the record becomes a row in header order.
//! 3. The table is written to a sibling `<file>.tmp`, synced, and renamed over the store.
//!
//! Steps 1–3 run under a store-wide mutex, so concurrent appends from one process never lose a
//! row. Readers never observe a partially written file because of the rename.

use crate::constants::STORE_TEMP_SUFFIX;
use crate::record::SurveyRecord;
use crate::{SurveyError, SurveyResult};
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// In-memory copy of the store: a header and positional rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreTable {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl StoreTable {
    /// Parses CSV bytes. Empty input is an empty table.
    ///
    /// Rows are kept as read, even when their length differs from the header; see
    /// [`StoreTable::misaligned_rows`].
    pub fn from_csv_bytes(bytes: &[u8]) -> SurveyResult<Self> {
        if bytes.is_empty() {
            return Ok(Self::default());
        }

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(bytes);

        let header = reader.headers()?.iter().map(str::to_owned).collect();
        let rows = reader
            .records()
            .map(|row| row.map(|r| r.iter().map(str::to_owned).collect()))
            .collect::<Result<Vec<Vec<String>>, csv::Error>>()?;

        Ok(Self { header, rows })
    }

    /// Serialises the table exactly as the store writes it.
    pub fn to_csv_bytes(&self) -> SurveyResult<Vec<u8>> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        self.write_to(&mut writer)?;
        writer
            .into_inner()
            .map_err(|e| SurveyError::StoreWrite(e.into_error()))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// 1-based positions of data rows whose cell count differs from the header.
    pub fn misaligned_rows(&self) -> Vec<usize> {
        self.rows
            .iter()
            .enumerate()
            .filter(|(_, row)| row.len() != self.header.len())
            .map(|(i, _)| i + 1)
            .collect()
    }

    /// Returns the value of `column` in data row `row` (0-based).
    pub fn cell(&self, row: usize, column: &str) -> Option<&str> {
        let index = self.header.iter().position(|h| h == column)?;
        self.rows.get(row)?.get(index).map(String::as_str)
    }

    fn push_record(&mut self, record: &SurveyRecord) -> SurveyResult<()> {
        let width = self.header.len();
        if let Some(position) = self.rows.iter().position(|row| row.len() > width) {
            return Err(SurveyError::StoreCorrupt(format!(
                "store row {} has more cells than the header; run `survey check`",
                position + 1
            )));
        }

        if self.header.is_empty() {
            self.header = record.keys().map(str::to_owned).collect();
        } else {
            for key in record.keys() {
                if !self.header.iter().any(|h| h == key) {
                    tracing::warn!(column = key, "adding column to survey store");
                    self.header.push(key.to_owned());
                }
            }
        }
        let width = self.header.len();
        for row in &mut self.rows {
            row.resize(width, String::new());
        }

        let row = self
            .header
            .iter()
            .map(|column| record.get(column).unwrap_or_default().to_owned())
            .collect();
        self.rows.push(row);
        Ok(())
    }

    fn write_to<W: std::io::Write>(&self, writer: &mut csv::Writer<W>) -> SurveyResult<()> {
        writer.write_record(&self.header)?;
        for row in &self.rows {
            writer.write_record(row)?;
        }
        writer.flush().map_err(SurveyError::StoreWrite)
    }
}

/// Summary of a store's integrity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreReport {
    pub rows: usize,
    pub columns: usize,
    /// 1-based data row positions whose cell count differs from the header.
    pub misaligned: Vec<usize>,
}

impl StoreReport {
    pub fn is_consistent(&self) -> bool {
        self.misaligned.is_empty()
    }
}

/// Handle to the CSV file holding every completed survey.
///
/// Cloning is cheap; clones share the append lock.
#[derive(Clone, Debug)]
pub struct CsvStore {
    path: PathBuf,
    append_lock: Arc<Mutex<()>>,
}

impl CsvStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            append_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends `record` as one new row.
    ///
    /// Creates the store with `record`'s keys as header if it does not exist yet. Returns once
    /// the rewritten file has been synced to disk.
    ///
    /// # Errors
    ///
    /// Returns a `SurveyError` if:
    /// - `record` has no fields,
    /// - the store cannot be read or parsed, or has a row longer than its header,
    /// - the temporary file cannot be written, synced or renamed over the store.
    pub fn append(&self, record: &SurveyRecord) -> SurveyResult<()> {
        if record.is_empty() {
            return Err(SurveyError::InvalidInput(
                "cannot store a record with no fields".into(),
            ));
        }

        let _guard = self
            .append_lock
            .lock()
            .map_err(|_| SurveyError::StoreLockPoisoned)?;

        let mut table = self.read_table()?;
        table.push_record(record)?;
        self.write_table(&table)?;

        tracing::info!(
            path = %self.path.display(),
            rows = table.len(),
            "survey response stored"
        );
        Ok(())
    }

    /// Loads the whole store. An absent or empty file is an empty table.
    pub fn read_table(&self) -> SurveyResult<StoreTable> {
        match fs::read(&self.path) {
            Ok(bytes) => StoreTable::from_csv_bytes(&bytes),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(StoreTable::default()),
            Err(e) => Err(SurveyError::StoreRead(e)),
        }
    }

    /// Number of stored responses.
    pub fn count(&self) -> SurveyResult<usize> {
        Ok(self.read_table()?.len())
    }

    /// Reports rows that no longer line up with the header, e.g. after hand edits.
    pub fn check(&self) -> SurveyResult<StoreReport> {
        let table = self.read_table()?;
        Ok(StoreReport {
            rows: table.len(),
            columns: table.header.len(),
            misaligned: table.misaligned_rows(),
        })
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(OsString::from)
            .unwrap_or_default();
        name.push(STORE_TEMP_SUFFIX);
        self.path.with_file_name(name)
    }

    fn write_table(&self, table: &StoreTable) -> SurveyResult<()> {
        let temp_path = self.temp_path();

        let result = write_synced(&temp_path, table)
            .and_then(|()| fs::rename(&temp_path, &self.path).map_err(SurveyError::StoreWrite));

        if result.is_err() {
            let _ = fs::remove_file(&temp_path);
        }
        result
    }
}

fn write_synced(path: &Path, table: &StoreTable) -> SurveyResult<()> {
    let file = File::create(path).map_err(SurveyError::StoreWrite)?;
    let mut writer = csv::Writer::from_writer(file);
    table.write_to(&mut writer)?;

    let mut file = writer
        .into_inner()
        .map_err(|e| SurveyError::StoreWrite(e.into_error()))?;
    file.flush().map_err(SurveyError::StoreWrite)?;
    file.sync_all().map_err(SurveyError::StoreWrite)
}
