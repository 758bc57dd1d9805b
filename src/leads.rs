//! Lead record reader.
//!
//! Reads a CSV file with a header row into [`Lead`] records. Columns are
//! matched by name; unknown columns are ignored and missing or blank ones
//! become empty strings.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, StringRecord, StringRecordsIntoIter, Trim};
use tracing::{debug, warn};

use crate::error::{AgentError, Result};
use crate::types::Lead;

const COLUMNS: [&str; 6] = ["id", "name", "email", "company", "interest", "ticket"];

/// A lead file on disk. Each call to [`LeadReader::leads`] re-reads it from
/// the start.
#[derive(Debug, Clone)]
pub struct LeadReader {
    path: PathBuf,
}

impl LeadReader {
    /// Point the reader at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::NotFound`] if the path does not exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(AgentError::NotFound(path.to_path_buf()));
        }
        Ok(Self {
            path: path.to_path_buf(),
        })
    }

    /// Lazily iterate the records in file order.
    pub fn leads(&self) -> Result<Leads> {
        let file = File::open(&self.path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => AgentError::NotFound(self.path.clone()),
            _ => AgentError::Io(e),
        })?;

        debug!(path = %self.path.display(), "Opening lead file");
        Leads::from_reader(file)
    }
}

/// Position of each recognised column in the header row.
#[derive(Debug, Clone, Default)]
struct ColumnIndex {
    positions: HashMap<&'static str, usize>,
}

impl ColumnIndex {
    fn new(headers: &StringRecord) -> Self {
        let mut positions = HashMap::new();
        for column in COLUMNS {
            // First occurrence wins on duplicate headers.
            if let Some(idx) = headers.iter().position(|h| h == column) {
                positions.insert(column, idx);
            }
        }
        Self { positions }
    }

    fn field(&self, record: &StringRecord, column: &str) -> String {
        self.positions
            .get(column)
            .and_then(|&idx| record.get(idx))
            .filter(|value| !value.trim().is_empty())
            .map(str::to_string)
            .unwrap_or_default()
    }

    fn lead(&self, record: &StringRecord) -> Lead {
        Lead {
            id: self.field(record, "id"),
            name: self.field(record, "name"),
            email: self.field(record, "email"),
            company: self.field(record, "company"),
            interest: self.field(record, "interest"),
            ticket: self.field(record, "ticket"),
        }
    }
}

/// Iterator over the records of a lead file.
///
/// A malformed row yields one `Err` and iteration continues with the next
/// row. An I/O failure yields one `Err` and ends iteration.
pub struct Leads<R = File> {
    records: StringRecordsIntoIter<R>,
    columns: ColumnIndex,
    done: bool,
}

impl<R: Read> Leads<R> {
    fn from_reader(rdr: R) -> Result<Self> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(Trim::Headers)
            .from_reader(rdr);

        let headers = reader.headers()?.clone();
        debug!(?headers, "Read lead header row");
        let columns = ColumnIndex::new(&headers);

        Ok(Self {
            records: reader.into_records(),
            columns,
            done: false,
        })
    }
}

impl<R: Read> Iterator for Leads<R> {
    type Item = Result<Lead>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.records.next()? {
            Ok(record) => Some(Ok(self.columns.lead(&record))),
            Err(e) => {
                if e.is_io_error() {
                    warn!(error = %e, "Lead file read failed; stopping");
                    self.done = true;
                }
                Some(Err(AgentError::from(e)))
            }
        }
    }
}
