use csv::{ReaderBuilder, StringRecord, Trim};
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use std::{
    fs::File,
    io::Read,
    path::{Path, PathBuf},
};

use crate::error::{Error, Result};

/// Header given to file columns that no typed field asks for.
const UNMAPPED: &str = "_";

/// What to do with a row whose fields cannot be converted to their
/// typed form.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum OnInvalid {
    /// Stop with [`Error::DataType`] at the first bad row.
    #[default]
    Fail,
    /// Log a warning and leave the row out.
    Skip,
}

/// A delimited text file held in memory: its header names, and its data
/// rows in file order.
///
/// To load a table, use [`Table::read_csv`]. Each row can be viewed as a
/// mapping from header name to raw value with [`Table::rows`], or
/// converted to a typed record with [`Table::deserialize`].
#[derive(Debug)]
pub struct Table {
    path: PathBuf,
    headers: StringRecord,
    rows: Vec<StringRecord>,
}

impl Table {
    /// Reads the comma-delimited file at `path`. The first row is the
    /// header. Whitespace around headers and fields is trimmed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FileNotFound`] if the file cannot be opened, and
    /// [`Error::MalformedInput`] if it has no header row, a row's width
    /// differs from the header's, or it is not valid UTF-8.
    pub fn read_csv(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| Error::FileNotFound {
            path: path.to_path_buf(),
            source,
        })?;
        let table = Self::from_reader(path, file)?;
        info!("loaded {} rows from {}", table.len(), path.display());
        debug!("{} columns: {:?}", path.display(), table.headers().collect::<Vec<_>>());
        Ok(table)
    }

    /// Reads a table from `rdr`, naming it `path` in any errors.
    ///
    /// # Errors
    ///
    /// As for [`Table::read_csv`], except that nothing is opened.
    pub fn from_reader(path: impl Into<PathBuf>, rdr: impl Read) -> Result<Self> {
        let path = path.into();
        let mut rdr = ReaderBuilder::new().trim(Trim::All).from_reader(rdr);
        let headers = rdr
            .headers()
            .map_err(|e| csv_error(&path, e))?
            .clone();
        if headers.is_empty() {
            return Err(Error::MalformedInput {
                path,
                line: None,
                reason: "missing header row".into(),
            });
        }
        let mut rows = Vec::new();
        for result in rdr.records() {
            rows.push(result.map_err(|e| csv_error(&path, e))?);
        }
        Ok(Self {
            path,
            headers,
            rows,
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn headers(&self) -> impl Iterator<Item = &str> {
        self.headers.iter()
    }

    #[must_use]
    pub fn has_column(&self, name: &str) -> bool {
        self.headers.iter().any(|h| h == name)
    }

    /// Returns the number of data rows, not counting the header.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns the data rows in file order.
    pub fn rows(&self) -> impl Iterator<Item = Row<'_>> {
        self.rows.iter().map(|record| Row {
            headers: &self.headers,
            record,
        })
    }

    /// Checks that `name` appears exactly once in the header.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedInput`] naming the column otherwise.
    pub fn require(&self, name: &str) -> Result<()> {
        match self.headers.iter().filter(|h| *h == name).count() {
            1 => Ok(()),
            0 => Err(self.malformed(format!("missing column {name:?}"))),
            _ => Err(self.malformed(format!("column {name:?} appears more than once"))),
        }
    }

    /// Converts every row to a `T`.
    ///
    /// `columns` pairs a header in this file with the name of the field of
    /// `T` that it fills. Columns not listed are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DataType`] for the first row that does not convert,
    /// unless `on_invalid` is [`OnInvalid::Skip`], in which case such rows
    /// are logged and dropped.
    pub fn deserialize<T: DeserializeOwned>(
        &self,
        columns: &[(&str, &str)],
        on_invalid: OnInvalid,
    ) -> Result<Vec<T>> {
        let fields: StringRecord = self
            .headers
            .iter()
            .map(|h| {
                columns
                    .iter()
                    .find(|(header, _)| *header == h)
                    .map_or(UNMAPPED, |(_, field)| *field)
            })
            .collect();
        let mut items = Vec::with_capacity(self.rows.len());
        for record in &self.rows {
            match record.deserialize(Some(&fields)) {
                Ok(item) => items.push(item),
                Err(e) => {
                    let err = Error::DataType {
                        path: self.path.clone(),
                        line: record.position().map(csv::Position::line),
                        reason: self.describe(&e),
                    };
                    match on_invalid {
                        OnInvalid::Fail => return Err(err),
                        OnInvalid::Skip => warn!("skipping row: {err}"),
                    }
                }
            }
        }
        Ok(items)
    }

    fn describe(&self, err: &csv::Error) -> String {
        let csv::ErrorKind::Deserialize { err, .. } = err.kind() else {
            return err.to_string();
        };
        match err.field().and_then(|i| self.headers.get(i as usize)) {
            Some(column) => format!("column {column:?}: {}", err.kind()),
            None => err.kind().to_string(),
        }
    }

    fn malformed(&self, reason: String) -> Error {
        Error::MalformedInput {
            path: self.path.clone(),
            line: None,
            reason,
        }
    }
}

/// One data row of a [`Table`], viewed as header name → raw value.
#[derive(Clone, Copy, Debug)]
pub struct Row<'a> {
    headers: &'a StringRecord,
    record: &'a StringRecord,
}

impl<'a> Row<'a> {
    /// Returns the value in column `name`, if the table has that column.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&'a str> {
        let i = self.headers.iter().position(|h| h == name)?;
        self.record.get(i)
    }

    /// Returns the 1-based line this row was read from.
    #[must_use]
    pub fn line(&self) -> Option<u64> {
        self.record.position().map(csv::Position::line)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'a str, &'a str)> {
        self.headers.iter().zip(self.record.iter())
    }
}

fn csv_error(path: &Path, err: csv::Error) -> Error {
    let line = err.position().map(csv::Position::line);
    let path = path.to_path_buf();
    match err.into_kind() {
        csv::ErrorKind::Io(source) => Error::FileNotFound { path, source },
        csv::ErrorKind::UnequalLengths {
            expected_len, len, ..
        } => Error::MalformedInput {
            path,
            line,
            reason: format!("row has {len} fields but the header has {expected_len}"),
        },
        csv::ErrorKind::Utf8 { .. } => Error::MalformedInput {
            path,
            line,
            reason: "invalid UTF-8".into(),
        },
        other => Error::MalformedInput {
            path,
            line,
            reason: format!("{other:?}"),
        },
    }
}
