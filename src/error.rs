use std::{io, path::PathBuf};

/// Errors that stop a reporting run.
///
/// References to unknown clients or materials are deliberately not errors:
/// see [`crate::series::city_participation`] and [`crate::summary`].
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An input file does not exist or cannot be opened.
    #[error("cannot open {}: {source}", path.display())]
    FileNotFound {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A file's shape does not match what the pipeline needs: no header
    /// row, a missing column, or a row whose width differs from the header.
    #[error("{}{}: {reason}", path.display(), line_suffix(*line))]
    MalformedInput {
        path: PathBuf,
        line: Option<u64>,
        reason: String,
    },

    /// A field that must be numeric could not be parsed.
    #[error("{}{}: {reason}", path.display(), line_suffix(*line))]
    DataType {
        path: PathBuf,
        line: Option<u64>,
        reason: String,
    },

    /// Numbers that parsed on their own add up to a total too large to
    /// hold, such as the quantity or cost of one material.
    #[error("{label}: {reason}")]
    Overflow { label: String, reason: String },

    /// A report folder or file could not be written.
    #[error("writing {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The drawing backend failed to produce a chart.
    #[error("drawing {}: {reason}", path.display())]
    Chart { path: PathBuf, reason: String },
}

fn line_suffix(line: Option<u64>) -> String {
    line.map(|n| format!(" (line {n})")).unwrap_or_default()
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_fn_includes_line_number_when_known() {
        let err = Error::DataType {
            path: "materials.csv".into(),
            line: Some(3),
            reason: "bad number".into(),
        };
        assert_eq!(err.to_string(), "materials.csv (line 3): bad number");
    }

    #[test]
    fn display_fn_omits_line_number_when_unknown() {
        let err = Error::MalformedInput {
            path: "clients.csv".into(),
            line: None,
            reason: "missing header row".into(),
        };
        assert_eq!(err.to_string(), "clients.csv: missing header row");
    }

    #[test]
    fn display_fn_names_the_overflowing_total() {
        let err = Error::Overflow {
            label: "Steel".into(),
            reason: "total cost is too large".into(),
        };
        assert_eq!(err.to_string(), "Steel: total cost is too large");
    }
}
