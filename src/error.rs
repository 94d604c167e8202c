//! Error types for similarity search.

use std::fmt;
use std::path::PathBuf;

/// Result type for search operations.
pub type SearchResult<T> = Result<T, SearchError>;

/// Errors that abort a search call.
///
/// A search either completes with a fully verified pair set or fails with
/// one of these; there is no partial-result mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    /// Metric selector was neither `L` nor `H`.
    InvalidMetric(char),

    /// Parameters are inconsistent with the requested strategy
    /// (e.g. part-pattern search without a region).
    InvalidConfig(String),

    /// Input or output file could not be opened, read or written.
    Io { path: PathBuf, message: String },

    /// Configuration file could not be parsed.
    ConfigParse { path: PathBuf, message: String },

    /// Confirmed-pair count differs from the caller-supplied expectation.
    OutputCountMismatch {
        expected: usize,
        actual: usize,
        /// A few pairs from the produced set, smallest first.
        sample: Vec<(usize, usize)>,
    },
}

impl SearchError {
    pub(crate) fn io(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        SearchError::Io {
            path: path.into(),
            message: err.to_string(),
        }
    }
}

impl fmt::Display for SearchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchError::InvalidMetric(c) => {
                write!(f, "Invalid metric '{}': expected 'L' (Levenshtein) or 'H' (Hamming)", c)
            }
            SearchError::InvalidConfig(msg) => write!(f, "Invalid configuration: {}", msg),
            SearchError::Io { path, message } => {
                write!(f, "Failed to access '{}': {}", path.display(), message)
            }
            SearchError::ConfigParse { path, message } => {
                write!(f, "Failed to parse '{}': {}", path.display(), message)
            }
            SearchError::OutputCountMismatch {
                expected,
                actual,
                sample,
            } => {
                write!(
                    f,
                    "Output size {} does not match expected {}",
                    actual, expected
                )?;
                if !sample.is_empty() {
                    let shown: Vec<String> =
                        sample.iter().map(|(a, b)| format!("({}, {})", a, b)).collect();
                    write!(f, "; first pairs: {}", shown.join(", "))?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for SearchError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_metric_message() {
        let err = SearchError::InvalidMetric('X');
        assert!(err.to_string().contains("'X'"));
    }

    #[test]
    fn test_mismatch_message_lists_sample() {
        let err = SearchError::OutputCountMismatch {
            expected: 3,
            actual: 2,
            sample: vec![(0, 1), (2, 2)],
        };
        let msg = err.to_string();
        assert!(msg.contains("Output size 2 does not match expected 3"));
        assert!(msg.contains("(0, 1), (2, 2)"));
    }
}
