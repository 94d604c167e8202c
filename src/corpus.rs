//! Line-delimited input corpus.
//!
//! One string per line. Duplicate lines collapse onto the index of their
//! first occurrence; when duplicates are kept, the original line numbers of
//! every copy are recorded so output can be expanded back to them.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::debug;

use crate::error::{SearchError, SearchResult};
use crate::search::FastHashMap;

/// Distinct strings in first-occurrence order.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    strings: Vec<String>,
    index: FastHashMap<String, usize>,
    positions: Option<FastHashMap<String, Vec<usize>>>,
}

impl Corpus {
    /// Build from lines; trailing `\r` is stripped from each line.
    pub fn from_lines<I, S>(lines: I, keep_duplicates: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut corpus = Corpus {
            positions: keep_duplicates.then(FastHashMap::default),
            ..Corpus::default()
        };
        for (line_no, line) in lines.into_iter().enumerate() {
            corpus.push_line(line.as_ref(), line_no);
        }
        corpus
    }

    /// Read a line-delimited file.
    pub fn read(path: &Path, keep_duplicates: bool) -> SearchResult<Self> {
        let file = File::open(path).map_err(|e| SearchError::io(path, e))?;
        let reader = BufReader::new(file);

        let mut corpus = Corpus {
            positions: keep_duplicates.then(FastHashMap::default),
            ..Corpus::default()
        };
        let mut lines = 0usize;
        for (line_no, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| SearchError::io(path, e))?;
            corpus.push_line(&line, line_no);
            lines += 1;
        }

        debug!(
            target: "simsearch::corpus",
            path = %path.display(),
            lines,
            distinct = corpus.len(),
            "Read corpus"
        );
        Ok(corpus)
    }

    fn push_line(&mut self, line: &str, line_no: usize) {
        let line = line.strip_suffix('\r').unwrap_or(line);
        if !self.index.contains_key(line) {
            self.index.insert(line.to_string(), self.strings.len());
            self.strings.push(line.to_string());
        }
        if let Some(positions) = self.positions.as_mut() {
            positions.entry(line.to_string()).or_default().push(line_no);
        }
    }

    pub fn strings(&self) -> &[String] {
        &self.strings
    }

    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<&str> {
        self.strings.get(idx).map(String::as_str)
    }

    /// Index of the first occurrence of `s`.
    pub fn index_of(&self, s: &str) -> Option<usize> {
        self.index.get(s).copied()
    }

    /// Zero-based line numbers of every copy of `s`, if duplicates are kept.
    pub fn positions(&self, s: &str) -> Option<&[usize]> {
        self.positions.as_ref()?.get(s).map(Vec::as_slice)
    }

    pub fn keeps_duplicates(&self) -> bool {
        self.positions.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_occurrence_wins() {
        let corpus = Corpus::from_lines(["cat", "bat", "cat", "dog"], false);
        assert_eq!(corpus.strings(), &["cat", "bat", "dog"]);
        assert_eq!(corpus.index_of("cat"), Some(0));
        assert_eq!(corpus.index_of("dog"), Some(2));
        assert_eq!(corpus.index_of("cow"), None);
        assert!(!corpus.keeps_duplicates());
        assert_eq!(corpus.positions("cat"), None);
    }

    #[test]
    fn test_positions_tracked() {
        let corpus = Corpus::from_lines(["cat", "bat", "cat", "cat"], true);
        assert_eq!(corpus.len(), 2);
        assert_eq!(corpus.positions("cat"), Some(&[0, 2, 3][..]));
        assert_eq!(corpus.positions("bat"), Some(&[1][..]));
    }

    #[test]
    fn test_carriage_return_stripped() {
        let corpus = Corpus::from_lines(["cat\r", "cat"], false);
        assert_eq!(corpus.strings(), &["cat"]);
        assert_eq!(corpus.get(0), Some("cat"));
        assert_eq!(corpus.get(1), None);
    }

    #[test]
    fn test_missing_file() {
        let path = std::env::temp_dir().join("simsearch-corpus-does-not-exist.txt");
        assert!(matches!(
            Corpus::read(&path, false),
            Err(SearchError::Io { .. })
        ));
    }
}
