//! Result files.
//!
//! One line per confirmed pair, `<a>\t<b>`, sorted by pair. When the corpus
//! keeps duplicates, each side is followed by the comma-separated line
//! numbers of its copies: `<a>\t<b>\t<positions of a>\t<positions of b>`.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::Strategy;
use crate::corpus::Corpus;
use crate::error::{SearchError, SearchResult};
use crate::search::{Metric, PairSet};

/// `<input>_<strategy tag>_<cutoff>_<metric selector>`, next to the input.
pub fn output_file_name(
    input: &Path,
    strategy: Strategy,
    cutoff: usize,
    metric: Metric,
) -> PathBuf {
    let mut name = input.as_os_str().to_os_string();
    name.push(format!("_{}_{}_{}", strategy.tag(), cutoff, metric.selector()));
    PathBuf::from(name)
}

fn join_positions(positions: Option<&[usize]>) -> String {
    positions
        .unwrap_or_default()
        .iter()
        .map(|p| p.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

/// Write every pair of `pairs` as a line of `writer`.
pub fn write_pairs<W: Write>(
    writer: &mut W,
    corpus: &Corpus,
    pairs: &PairSet,
) -> std::io::Result<()> {
    for (a, b) in pairs.to_sorted_vec() {
        if corpus.keeps_duplicates() {
            let sa = corpus.get(a).unwrap_or_default();
            let sb = corpus.get(b).unwrap_or_default();
            writeln!(
                writer,
                "{}\t{}\t{}\t{}",
                a,
                b,
                join_positions(corpus.positions(sa)),
                join_positions(corpus.positions(sb))
            )?;
        } else {
            writeln!(writer, "{}\t{}", a, b)?;
        }
    }
    writer.flush()
}

/// Create (or truncate) `path` and write the pairs to it.
pub fn write_pairs_to_path(path: &Path, corpus: &Corpus, pairs: &PairSet) -> SearchResult<()> {
    let file = File::create(path).map_err(|e| SearchError::io(path, e))?;
    let mut writer = BufWriter::new(file);
    write_pairs(&mut writer, corpus, pairs).map_err(|e| SearchError::io(path, e))?;
    debug!(
        target: "simsearch::output",
        path = %path.display(),
        lines = pairs.len(),
        "Wrote pairs"
    );
    Ok(())
}
