//! Search configuration
//!
//! Every knob of a search call lives in [`SearchConfig`]. It can be built in
//! code, or loaded from a TOML file where every field is optional:
//!
//! ```toml
//! cutoff = 2
//! metric = "L"                 # "L" (Levenshtein) or "H" (Hamming)
//! include_eye = true           # emit (i, i) for every considered string
//! region = { prefix = 6 }      # "none" | { prefix = N } | { suffix = N }
//!                              # | { middle = { start = S, len = N } }
//! small_bucket_threshold = 300 # below: pairwise check inside the bucket
//! large_bucket_threshold = 10000 # at or above: parallel recursive search
//! sink = "thread-local"        # or "shared"
//! threads = 0                  # 0 = one worker per logical CPU
//! expected_pairs = 14802311    # optional; mismatch is a hard error
//! ```

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{SearchError, SearchResult};
use crate::search::{Metric, Region, SinkKind};

/// Candidate-generation strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strategy {
    /// One region key per string, confirmed on the full strings.
    Patterns,
    /// Whole-string deletion patterns.
    #[default]
    SemiPatterns,
    /// Region key buckets, size-adaptive verification.
    PartPatterns,
}

impl Strategy {
    /// Short tag used in output file names.
    pub fn tag(self) -> &'static str {
        match self {
            Strategy::Patterns => "p",
            Strategy::SemiPatterns => "s",
            Strategy::PartPatterns => "pp",
        }
    }
}

impl FromStr for Strategy {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "patterns" | "p" => Ok(Strategy::Patterns),
            "semi" | "semi-patterns" | "s" => Ok(Strategy::SemiPatterns),
            "part" | "part-patterns" | "pp" => Ok(Strategy::PartPatterns),
            other => Err(SearchError::InvalidConfig(format!(
                "unknown strategy '{}' (expected patterns, semi or part)",
                other
            ))),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Strategy::Patterns => "patterns",
            Strategy::SemiPatterns => "semi-patterns",
            Strategy::PartPatterns => "part-patterns",
        };
        write!(f, "{}", name)
    }
}

/// Parameters of one search call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SearchConfig {
    /// Maximum distance of a confirmed pair.
    pub cutoff: usize,

    /// Distance used for confirmation.
    pub metric: Metric,

    /// Structural region for pattern and part-pattern searches.
    pub region: Region,

    /// Add (i, i) for every considered string.
    pub include_eye: bool,

    /// Buckets smaller than this are checked pairwise; larger ones (below
    /// `large_bucket_threshold`) run a serial recursive search.
    pub small_bucket_threshold: usize,

    /// Buckets at or above this size run a recursive search using the whole
    /// worker pool, one bucket at a time.
    pub large_bucket_threshold: usize,

    /// How workers accumulate confirmed pairs.
    pub sink: SinkKind,

    /// Worker threads (0 = one per logical CPU).
    pub threads: usize,

    /// Expected size of the output set, self-pairs included.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_pairs: Option<usize>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            cutoff: 2,
            metric: Metric::Levenshtein,
            region: Region::None,
            include_eye: true,
            small_bucket_threshold: 300,
            large_bucket_threshold: 10_000,
            sink: SinkKind::ThreadLocal,
            threads: 0,
            expected_pairs: None,
        }
    }
}

impl SearchConfig {
    pub fn new(cutoff: usize, metric: Metric) -> Self {
        Self {
            cutoff,
            metric,
            ..Self::default()
        }
    }

    pub fn with_region(mut self, region: Region) -> Self {
        self.region = region;
        self
    }

    pub fn with_include_eye(mut self, include_eye: bool) -> Self {
        self.include_eye = include_eye;
        self
    }

    pub fn with_thresholds(mut self, small: usize, large: usize) -> Self {
        self.small_bucket_threshold = small;
        self.large_bucket_threshold = large;
        self
    }

    pub fn with_sink(mut self, sink: SinkKind) -> Self {
        self.sink = sink;
        self
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    pub fn with_expected_pairs(mut self, expected: usize) -> Self {
        self.expected_pairs = Some(expected);
        self
    }

    /// Parse a configuration from TOML content.
    pub fn parse_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Load and validate a configuration file.
    pub fn load(path: &Path) -> SearchResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| SearchError::io(path, e))?;
        let config = Self::parse_toml(&content).map_err(|e| SearchError::ConfigParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject regions that cut nothing.
    pub fn validate(&self) -> SearchResult<()> {
        match self.region {
            Region::Prefix(0) | Region::Suffix(0) | Region::Middle { len: 0, .. } => {
                Err(SearchError::InvalidConfig(format!(
                    "region {:?} is empty; its size must be positive",
                    self.region
                )))
            }
            _ => Ok(()),
        }
    }
}
