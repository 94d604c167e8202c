//! Search orchestrators.
//!
//! Each strategy is one linear pipeline over an immutable corpus:
//! generate keys → build the index → verify buckets → merge pairs. Nothing
//! persists between calls; the index is dropped as soon as its buckets have
//! been taken.

use std::time::Instant;

use tracing::{debug, info, warn};

use crate::config::{SearchConfig, Strategy};
use crate::error::{SearchError, SearchResult};

use super::index::{build_parallel, build_serial, Bucket, KeyScheme};
use super::pairs::{PairSet, PairSink};
use super::patterns::MAX_DELETIONS;
use super::region::Region;
use super::thread_pool::WorkerPool;
use super::verify::{verify_buckets, verify_buckets_with, verify_pairwise, PairCheck};

/// Pairs shown in an [`SearchError::OutputCountMismatch`].
const MISMATCH_SAMPLE: usize = 10;

/// Near-duplicate search over one corpus.
///
/// The worker pool is built once and reused by every call.
#[derive(Debug)]
pub struct SimSearch<'c> {
    strings: &'c [String],
    config: SearchConfig,
    pool: WorkerPool,
}

impl<'c> SimSearch<'c> {
    /// Validate `config` and start the worker pool.
    pub fn new(strings: &'c [String], config: SearchConfig) -> SearchResult<Self> {
        config.validate()?;
        let pool = WorkerPool::new(config.threads)?;
        if config.cutoff > MAX_DELETIONS {
            warn!(
                target: "simsearch::search",
                cutoff = config.cutoff,
                max = MAX_DELETIONS,
                "Deletion patterns stop at depth {}; pairs beyond it may be missed",
                MAX_DELETIONS
            );
        }
        Ok(Self {
            strings,
            config,
            pool,
        })
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn num_threads(&self) -> usize {
        self.pool.num_threads()
    }

    /// Run `strategy` over the whole corpus, or over `subset` if given.
    pub fn run(&self, strategy: Strategy, subset: Option<&[usize]>) -> SearchResult<PairSet> {
        match strategy {
            Strategy::Patterns => self.pattern_search(subset),
            Strategy::SemiPatterns => self.semi_pattern_search(subset),
            Strategy::PartPatterns => self.part_pattern_search(subset),
        }
    }

    /// One region key per string; every bucket pair is confirmed on the
    /// full strings.
    pub fn pattern_search(&self, subset: Option<&[usize]>) -> SearchResult<PairSet> {
        let region = self.require_region(Strategy::Patterns)?;
        let indices = self.resolve_subset(subset)?;
        let started = Instant::now();

        let index = build_serial(self.strings, &indices, KeyScheme::Region(region));
        let buckets = index.into_buckets();

        let check = PairCheck::full(self.strings, self.config.metric, self.config.cutoff);
        let pairs = self
            .pool
            .install(|| verify_buckets(&buckets, &check, self.config.sink));
        drop(buckets);

        self.finish(Strategy::Patterns, &indices, pairs, started)
    }

    /// Deletion patterns over the whole string, parallel index and
    /// parallel verification.
    pub fn semi_pattern_search(&self, subset: Option<&[usize]>) -> SearchResult<PairSet> {
        let indices = self.resolve_subset(subset)?;
        let started = Instant::now();

        let pairs = self
            .pool
            .install(|| self.semi_patterns_parallel(&indices, Region::None));

        self.finish(Strategy::SemiPatterns, &indices, pairs, started)
    }

    /// Region key buckets, split up front by size.
    ///
    /// Buckets below the large threshold share one parallel loop: the
    /// smallest are checked pairwise, the rest run a serial recursive
    /// semi-pattern search. Large buckets are taken one at a time, each with a
    /// recursive search that uses the whole pool.
    pub fn part_pattern_search(&self, subset: Option<&[usize]>) -> SearchResult<PairSet> {
        let region = self.require_region(Strategy::PartPatterns)?;
        let indices = self.resolve_subset(subset)?;
        let started = Instant::now();

        let small = self.config.small_bucket_threshold;
        let large = self.config.large_bucket_threshold;

        let pairs = self.pool.install(|| {
            let index = build_parallel(
                self.strings,
                &indices,
                KeyScheme::Region(region),
                self.pool.num_threads(),
            );
            let (large_buckets, rest): (Vec<Bucket>, Vec<Bucket>) = index
                .into_buckets()
                .into_iter()
                .filter(|b| b.len() > 1)
                .partition(|b| b.len() >= large);

            debug!(
                target: "simsearch::search",
                buckets = rest.len() + large_buckets.len(),
                large = large_buckets.len(),
                small_threshold = small,
                large_threshold = large,
                "Routing part-pattern buckets"
            );

            let check = PairCheck::for_shared_key(
                self.strings,
                self.config.metric,
                self.config.cutoff,
                region,
            );
            let phase = Instant::now();
            let mut pairs = verify_buckets_with(&rest, self.config.sink, |bucket, out| {
                if bucket.len() < small {
                    verify_pairwise(bucket, &check, out);
                } else {
                    self.semi_patterns_serial(bucket, region, out);
                }
            });
            debug!(
                target: "simsearch::search",
                pairs = pairs.len(),
                elapsed_ms = phase.elapsed().as_millis() as u64,
                "Verified small and medium buckets"
            );

            for bucket in &large_buckets {
                let phase = Instant::now();
                let found = self.semi_patterns_parallel(bucket, region);
                debug!(
                    target: "simsearch::search",
                    size = bucket.len(),
                    pairs = found.len(),
                    elapsed_ms = phase.elapsed().as_millis() as u64,
                    "Verified large bucket"
                );
                pairs.merge(found);
            }
            pairs
        });

        self.finish(Strategy::PartPatterns, &indices, pairs, started)
    }

    /// Semi-pattern search over `indices`, using the pool. `region` is the
    /// key the strings already share (`Region::None` at top level); patterns
    /// are drawn from the remainders.
    fn semi_patterns_parallel(&self, indices: &[usize], region: Region) -> PairSet {
        let phase = Instant::now();
        let index = build_parallel(
            self.strings,
            indices,
            self.deletion_scheme(region),
            self.pool.num_threads(),
        );
        let patterns = index.len();
        let buckets = index.into_buckets();
        let indexed = phase.elapsed();

        let check = PairCheck::for_shared_key(
            self.strings,
            self.config.metric,
            self.config.cutoff,
            region,
        );
        let pairs = verify_buckets(&buckets, &check, self.config.sink);
        debug!(
            target: "simsearch::search",
            strings = indices.len(),
            patterns,
            pairs = pairs.len(),
            index_ms = indexed.as_millis() as u64,
            elapsed_ms = phase.elapsed().as_millis() as u64,
            "Semi-pattern pass"
        );
        pairs
    }

    /// Semi-pattern search over `indices` on the calling thread.
    fn semi_patterns_serial(&self, indices: &[usize], region: Region, out: &mut dyn PairSink) {
        let index = build_serial(self.strings, indices, self.deletion_scheme(region));
        let check = PairCheck::for_shared_key(
            self.strings,
            self.config.metric,
            self.config.cutoff,
            region,
        );
        for (_, bucket) in index.iter() {
            verify_pairwise(bucket, &check, out);
        }
    }

    /// Region-keyed strategies need a real region: with `Region::None` every
    /// key is a whole distinct string and no bucket holds two strings.
    fn require_region(&self, strategy: Strategy) -> SearchResult<Region> {
        match self.config.region {
            Region::None => Err(SearchError::InvalidConfig(format!(
                "{} search needs a prefix, suffix or middle region",
                strategy
            ))),
            region => Ok(region),
        }
    }

    fn deletion_scheme(&self, region: Region) -> KeyScheme {
        KeyScheme::Deletions {
            depth: self.config.cutoff.min(MAX_DELETIONS),
            region,
        }
    }

    /// Sorted, deduplicated indices to search.
    fn resolve_subset(&self, subset: Option<&[usize]>) -> SearchResult<Vec<usize>> {
        let Some(subset) = subset else {
            return Ok((0..self.strings.len()).collect());
        };
        if let Some(&bad) = subset.iter().find(|&&i| i >= self.strings.len()) {
            return Err(SearchError::InvalidConfig(format!(
                "subset index {} out of range for a corpus of {} strings",
                bad,
                self.strings.len()
            )));
        }
        let mut indices = subset.to_vec();
        indices.sort_unstable();
        indices.dedup();
        Ok(indices)
    }

    /// Self-pair post-pass and the expected-count check.
    fn finish(
        &self,
        strategy: Strategy,
        indices: &[usize],
        mut pairs: PairSet,
        started: Instant,
    ) -> SearchResult<PairSet> {
        let distinct = pairs.distinct_pair_count();
        if self.config.include_eye {
            pairs.add_self_pairs(indices.iter().copied());
        }

        info!(
            target: "simsearch::search",
            %strategy,
            strings = indices.len(),
            cutoff = self.config.cutoff,
            metric = %self.config.metric.selector(),
            pairs = distinct,
            total = pairs.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Search complete"
        );

        if let Some(expected) = self.config.expected_pairs {
            if pairs.len() != expected {
                let sample = pairs
                    .to_sorted_vec()
                    .into_iter()
                    .take(MISMATCH_SAMPLE)
                    .collect();
                return Err(SearchError::OutputCountMismatch {
                    expected,
                    actual: pairs.len(),
                    sample,
                });
            }
        }
        Ok(pairs)
    }
}
