//! Bucket verification.
//!
//! Every bucket is a list of strings sharing one key. Verification runs the
//! distance oracle over the pairs in a bucket and writes confirmed pairs to a
//! [`PairSink`]. Singleton buckets contribute nothing; self-pairs are added
//! by the orchestrator in one pass at the end.

use itertools::Itertools;
use rayon::prelude::*;

use super::distance::{DistanceFn, Metric};
use super::index::Bucket;
use super::pairs::{PairSet, PairSink, SharedPairSet, SinkKind};
use super::region::{region_remainder, Region};

/// Upper bound on buckets handed to a worker at once. Bucket sizes vary by
/// orders of magnitude, so keep the unit of stealing small.
const VERIFY_GRAIN: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CheckMode {
    /// Compare the full strings.
    Full,
    /// Compare the remainders only; exact for the metric and region.
    Remainder,
    /// Compare remainders first, then confirm on the full strings.
    RemainderThenFull,
}

/// Decides whether two corpus strings form a confirmed pair.
#[derive(Clone, Copy)]
pub struct PairCheck<'a> {
    strings: &'a [String],
    within: DistanceFn,
    cutoff: usize,
    region: Region,
    mode: CheckMode,
}

impl std::fmt::Debug for PairCheck<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PairCheck")
            .field("cutoff", &self.cutoff)
            .field("region", &self.region)
            .field("mode", &self.mode)
            .finish()
    }
}

impl<'a> PairCheck<'a> {
    /// Confirm on the unmodified strings.
    pub fn full(strings: &'a [String], metric: Metric, cutoff: usize) -> Self {
        Self {
            strings,
            within: metric.oracle(),
            cutoff,
            region: Region::None,
            mode: CheckMode::Full,
        }
    }

    /// Confirm pairs whose strings are known to share the same `region` key.
    ///
    /// When trimming the key preserves the distance only the remainders are
    /// compared; otherwise a remainder match is re-checked on the full
    /// strings so trimming never produces a false positive.
    pub fn for_shared_key(
        strings: &'a [String],
        metric: Metric,
        cutoff: usize,
        region: Region,
    ) -> Self {
        let mode = if region == Region::None {
            CheckMode::Full
        } else if region.remainder_is_exact(metric) {
            CheckMode::Remainder
        } else {
            CheckMode::RemainderThenFull
        };
        Self {
            strings,
            within: metric.oracle(),
            cutoff,
            region,
            mode,
        }
    }

    pub fn confirms(&self, a: usize, b: usize) -> bool {
        let (sa, sb) = (&self.strings[a], &self.strings[b]);
        match self.mode {
            CheckMode::Full => (self.within)(sa, sb, self.cutoff),
            CheckMode::Remainder => (self.within)(
                region_remainder(sa, self.region),
                region_remainder(sb, self.region),
                self.cutoff,
            ),
            CheckMode::RemainderThenFull => {
                (self.within)(
                    region_remainder(sa, self.region),
                    region_remainder(sb, self.region),
                    self.cutoff,
                ) && (self.within)(sa, sb, self.cutoff)
            }
        }
    }
}

/// Check every pair of one bucket and emit the confirmed ones.
pub fn verify_pairwise<S>(bucket: &[usize], check: &PairCheck<'_>, sink: &mut S)
where
    S: PairSink + ?Sized,
{
    if bucket.len() < 2 {
        return;
    }
    for (&a, &b) in bucket.iter().tuple_combinations() {
        if a != b && check.confirms(a, b) {
            sink.insert_pair(a, b);
        }
    }
}

/// Run `per_bucket` over all buckets on the current pool, accumulating with
/// the requested sink strategy.
pub fn verify_buckets_with<F>(buckets: &[Bucket], sink: SinkKind, per_bucket: F) -> PairSet
where
    F: Fn(&[usize], &mut dyn PairSink) + Sync,
{
    match sink {
        SinkKind::ThreadLocal => buckets
            .par_iter()
            .with_max_len(VERIFY_GRAIN)
            .fold(PairSet::new, |mut local, bucket| {
                per_bucket(bucket.as_slice(), &mut local);
                local
            })
            .reduce(PairSet::new, PairSet::merged),
        SinkKind::Shared => {
            let shared = SharedPairSet::new();
            buckets
                .par_iter()
                .with_max_len(VERIFY_GRAIN)
                .for_each(|bucket| {
                    let mut handle = &shared;
                    per_bucket(bucket.as_slice(), &mut handle);
                });
            let mut out = PairSet::new();
            shared.merge_into(&mut out);
            out
        }
    }
}

/// Pairwise verification of every bucket, in parallel.
pub fn verify_buckets(buckets: &[Bucket], check: &PairCheck<'_>, sink: SinkKind) -> PairSet {
    verify_buckets_with(buckets, sink, |bucket, out| verify_pairwise(bucket, check, out))
}
