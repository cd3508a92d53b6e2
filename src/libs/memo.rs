use std::collections::HashMap;

use indexmap::{IndexMap, IndexSet};
use tracing::debug;

use crate::libs::error::GactError;
use crate::libs::pair::{Activity, Pair};

/// Memoized evaluations, organized by guide start position:
/// `{locus: {pair: activity}}`.
///
/// In genome-scanning usage many overlapping windows re-query the same
/// pair at the same locus; this bounds model invocations to one per
/// distinct (locus, pair). The locus carries no effect on the computed
/// result, it only scopes storage and cleanup.
#[derive(Debug, Default)]
pub struct EvaluationCache {
    memo: HashMap<i64, IndexMap<Pair, Activity>>,
}

impl EvaluationCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns results for `pairs` at `locus`, evaluating only what is
    /// not yet cached.
    ///
    /// The uncached subset is deduplicated (first-seen order) before
    /// `eval` runs on it, so a pair requested twice in one call, or
    /// cached by an earlier call at this locus, is evaluated once. The
    /// returned list matches `pairs` one-to-one, duplicates included.
    pub fn fetch<F>(
        &mut self,
        locus: i64,
        pairs: &[Pair],
        eval: F,
    ) -> Result<Vec<Activity>, GactError>
    where
        F: FnOnce(&[Pair]) -> Result<Vec<Activity>, GactError>,
    {
        let mem = self.memo.entry(locus).or_default();

        let unseen: IndexSet<&Pair> = pairs.iter().filter(|p| !mem.contains_key(*p)).collect();
        let unseen: Vec<Pair> = unseen.into_iter().cloned().collect();

        if !unseen.is_empty() {
            debug!(
                "locus {}: {} of {} pairs need evaluation",
                locus,
                unseen.len(),
                pairs.len()
            );
            let results = eval(&unseen)?;
            if results.len() != unseen.len() {
                return Err(GactError::Config(format!(
                    "evaluated {} pairs but got {} results",
                    unseen.len(),
                    results.len()
                )));
            }
            let mem = self.memo.entry(locus).or_default();
            for (pair, result) in unseen.into_iter().zip(results) {
                mem.insert(pair, result);
            }
        }

        let mem = &self.memo[&locus];
        Ok(pairs.iter().map(|p| mem[p]).collect())
    }

    /// Discards all cached entries for `locus`; a no-op if none exist
    pub fn cleanup(&mut self, locus: i64) {
        self.memo.remove(&locus);
    }

    /// Number of cached pairs at `locus`
    pub fn len(&self, locus: i64) -> usize {
        self.memo.get(&locus).map_or(0, |mem| mem.len())
    }

    pub fn is_empty(&self) -> bool {
        self.memo.values().all(|mem| mem.is_empty())
    }
}
