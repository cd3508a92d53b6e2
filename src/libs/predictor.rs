use tracing::info;

use crate::libs::error::GactError;
use crate::libs::memo::EvaluationCache;
use crate::libs::model::{ModelMeta, ScoringModel};
use crate::libs::onehot;
use crate::libs::pair::{Activity, Pair};
use crate::libs::policy::DecisionPolicy;

/// The activity prediction façade.
///
/// Owns the two scoring models, the decision policy, and the evaluation
/// cache; this is the only type external callers touch. All cache
/// mutation is serialized through `&mut self`, so concurrent use means
/// wrapping the whole predictor in a lock.
pub struct Predictor {
    classification: Box<dyn ScoringModel>,
    regression: Box<dyn ScoringModel>,
    policy: DecisionPolicy,
    context_nt: usize,
    cache: EvaluationCache,
}

impl std::fmt::Debug for Predictor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Predictor")
            .field("policy", &self.policy)
            .field("context_nt", &self.context_nt)
            .finish_non_exhaustive()
    }
}

impl Predictor {
    /// Builds a predictor from the two models and their companion
    /// metadata.
    ///
    /// The models must have been trained with the same `context_nt`;
    /// a mismatch is fatal. Thresholds not supplied by the caller come
    /// from each model's `default_threshold` (see `DecisionPolicy::new`
    /// for the domains and the regression shift convention).
    pub fn new(
        classification: Box<dyn ScoringModel>,
        classification_meta: ModelMeta,
        regression: Box<dyn ScoringModel>,
        regression_meta: ModelMeta,
        classification_threshold: Option<f64>,
        regression_threshold: Option<f64>,
    ) -> Result<Self, GactError> {
        if classification_meta.context_nt != regression_meta.context_nt {
            return Err(GactError::Config(format!(
                "classification and regression models should have been trained \
                 with the same context_nt, but differ: {} vs {}",
                classification_meta.context_nt, regression_meta.context_nt
            )));
        }

        let policy = DecisionPolicy::new(
            classification_threshold,
            classification_meta.default_threshold,
            regression_threshold,
            regression_meta.default_threshold,
        )?;
        info!(
            "predictor ready: context_nt={}, classification_threshold={}, regression_threshold={}",
            classification_meta.context_nt,
            policy.classification_threshold,
            policy.regression_threshold
        );

        Ok(Self {
            classification,
            regression,
            policy,
            context_nt: classification_meta.context_nt,
            cache: EvaluationCache::new(),
        })
    }

    /// Context bases on each side of the guide window; callers validate
    /// their input shapes against this.
    pub fn context_nt(&self) -> usize {
        self.context_nt
    }

    /// Whether each pair is highly active. `locus` scopes memoization.
    pub fn determine_highly_active(
        &mut self,
        locus: i64,
        pairs: &[Pair],
    ) -> Result<Vec<bool>, GactError> {
        let results = self.evaluate(locus, pairs)?;
        Ok(results.iter().map(|r| r.highly_active).collect())
    }

    /// A single activity score for each pair. `locus` scopes memoization.
    pub fn compute_activity(&mut self, locus: i64, pairs: &[Pair]) -> Result<Vec<f64>, GactError> {
        let results = self.evaluate(locus, pairs)?;
        Ok(results.iter().map(|r| r.score).collect())
    }

    fn evaluate(&mut self, locus: i64, pairs: &[Pair]) -> Result<Vec<Activity>, GactError> {
        let context_nt = self.context_nt;
        let policy = self.policy;
        let classification = &*self.classification;
        let regression = &*self.regression;

        self.cache.fetch(locus, pairs, |unseen| {
            let batch = unseen
                .iter()
                .map(|pair| onehot::encode(pair, context_nt))
                .collect::<Result<Vec<_>, _>>()?;
            policy.evaluate(classification, regression, &batch)
        })
    }

    /// Drops memoizations no longer needed at a start position
    pub fn cleanup_memoized(&mut self, locus: i64) {
        self.cache.cleanup(locus);
    }
}
