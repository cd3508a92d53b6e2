use itertools::Itertools;
use tracing::debug;

use crate::libs::error::GactError;
use crate::libs::model::{predict, ScoringModel};
use crate::libs::onehot::Encoded;
use crate::libs::pair::Activity;

/// Activity values (and thus regression outputs) are modeled as >= -4;
/// predictions are shifted up by this amount so the usable range starts
/// at zero.
pub const REGRESSION_SHIFT: f64 = 4.0;
pub const REGRESSION_LOWER_BOUND: f64 = 0.0;

/// Maps a raw regression output into shifted space with a hard floor.
///
/// Outputs below -4 (less than any training data value) are floored to 0
/// rather than rejected.
pub fn shift(raw: f64) -> f64 {
    (raw + REGRESSION_SHIFT).max(REGRESSION_LOWER_BOUND)
}

/// The two-stage classify-then-regress decision policy.
///
/// The classification threshold decides which pairs are active; the
/// regression threshold (trained only on active pairs, stored in shifted
/// space) decides which of those are highly active.
#[derive(Debug, Clone, Copy)]
pub struct DecisionPolicy {
    pub classification_threshold: f64,
    pub regression_threshold: f64,
}

impl DecisionPolicy {
    /// Builds the policy from optional caller-supplied thresholds and the
    /// defaults shipped with each model.
    ///
    /// A caller-supplied regression threshold is already in shifted space;
    /// a model default is in raw output space and gets the shift applied
    /// here. Boundary values are valid since all comparisons are `>=`.
    pub fn new(
        classification_threshold: Option<f64>,
        classification_default: f64,
        regression_threshold: Option<f64>,
        regression_default: f64,
    ) -> Result<Self, GactError> {
        let classification_threshold = match classification_threshold {
            Some(t) => {
                if !(0.0..=1.0).contains(&t) {
                    return Err(GactError::Config(format!(
                        "classification threshold should be in [0,1], got {}",
                        t
                    )));
                }
                t
            }
            None => {
                if !(0.0..=1.0).contains(&classification_default) {
                    return Err(GactError::Config(format!(
                        "default classification threshold {} is outside [0,1]",
                        classification_default
                    )));
                }
                classification_default
            }
        };

        let regression_threshold = match regression_threshold {
            Some(t) => {
                if t < 0.0 {
                    return Err(GactError::Config(format!(
                        "regression threshold should be >= 0, got {}",
                        t
                    )));
                }
                t
            }
            None => {
                // The default is in the range of direct model outputs
                let shifted = regression_default + REGRESSION_SHIFT;
                if shifted <= REGRESSION_LOWER_BOUND {
                    return Err(GactError::Config(format!(
                        "default regression threshold {} shifts to {}, not above {}",
                        regression_default, shifted, REGRESSION_LOWER_BOUND
                    )));
                }
                shifted
            }
        };

        Ok(Self {
            classification_threshold,
            regression_threshold,
        })
    }

    /// Evaluates an encoded batch against both models.
    ///
    /// Classification runs on the full batch; regression runs only on the
    /// pairs classified active, in their original relative order. Inactive
    /// pairs score exactly (0, false).
    pub fn evaluate(
        &self,
        classification: &dyn ScoringModel,
        regression: &dyn ScoringModel,
        batch: &[Encoded],
    ) -> Result<Vec<Activity>, GactError> {
        if batch.is_empty() {
            return Ok(Vec::new());
        }

        let classification_scores = predict(classification, batch)?;
        let active: Vec<bool> = classification_scores
            .iter()
            .map(|&score| score >= self.classification_threshold)
            .collect();

        let active_batch: Vec<Encoded> = batch
            .iter()
            .zip(active.iter())
            .filter(|(_, &is_active)| is_active)
            .map(|(enc, _)| enc.clone())
            .collect();

        let regression_scores = predict(regression, &active_batch)?;
        debug!(
            "classified {} pairs, {} active",
            batch.len(),
            active_batch.len()
        );

        self.combine(&active, &regression_scores)
    }

    /// Merges classification decisions with regression outputs.
    ///
    /// `regression_scores` covers only the active pairs, in order; the
    /// counts must line up exactly or the batch is inconsistent.
    fn combine(
        &self,
        active: &[bool],
        regression_scores: &[f64],
    ) -> Result<Vec<Activity>, GactError> {
        let n_active = active.iter().filter(|&&a| a).count();
        if n_active != regression_scores.len() {
            return Err(GactError::Config(format!(
                "{} pairs classified active but {} regression outputs",
                n_active,
                regression_scores.len()
            )));
        }

        let mut regressed = regression_scores.iter();
        let results = active
            .iter()
            .map(|&is_active| {
                if !is_active {
                    return Activity::INACTIVE;
                }
                // Count checked above, so the iterator cannot run dry
                let score = shift(*regressed.next().unwrap());
                Activity {
                    score,
                    highly_active: score >= self.regression_threshold,
                }
            })
            .collect_vec();

        Ok(results)
    }
}
