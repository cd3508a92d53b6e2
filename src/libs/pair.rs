use crate::libs::error::GactError;

/// A guide-target pair under evaluation.
///
/// `target` is the target region with `context_nt` flanking bases on each
/// side of the guide window; `guide` is the guide sequence itself. Pairs
/// compare and hash by exact string equality, which makes them usable as
/// memoization keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Pair {
    pub target: String,
    pub guide: String,
}

impl Pair {
    pub fn new(target: impl Into<String>, guide: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            guide: guide.into(),
        }
    }

    /// Checks that the target carries exactly `context_nt` bases of context
    /// on each side of the guide window.
    pub fn check_context(&self, context_nt: usize) -> Result<(), GactError> {
        let expected = 2 * context_nt + self.guide.chars().count();
        let actual = self.target.chars().count();
        if actual != expected {
            return Err(GactError::BadLength {
                target: self.target.clone(),
                actual,
                expected,
                context_nt,
                guide_len: self.guide.chars().count(),
            });
        }
        Ok(())
    }
}

/// Result of evaluating one pair.
///
/// A pair classified inactive is exactly `(0.0, false)`. An active pair
/// carries the shifted regression output (>= 0); `highly_active` is set
/// when that output reaches the regression threshold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Activity {
    pub score: f64,
    pub highly_active: bool,
}

impl Activity {
    pub const INACTIVE: Self = Self {
        score: 0.0,
        highly_active: false,
    };
}
