use thiserror::Error;

/// Error types that can occur while evaluating guide-target activity
#[derive(Error, Debug)]
pub enum GactError {
    /// Broken model setup: missing companion files, thresholds outside
    /// their domains, mismatched context_nt, count mismatches between
    /// model stages. Never recoverable.
    #[error("configuration: {0}")]
    Config(String),

    /// A character outside the IUPAC nucleotide alphabet
    #[error("cannot encode base {base:?} in sequence {seq}")]
    BadBase { base: char, seq: String },

    /// Target length does not match 2*context_nt + guide length
    #[error("target {target} has length {actual}, expected {expected} (2*{context_nt} context + {guide_len} guide)")]
    BadLength {
        target: String,
        actual: usize,
        expected: usize,
        context_nt: usize,
        guide_len: usize,
    },

    /// Malformed input row
    #[error("input format: {0}")]
    InputFormat(String),

    /// External scoring model failed or produced unparseable output
    #[error("model invocation: {0}")]
    Model(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
