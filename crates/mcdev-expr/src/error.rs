use thiserror::Error;

/// Expression evaluation failure.
///
/// The `Display` form is what ends up in diagnostic findings.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExprError {
    #[error("expression too long: {actual} chars (limit {limit})")]
    TooLong { limit: usize, actual: usize },

    #[error("expression nested too deeply at {position} (limit {limit})")]
    TooDeep { limit: usize, position: usize },

    /// Parse or runtime error reported by the JEXL engine
    #[error("{0}")]
    Eval(String),
}
