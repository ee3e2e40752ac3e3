use thiserror::Error;

/// Errors raised while registering rules.
///
/// Rewriting itself never fails; anything that can be rejected is rejected
/// up front, when the rule is built.
#[derive(Debug, Error)]
pub enum RuleError {
    #[error("invalid pattern `{pattern}`: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}
