//! Error taxonomy for the theme engine.

use thiserror::Error;

/// Theme engine errors.
///
/// Only transport failures are retryable; a malformed payload or a missing
/// DOM capability will not change on a second attempt.
#[derive(Debug, Error)]
pub enum ThemeError {
    /// Network-level failure: timeout, connection refused, non-2xx status.
    #[error("transport error: {0}")]
    Transport(String),
    /// The palette response did not have the expected shape.
    #[error("invalid palette response: {0}")]
    Validation(String),
    /// A DOM capability or insertion point was unavailable.
    #[error("dom error: {0}")]
    Dom(String),
}

impl ThemeError {
    /// Whether another attempt could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ThemeError::Transport(_))
    }

    /// Short label identifying the failure class, used as the `source`
    /// field of `theme-error` event details.
    pub fn kind(&self) -> &'static str {
        match self {
            ThemeError::Transport(_) => "transport",
            ThemeError::Validation(_) => "validation",
            ThemeError::Dom(_) => "dom",
        }
    }
}

/// Result type for theme operations.
pub type ThemeResult<T> = Result<T, ThemeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_transport_is_retryable() {
        assert!(ThemeError::Transport("timeout".into()).is_retryable());
        assert!(!ThemeError::Validation("missing colors".into()).is_retryable());
        assert!(!ThemeError::Dom("no header".into()).is_retryable());
    }

    #[test]
    fn test_display() {
        let err = ThemeError::Transport("HTTP 500".into());
        assert_eq!(err.to_string(), "transport error: HTTP 500");
    }
}
