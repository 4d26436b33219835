//! Domain error types.
//!
//! These errors represent records that cannot be turned into valid domain
//! values. They are distinct from I/O and lookup failures.

use super::LineId;

/// Domain-level validation errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    /// A line needs at least one hop
    #[error("line {line} has {stops} stop(s), at least 2 required")]
    ShortLine { line: LineId, stops: usize },

    /// Direction code other than 1 or 2
    #[error("unknown direction code {0}")]
    UnknownDirection(u8),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = DomainError::ShortLine {
            line: LineId(5369802),
            stops: 1,
        };
        assert_eq!(
            err.to_string(),
            "line 5369802 has 1 stop(s), at least 2 required"
        );

        let err = DomainError::UnknownDirection(7);
        assert_eq!(err.to_string(), "unknown direction code 7");
    }
}
