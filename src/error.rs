//! Error types

use thiserror::Error;

/// Returned when glyph or row geometry is queried before any layout pass.
///
/// This is the one hard failure in the crate: it signals a caller-contract
/// violation, not a recoverable runtime condition. Stale caret or selection
/// indices are clamped instead and never surface as errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("geometry queried before any layout pass")]
pub struct NotLaidOut;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(
            NotLaidOut.to_string(),
            "geometry queried before any layout pass"
        );
    }
}
