//! Non-fatal structural diagnostics
//!
//! Diagnostics never stop the analysis; they are collected in order and
//! returned next to the (best-effort) result.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// A `{` with no matching `}` before the end of the token stream.
    UnterminatedScope,
    /// A `}` at global level with no `{` to close.
    UnmatchedClose,
}

/// A syntax note keyed to a position in the token sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub token_index: usize,
    pub kind: DiagnosticKind,
    pub cause: String,
}

impl Diagnostic {
    pub fn new(token_index: usize, kind: DiagnosticKind, cause: impl Into<String>) -> Self {
        Self {
            token_index,
            kind,
            cause: cause.into(),
        }
    }

    pub fn unterminated_scope(token_index: usize) -> Self {
        Self::new(
            token_index,
            DiagnosticKind::UnterminatedScope,
            "'{' is never closed",
        )
    }

    pub fn unmatched_close(token_index: usize) -> Self {
        Self::new(
            token_index,
            DiagnosticKind::UnmatchedClose,
            "'}' has no matching '{'",
        )
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Syntax error at token {}: {}",
            self.token_index, self.cause
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let diag = Diagnostic::unterminated_scope(7);
        assert_eq!(diag.kind, DiagnosticKind::UnterminatedScope);
        assert_eq!(diag.to_string(), "Syntax error at token 7: '{' is never closed");
    }
}
