//! Token definitions shared by the lexer, the scope builder and the UI.

use std::fmt;
use std::ops::Range;

/// Classification assigned to every emitted token.
///
/// The declaration order is the lexer's precedence order: when two rules
/// could match at the same position, the one declared first wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Char,
    String,
    Binary,
    Hexadecimal,
    Octal,
    Integer,
    Float,
    Modifier,
    Type,
    Keyword,
    Symbol,
    Identifier,
}

impl TokenKind {
    /// Upper-case label used in dumps and the token pane.
    pub fn name(self) -> &'static str {
        match self {
            TokenKind::Char => "CHAR",
            TokenKind::String => "STRING",
            TokenKind::Binary => "BINARY",
            TokenKind::Hexadecimal => "HEXADECIMAL",
            TokenKind::Octal => "OCTAL",
            TokenKind::Integer => "INTEGER",
            TokenKind::Float => "FLOAT",
            TokenKind::Modifier => "MODIFIER",
            TokenKind::Type => "TYPE",
            TokenKind::Keyword => "KEYWORD",
            TokenKind::Symbol => "SYMBOL",
            TokenKind::Identifier => "IDENTIFIER",
        }
    }

    /// Returns `true` for the numeric literal kinds.
    pub fn is_number(self) -> bool {
        matches!(
            self,
            TokenKind::Binary
                | TokenKind::Hexadecimal
                | TokenKind::Octal
                | TokenKind::Integer
                | TokenKind::Float
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A classified, positioned slice of the source text.
///
/// `start..end` is a half-open byte range into the analyzed source and
/// `index` is the token's position in the emitted sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub start: usize,
    pub end: usize,
    pub index: usize,
    pub text: String,
    pub kind: TokenKind,
}

impl Token {
    pub fn new(start: usize, end: usize, index: usize, text: &str, kind: TokenKind) -> Self {
        Self {
            start,
            end,
            index,
            text: text.to_string(),
            kind,
        }
    }

    pub fn span(&self) -> Range<usize> {
        self.start..self.end
    }

    pub fn is_open_brace(&self) -> bool {
        self.kind == TokenKind::Symbol && self.text == "{"
    }

    pub fn is_close_brace(&self) -> bool {
        self.kind == TokenKind::Symbol && self.text == "}"
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<10} from {:<4} to {:<4} {}",
            self.kind.name(),
            self.start,
            self.end,
            self.text
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_pads_columns() {
        let tok = Token::new(4, 5, 1, "x", TokenKind::Identifier);
        assert_eq!(tok.to_string(), "IDENTIFIER from 4    to 5    x");

        let tok = Token::new(0, 3, 0, "int", TokenKind::Type);
        assert_eq!(tok.to_string(), "TYPE       from 0    to 3    int");
    }

    #[test]
    fn test_brace_predicates() {
        let open = Token::new(0, 1, 0, "{", TokenKind::Symbol);
        let close = Token::new(1, 2, 1, "}", TokenKind::Symbol);
        assert!(open.is_open_brace());
        assert!(!open.is_close_brace());
        assert!(close.is_close_brace());
        assert_eq!(close.span(), 1..2);
    }

    #[test]
    fn test_number_kinds() {
        assert!(TokenKind::Octal.is_number());
        assert!(TokenKind::Float.is_number());
        assert!(!TokenKind::Char.is_number());
        assert!(!TokenKind::Identifier.is_number());
    }
}
