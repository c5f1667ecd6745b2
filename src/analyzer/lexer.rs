//! Lexer for C-family source text
//!
//! Scanning is anchored: every match starts exactly where the previous one
//! ended. At each position the rules of the precedence table are tried in
//! order and the first one that matches wins, regardless of match length.
//! Comments and whitespace are consumed but only recorded as [`Trivia`];
//! everything else becomes a [`Token`].
//!
//! Precedence quirks are intentional and observable:
//! - `public`, `static`, ... are MODIFIER and `int`, `char`, ... are TYPE even
//!   though they also appear in the keyword table.
//! - Signed and leading-digit numbers are taken by the integer rules before
//!   FLOAT is tried, so `1.5` lexes as INTEGER `1` followed by FLOAT `.5`.
//! - A `-` directly followed by a digit is part of the number: `x-1` yields
//!   IDENTIFIER `x`, INTEGER `-1`.

use super::token::{Token, TokenKind};
use rustc_hash::FxHashSet;
use std::fmt;
use std::ops::Range;

const MODIFIERS: &[&str] = &[
    "public",
    "protected",
    "private",
    "static",
    "abstract",
    "final",
    "native",
    "synchronized",
    "transient",
    "volatile",
    "strictfp",
];

const TYPES: &[&str] = &["boolean", "char", "double", "float", "byte", "int", "long"];

const KEYWORDS: &[&str] = &[
    "abstract",
    "assert",
    "boolean",
    "break",
    "byte",
    "case",
    "catch",
    "char",
    "class",
    "continue",
    "default",
    "do",
    "double",
    "else",
    "enum",
    "extends",
    "final",
    "finally",
    "float",
    "for",
    "if",
    "implements",
    "import",
    "instanceof",
    "int",
    "interface",
    "long",
    "native",
    "new",
    "package",
    "private",
    "protected",
    "public",
    "return",
    "short",
    "static",
    "strictfp",
    "super",
    "switch",
    "synchronized",
    "this",
    "throw",
    "throws",
    "transient",
    "try",
    "void",
    "volatile",
    "while",
    "true",
    "null",
    "false",
    "const",
    "goto",
];

const SYMBOLS: &[u8] = b"{}()[].|\\,<>?/-+=!:@#;$%~^&*";

/// One entry of the ordered rule table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rule {
    Comment,
    Whitespace,
    Emit(TokenKind),
}

/// Rules in precedence order.
const RULES: [Rule; 14] = [
    Rule::Comment,
    Rule::Whitespace,
    Rule::Emit(TokenKind::Char),
    Rule::Emit(TokenKind::String),
    Rule::Emit(TokenKind::Binary),
    Rule::Emit(TokenKind::Hexadecimal),
    Rule::Emit(TokenKind::Octal),
    Rule::Emit(TokenKind::Integer),
    Rule::Emit(TokenKind::Float),
    Rule::Emit(TokenKind::Modifier),
    Rule::Emit(TokenKind::Type),
    Rule::Emit(TokenKind::Keyword),
    Rule::Emit(TokenKind::Symbol),
    Rule::Emit(TokenKind::Identifier),
];

/// What a discarded span of source consisted of.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriviaKind {
    Comment,
    Whitespace,
}

/// A span the lexer consumed without emitting a token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trivia {
    pub kind: TriviaKind,
    pub span: Range<usize>,
}

/// Lexer error type
///
/// Raised when no rule matches at `offset`. Fatal to the tokenization call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexError {
    pub offset: usize,
    pub found: char,
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Lexer error at offset {}: no rule matches {:?}",
            self.offset, self.found
        )
    }
}

impl std::error::Error for LexError {}

/// Lexer for C-family source code
pub struct Lexer<'src> {
    source: &'src str,
    bytes: &'src [u8],
    /// Start of the last `*/` in the source; every block comment ends there.
    last_block_close: Option<usize>,
    position: usize,
    trivia: Vec<Trivia>,
    modifiers: FxHashSet<&'static str>,
    types: FxHashSet<&'static str>,
    keywords: FxHashSet<&'static str>,
}

impl<'src> Lexer<'src> {
    /// Create a new lexer for the given source string.
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            bytes: source.as_bytes(),
            last_block_close: source.rfind("*/"),
            position: 0,
            trivia: Vec::new(),
            modifiers: MODIFIERS.iter().copied().collect(),
            types: TYPES.iter().copied().collect(),
            keywords: KEYWORDS.iter().copied().collect(),
        }
    }

    /// Tokenize the entire input
    pub fn tokenize(&mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();

        while !self.is_at_end() {
            let start = self.position;
            let (rule, len) = self.match_at(start).ok_or_else(|| self.error_at(start))?;
            let end = start + len;
            self.position = end;

            match rule {
                Rule::Comment => self.trivia.push(Trivia {
                    kind: TriviaKind::Comment,
                    span: start..end,
                }),
                Rule::Whitespace => self.trivia.push(Trivia {
                    kind: TriviaKind::Whitespace,
                    span: start..end,
                }),
                Rule::Emit(kind) => {
                    let text = &self.source[start..end];
                    tokens.push(Token::new(start, end, tokens.len(), text, kind));
                }
            }
        }

        Ok(tokens)
    }

    /// Comment and whitespace spans consumed so far, in source order.
    pub fn trivia(&self) -> &[Trivia] {
        &self.trivia
    }

    pub fn into_trivia(self) -> Vec<Trivia> {
        self.trivia
    }

    /// First rule matching at `pos`, with the byte length it consumes.
    fn match_at(&self, pos: usize) -> Option<(Rule, usize)> {
        RULES
            .iter()
            .find_map(|&rule| self.match_rule(rule, pos).map(|len| (rule, len)))
    }

    fn match_rule(&self, rule: Rule, pos: usize) -> Option<usize> {
        match rule {
            Rule::Comment => self.comment(pos),
            Rule::Whitespace => nonzero(self.run(pos, is_whitespace)),
            Rule::Emit(kind) => match kind {
                TokenKind::Char => self.char_literal(pos),
                TokenKind::String => self.string_literal(pos),
                TokenKind::Binary => self.binary(pos),
                TokenKind::Hexadecimal => self.hexadecimal(pos),
                TokenKind::Octal => self.octal(pos),
                TokenKind::Integer => self.integer(pos),
                TokenKind::Float => self.float(pos),
                TokenKind::Modifier => self.word_in(pos, &self.modifiers),
                TokenKind::Type => self.word_in(pos, &self.types),
                TokenKind::Keyword => self.word_in(pos, &self.keywords),
                TokenKind::Symbol => self
                    .peek(pos)
                    .filter(|b| SYMBOLS.contains(b))
                    .map(|_| 1),
                TokenKind::Identifier => self.identifier(pos),
            },
        }
    }

    /// `//` up to the end of the line, or `/*` up to the *last* `*/` in the
    /// remaining input.
    fn comment(&self, pos: usize) -> Option<usize> {
        if self.peek(pos) != Some(b'/') {
            return None;
        }
        match self.peek(pos + 1) {
            Some(b'/') => {
                let body = self.run(pos + 2, |b| b != b'\n' && b != b'\r');
                Some(2 + body)
            }
            Some(b'*') => self
                .last_block_close
                .filter(|&close| close >= pos + 2)
                .map(|close| close + 2 - pos),
            _ => None,
        }
    }

    fn char_literal(&self, pos: usize) -> Option<usize> {
        if self.peek(pos) != Some(b'\'') {
            return None;
        }
        let mut chars = self.source[pos + 1..].chars();
        let first = chars.next()?;
        let mut len = 1 + first.len_utf8();
        if first == '\\' {
            len += chars.next()?.len_utf8();
        }
        (chars.next()? == '\'').then_some(len + 1)
    }

    fn string_literal(&self, pos: usize) -> Option<usize> {
        if self.peek(pos) != Some(b'"') {
            return None;
        }
        let mut chars = self.source[pos + 1..].char_indices();
        while let Some((i, ch)) = chars.next() {
            match ch {
                '"' => return Some(1 + i + 1),
                '\\' => {
                    chars.next()?;
                }
                _ => {}
            }
        }
        None
    }

    fn binary(&self, pos: usize) -> Option<usize> {
        if !self.source[pos..].starts_with("0b") {
            return None;
        }
        nonzero(self.run(pos + 2, |b| b == b'0' || b == b'1')).map(|n| 2 + n)
    }

    fn hexadecimal(&self, pos: usize) -> Option<usize> {
        let sign = self.sign(pos);
        if !self.source[pos + sign..].starts_with("0x") {
            return None;
        }
        nonzero(self.run(pos + sign + 2, |b| b.is_ascii_hexdigit())).map(|n| sign + 2 + n)
    }

    fn octal(&self, pos: usize) -> Option<usize> {
        let sign = self.sign(pos);
        if self.peek(pos + sign) != Some(b'0') {
            return None;
        }
        nonzero(self.run(pos + sign + 1, |b| b.is_ascii_digit())).map(|n| sign + 1 + n)
    }

    fn integer(&self, pos: usize) -> Option<usize> {
        let sign = self.sign(pos);
        let digits = match self.peek(pos + sign)? {
            b'0' => 1,
            b'1'..=b'9' => 1 + self.run(pos + sign + 1, |b| b.is_ascii_digit()),
            _ => return None,
        };
        let len = sign + digits;
        match self.peek(pos + len) {
            Some(b'l' | b'L') => Some(len + 1),
            _ => Some(len),
        }
    }

    fn float(&self, pos: usize) -> Option<usize> {
        let sign = self.sign(pos);
        let whole = self.run(pos + sign, |b| b.is_ascii_digit());
        let dot = pos + sign + whole;
        if self.peek(dot) != Some(b'.') {
            return None;
        }
        let fraction = self.run(dot + 1, |b| b.is_ascii_digit());
        if whole + fraction == 0 {
            return None;
        }
        let len = sign + whole + 1 + fraction;
        match self.peek(pos + len) {
            Some(b'f' | b'F') => Some(len + 1),
            _ => Some(len),
        }
    }

    /// Matches a whole word that is a member of `set`.
    fn word_in(&self, pos: usize, set: &FxHashSet<&'static str>) -> Option<usize> {
        if !self.at_word_start(pos) {
            return None;
        }
        let len = self.word_len(pos);
        set.contains(&self.source[pos..pos + len]).then_some(len)
    }

    fn identifier(&self, pos: usize) -> Option<usize> {
        if !self.at_word_start(pos) {
            return None;
        }
        Some(self.word_len(pos))
    }

    /// Length of the `[\w$]` run at `pos`, minus any trailing `$` so the
    /// word ends on a word boundary.
    fn word_len(&self, pos: usize) -> usize {
        let mut len = self.run(pos, is_identifier_byte);
        while len > 1 && self.bytes[pos + len - 1] == b'$' {
            len -= 1;
        }
        len
    }

    /// A word boundary followed by `[_a-zA-Z]`.
    fn at_word_start(&self, pos: usize) -> bool {
        let starts_word = self
            .peek(pos)
            .is_some_and(|b| b == b'_' || b.is_ascii_alphabetic());
        let after_boundary = pos == 0 || !is_word_byte(self.bytes[pos - 1]);
        starts_word && after_boundary
    }

    /// 1 if a `-` sits at `pos`, else 0.
    fn sign(&self, pos: usize) -> usize {
        usize::from(self.peek(pos) == Some(b'-'))
    }

    /// Length of the run of bytes satisfying `pred` starting at `from`.
    fn run(&self, from: usize, pred: impl Fn(u8) -> bool) -> usize {
        self.bytes
            .get(from..)
            .map_or(0, |rest| rest.iter().take_while(|&&b| pred(b)).count())
    }

    fn peek(&self, pos: usize) -> Option<u8> {
        self.bytes.get(pos).copied()
    }

    fn is_at_end(&self) -> bool {
        self.position >= self.bytes.len()
    }

    fn error_at(&self, offset: usize) -> LexError {
        LexError {
            offset,
            found: self.source[offset..].chars().next().unwrap_or('\0'),
        }
    }
}

fn nonzero(len: usize) -> Option<usize> {
    (len > 0).then_some(len)
}

fn is_whitespace(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r' | 0x0B | 0x0C)
}

fn is_word_byte(b: u8) -> bool {
    b == b'_' || b.is_ascii_alphanumeric()
}

fn is_identifier_byte(b: u8) -> bool {
    is_word_byte(b) || b == b'$'
}
