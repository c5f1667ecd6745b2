//! Lexical and structural analysis of C-family source
//!
//! This module turns source text into a read-only structural view:
//! - [`lines`]: Line index (byte offset → line number)
//! - [`lexer`]: Tokenization (source text → tokens)
//! - [`scope`]: Brace scope tree (tokens → nested scopes)
//! - [`diagnostics`]: Non-fatal structural notes
//! - [`report`]: Plain-text dump of a finished analysis
//!
//! [`Analysis::run`] drives all of them in order. Only a lexing failure
//! aborts a run; scope anomalies degrade to a best-effort tree plus
//! diagnostics.

pub mod diagnostics;
pub mod lexer;
pub mod lines;
pub mod report;
pub mod scope;
pub mod token;

use diagnostics::Diagnostic;
use lexer::{LexError, Lexer, Trivia};
use lines::LineIndex;
use scope::{ScopeId, ScopeTree};
use std::fmt;
use token::Token;

/// Errors that abort an analysis run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    /// No lexer rule matched. `line` and `column` are 0-based.
    Lex {
        error: LexError,
        line: usize,
        column: usize,
    },
}

impl fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisError::Lex {
                error,
                line,
                column,
            } => write!(
                f,
                "Lexer error at line {}, column {}: unexpected character {:?}",
                line + 1,
                column + 1,
                error.found
            ),
        }
    }
}

impl std::error::Error for AnalysisError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AnalysisError::Lex { error, .. } => Some(error),
        }
    }
}

/// Everything produced from one source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Analysis {
    source: String,
    lines: LineIndex,
    tokens: Vec<Token>,
    trivia: Vec<Trivia>,
    scopes: ScopeTree,
    diagnostics: Vec<Diagnostic>,
}

impl Analysis {
    /// Run the full pipeline over `source`.
    pub fn run(source: impl Into<String>) -> Result<Self, AnalysisError> {
        let source = source.into();
        let lines = LineIndex::new(&source);

        let mut lexer = Lexer::new(&source);
        let tokens = match lexer.tokenize() {
            Ok(tokens) => tokens,
            Err(error) => {
                return Err(AnalysisError::Lex {
                    line: lines.line_of(error.offset),
                    column: lines.column_of(error.offset),
                    error,
                });
            }
        };
        let trivia = lexer.into_trivia();

        let mut diagnostics = Vec::new();
        let scopes = ScopeTree::build(&tokens, &mut diagnostics);

        Ok(Self {
            source,
            lines,
            tokens,
            trivia,
            scopes,
            diagnostics,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn lines(&self) -> &LineIndex {
        &self.lines
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Comment and whitespace spans skipped by the lexer.
    pub fn trivia(&self) -> &[Trivia] {
        &self.trivia
    }

    pub fn scopes(&self) -> &ScopeTree {
        &self.scopes
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// `true` when the run recorded no diagnostics.
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// The first recorded problem, if any.
    pub fn first_problem(&self) -> Option<&Diagnostic> {
        self.diagnostics.first()
    }

    pub fn token(&self, index: usize) -> Option<&Token> {
        self.tokens.get(index)
    }

    pub fn next_token(&self, index: usize) -> Option<&Token> {
        self.tokens.get(index.checked_add(1)?)
    }

    pub fn prev_token(&self, index: usize) -> Option<&Token> {
        self.tokens.get(index.checked_sub(1)?)
    }

    /// 0-based line on which the token at `index` starts.
    pub fn line_of_token(&self, index: usize) -> Option<usize> {
        self.token(index).map(|token| self.lines.line_of(token.start))
    }

    pub fn line_text(&self, line: usize) -> Option<&str> {
        self.lines.line_text(&self.source, line)
    }

    /// Deepest scope enclosing the token at `index`.
    pub fn innermost_scope_at(&self, index: usize) -> ScopeId {
        self.scopes.innermost_at(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::diagnostics::DiagnosticKind;

    #[test]
    fn test_clean_run() {
        let analysis = Analysis::run("int x = 5;").unwrap();
        assert!(analysis.is_clean());
        assert_eq!(analysis.tokens().len(), 5);
        assert!(analysis.scopes().root_scope().children.is_empty());
        assert!(analysis.first_problem().is_none());
    }

    #[test]
    fn test_lex_failure_reports_position() {
        let err = Analysis::run("int x;\n  y = `;").unwrap_err();
        let AnalysisError::Lex {
            error,
            line,
            column,
        } = err.clone();
        assert_eq!(error.offset, 13);
        assert_eq!(line, 1);
        assert_eq!(column, 6);
        assert_eq!(
            err.to_string(),
            "Lexer error at line 2, column 7: unexpected character '`'"
        );
    }

    #[test]
    fn test_unterminated_is_a_problem_not_an_error() {
        let analysis = Analysis::run("void f() {").unwrap();
        assert!(!analysis.is_clean());
        let problem = analysis.first_problem().unwrap();
        assert_eq!(problem.kind, DiagnosticKind::UnterminatedScope);
        assert_eq!(problem.token_index, 4);
    }

    #[test]
    fn test_token_neighbours() {
        let analysis = Analysis::run("a b c").unwrap();
        assert_eq!(analysis.next_token(0).unwrap().text, "b");
        assert_eq!(analysis.prev_token(2).unwrap().text, "b");
        assert!(analysis.prev_token(0).is_none());
        assert!(analysis.next_token(2).is_none());
    }

    #[test]
    fn test_line_lookup_for_tokens() {
        let analysis = Analysis::run("// comment\nint x;").unwrap();
        let x = analysis.tokens().iter().position(|t| t.text == "x").unwrap();
        let line = analysis.line_of_token(x).unwrap();
        assert_eq!(line, 1);
        assert_eq!(analysis.line_text(line), Some("int x;"));
    }

    #[test]
    fn test_runs_are_repeatable() {
        let source = "class A { int f() { return 0x1F; } /* x */ }\n{";
        let first = Analysis::run(source).unwrap();
        let second = Analysis::run(source).unwrap();
        assert_eq!(first, second);
    }
}
