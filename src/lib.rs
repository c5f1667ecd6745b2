//! # Introduction
//!
//! metalex turns the text of a C-family source file into a typed token
//! stream, an offset → line index and a tree of brace-delimited scopes. The
//! result can be dumped as text or browsed in a terminal UI built with
//! [ratatui](https://docs.rs/ratatui).
//!
//! ## Analysis pipeline
//!
//! ```text
//! Source ─┬─→ LineIndex
//!         └─→ Lexer → Tokens → ScopeTree (+ Diagnostics)
//! ```
//!
//! 1. [`analyzer::lines`] — byte offset of every newline; line lookups.
//! 2. [`analyzer::lexer`] — ordered-rule tokenizer; comments and whitespace
//!    are kept only as trivia spans.
//! 3. [`analyzer::scope`] — groups tokens into nested `{ ... }` scopes and
//!    reports unbalanced braces as [`analyzer::diagnostics::Diagnostic`]s.
//! 4. [`analyzer::Analysis`] — runs the above once per source text and owns
//!    the results.
//! 5. [`ui`] — ratatui-based browser; not part of the stable library API.
//!
//! ## Example
//!
//! ```
//! use metalex::analyzer::Analysis;
//!
//! let analysis = Analysis::run("class A { void f() { return; } }").unwrap();
//! assert_eq!(analysis.tokens().len(), 12);
//! assert_eq!(analysis.scopes().len(), 3);
//! assert!(analysis.is_clean());
//! ```

pub mod analyzer;
pub mod ui;
