//! Brace scope tree
//!
//! Groups a token sequence into nested `{ ... }` scopes. Scopes live in an
//! arena ([`ScopeTree::scopes`]) and refer to each other by [`ScopeId`], so a
//! child's link to its parent is a plain index rather than a reference.
//!
//! Matching is done with an explicit stack of open scopes instead of
//! recursion, which keeps deeply nested input from exhausting the call
//! stack. Skipping past a nested scope and resuming after its `}` falls out
//! of popping the stack.

use super::diagnostics::Diagnostic;
use super::token::Token;
use std::ops::RangeInclusive;

/// Opaque identifier for a [`Scope`] in the [`ScopeTree`].
pub type ScopeId = usize;

/// How a scope ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeEnd {
    /// Closed by the `}` at this token index.
    Brace(usize),
    /// The token stream ran out before a matching `}`.
    Unterminated,
}

/// A single scope node in the [`ScopeTree`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scope {
    pub id: ScopeId,
    /// The enclosing scope, or `None` for the root.
    pub parent: Option<ScopeId>,
    /// Directly nested scopes in source order.
    pub children: Vec<ScopeId>,
    /// Index of the opening token. For the global root this is the first
    /// token of the program; `None` only when there are no tokens at all.
    pub begin: Option<usize>,
    /// `None` for the global root, which is not delimited by braces.
    pub end: Option<ScopeEnd>,
    pub depth: usize,
}

impl Scope {
    fn new(id: ScopeId, parent: Option<ScopeId>, begin: Option<usize>, depth: usize) -> Self {
        Self {
            id,
            parent,
            children: Vec::new(),
            begin,
            end: None,
            depth,
        }
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    pub fn is_unterminated(&self) -> bool {
        self.end == Some(ScopeEnd::Unterminated)
    }

    /// Token indices covered by this scope, braces included.
    ///
    /// Unterminated and undelimited scopes extend to the end of the stream.
    pub fn token_range(&self) -> Option<RangeInclusive<usize>> {
        let begin = self.begin?;
        let end = match self.end {
            Some(ScopeEnd::Brace(end)) => end,
            Some(ScopeEnd::Unterminated) | None => usize::MAX,
        };
        Some(begin..=end)
    }

    pub fn contains_token(&self, index: usize) -> bool {
        self.token_range().is_some_and(|range| range.contains(&index))
    }
}

/// The result of grouping a token sequence into scopes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeTree {
    /// All scopes, indexed by [`ScopeId`], in pre-order.
    pub scopes: Vec<Scope>,
    pub root: ScopeId,
}

impl ScopeTree {
    /// Build the whole-program tree.
    ///
    /// The root stands for the implicit global scope: it begins at the first
    /// token and is never closed. A `}` at global level has nothing to close;
    /// it is reported and skipped.
    pub fn build(tokens: &[Token], diagnostics: &mut Vec<Diagnostic>) -> Self {
        let mut builder = Builder::new(tokens.first().map(|t| t.index));
        builder.scan(tokens, 0, false, diagnostics);
        builder.finish()
    }

    /// Build the tree for the scope opened at `open_token_index`.
    ///
    /// The token at that index is treated as the opener whatever its text;
    /// scanning stops at its matching `}`. Returns `None` when the index is
    /// out of range.
    pub fn build_at(
        tokens: &[Token],
        open_token_index: usize,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Option<Self> {
        let open = tokens.get(open_token_index)?;
        let mut builder = Builder::new(Some(open.index));
        builder.scan(tokens, open_token_index + 1, true, diagnostics);
        Some(builder.finish())
    }

    pub fn scope(&self, id: ScopeId) -> &Scope {
        &self.scopes[id]
    }

    pub fn root_scope(&self) -> &Scope {
        self.scope(self.root)
    }

    /// Number of scopes including the root.
    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    /// Number of scopes nested anywhere below `id`.
    pub fn descendant_count(&self, id: ScopeId) -> usize {
        self.walk_from(id).count() - 1
    }

    /// Pre-order traversal starting at the root.
    pub fn walk(&self) -> Walk<'_> {
        self.walk_from(self.root)
    }

    pub fn walk_from(&self, id: ScopeId) -> Walk<'_> {
        Walk {
            tree: self,
            pending: vec![id],
        }
    }

    /// The deepest scope whose token range contains `token_index`.
    pub fn innermost_at(&self, token_index: usize) -> ScopeId {
        let mut current = self.root;
        while let Some(&child) = self.scopes[current]
            .children
            .iter()
            .find(|&&child| self.scopes[child].contains_token(token_index))
        {
            current = child;
        }
        current
    }

    /// Text of the token just before the scope's opener, or `global` when the
    /// scope starts the program.
    pub fn label<'t>(&self, id: ScopeId, tokens: &'t [Token]) -> &'t str {
        match self.scopes[id].begin {
            Some(begin) if begin > 0 => tokens
                .get(begin - 1)
                .map_or("global", |token| token.text.as_str()),
            _ => "global",
        }
    }

    /// Indented one-line-per-scope dump of the tree.
    pub fn render(&self, tokens: &[Token]) -> String {
        let mut out = String::new();
        for scope in self.walk() {
            out.push_str(&"  ".repeat(scope.depth));
            out.push_str("╚═");
            out.push_str(self.label(scope.id, tokens));
            out.push('\n');
        }
        out
    }
}

/// Pre-order iterator over a [`ScopeTree`].
pub struct Walk<'a> {
    tree: &'a ScopeTree,
    pending: Vec<ScopeId>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = &'a Scope;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.pending.pop()?;
        let scope = &self.tree.scopes[id];
        self.pending.extend(scope.children.iter().rev());
        Some(scope)
    }
}

struct Builder {
    scopes: Vec<Scope>,
    /// Open scopes, innermost last. Index 0 is always the root.
    open: Vec<ScopeId>,
}

impl Builder {
    fn new(root_begin: Option<usize>) -> Self {
        Self {
            scopes: vec![Scope::new(0, None, root_begin, 0)],
            open: vec![0],
        }
    }

    /// Scan `tokens[from..]`. When `root_is_brace` the root is an ordinary
    /// brace scope and the walk ends at its closing `}`.
    fn scan(
        &mut self,
        tokens: &[Token],
        from: usize,
        root_is_brace: bool,
        diagnostics: &mut Vec<Diagnostic>,
    ) {
        for token in tokens.iter().skip(from) {
            if token.is_open_brace() {
                self.open_scope(token.index);
            } else if token.is_close_brace() {
                if self.open.len() > 1 || root_is_brace {
                    if let Some(id) = self.open.pop() {
                        self.scopes[id].end = Some(ScopeEnd::Brace(token.index));
                    }
                    if self.open.is_empty() {
                        return;
                    }
                } else {
                    diagnostics.push(Diagnostic::unmatched_close(token.index));
                }
            }
        }

        let first_unclosed = usize::from(!root_is_brace);
        for &id in self.open.iter().skip(first_unclosed) {
            let scope = &mut self.scopes[id];
            scope.end = Some(ScopeEnd::Unterminated);
            if let Some(begin) = scope.begin {
                diagnostics.push(Diagnostic::unterminated_scope(begin));
            }
        }
    }

    fn open_scope(&mut self, begin: usize) {
        let parent = self.open[self.open.len() - 1];
        let id = self.scopes.len();
        let depth = self.scopes[parent].depth + 1;
        self.scopes.push(Scope::new(id, Some(parent), Some(begin), depth));
        self.scopes[parent].children.push(id);
        self.open.push(id);
    }

    fn finish(self) -> ScopeTree {
        ScopeTree {
            scopes: self.scopes,
            root: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::diagnostics::DiagnosticKind;
    use crate::analyzer::lexer::Lexer;

    fn tree_of(source: &str) -> (Vec<Token>, ScopeTree, Vec<Diagnostic>) {
        let tokens = Lexer::new(source).tokenize().unwrap();
        let mut diagnostics = Vec::new();
        let tree = ScopeTree::build(&tokens, &mut diagnostics);
        (tokens, tree, diagnostics)
    }

    #[test]
    fn test_no_braces() {
        let (_, tree, diagnostics) = tree_of("int x = 5;");
        assert_eq!(tree.len(), 1);
        assert!(tree.root_scope().children.is_empty());
        assert_eq!(tree.root_scope().begin, Some(0));
        assert_eq!(tree.root_scope().end, None);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_empty_stream() {
        let (_, tree, diagnostics) = tree_of("");
        let root = tree.root_scope();
        assert!(root.children.is_empty());
        assert_eq!(root.begin, None);
        assert_eq!(root.end, None);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_class_with_method() {
        let (tokens, tree, diagnostics) = tree_of("class A { void f() { return; } }");
        assert!(diagnostics.is_empty());

        let root = tree.root_scope();
        assert_eq!(root.children.len(), 1);

        let class_body = tree.scope(root.children[0]);
        assert_eq!(class_body.begin, Some(2));
        assert_eq!(class_body.end, Some(ScopeEnd::Brace(11)));
        assert_eq!(class_body.parent, Some(tree.root));
        assert_eq!(class_body.children.len(), 1);

        let method_body = tree.scope(class_body.children[0]);
        assert_eq!(method_body.parent, Some(class_body.id));
        assert_eq!(method_body.depth, 2);
        let (begin, end) = match (method_body.begin, method_body.end) {
            (Some(b), Some(ScopeEnd::Brace(e))) => (b, e),
            other => panic!("unexpected bounds {:?}", other),
        };
        let inner: Vec<&str> = tokens[begin + 1..end].iter().map(|t| t.text.as_str()).collect();
        assert_eq!(inner, vec!["return", ";"]);
    }

    #[test]
    fn test_leading_brace_opens_child_of_global() {
        let (_, tree, diagnostics) = tree_of("{ }");
        assert!(diagnostics.is_empty());
        assert_eq!(tree.descendant_count(tree.root), 1);
        let block = tree.scope(tree.root_scope().children[0]);
        assert_eq!(block.begin, Some(0));
        assert_eq!(block.end, Some(ScopeEnd::Brace(1)));
    }

    #[test]
    fn test_siblings_and_descendants() {
        let source = "void a() { if (x) { y; } } void b() { { } { { } } }";
        let (tokens, tree, diagnostics) = tree_of(source);
        assert!(diagnostics.is_empty());

        let opens = tokens.iter().filter(|t| t.text == "{").count();
        assert_eq!(tree.descendant_count(tree.root), opens);
        assert_eq!(tree.root_scope().children.len(), 2);

        for scope in tree.walk().filter(|s| !s.is_root()) {
            let begin = scope.begin.unwrap();
            assert_eq!(tokens[begin].text, "{");
            match scope.end {
                Some(ScopeEnd::Brace(end)) => assert_eq!(tokens[end].text, "}"),
                other => panic!("scope {} ended with {:?}", scope.id, other),
            }
        }
    }

    #[test]
    fn test_unterminated_scope_is_recorded() {
        let (_, tree, diagnostics) = tree_of("void f() {");
        let body = tree.scope(tree.root_scope().children[0]);
        assert!(body.is_unterminated());
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].kind, DiagnosticKind::UnterminatedScope);
        assert_eq!(diagnostics[0].token_index, 4);
    }

    #[test]
    fn test_nested_unterminated_scopes_all_report() {
        let (_, tree, diagnostics) = tree_of("a { b { c");
        assert_eq!(tree.len(), 3);
        assert!(tree.walk().skip(1).all(Scope::is_unterminated));
        let at: Vec<usize> = diagnostics.iter().map(|d| d.token_index).collect();
        assert_eq!(at, vec![1, 3]);
    }

    #[test]
    fn test_stray_close_is_skipped() {
        let (_, tree, diagnostics) = tree_of("} x { }");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].kind, DiagnosticKind::UnmatchedClose);
        assert_eq!(diagnostics[0].token_index, 0);
        assert_eq!(tree.root_scope().children.len(), 1);
    }

    #[test]
    fn test_build_at_stops_at_matching_brace() {
        let tokens = Lexer::new("x { a { } b } { c }").tokenize().unwrap();
        let mut diagnostics = Vec::new();
        let tree = ScopeTree::build_at(&tokens, 1, &mut diagnostics).unwrap();
        assert!(diagnostics.is_empty());
        assert_eq!(tree.len(), 2);
        assert_eq!(tree.root_scope().end, Some(ScopeEnd::Brace(6)));
        assert_eq!(tree.scope(1).begin, Some(3));

        assert!(ScopeTree::build_at(&tokens, 99, &mut diagnostics).is_none());
    }

    #[test]
    fn test_build_at_unterminated() {
        let tokens = Lexer::new("{ a").tokenize().unwrap();
        let mut diagnostics = Vec::new();
        let tree = ScopeTree::build_at(&tokens, 0, &mut diagnostics).unwrap();
        assert!(tree.root_scope().is_unterminated());
        assert_eq!(diagnostics, vec![Diagnostic::unterminated_scope(0)]);
    }

    #[test]
    fn test_innermost_at() {
        let (_, tree, _) = tree_of("class A { void f() { return; } int g; }");
        let class_body = tree.root_scope().children[0];
        let method_body = tree.scope(class_body).children[0];
        assert_eq!(tree.innermost_at(0), tree.root);
        assert_eq!(tree.innermost_at(2), class_body);
        assert_eq!(tree.innermost_at(8), method_body);
        assert_eq!(tree.innermost_at(11), class_body);
    }

    #[test]
    fn test_render() {
        let (tokens, tree, _) = tree_of("class A { void f() { return; } }");
        assert_eq!(tree.render(&tokens), "╚═global\n  ╚═A\n    ╚═)\n");
    }

    #[test]
    fn test_deep_nesting() {
        let source = format!("{}{}", "{".repeat(5000), "}".repeat(5000));
        let (_, tree, diagnostics) = tree_of(&source);
        assert!(diagnostics.is_empty());
        assert_eq!(tree.descendant_count(tree.root), 5000);
        assert_eq!(tree.walk().map(|s| s.depth).max(), Some(5000));
    }
}
