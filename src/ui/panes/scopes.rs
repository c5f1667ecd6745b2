//! Scope tree pane

use super::{keep_visible, pane_block};
use crate::analyzer::scope::{ScopeEnd, ScopeId};
use crate::analyzer::Analysis;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem},
    Frame,
};

/// "L3-L9" style line range of a scope, 1-based.
fn line_range(analysis: &Analysis, id: ScopeId) -> String {
    let scope = analysis.scopes().scope(id);
    let line_of = |index: usize| analysis.line_of_token(index).map(|line| line + 1);

    let begin = scope.begin.and_then(line_of);
    let end = match scope.end {
        Some(ScopeEnd::Brace(end)) => line_of(end),
        Some(ScopeEnd::Unterminated) => None,
        None => Some(analysis.lines().line_count()),
    };

    match (begin, end) {
        (Some(b), Some(e)) => format!("L{}-L{}", b, e),
        (Some(b), None) => format!("L{}-?", b),
        _ => String::from("empty"),
    }
}

/// Render the scope pane. Scope ids are in pre-order, so row == id.
pub fn render_scope_pane(
    frame: &mut Frame,
    area: Rect,
    analysis: &Analysis,
    selected: ScopeId,
    is_focused: bool,
    scroll: &mut usize,
) {
    let tree = analysis.scopes();
    let title = format!(" Scopes ({}) ", tree.len());
    let block = pane_block(&title, is_focused);

    let visible_height = area.height.saturating_sub(2).max(1) as usize; // Account for borders, min 1
    keep_visible(scroll, selected, visible_height, tree.len());

    let items: Vec<ListItem> = tree
        .walk()
        .skip(*scroll)
        .take(visible_height)
        .map(|scope| {
            let mut spans = vec![
                Span::raw(format!("{}╚═", "  ".repeat(scope.depth))),
                Span::styled(
                    tree.label(scope.id, analysis.tokens()).to_string(),
                    Style::default().fg(DEFAULT_THEME.function),
                ),
                Span::styled(
                    format!("  {}", line_range(analysis, scope.id)),
                    Style::default().fg(DEFAULT_THEME.comment),
                ),
            ];
            if scope.is_unterminated() {
                spans.push(Span::styled(
                    " unterminated",
                    Style::default()
                        .fg(DEFAULT_THEME.error)
                        .add_modifier(Modifier::BOLD),
                ));
            }

            let item = ListItem::new(Line::from(spans));
            if scope.id == selected {
                item.style(Style::default().bg(DEFAULT_THEME.selection_bg))
            } else {
                item
            }
        })
        .collect();

    let list = List::new(items).block(block);
    frame.render_widget(list, area);
}
