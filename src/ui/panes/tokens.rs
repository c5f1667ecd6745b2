//! Token table pane

use super::{keep_visible, pane_block};
use crate::analyzer::Analysis;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, Paragraph},
    Frame,
};

/// Render the token pane, one row per token.
pub fn render_token_pane(
    frame: &mut Frame,
    area: Rect,
    analysis: &Analysis,
    selected: Option<usize>,
    is_focused: bool,
    scroll: &mut usize,
) {
    let tokens = analysis.tokens();
    let title = format!(" Tokens ({}) ", tokens.len());
    let block = pane_block(&title, is_focused);

    if tokens.is_empty() {
        let paragraph = Paragraph::new("(no tokens)")
            .block(block)
            .style(Style::default().fg(DEFAULT_THEME.comment));
        frame.render_widget(paragraph, area);
        return;
    }

    let visible_height = area.height.saturating_sub(2).max(1) as usize; // Account for borders, min 1
    let focus_row = selected.unwrap_or(*scroll);
    keep_visible(scroll, focus_row, visible_height, tokens.len());

    let lines = analysis.lines();
    let items: Vec<ListItem> = tokens
        .iter()
        .skip(*scroll)
        .take(visible_height)
        .map(|token| {
            let line = lines.line_of(token.start);
            let column = lines.column_of(token.start);
            let row = Line::from(vec![
                Span::styled(
                    format!("{:>5} ", token.index),
                    Style::default().fg(DEFAULT_THEME.comment),
                ),
                Span::styled(
                    format!("{:<12}", token.kind.name()),
                    Style::default().fg(DEFAULT_THEME.type_name),
                ),
                Span::styled(
                    format!("{:>4}:{:<4}", line + 1, column + 1),
                    Style::default().fg(DEFAULT_THEME.comment),
                ),
                Span::styled(
                    token.text.escape_debug().to_string(),
                    Style::default().fg(DEFAULT_THEME.fg),
                ),
            ]);

            let item = ListItem::new(row);
            if Some(token.index) == selected {
                item.style(
                    Style::default()
                        .bg(DEFAULT_THEME.selection_bg)
                        .add_modifier(Modifier::BOLD),
                )
            } else {
                item
            }
        })
        .collect();

    let list = List::new(items).block(block);
    frame.render_widget(list, area);
}
