//! TUI pane rendering modules
//!
//! - [`source`]: Source text coloured from the real token stream, with the
//!   selected token and its line highlighted
//! - [`tokens`]: Scrolling table of every emitted token
//! - [`scopes`]: Indented scope tree with the enclosing scope highlighted
//! - [`status`]: Status bar with keybindings and selection info
//!
//! Each pane exports one `render_*` function. Scroll offsets are owned by the
//! [`App`](crate::ui::App) and adjusted here so the selection stays visible.

pub mod scopes;
pub mod source;
pub mod status;
pub mod tokens;

pub use scopes::render_scope_pane;
pub use source::render_source_pane;
pub use status::render_status_bar;
pub use tokens::render_token_pane;

use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    style::{Modifier, Style},
    widgets::{Block, Borders},
};

/// Bordered block with the focus-dependent border colour.
fn pane_block(title: &str, is_focused: bool) -> Block<'_> {
    let border_style = if is_focused {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    };

    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style)
}

/// Adjust `offset` so that row `selected` is inside a window of `height`
/// rows, then clamp it to the scrollable range.
pub fn keep_visible(offset: &mut usize, selected: usize, height: usize, total: usize) {
    let height = height.max(1);
    if selected < *offset {
        *offset = selected;
    } else if selected >= *offset + height {
        *offset = selected + 1 - height;
    }
    clamp_scroll(offset, height, total);
}

/// Clamp `offset` so the last page is never scrolled past.
pub fn clamp_scroll(offset: &mut usize, height: usize, total: usize) {
    *offset = (*offset).min(total.saturating_sub(height.max(1)));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keep_visible_scrolls_both_ways() {
        let mut offset = 0;
        keep_visible(&mut offset, 12, 5, 100);
        assert_eq!(offset, 8);
        keep_visible(&mut offset, 3, 5, 100);
        assert_eq!(offset, 3);
        keep_visible(&mut offset, 5, 5, 100);
        assert_eq!(offset, 3);
    }

    #[test]
    fn test_clamp_scroll_short_content() {
        let mut offset = 40;
        clamp_scroll(&mut offset, 10, 4);
        assert_eq!(offset, 0);

        let mut offset = 95;
        clamp_scroll(&mut offset, 10, 100);
        assert_eq!(offset, 90);
    }
}
