//! Source code pane rendering with token-driven highlighting
//!
//! Colours come from the analysis itself rather than a separate highlighter:
//! every token is styled by its [`TokenKind`] and comment trivia is greyed
//! out. Multi-line tokens and block comments are clipped per line.

use super::{clamp_scroll, keep_visible, pane_block};
use crate::analyzer::lexer::TriviaKind;
use crate::analyzer::token::{Token, TokenKind};
use crate::analyzer::Analysis;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use std::ops::Range;

/// A styled byte range of the source.
struct Segment {
    span: Range<usize>,
    style: Style,
}

fn token_style(tokens: &[Token], token: &Token) -> Style {
    match token.kind {
        TokenKind::Keyword => Style::default()
            .fg(DEFAULT_THEME.keyword)
            .add_modifier(Modifier::BOLD),
        TokenKind::Modifier => Style::default().fg(DEFAULT_THEME.modifier),
        TokenKind::Type => Style::default().fg(DEFAULT_THEME.type_name),
        TokenKind::String | TokenKind::Char => Style::default().fg(DEFAULT_THEME.string),
        kind if kind.is_number() => Style::default().fg(DEFAULT_THEME.number),
        TokenKind::Symbol => match token.text.as_str() {
            "{" | "}" | "(" | ")" | "[" | "]" => Style::default().fg(DEFAULT_THEME.primary), // Brackets
            _ => Style::default().fg(DEFAULT_THEME.fg),
        },
        _ => {
            let is_call = tokens.get(token.index + 1).is_some_and(|next| next.text == "(");
            if is_call {
                Style::default().fg(DEFAULT_THEME.function)
            } else {
                Style::default().fg(DEFAULT_THEME.fg) // Variables/Identifiers
            }
        }
    }
}

/// Styled tokens and comments in source order.
fn build_segments(analysis: &Analysis, selected: Option<usize>) -> Vec<Segment> {
    let tokens = analysis.tokens();
    let mut segments: Vec<Segment> = tokens
        .iter()
        .map(|token| {
            let mut style = token_style(tokens, token);
            if Some(token.index) == selected {
                style = style
                    .bg(DEFAULT_THEME.selection_bg)
                    .add_modifier(Modifier::BOLD);
            }
            Segment {
                span: token.span(),
                style,
            }
        })
        .collect();

    segments.extend(
        analysis
            .trivia()
            .iter()
            .filter(|t| t.kind == TriviaKind::Comment)
            .map(|t| Segment {
                span: t.span.clone(),
                style: Style::default().fg(DEFAULT_THEME.comment),
            }),
    );
    segments.sort_by_key(|s| s.span.start);
    segments
}

fn expand_tabs(text: &str) -> String {
    text.replace('\t', "    ")
}

/// Spans for the byte range `line`, filling gaps between segments raw.
fn highlight_line(source: &str, line: Range<usize>, segments: &[Segment]) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    let mut cursor = line.start;
    let first = segments.partition_point(|s| s.span.end <= line.start);

    for segment in &segments[first..] {
        if segment.span.start >= line.end {
            break;
        }
        let start = segment.span.start.max(line.start);
        let end = segment.span.end.min(line.end);
        if start > cursor {
            spans.push(Span::raw(expand_tabs(&source[cursor..start])));
        }
        spans.push(Span::styled(expand_tabs(&source[start..end]), segment.style));
        cursor = end;
    }

    if cursor < line.end {
        spans.push(Span::raw(expand_tabs(&source[cursor..line.end])));
    }
    spans
}

/// Render the source code pane
///
/// When `follow` is set the scroll offset is moved so the selected token's
/// line is visible; otherwise the offset is only clamped.
pub fn render_source_pane(
    frame: &mut Frame,
    area: Rect,
    analysis: &Analysis,
    selected: Option<usize>,
    is_focused: bool,
    follow: bool,
    scroll: &mut usize,
) {
    let block = pane_block(" Source ", is_focused);
    let lines = analysis.lines();
    let source = analysis.source();
    let total_lines = lines.line_count();
    let visible_height = area.height.saturating_sub(2).max(1) as usize; // Account for borders (2), min 1

    let current_line = selected.and_then(|index| analysis.line_of_token(index));
    match current_line {
        Some(line) if follow => keep_visible(scroll, line, visible_height, total_lines),
        _ => clamp_scroll(scroll, visible_height, total_lines),
    }

    let segments = build_segments(analysis, selected);

    let visible_lines: Vec<Line> = (*scroll..total_lines)
        .take(visible_height)
        .filter_map(|line| {
            let span = lines.line_span(line)?;
            let text_len = lines.line_text(source, line).map_or(0, str::len);
            let span = span.start..span.start + text_len;

            let is_current = Some(line) == current_line;
            let num_style = if is_current {
                Style::default()
                    .fg(DEFAULT_THEME.secondary)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(DEFAULT_THEME.comment) // Line numbers
            };

            let mut content = highlight_line(source, span, &segments);
            if is_current {
                let line_bg = Style::default().bg(DEFAULT_THEME.current_line_bg);
                for span in &mut content {
                    span.style = line_bg.patch(span.style);
                }
            }

            let mut spans = vec![Span::styled(format!("{:4} ", line + 1), num_style)];
            spans.extend(content);
            let mut rendered = Line::from(spans);
            if is_current {
                rendered = rendered.style(Style::default().bg(DEFAULT_THEME.current_line_bg));
            }
            Some(rendered)
        })
        .collect();

    let paragraph = Paragraph::new(visible_lines).block(block);
    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line_texts(source: &str, line: usize) -> Vec<String> {
        let analysis = Analysis::run(source).unwrap();
        let segments = build_segments(&analysis, None);
        let span = analysis.lines().line_span(line).unwrap();
        highlight_line(source, span, &segments)
            .into_iter()
            .map(|s| s.content.into_owned())
            .collect()
    }

    #[test]
    fn test_highlight_splits_on_tokens() {
        assert_eq!(
            line_texts("int x = 5; // five", 0),
            vec!["int", " ", "x", " ", "=", " ", "5", ";", " ", "// five"]
        );
    }

    #[test]
    fn test_block_comment_is_clipped_per_line() {
        let source = "a /* one\ntwo */ b";
        assert_eq!(line_texts(source, 0), vec!["a", " ", "/* one"]);
        assert_eq!(line_texts(source, 1), vec!["two */", " ", "b"]);
    }

    #[test]
    fn test_call_identifiers_use_function_colour() {
        let analysis = Analysis::run("f(x)").unwrap();
        let tokens = analysis.tokens();
        assert_eq!(
            token_style(tokens, &tokens[0]).fg,
            Some(DEFAULT_THEME.function)
        );
        assert_eq!(token_style(tokens, &tokens[2]).fg, Some(DEFAULT_THEME.fg));
    }
}
