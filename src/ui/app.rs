//! Main TUI application state and logic

use crate::analyzer::scope::ScopeId;
use crate::analyzer::Analysis;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    Frame, Terminal,
};
use std::io;
use std::time::Duration;

const PAGE: usize = 10;

/// Which pane is currently focused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusedPane {
    Source,
    Tokens,
    Scopes,
}

impl FocusedPane {
    /// Move focus to the next pane (source -> tokens -> scopes)
    pub fn next(self) -> Self {
        match self {
            FocusedPane::Source => FocusedPane::Tokens,
            FocusedPane::Tokens => FocusedPane::Scopes,
            FocusedPane::Scopes => FocusedPane::Source,
        }
    }

    /// Move focus to the previous pane
    pub fn prev(self) -> Self {
        match self {
            FocusedPane::Source => FocusedPane::Scopes,
            FocusedPane::Tokens => FocusedPane::Source,
            FocusedPane::Scopes => FocusedPane::Tokens,
        }
    }
}

/// The main application state
pub struct App {
    pub analysis: Analysis,

    /// Currently focused pane
    pub focused_pane: FocusedPane,

    /// Selected token index; `None` only when there are no tokens
    pub selected_token: Option<usize>,

    /// Scope enclosing the selection (or picked in the scope pane)
    pub selected_scope: ScopeId,

    /// Per-pane scroll offsets
    pub source_scroll: usize,
    pub token_scroll: usize,
    pub scope_scroll: usize,

    /// Whether the source pane scrolls to keep the selection visible.
    /// Cleared when the source pane is scrolled by hand.
    pub follow_selection: bool,

    /// Whether the app should quit
    pub should_quit: bool,

    /// Status message to display
    pub status_message: String,
}

impl App {
    pub fn new(analysis: Analysis) -> Self {
        let selected_token = (!analysis.tokens().is_empty()).then_some(0);
        let status_message = match analysis.first_problem() {
            Some(problem) => problem.to_string(),
            None => String::from("Ready!"),
        };
        let selected_scope = analysis.scopes().root;

        App {
            analysis,
            focused_pane: FocusedPane::Tokens,
            selected_token,
            selected_scope,
            source_scroll: 0,
            token_scroll: 0,
            scope_scroll: 0,
            follow_selection: true,
            should_quit: false,
            status_message,
        }
    }

    /// Run the TUI application
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.should_quit {
                break;
            }

            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key_event(key);
                    }
                }
            }
        }

        Ok(())
    }

    /// Render the UI
    fn render(&mut self, frame: &mut Frame) {
        let size = frame.area();

        // Panes on top, status bar at bottom
        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(size);

        let pane_area = main_chunks[0];
        let status_area = main_chunks[1];

        // Source on the left, tokens and scopes stacked on the right
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(pane_area);

        let right_rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(columns[1]);

        super::panes::render_source_pane(
            frame,
            columns[0],
            &self.analysis,
            self.selected_token,
            self.focused_pane == FocusedPane::Source,
            self.follow_selection,
            &mut self.source_scroll,
        );

        super::panes::render_token_pane(
            frame,
            right_rows[0],
            &self.analysis,
            self.selected_token,
            self.focused_pane == FocusedPane::Tokens,
            &mut self.token_scroll,
        );

        super::panes::render_scope_pane(
            frame,
            right_rows[1],
            &self.analysis,
            self.selected_scope,
            self.focused_pane == FocusedPane::Scopes,
            &mut self.scope_scroll,
        );

        let line = self
            .selected_token
            .and_then(|index| self.analysis.line_of_token(index));
        super::panes::render_status_bar(
            frame,
            status_area,
            &self.status_message,
            self.selected_token,
            self.analysis.tokens().len(),
            line,
            self.analysis.diagnostics().len(),
        );
    }

    /// Handle keyboard events
    pub fn handle_key_event(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.should_quit = true;
            }
            KeyCode::Tab => {
                self.focused_pane = self.focused_pane.next();
            }
            KeyCode::BackTab => {
                self.focused_pane = self.focused_pane.prev();
            }
            KeyCode::Up => self.move_by(-1),
            KeyCode::Down => self.move_by(1),
            KeyCode::PageUp => self.move_by(-(PAGE as isize)),
            KeyCode::PageDown => self.move_by(PAGE as isize),
            KeyCode::Home => self.select_token(0),
            KeyCode::End => {
                let last = self.analysis.tokens().len().saturating_sub(1);
                self.select_token(last);
            }
            KeyCode::Char('n') => self.jump_to_problem(true),
            KeyCode::Char('p') => self.jump_to_problem(false),
            _ => {}
        }
    }

    /// Move within the focused pane by `delta` rows.
    fn move_by(&mut self, delta: isize) {
        match self.focused_pane {
            FocusedPane::Source => {
                self.follow_selection = false;
                self.source_scroll = self.source_scroll.saturating_add_signed(delta);
            }
            FocusedPane::Tokens => {
                if let Some(current) = self.selected_token {
                    self.select_token(current.saturating_add_signed(delta));
                }
            }
            FocusedPane::Scopes => {
                let last = self.analysis.scopes().len().saturating_sub(1);
                let target = self.selected_scope.saturating_add_signed(delta).min(last);
                self.select_scope(target);
            }
        }
    }

    /// Select a token (clamped to the stream) and the scope around it.
    pub fn select_token(&mut self, index: usize) {
        let count = self.analysis.tokens().len();
        if count == 0 {
            return;
        }
        let index = index.min(count - 1);
        self.selected_token = Some(index);
        self.selected_scope = self.analysis.innermost_scope_at(index);
        self.follow_selection = true;

        if let Some(token) = self.analysis.token(index) {
            self.status_message = format!("{} {}", token.kind, token.text.escape_debug());
        }
    }

    /// Select a scope and move the token selection to its opener.
    fn select_scope(&mut self, id: ScopeId) {
        self.selected_scope = id;
        if let Some(begin) = self.analysis.scopes().scope(id).begin {
            self.selected_token = Some(begin);
            self.follow_selection = true;
            let label = self.analysis.scopes().label(id, self.analysis.tokens());
            self.status_message = format!("Scope after '{}'", label);
        }
    }

    /// Cycle through diagnostic positions relative to the selection.
    fn jump_to_problem(&mut self, forward: bool) {
        let positions: Vec<usize> = self
            .analysis
            .diagnostics()
            .iter()
            .map(|d| d.token_index)
            .collect();
        if positions.is_empty() {
            self.status_message = String::from("No problems found");
            return;
        }

        let current = self.selected_token.unwrap_or(0);
        let target = if forward {
            positions
                .iter()
                .copied()
                .find(|&p| p > current)
                .unwrap_or(positions[0])
        } else {
            positions
                .iter()
                .rev()
                .copied()
                .find(|&p| p < current)
                .unwrap_or(positions[positions.len() - 1])
        };

        self.select_token(target);
        if let Some(problem) = self
            .analysis
            .diagnostics()
            .iter()
            .find(|d| d.token_index == target)
        {
            self.status_message = problem.to_string();
        }
    }
}
