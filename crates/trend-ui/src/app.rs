//! Full-screen terminal viewer for a single chart.
//!
//! [`App`] owns the theme and draws a [`ChartSpec`] until the user quits.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Layout},
    text::Line,
    Frame, Terminal,
};
use tracing::debug;

use trend_core::{Result, TrendError};

use crate::chart::{render_chart, ChartSpec, ChartSurface};
use crate::themes::Theme;

const HINT: &str = "Press 'q' or Esc to exit";

/// Root state of the chart viewer.
pub struct App {
    pub theme: Theme,
    /// Set to `true` to break out of the event loop on the next iteration.
    pub should_quit: bool,
}

impl App {
    pub fn new(theme_name: &str) -> Self {
        Self {
            theme: Theme::from_name(theme_name),
            should_quit: false,
        }
    }

    /// Draw `spec` on the alternate screen and block until `q`, `Esc` or
    /// `Ctrl+C`.
    pub fn run(&mut self, spec: &ChartSpec) -> io::Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let result = self.event_loop(&mut terminal, spec);

        // Restore terminal state unconditionally.
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    /// Update state for one key press.
    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
            }
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => self.should_quit = true,
            _ => {}
        }
    }

    /// Chart plus a one-line key hint.
    pub fn render(&self, frame: &mut Frame, spec: &ChartSpec) {
        let [chart_area, hint_area] =
            Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(frame.area());
        render_chart(frame, chart_area, spec, &self.theme);
        frame.render_widget(Line::styled(HINT, self.theme.dim).right_aligned(), hint_area);
    }

    // ── Private helpers ───────────────────────────────────────────────────────

    fn event_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
        spec: &ChartSpec,
    ) -> io::Result<()> {
        let tick_rate = Duration::from_millis(250);

        while !self.should_quit {
            terminal.draw(|frame| self.render(frame, spec))?;

            if event::poll(tick_rate)? {
                match event::read()? {
                    Event::Key(key) => self.handle_key(key),
                    Event::Resize(w, h) => debug!("Terminal resized to {}x{}", w, h),
                    _ => {}
                }
            }
        }
        Ok(())
    }
}

impl ChartSurface for App {
    fn show(&mut self, spec: &ChartSpec) -> Result<()> {
        self.should_quit = false;
        self.run(spec)
            .map_err(|e| TrendError::Terminal(e.to_string()))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
