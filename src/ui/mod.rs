pub mod cache;
pub mod client_wizard;
pub mod clients;
pub mod project_view;
pub mod project_wizard;
pub mod projects;

use std::fmt::Display;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use tui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::Spans,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

pub const LOAD_FAILED: &str = "Something went wrong...";
pub const INCOMPLETE_FORM: &str = "Please fill all fields";

/// Data a screen is waiting on from the API
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Remote<T> {
    Loading,
    Failed(String),
    Ready(T),
}

impl<T> Remote<T> {
    pub fn from_result<E: Display>(result: std::result::Result<T, E>) -> Self {
        match result {
            Ok(value) => Remote::Ready(value),
            Err(err) => Remote::Failed(err.to_string()),
        }
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            Remote::Ready(value) => Some(value),
            _ => None,
        }
    }
}

/// Block until the next key press
pub fn read_key() -> Result<Option<KeyCode>> {
    if let Event::Key(key) = event::read()? {
        if key.kind != KeyEventKind::Release {
            return Ok(Some(key.code));
        }
    }
    Ok(None)
}

/// Render the loading/failure placeholder for `remote`.
///
/// Returns the value when it is ready so the caller can draw it.
pub fn render_remote<'a, B: Backend, T>(
    frame: &mut Frame<B>,
    remote: &'a Remote<T>,
    area: Rect,
) -> Option<&'a T> {
    match remote {
        Remote::Loading => None,
        Remote::Failed(_) => {
            let message = Paragraph::new(LOAD_FAILED)
                .style(Style::default().fg(Color::Red))
                .block(Block::default().borders(Borders::ALL));
            frame.render_widget(message, area);
            None
        }
        Remote::Ready(value) => Some(value),
    }
}

/// Modal message drawn over the current screen; any key dismisses it
pub fn render_alert<B: Backend>(frame: &mut Frame<B>, message: &str) {
    let area = centered_rect(50, 20, frame.size());

    let popup = Paragraph::new(vec![
        Spans::from(""),
        Spans::from(message),
        Spans::from(""),
        Spans::from("Press any key to continue"),
    ])
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true })
    .block(Block::default().title("Alert").borders(Borders::ALL))
    .style(Style::default().fg(Color::White).bg(Color::Black));

    frame.render_widget(Clear, area);
    frame.render_widget(popup, area);
}

pub fn render_confirmation<B: Backend>(frame: &mut Frame<B>, question: &str, detail: &str) {
    let area = centered_rect(50, 20, frame.size());

    let popup = Paragraph::new(vec![
        Spans::from(""),
        Spans::from(question),
        Spans::from(""),
        Spans::from(detail),
        Spans::from(""),
        Spans::from("<Y> Yes  <N> No"),
    ])
    .block(Block::default().title("Confirm Delete").borders(Borders::ALL))
    .style(Style::default().fg(Color::White).bg(Color::Black));

    frame.render_widget(Clear, area);
    frame.render_widget(popup, area);
}

// Helper function to create a centered rect
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

/// Move a list selection one step, wrapping at both ends
pub fn step_selection(selected: Option<usize>, len: usize, forward: bool) -> Option<usize> {
    if len == 0 {
        return None;
    }

    let i = match selected {
        Some(i) if forward => {
            if i >= len - 1 {
                0
            } else {
                i + 1
            }
        }
        Some(i) => {
            if i == 0 {
                len - 1
            } else {
                i - 1
            }
        }
        None => 0,
    };
    Some(i)
}
