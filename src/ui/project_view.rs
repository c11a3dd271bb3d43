use anyhow::Result;
use crossterm::event::KeyCode;
use tui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::api::{ClientRecord, ProjectRecord};
use crate::ui::{read_key, render_confirmation, render_remote, Remote};

pub const NOT_FOUND: &str = "Project not found";

pub struct ProjectViewState {
    project: Remote<Option<ProjectRecord>>,
    show_delete_confirmation: bool,
}

impl ProjectViewState {
    pub fn new(project: Remote<Option<ProjectRecord>>) -> Self {
        Self {
            project,
            show_delete_confirmation: false,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.project, Remote::Loading)
    }

    pub fn project(&self) -> Option<&ProjectRecord> {
        self.project.ready().and_then(Option::as_ref)
    }

    pub fn toggle_delete_confirmation(&mut self) {
        self.show_delete_confirmation = !self.show_delete_confirmation;
    }
}

pub enum ProjectViewAction {
    Back,
    EditProject(ProjectRecord),
    DeleteProject(String), // Contains project_id
}

pub fn render_project_view<B: Backend>(frame: &mut Frame<B>, state: &ProjectViewState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints(
            [
                Constraint::Min(6),
                Constraint::Length(5),
                Constraint::Length(3),
            ]
            .as_ref(),
        )
        .split(frame.size());

    let Some(found) = render_remote(frame, &state.project, chunks[0]) else {
        return;
    };

    let help_text = match found {
        Some(project) => {
            render_details(frame, project, chunks[0]);
            render_client_info(frame, project.client.as_ref(), chunks[1]);
            "<E> Edit | <D> Delete | <Esc> Back"
        }
        None => {
            let message = Paragraph::new(NOT_FOUND)
                .block(Block::default().title("Project").borders(Borders::ALL));
            frame.render_widget(message, chunks[0]);
            "<Esc> Back"
        }
    };

    let help = Paragraph::new(help_text)
        .block(Block::default().borders(Borders::TOP))
        .style(Style::default().fg(Color::White));
    frame.render_widget(help, chunks[2]);

    if state.show_delete_confirmation {
        render_confirmation(frame, "Are you sure you want to delete this project?", "");
    }
}

fn render_details<B: Backend>(frame: &mut Frame<B>, project: &ProjectRecord, area: Rect) {
    let label = Style::default().fg(Color::Yellow);
    let details = Paragraph::new(vec![
        Spans::from(Span::styled(
            project.name.as_str(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Spans::from(""),
        Spans::from(project.description.as_str()),
        Spans::from(""),
        Spans::from(vec![
            Span::styled("Status: ", label),
            Span::raw(project.status.as_str()),
        ]),
    ])
    .wrap(Wrap { trim: true })
    .block(Block::default().title("Project").borders(Borders::ALL));

    frame.render_widget(details, area);
}

fn render_client_info<B: Backend>(frame: &mut Frame<B>, client: Option<&ClientRecord>, area: Rect) {
    let lines = match client {
        Some(client) => vec![
            Spans::from(format!("Name: {}", client.name)),
            Spans::from(format!("Email: {}", client.email)),
            Spans::from(format!("Phone: {}", client.phone)),
        ],
        None => vec![Spans::from("No client")],
    };

    let info = Paragraph::new(lines)
        .block(Block::default().title("Client Information").borders(Borders::ALL));
    frame.render_widget(info, area);
}

pub fn handle_input(state: &mut ProjectViewState) -> Result<Option<ProjectViewAction>> {
    Ok(read_key()?.and_then(|code| handle_key(state, code)))
}

pub fn handle_key(state: &mut ProjectViewState, code: KeyCode) -> Option<ProjectViewAction> {
    if state.show_delete_confirmation {
        match code {
            KeyCode::Char('y') => {
                state.toggle_delete_confirmation();
                return state
                    .project()
                    .map(|p| ProjectViewAction::DeleteProject(p.id.clone()));
            }
            KeyCode::Char('n') | KeyCode::Char('q') | KeyCode::Esc => {
                state.toggle_delete_confirmation();
            }
            _ => {}
        }
        return None;
    }

    match code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Backspace => Some(ProjectViewAction::Back),
        KeyCode::Char('e') => state.project().cloned().map(ProjectViewAction::EditProject),
        KeyCode::Char('d') => {
            if state.project().is_some() {
                state.toggle_delete_confirmation();
            }
            None
        }
        _ => None,
    }
}
