use anyhow::Result;
use crossterm::event::KeyCode;
use tui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::api::ProjectRecord;
use crate::ui::{read_key, render_remote, step_selection, Remote};

// Represents the state of the project list screen
pub struct ProjectsState {
    projects: Remote<Vec<ProjectRecord>>,
    list_state: ListState,
}

impl ProjectsState {
    pub fn new(projects: Remote<Vec<ProjectRecord>>) -> Self {
        let mut list_state = ListState::default();
        if projects.ready().is_some_and(|p| !p.is_empty()) {
            list_state.select(Some(0));
        }

        Self {
            projects,
            list_state,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.projects, Remote::Loading)
    }

    fn items(&self) -> &[ProjectRecord] {
        self.projects.ready().map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn next(&mut self) {
        let i = step_selection(self.list_state.selected(), self.items().len(), true);
        self.list_state.select(i);
    }

    pub fn previous(&mut self) {
        let i = step_selection(self.list_state.selected(), self.items().len(), false);
        self.list_state.select(i);
    }

    pub fn selected_project(&self) -> Option<&ProjectRecord> {
        self.list_state.selected().and_then(|i| self.items().get(i))
    }

    pub fn selected_project_id(&self) -> Option<String> {
        self.selected_project().map(|p| p.id.clone())
    }
}

pub enum ProjectAction {
    Quit,
    ShowClients,
    NewProject,
    SelectProject(String), // Contains project_id
}

pub fn render_projects<B: Backend>(frame: &mut Frame<B>, state: &mut ProjectsState) {
    let size = frame.size();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(3)].as_ref())
        .split(size);

    let Some(projects) = render_remote(frame, &state.projects, chunks[0]) else {
        return;
    };

    let items: Vec<ListItem> = projects
        .iter()
        .map(|project| {
            ListItem::new(Spans::from(vec![
                Span::raw(&project.name),
                Span::raw(" ("),
                Span::styled(&project.status, Style::default().fg(Color::Cyan)),
                Span::raw(")"),
            ]))
        })
        .collect();

    let projects_list = List::new(items)
        .block(Block::default().title("Projects").borders(Borders::ALL))
        .highlight_style(
            Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        );

    frame.render_stateful_widget(projects_list, chunks[0], &mut state.list_state);

    let buttons_text = if state.selected_project().is_some() {
        "<N> New Project | <Enter> View Project | <Tab> Clients | <Q> Quit"
    } else {
        "<N> New Project | <Tab> Clients | <Q> Quit"
    };

    let buttons = Paragraph::new(buttons_text)
        .block(Block::default().borders(Borders::TOP))
        .style(Style::default().fg(Color::White));

    frame.render_widget(buttons, chunks[1]);
}

pub fn handle_input(state: &mut ProjectsState) -> Result<Option<ProjectAction>> {
    Ok(read_key()?.and_then(|code| handle_key(state, code)))
}

pub fn handle_key(state: &mut ProjectsState, code: KeyCode) -> Option<ProjectAction> {
    match code {
        KeyCode::Char('q') | KeyCode::Esc => return Some(ProjectAction::Quit),
        KeyCode::Tab => return Some(ProjectAction::ShowClients),
        KeyCode::Char('n') => return Some(ProjectAction::NewProject),
        KeyCode::Enter => return state.selected_project_id().map(ProjectAction::SelectProject),
        KeyCode::Down => state.next(),
        KeyCode::Up => state.previous(),
        _ => {}
    }
    None
}
