use anyhow::Result;
use crossterm::event::KeyCode;
use tui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use crate::api::{ClientRecord, ProjectChanges, ProjectInput, ProjectRecord};
use crate::models::ProjectStatus;
use crate::ui::{read_key, render_remote, step_selection, Remote};

pub enum ProjectWizardAction {
    Cancel,
    Incomplete,
    Create(ProjectInput),
    Update(ProjectChanges),
}

#[derive(Clone, PartialEq, Copy, Debug)]
pub enum ProjectField {
    Name,
    Description,
    Status,
    Client,
}

#[derive(Clone, PartialEq, Debug)]
pub enum WizardMode {
    Create,
    Edit { id: String },
}

pub struct ProjectWizardState {
    pub mode: WizardMode,
    pub name: String,
    pub description: String,
    pub status: ProjectStatus,
    // Stored label the form could not read; kept unless the user picks a status
    unrecognized_status: Option<String>,
    clients: Remote<Vec<ClientRecord>>,
    selected_client: Option<usize>,
    pub current_field: ProjectField,
    pub editing: bool,
}

impl ProjectWizardState {
    pub fn new(clients: Remote<Vec<ClientRecord>>) -> Self {
        Self {
            mode: WizardMode::Create,
            name: String::new(),
            description: String::new(),
            status: ProjectStatus::default(),
            unrecognized_status: None,
            clients,
            selected_client: None,
            current_field: ProjectField::Name,
            editing: false,
        }
    }

    /// Edit form prefilled from `project`; the owning client is fixed
    pub fn from_existing(project: &ProjectRecord) -> Self {
        let (status, unrecognized_status) = match project.status.parse() {
            Ok(status) => (status, None),
            Err(_) => (ProjectStatus::default(), Some(project.status.clone())),
        };

        Self {
            mode: WizardMode::Edit {
                id: project.id.clone(),
            },
            name: project.name.clone(),
            description: project.description.clone(),
            status,
            unrecognized_status,
            clients: Remote::Ready(Vec::new()),
            selected_client: None,
            current_field: ProjectField::Name,
            editing: false,
        }
    }

    pub fn is_editing_existing(&self) -> bool {
        matches!(self.mode, WizardMode::Edit { .. })
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.clients, Remote::Loading)
    }

    fn fields(&self) -> &'static [ProjectField] {
        if self.is_editing_existing() {
            &[ProjectField::Name, ProjectField::Description, ProjectField::Status]
        } else {
            &[
                ProjectField::Name,
                ProjectField::Description,
                ProjectField::Status,
                ProjectField::Client,
            ]
        }
    }

    fn step_field(&mut self, forward: bool) {
        let fields = self.fields();
        let current = fields.iter().position(|f| *f == self.current_field);
        if let Some(i) = step_selection(current, fields.len(), forward) {
            self.current_field = fields[i];
        }
    }

    pub fn next_field(&mut self) {
        self.step_field(true);
    }

    pub fn previous_field(&mut self) {
        self.step_field(false);
    }

    pub fn toggle_editing(&mut self) {
        // Status and client are picked with Left/Right, never typed
        if matches!(self.current_field, ProjectField::Name | ProjectField::Description) {
            self.editing = !self.editing;
        }
    }

    pub fn selected_client(&self) -> Option<&ClientRecord> {
        let clients = self.clients.ready()?;
        self.selected_client.and_then(|i| clients.get(i))
    }

    fn cycle_choice(&mut self, forward: bool) {
        match self.current_field {
            ProjectField::Status if self.unrecognized_status.is_some() => {
                self.unrecognized_status = None;
            }
            ProjectField::Status => {
                self.status = if forward {
                    self.status.next()
                } else {
                    self.status.previous()
                };
            }
            ProjectField::Client => {
                let len = self.clients.ready().map_or(0, Vec::len);
                self.selected_client = step_selection(self.selected_client, len, forward);
            }
            _ => {}
        }
    }

    pub fn edit_current_field(&mut self, key: KeyCode) {
        if !self.editing {
            return;
        }

        let field_value = match self.current_field {
            ProjectField::Name => &mut self.name,
            ProjectField::Description => &mut self.description,
            _ => return,
        };

        match key {
            KeyCode::Char(c) => {
                field_value.push(c);
            }
            KeyCode::Backspace => {
                field_value.pop();
            }
            _ => {}
        }
    }

    pub fn is_valid(&self) -> bool {
        let has_client = self.is_editing_existing() || self.selected_client().is_some();
        !self.name.is_empty() && !self.description.is_empty() && has_client
    }

    /// Build the mutation input; a create form is cleared for the next project
    pub fn submit(&mut self) -> ProjectWizardAction {
        if !self.is_valid() {
            return ProjectWizardAction::Incomplete;
        }

        match &self.mode {
            WizardMode::Edit { id } => ProjectWizardAction::Update(ProjectChanges {
                id: id.clone(),
                name: self.name.clone(),
                description: self.description.clone(),
                status: self.unrecognized_status.is_none().then_some(self.status),
            }),
            WizardMode::Create => {
                let client_id = self
                    .selected_client()
                    .map(|c| c.id.clone())
                    .unwrap_or_default();
                let input = ProjectInput {
                    name: std::mem::take(&mut self.name),
                    description: std::mem::take(&mut self.description),
                    status: std::mem::take(&mut self.status),
                    client_id,
                };
                self.selected_client = None;
                self.current_field = ProjectField::Name;
                ProjectWizardAction::Create(input)
            }
        }
    }
}

pub fn render_project_wizard<B: Backend>(f: &mut Frame<B>, state: &ProjectWizardState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(2)
        .constraints(
            [
                Constraint::Length(3),
                Constraint::Min(6),
                Constraint::Length(3),
            ]
            .as_ref(),
        )
        .split(f.size());

    // The selector needs the client list before the form can be shown
    if render_remote(f, &state.clients, chunks[1]).is_none() {
        return;
    }

    let title_text = if state.is_editing_existing() {
        "Edit Project"
    } else {
        "Add Project"
    };

    let title = Paragraph::new(title_text)
        .style(Style::default().fg(Color::Cyan))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, chunks[0]);

    render_form(f, state, chunks[1]);

    let help_text = if state.editing {
        "Enter - Save field | Esc - Stop editing"
    } else {
        match state.current_field {
            ProjectField::Status | ProjectField::Client => {
                "Left/Right - Change | Up/Down - Navigate fields | S - Submit | Esc - Cancel"
            }
            _ => "Enter - Edit field | Up/Down - Navigate fields | S - Submit | Esc - Cancel",
        }
    };

    let help = Paragraph::new(help_text)
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, chunks[2]);
}

fn render_form<B: Backend>(f: &mut Frame<B>, state: &ProjectWizardState, area: Rect) {
    let items: Vec<ListItem> = state
        .fields()
        .iter()
        .map(|field| {
            let (label, value) = match field {
                ProjectField::Name => ("Name", state.name.clone()),
                ProjectField::Description => ("Description", state.description.clone()),
                ProjectField::Status => {
                    let label = state
                        .unrecognized_status
                        .as_deref()
                        .unwrap_or(state.status.label());
                    ("Status", format!("< {} >", label))
                }
                ProjectField::Client => (
                    "Client",
                    state
                        .selected_client()
                        .map_or("Select Client".to_string(), |c| format!("< {} >", c.name)),
                ),
            };

            let selected = *field == state.current_field;
            let content = if selected && state.editing {
                Spans::from(vec![
                    Span::styled(format!("{}: ", label), Style::default().fg(Color::Yellow)),
                    Span::styled(
                        format!("{}|", value),
                        Style::default().add_modifier(Modifier::BOLD),
                    ),
                ])
            } else {
                let style = if selected {
                    Style::default().fg(Color::Yellow)
                } else {
                    Style::default()
                };

                Spans::from(vec![
                    Span::styled(format!("{}: ", label), style),
                    Span::raw(value),
                ])
            };

            ListItem::new(content)
        })
        .collect();

    let form_list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title("Project Details"));

    f.render_widget(form_list, area);
}

pub fn handle_input(state: &mut ProjectWizardState) -> Result<Option<ProjectWizardAction>> {
    Ok(read_key()?.and_then(|code| handle_key(state, code)))
}

pub fn handle_key(state: &mut ProjectWizardState, code: KeyCode) -> Option<ProjectWizardAction> {
    match code {
        KeyCode::Esc => {
            if state.editing {
                state.toggle_editing();
            } else {
                return Some(ProjectWizardAction::Cancel);
            }
        }
        KeyCode::Enter => state.toggle_editing(),
        KeyCode::Up if !state.editing => state.previous_field(),
        KeyCode::Down if !state.editing => state.next_field(),
        KeyCode::Left if !state.editing => state.cycle_choice(false),
        KeyCode::Right if !state.editing => state.cycle_choice(true),
        KeyCode::Char('s') if !state.editing => return Some(state.submit()),
        _ if state.editing => state.edit_current_field(code),
        _ => {}
    }

    None
}
