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

use crate::api::ClientInput;
use crate::ui::read_key;

pub enum ClientWizardAction {
    Cancel,
    Incomplete,
    Save(ClientInput),
}

#[derive(Clone, PartialEq, Copy, Debug, Default)]
pub enum ClientField {
    #[default]
    Name,
    Email,
    Phone,
}

#[derive(Default)]
pub struct ClientWizardState {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub current_field: ClientField,
    pub editing: bool,
}

impl ClientWizardState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle_editing(&mut self) {
        self.editing = !self.editing;
    }

    pub fn next_field(&mut self) {
        self.current_field = match self.current_field {
            ClientField::Name => ClientField::Email,
            ClientField::Email => ClientField::Phone,
            ClientField::Phone => ClientField::Name,
        };
    }

    pub fn previous_field(&mut self) {
        self.current_field = match self.current_field {
            ClientField::Name => ClientField::Phone,
            ClientField::Email => ClientField::Name,
            ClientField::Phone => ClientField::Email,
        };
    }

    pub fn edit_current_field(&mut self, key: KeyCode) {
        if !self.editing {
            return;
        }

        let field_value = match self.current_field {
            ClientField::Name => &mut self.name,
            ClientField::Email => &mut self.email,
            ClientField::Phone => &mut self.phone,
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
        !self.name.is_empty() && !self.email.is_empty() && !self.phone.is_empty()
    }

    /// Take the entered values and clear the form for the next client
    pub fn submit(&mut self) -> ClientWizardAction {
        if !self.is_valid() {
            return ClientWizardAction::Incomplete;
        }

        let state = std::mem::take(self);
        ClientWizardAction::Save(ClientInput {
            name: state.name,
            email: state.email,
            phone: state.phone,
        })
    }
}

pub fn render_client_wizard<B: Backend>(f: &mut Frame<B>, state: &mut ClientWizardState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(2)
        .constraints(
            [
                Constraint::Length(3),
                Constraint::Min(5),
                Constraint::Length(3),
            ]
            .as_ref(),
        )
        .split(f.size());

    let title = Paragraph::new("Add Client")
        .style(Style::default().fg(Color::Cyan))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, chunks[0]);

    render_form(f, state, chunks[1]);

    let help_text = if state.editing {
        "Enter - Save field | Esc - Stop editing"
    } else {
        "Enter - Edit field | Up/Down - Navigate fields | S - Submit | Esc - Cancel"
    };

    let help = Paragraph::new(help_text)
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, chunks[2]);
}

fn render_form<B: Backend>(f: &mut Frame<B>, state: &ClientWizardState, area: Rect) {
    let fields = [
        (ClientField::Name, "Name", &state.name),
        (ClientField::Email, "Email", &state.email),
        (ClientField::Phone, "Phone", &state.phone),
    ];

    let items: Vec<ListItem> = fields
        .iter()
        .map(|(field, label, value)| {
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
                    Span::raw(value.as_str()),
                ])
            };

            ListItem::new(content)
        })
        .collect();

    let form_list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title("Client Details"));

    f.render_widget(form_list, area);
}

pub fn handle_input(state: &mut ClientWizardState) -> Result<Option<ClientWizardAction>> {
    Ok(read_key()?.and_then(|code| handle_key(state, code)))
}

pub fn handle_key(state: &mut ClientWizardState, code: KeyCode) -> Option<ClientWizardAction> {
    match code {
        KeyCode::Esc => {
            if state.editing {
                state.toggle_editing();
            } else {
                return Some(ClientWizardAction::Cancel);
            }
        }
        KeyCode::Enter => state.toggle_editing(),
        KeyCode::Up if !state.editing => state.previous_field(),
        KeyCode::Down if !state.editing => state.next_field(),
        KeyCode::Char('s') if !state.editing => return Some(state.submit()),
        _ if state.editing => state.edit_current_field(code),
        _ => {}
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn type_text(state: &mut ClientWizardState, text: &str) {
        handle_key(state, KeyCode::Enter);
        for c in text.chars() {
            handle_key(state, KeyCode::Char(c));
        }
        handle_key(state, KeyCode::Enter);
    }

    #[test]
    fn test_submit_with_empty_field_is_incomplete() {
        let mut state = ClientWizardState::new();
        type_text(&mut state, "Acme");
        handle_key(&mut state, KeyCode::Down);
        type_text(&mut state, "a@acme.com");

        let action = handle_key(&mut state, KeyCode::Char('s'));

        assert!(matches!(action, Some(ClientWizardAction::Incomplete)));
        assert_eq!(state.name, "Acme");
        assert_eq!(state.email, "a@acme.com");
    }

    #[test]
    fn test_submit_returns_input_and_resets() {
        let mut state = ClientWizardState::new();
        type_text(&mut state, "Acme");
        handle_key(&mut state, KeyCode::Down);
        type_text(&mut state, "a@acme.com");
        handle_key(&mut state, KeyCode::Down);
        type_text(&mut state, "555-12345");
        handle_key(&mut state, KeyCode::Enter);
        handle_key(&mut state, KeyCode::Backspace);
        handle_key(&mut state, KeyCode::Enter);

        match handle_key(&mut state, KeyCode::Char('s')) {
            Some(ClientWizardAction::Save(input)) => assert_eq!(
                input,
                ClientInput {
                    name: "Acme".to_string(),
                    email: "a@acme.com".to_string(),
                    phone: "555-1234".to_string(),
                }
            ),
            _ => panic!("expected a saved client"),
        }

        assert!(state.name.is_empty() && state.email.is_empty() && state.phone.is_empty());
        assert_eq!(state.current_field, ClientField::Name);
    }

    #[test]
    fn test_typing_s_while_editing_is_text() {
        let mut state = ClientWizardState::new();
        handle_key(&mut state, KeyCode::Enter);

        assert!(handle_key(&mut state, KeyCode::Char('s')).is_none());
        assert_eq!(state.name, "s");
    }

    #[test]
    fn test_escape_stops_editing_before_cancelling() {
        let mut state = ClientWizardState::new();
        handle_key(&mut state, KeyCode::Enter);

        assert!(handle_key(&mut state, KeyCode::Esc).is_none());
        assert!(!state.editing);
        assert!(matches!(handle_key(&mut state, KeyCode::Esc), Some(ClientWizardAction::Cancel)));
    }

    #[test]
    fn test_field_navigation_wraps() {
        let mut state = ClientWizardState::new();
        handle_key(&mut state, KeyCode::Up);
        assert_eq!(state.current_field, ClientField::Phone);
        handle_key(&mut state, KeyCode::Down);
        assert_eq!(state.current_field, ClientField::Name);
    }
}
