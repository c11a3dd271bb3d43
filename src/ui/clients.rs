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

use crate::api::ClientRecord;
use crate::ui::{read_key, render_confirmation, render_remote, step_selection, Remote};

// Represents the state of the client list screen
pub struct ClientsState {
    clients: Remote<Vec<ClientRecord>>,
    list_state: ListState,
    show_delete_confirmation: bool,
}

impl ClientsState {
    pub fn new(clients: Remote<Vec<ClientRecord>>) -> Self {
        let mut list_state = ListState::default();
        if clients.ready().is_some_and(|c| !c.is_empty()) {
            list_state.select(Some(0));
        }

        Self {
            clients,
            list_state,
            show_delete_confirmation: false,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.clients, Remote::Loading)
    }

    fn items(&self) -> &[ClientRecord] {
        self.clients.ready().map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn next(&mut self) {
        let i = step_selection(self.list_state.selected(), self.items().len(), true);
        self.list_state.select(i);
    }

    pub fn previous(&mut self) {
        let i = step_selection(self.list_state.selected(), self.items().len(), false);
        self.list_state.select(i);
    }

    pub fn toggle_delete_confirmation(&mut self) {
        self.show_delete_confirmation = !self.show_delete_confirmation;
    }

    pub fn selected_client(&self) -> Option<&ClientRecord> {
        self.list_state.selected().and_then(|i| self.items().get(i))
    }

    pub fn selected_client_id(&self) -> Option<String> {
        self.selected_client().map(|c| c.id.clone())
    }
}

pub enum ClientAction {
    Quit,
    ShowProjects,
    NewClient,
    DeleteClient(String), // Contains client_id
}

pub fn render_clients<B: Backend>(frame: &mut Frame<B>, state: &mut ClientsState) {
    let size = frame.size();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(3)].as_ref())
        .split(size);

    let Some(clients) = render_remote(frame, &state.clients, chunks[0]) else {
        return;
    };

    let items: Vec<ListItem> = clients
        .iter()
        .map(|client| {
            ListItem::new(Spans::from(vec![
                Span::styled(&client.name, Style::default().add_modifier(Modifier::BOLD)),
                Span::raw("  "),
                Span::raw(&client.email),
                Span::raw("  "),
                Span::raw(&client.phone),
            ]))
        })
        .collect();

    let clients_list = List::new(items)
        .block(Block::default().title("Clients").borders(Borders::ALL))
        .highlight_style(
            Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        );

    frame.render_stateful_widget(clients_list, chunks[0], &mut state.list_state);

    let buttons_text = if state.selected_client().is_some() {
        "<N> New Client | <D> Delete Client | <Tab> Projects | <Q> Quit"
    } else {
        "<N> New Client | <Tab> Projects | <Q> Quit"
    };

    let buttons = Paragraph::new(buttons_text)
        .block(Block::default().borders(Borders::TOP))
        .style(Style::default().fg(Color::White));

    frame.render_widget(buttons, chunks[1]);

    if state.show_delete_confirmation {
        render_confirmation(
            frame,
            "Are you sure you want to delete this client?",
            "All of the client's projects will also be deleted.",
        );
    }
}

pub fn handle_input(state: &mut ClientsState) -> Result<Option<ClientAction>> {
    Ok(read_key()?.and_then(|code| handle_key(state, code)))
}

pub fn handle_key(state: &mut ClientsState, code: KeyCode) -> Option<ClientAction> {
    if state.show_delete_confirmation {
        match code {
            KeyCode::Char('y') => {
                state.toggle_delete_confirmation();
                return state.selected_client_id().map(ClientAction::DeleteClient);
            }
            KeyCode::Char('n') | KeyCode::Char('q') | KeyCode::Esc => {
                state.toggle_delete_confirmation();
            }
            _ => {}
        }
        return None;
    }

    match code {
        KeyCode::Char('q') | KeyCode::Esc => return Some(ClientAction::Quit),
        KeyCode::Tab => return Some(ClientAction::ShowProjects),
        KeyCode::Char('n') => return Some(ClientAction::NewClient),
        KeyCode::Char('d') => {
            if state.selected_client().is_some() {
                state.toggle_delete_confirmation();
            }
        }
        KeyCode::Down => state.next(),
        KeyCode::Up => state.previous(),
        _ => {}
    }
    None
}
