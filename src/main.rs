mod api;
mod cli;
mod config;
mod db;
mod error;
mod models;
mod schema;
mod server;
mod ui;

use std::io;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use tracing_subscriber::EnvFilter;
use tui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};

use crate::api::GraphqlClient;
use crate::cli::{Cli, Command};
use crate::config::Config;
use crate::db::{MemoryStore, Store};
use crate::ui::{
    cache::{cached_clients, cached_projects, QueryCache},
    client_wizard::{render_client_wizard, handle_input as handle_client_wizard_input, ClientWizardAction, ClientWizardState},
    clients::{render_clients, handle_input as handle_clients_input, ClientAction, ClientsState},
    project_view::{render_project_view, handle_input as handle_project_view_input, ProjectViewAction, ProjectViewState},
    project_wizard::{render_project_wizard, handle_input as handle_project_wizard_input, ProjectWizardAction, ProjectWizardState, WizardMode},
    projects::{render_projects, handle_input as handle_projects_input, ProjectAction, ProjectsState},
    read_key, render_alert, Remote, INCOMPLETE_FORM,
};

// Represents the current screen in the app
enum AppScreen {
    Clients,
    ClientWizard,
    Projects,
    ProjectWizard,
    ProjectView(String), // Contains project_id
}

// Main application state
struct AppState {
    api: GraphqlClient,
    cache: QueryCache,
    screen: AppScreen,
    alert: Option<String>,
    clients_state: Option<ClientsState>,
    client_wizard_state: Option<ClientWizardState>,
    projects_state: Option<ProjectsState>,
    project_wizard_state: Option<ProjectWizardState>,
    project_view_state: Option<ProjectViewState>,
}

impl AppState {
    fn new(api: GraphqlClient) -> Self {
        Self {
            api,
            cache: QueryCache::new(),
            screen: AppScreen::Clients,
            alert: None,
            clients_state: Some(ClientsState::new(Remote::Loading)),
            client_wizard_state: None,
            projects_state: None,
            project_wizard_state: None,
            project_view_state: None,
        }
    }

    fn show_clients(&mut self) {
        self.clients_state = Some(ClientsState::new(Remote::Loading));
        self.screen = AppScreen::Clients;
    }

    fn show_projects(&mut self) {
        self.projects_state = Some(ProjectsState::new(Remote::Loading));
        self.screen = AppScreen::Projects;
    }

    fn show_project(&mut self, project_id: String) {
        self.project_view_state = Some(ProjectViewState::new(Remote::Loading));
        self.screen = AppScreen::ProjectView(project_id);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = config::init()?;

    match cli.command {
        Command::Serve { in_memory, port } => {
            init_tracing();
            run_server(&config, in_memory, port.unwrap_or(config.port)).await
        }
        Command::Ui { api_url } => {
            let api = GraphqlClient::new(api_url.unwrap_or(config.api_url));
            run_ui(api).await
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

async fn run_server(config: &Config, in_memory: bool, port: u16) -> Result<()> {
    let store: Arc<dyn Store> = if in_memory {
        tracing::warn!("using in-memory store; records are lost on shutdown");
        Arc::new(MemoryStore::new())
    } else {
        let db = db::init(config.database_url()?).await?;
        tracing::info!("database connection established");
        Arc::new(db)
    };

    server::serve(schema::build_schema(store), port, config.graphiql_enabled()).await
}

async fn run_ui(api: GraphqlClient) -> Result<()> {
    // Setup terminal
    terminal::enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let endpoint = api.url().to_string();
    let mut app_state = AppState::new(api);

    // Run the main app loop
    let result = run_app(&mut terminal, &mut app_state).await;

    // Restore terminal
    terminal::disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    // Show any error message
    if let Err(err) = result {
        println!("Error: {}", err);
    }

    println!("Disconnected from {}", endpoint);

    Ok(())
}

async fn run_app<B: Backend>(terminal: &mut Terminal<B>, app_state: &mut AppState) -> Result<()> {
    loop {
        // Render current screen
        terminal.draw(|f| {
            match app_state.screen {
                AppScreen::Clients => {
                    if let Some(state) = &mut app_state.clients_state {
                        render_clients(f, state);
                    }
                }
                AppScreen::ClientWizard => {
                    if let Some(state) = &mut app_state.client_wizard_state {
                        render_client_wizard(f, state);
                    }
                }
                AppScreen::Projects => {
                    if let Some(state) = &mut app_state.projects_state {
                        render_projects(f, state);
                    }
                }
                AppScreen::ProjectWizard => {
                    if let Some(state) = &app_state.project_wizard_state {
                        render_project_wizard(f, state);
                    }
                }
                AppScreen::ProjectView(_) => {
                    if let Some(state) = &app_state.project_view_state {
                        render_project_view(f, state);
                    }
                }
            }

            if let Some(message) = &app_state.alert {
                render_alert(f, message);
            }
        })?;

        // Fetch whatever the screen just drawn as loading is waiting on
        if load_pending(app_state).await {
            continue;
        }

        if app_state.alert.is_some() {
            if read_key()?.is_some() {
                app_state.alert = None;
            }
            continue;
        }

        // Handle input for current screen
        let should_quit = match app_state.screen {
            AppScreen::Clients => handle_clients_screen(app_state).await?,
            AppScreen::ClientWizard => handle_client_wizard_screen(app_state).await?,
            AppScreen::Projects => handle_projects_screen(app_state).await?,
            AppScreen::ProjectWizard => handle_project_wizard_screen(app_state).await?,
            AppScreen::ProjectView(_) => handle_project_view_screen(app_state).await?,
        };

        if should_quit {
            break;
        }
    }

    Ok(())
}

/// Replace a loading screen state with fetched data; false when nothing was pending
async fn load_pending(app_state: &mut AppState) -> bool {
    match &app_state.screen {
        AppScreen::Clients
            if app_state.clients_state.as_ref().is_some_and(ClientsState::is_loading) =>
        {
            let clients = cached_clients(&app_state.api, &mut app_state.cache).await;
            app_state.clients_state = Some(ClientsState::new(clients));
        }
        AppScreen::Projects
            if app_state.projects_state.as_ref().is_some_and(ProjectsState::is_loading) =>
        {
            let projects = cached_projects(&app_state.api, &mut app_state.cache).await;
            app_state.projects_state = Some(ProjectsState::new(projects));
        }
        AppScreen::ProjectWizard
            if app_state
                .project_wizard_state
                .as_ref()
                .is_some_and(ProjectWizardState::is_loading) =>
        {
            let clients = cached_clients(&app_state.api, &mut app_state.cache).await;
            app_state.project_wizard_state = Some(ProjectWizardState::new(clients));
        }
        AppScreen::ProjectView(project_id)
            if app_state
                .project_view_state
                .as_ref()
                .is_some_and(ProjectViewState::is_loading) =>
        {
            let project = Remote::from_result(app_state.api.project(project_id).await);
            app_state.project_view_state = Some(ProjectViewState::new(project));
        }
        _ => return false,
    }

    true
}

async fn handle_clients_screen(app_state: &mut AppState) -> Result<bool> {
    let Some(state) = &mut app_state.clients_state else {
        return Ok(false);
    };

    match handle_clients_input(state)? {
        Some(ClientAction::Quit) => {
            return Ok(true);
        }
        Some(ClientAction::ShowProjects) => {
            app_state.show_projects();
        }
        Some(ClientAction::NewClient) => {
            app_state.client_wizard_state = Some(ClientWizardState::new());
            app_state.screen = AppScreen::ClientWizard;
        }
        Some(ClientAction::DeleteClient(client_id)) => {
            match app_state.api.delete_client(&client_id).await {
                Ok(_) => {
                    // The server removed the client's projects too
                    app_state.cache.remove_client(&client_id);
                    app_state.show_clients();
                }
                Err(err) => app_state.alert = Some(err.to_string()),
            }
        }
        None => {}
    }

    Ok(false)
}

async fn handle_client_wizard_screen(app_state: &mut AppState) -> Result<bool> {
    let Some(state) = &mut app_state.client_wizard_state else {
        return Ok(false);
    };

    match handle_client_wizard_input(state)? {
        Some(ClientWizardAction::Cancel) => {
            app_state.show_clients();
        }
        Some(ClientWizardAction::Incomplete) => {
            app_state.alert = Some(INCOMPLETE_FORM.to_string());
        }
        Some(ClientWizardAction::Save(input)) => {
            match app_state.api.add_client(&input).await {
                Ok(client) => {
                    app_state.cache.append_client(client);
                    app_state.show_clients();
                }
                Err(err) => app_state.alert = Some(err.to_string()),
            }
        }
        None => {}
    }

    Ok(false)
}

async fn handle_projects_screen(app_state: &mut AppState) -> Result<bool> {
    let Some(state) = &mut app_state.projects_state else {
        return Ok(false);
    };

    match handle_projects_input(state)? {
        Some(ProjectAction::Quit) => {
            return Ok(true);
        }
        Some(ProjectAction::ShowClients) => {
            app_state.show_clients();
        }
        Some(ProjectAction::NewProject) => {
            // The client selector is filled in by the next load
            app_state.project_wizard_state = Some(ProjectWizardState::new(Remote::Loading));
            app_state.screen = AppScreen::ProjectWizard;
        }
        Some(ProjectAction::SelectProject(project_id)) => {
            app_state.show_project(project_id);
        }
        None => {}
    }

    Ok(false)
}

async fn handle_project_wizard_screen(app_state: &mut AppState) -> Result<bool> {
    let Some(state) = &mut app_state.project_wizard_state else {
        return Ok(false);
    };

    let editing = match &state.mode {
        WizardMode::Edit { id } => Some(id.clone()),
        WizardMode::Create => None,
    };

    match handle_project_wizard_input(state)? {
        Some(ProjectWizardAction::Cancel) => match editing {
            Some(project_id) => app_state.show_project(project_id),
            None => app_state.show_projects(),
        },
        Some(ProjectWizardAction::Incomplete) => {
            app_state.alert = Some(INCOMPLETE_FORM.to_string());
        }
        Some(ProjectWizardAction::Create(input)) => {
            match app_state.api.add_project(&input).await {
                Ok(project) => {
                    app_state.cache.append_project(project);
                    app_state.show_projects();
                }
                Err(err) => app_state.alert = Some(err.to_string()),
            }
        }
        Some(ProjectWizardAction::Update(changes)) => {
            match app_state.api.update_project(&changes).await {
                Ok(updated) => {
                    if let Some(project) = &updated {
                        app_state.cache.replace_project(project.clone());
                    }
                    app_state.project_view_state =
                        Some(ProjectViewState::new(Remote::Ready(updated)));
                    app_state.screen = AppScreen::ProjectView(changes.id);
                }
                Err(err) => app_state.alert = Some(err.to_string()),
            }
        }
        None => {}
    }

    Ok(false)
}

async fn handle_project_view_screen(app_state: &mut AppState) -> Result<bool> {
    let Some(state) = &mut app_state.project_view_state else {
        return Ok(false);
    };

    match handle_project_view_input(state)? {
        Some(ProjectViewAction::Back) => {
            app_state.show_projects();
        }
        Some(ProjectViewAction::EditProject(project)) => {
            app_state.project_wizard_state = Some(ProjectWizardState::from_existing(&project));
            app_state.screen = AppScreen::ProjectWizard;
        }
        Some(ProjectViewAction::DeleteProject(project_id)) => {
            match app_state.api.delete_project(&project_id).await {
                Ok(_) => {
                    app_state.cache.remove_project(&project_id);
                    app_state.show_projects();
                }
                Err(err) => app_state.alert = Some(err.to_string()),
            }
        }
        None => {}
    }

    Ok(false)
}
