//! Client-side copy of the list queries.
//!
//! Mutations patch the cached lists in place instead of refetching, the same
//! way the web client wrote results back into its query cache.

use crate::api::{ClientRecord, GraphqlClient, ProjectRecord};
use crate::ui::Remote;

#[derive(Debug, Default)]
pub struct QueryCache {
    clients: Option<Vec<ClientRecord>>,
    projects: Option<Vec<ProjectRecord>>,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clients(&self) -> Option<&[ClientRecord]> {
        self.clients.as_deref()
    }

    pub fn projects(&self) -> Option<&[ProjectRecord]> {
        self.projects.as_deref()
    }

    pub fn write_clients(&mut self, clients: Vec<ClientRecord>) {
        self.clients = Some(clients);
    }

    pub fn write_projects(&mut self, projects: Vec<ProjectRecord>) {
        self.projects = Some(projects);
    }

    // The patch methods leave a list that was never loaded untouched; the
    // next read fetches it whole.

    pub fn append_client(&mut self, client: ClientRecord) {
        if let Some(clients) = &mut self.clients {
            clients.push(client);
        }
    }

    pub fn append_project(&mut self, project: ProjectRecord) {
        if let Some(projects) = &mut self.projects {
            projects.push(project);
        }
    }

    pub fn replace_project(&mut self, project: ProjectRecord) {
        if let Some(projects) = &mut self.projects {
            if let Some(slot) = projects.iter_mut().find(|p| p.id == project.id) {
                *slot = project;
            }
        }
    }

    pub fn remove_project(&mut self, id: &str) {
        if let Some(projects) = &mut self.projects {
            projects.retain(|p| p.id != id);
        }
    }

    /// Drop a deleted client along with the projects it owned
    pub fn remove_client(&mut self, id: &str) {
        if let Some(clients) = &mut self.clients {
            clients.retain(|c| c.id != id);
        }
        if let Some(projects) = &mut self.projects {
            projects.retain(|p| !p.belongs_to(id));
        }
    }
}

/// Serve the client list from the cache, fetching it on a miss
pub async fn cached_clients(api: &GraphqlClient, cache: &mut QueryCache) -> Remote<Vec<ClientRecord>> {
    if let Some(clients) = cache.clients() {
        return Remote::Ready(clients.to_vec());
    }

    match api.clients().await {
        Ok(clients) => {
            cache.write_clients(clients.clone());
            Remote::Ready(clients)
        }
        Err(err) => Remote::Failed(err.to_string()),
    }
}

/// Serve the project list from the cache, fetching it on a miss
pub async fn cached_projects(
    api: &GraphqlClient,
    cache: &mut QueryCache,
) -> Remote<Vec<ProjectRecord>> {
    if let Some(projects) = cache.projects() {
        return Remote::Ready(projects.to_vec());
    }

    match api.projects().await {
        Ok(projects) => {
            cache.write_projects(projects.clone());
            Remote::Ready(projects)
        }
        Err(err) => Remote::Failed(err.to_string()),
    }
}
