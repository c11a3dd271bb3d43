//! Typed GraphQL client used by the terminal UI.

mod operations;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;

use crate::models::ProjectStatus;

pub use operations::*;

/// Errors returned by [`GraphqlClient`]
#[derive(Error, Debug)]
pub enum ApiError {
    /// The request never produced a response body
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with GraphQL errors
    #[error("{}", .0.join("; "))]
    Graphql(Vec<String>),

    /// The server answered with neither data nor errors
    #[error("response contained no data")]
    MissingData,
}

pub type Result<T> = std::result::Result<T, ApiError>;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClientRecord {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProjectRecord {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Status label as reported by the server
    pub status: String,
    pub client: Option<ClientRecord>,
}

impl ProjectRecord {
    pub fn belongs_to(&self, client_id: &str) -> bool {
        self.client.as_ref().is_some_and(|c| c.id == client_id)
    }
}

/// Variables for `addClient`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClientInput {
    pub name: String,
    pub email: String,
    pub phone: String,
}

/// Variables for `addProject`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectInput {
    pub name: String,
    pub description: String,
    pub status: ProjectStatus,
    pub client_id: String,
}

/// Variables for `updateProject`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectChanges {
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ProjectStatus>,
}

#[derive(Serialize)]
struct GraphqlRequest<'a, V> {
    query: &'a str,
    variables: &'a V,
}

#[derive(Deserialize)]
struct GraphqlError {
    message: String,
}

#[derive(Deserialize)]
struct Envelope<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<GraphqlError>,
}

#[derive(Deserialize)]
struct Clients {
    clients: Vec<ClientRecord>,
}

#[derive(Deserialize)]
struct Projects {
    projects: Vec<ProjectRecord>,
}

#[derive(Deserialize)]
struct ProjectLookup {
    project: Option<ProjectRecord>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AddClient {
    add_client: ClientRecord,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DeleteClient {
    delete_client: Option<ClientRecord>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AddProject {
    add_project: ProjectRecord,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateProject {
    update_project: Option<ProjectRecord>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DeleteProject {
    delete_project: Option<ProjectRecord>,
}

/// HTTP client for the `/graphql` endpoint
#[derive(Clone)]
pub struct GraphqlClient {
    http: reqwest::Client,
    url: String,
}

impl GraphqlClient {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    async fn execute<V, T>(&self, query: &str, variables: &V) -> Result<T>
    where
        V: Serialize,
        T: DeserializeOwned,
    {
        let envelope: Envelope<T> = self
            .http
            .post(&self.url)
            .json(&GraphqlRequest { query, variables })
            .send()
            .await?
            .json()
            .await?;

        if !envelope.errors.is_empty() {
            let messages = envelope.errors.into_iter().map(|e| e.message).collect();
            return Err(ApiError::Graphql(messages));
        }

        envelope.data.ok_or(ApiError::MissingData)
    }

    pub async fn clients(&self) -> Result<Vec<ClientRecord>> {
        let data: Clients = self.execute(GET_CLIENTS, &json!({})).await?;
        Ok(data.clients)
    }

    pub async fn projects(&self) -> Result<Vec<ProjectRecord>> {
        let data: Projects = self.execute(GET_PROJECTS, &json!({})).await?;
        Ok(data.projects)
    }

    pub async fn project(&self, id: &str) -> Result<Option<ProjectRecord>> {
        let data: ProjectLookup = self.execute(GET_PROJECT, &json!({ "id": id })).await?;
        Ok(data.project)
    }

    pub async fn add_client(&self, input: &ClientInput) -> Result<ClientRecord> {
        let data: AddClient = self.execute(ADD_CLIENT, input).await?;
        Ok(data.add_client)
    }

    pub async fn delete_client(&self, id: &str) -> Result<Option<ClientRecord>> {
        let data: DeleteClient = self.execute(DELETE_CLIENT, &json!({ "id": id })).await?;
        Ok(data.delete_client)
    }

    pub async fn add_project(&self, input: &ProjectInput) -> Result<ProjectRecord> {
        let data: AddProject = self.execute(ADD_PROJECT, input).await?;
        Ok(data.add_project)
    }

    pub async fn update_project(&self, changes: &ProjectChanges) -> Result<Option<ProjectRecord>> {
        let data: UpdateProject = self.execute(UPDATE_PROJECT, changes).await?;
        Ok(data.update_project)
    }

    pub async fn delete_project(&self, id: &str) -> Result<Option<ProjectRecord>> {
        let data: DeleteProject = self.execute(DELETE_PROJECT, &json!({ "id": id })).await?;
        Ok(data.delete_project)
    }
}
