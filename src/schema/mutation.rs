use async_graphql::{Context, Error, ID, Object, Result};

use super::{parse_id, store, store_failure};
use crate::models::{
    Client, NewClient, NewProject, Project, ProjectStatus, ProjectStatusUpdate, ProjectUpdate,
};

pub struct MutationRoot;

#[Object(name = "Mutation")]
impl MutationRoot {
    /// Adding new client
    async fn add_client(
        &self,
        ctx: &Context<'_>,
        name: String,
        email: String,
        phone: String,
    ) -> Result<Client> {
        let client = NewClient { name, email, phone };
        store(ctx)?.create_client(&client).await.map_err(store_failure)
    }

    /// Delete a client
    ///
    /// Every project of the client is deleted with it.
    async fn delete_client(&self, ctx: &Context<'_>, id: ID) -> Result<Option<Client>> {
        let Some(id) = parse_id(&id) else {
            return Ok(None);
        };
        store(ctx)?.delete_client(id).await.map_err(store_failure)
    }

    /// Add a project
    async fn add_project(
        &self,
        ctx: &Context<'_>,
        name: String,
        description: String,
        #[graphql(default)] status: ProjectStatus,
        client_id: ID,
    ) -> Result<Project> {
        let client_id = parse_id(&client_id).ok_or_else(|| Error::new("invalid client id"))?;
        let project = NewProject {
            name,
            description,
            status,
            client_id,
        };
        store(ctx)?.create_project(&project).await.map_err(store_failure)
    }

    /// Delete a project
    async fn delete_project(&self, ctx: &Context<'_>, id: ID) -> Result<Option<Project>> {
        let Some(id) = parse_id(&id) else {
            return Ok(None);
        };
        store(ctx)?.delete_project(id).await.map_err(store_failure)
    }

    /// Update a project
    async fn update_project(
        &self,
        ctx: &Context<'_>,
        id: ID,
        name: String,
        description: String,
        status: Option<ProjectStatusUpdate>,
    ) -> Result<Option<Project>> {
        let Some(id) = parse_id(&id) else {
            return Ok(None);
        };
        let update = ProjectUpdate {
            name,
            description,
            status: status.map(ProjectStatus::from),
        };
        store(ctx)?
            .update_project(id, &update)
            .await
            .map_err(store_failure)
    }
}
