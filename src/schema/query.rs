use async_graphql::{Context, ID, Object, Result};

use super::{parse_id, store, store_failure};
use crate::models::{Client, Project};

pub struct QueryRoot;

#[Object(name = "RootQueryType")]
impl QueryRoot {
    /// Description of a client
    async fn client(&self, ctx: &Context<'_>, id: ID) -> Result<Option<Client>> {
        let Some(id) = parse_id(&id) else {
            return Ok(None);
        };
        store(ctx)?.get_client(id).await.map_err(store_failure)
    }

    /// List of all clients
    async fn clients(&self, ctx: &Context<'_>) -> Result<Vec<Client>> {
        store(ctx)?.get_clients().await.map_err(store_failure)
    }

    /// Description of a project
    async fn project(&self, ctx: &Context<'_>, id: ID) -> Result<Option<Project>> {
        let Some(id) = parse_id(&id) else {
            return Ok(None);
        };
        store(ctx)?.get_project(id).await.map_err(store_failure)
    }

    /// List of all projects
    async fn projects(&self, ctx: &Context<'_>) -> Result<Vec<Project>> {
        store(ctx)?.get_projects().await.map_err(store_failure)
    }
}
