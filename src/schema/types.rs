use async_graphql::{Context, ID, Object, Result};

use super::{store, store_failure};
use crate::models::{Client, Project};

#[Object]
impl Client {
    async fn id(&self) -> ID {
        ID(self.id.to_string())
    }

    async fn name(&self) -> &str {
        &self.name
    }

    async fn email(&self) -> &str {
        &self.email
    }

    async fn phone(&self) -> &str {
        &self.phone
    }
}

#[Object]
impl Project {
    async fn id(&self) -> ID {
        ID(self.id.to_string())
    }

    async fn name(&self) -> &str {
        &self.name
    }

    async fn description(&self) -> &str {
        &self.description
    }

    /// Human-readable status label, e.g. "Not Started"
    async fn status(&self) -> &str {
        self.status.label()
    }

    /// Owning client, or null when the reference no longer resolves
    async fn client(&self, ctx: &Context<'_>) -> Result<Option<Client>> {
        store(ctx)?
            .get_client(self.client_id)
            .await
            .map_err(store_failure)
    }
}
