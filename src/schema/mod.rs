//! GraphQL schema over the project/client store.
//!
//! The schema is assembled by [`build_schema`] from an injected store; every
//! resolver reaches the store through the schema data, so several schemas
//! with different backends can live side by side.

mod mutation;
mod query;
mod types;

use std::sync::Arc;

use async_graphql::{Context, EmptySubscription, Error, ErrorExtensions, ID, Schema};
use uuid::Uuid;

use crate::db::Store;
use crate::error::StoreError;

pub use mutation::MutationRoot;
pub use query::QueryRoot;

pub type ProjectSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

/// Build the GraphQL schema backed by `store`
pub fn build_schema(store: Arc<dyn Store>) -> ProjectSchema {
    Schema::build(QueryRoot, MutationRoot, EmptySubscription)
        .data(store)
        .finish()
}

fn store<'a>(ctx: &Context<'a>) -> async_graphql::Result<&'a Arc<dyn Store>> {
    ctx.data::<Arc<dyn Store>>()
}

/// Ids are opaque to callers; anything that is not one of ours matches nothing.
fn parse_id(id: &ID) -> Option<Uuid> {
    Uuid::parse_str(id.as_str()).ok()
}

/// Log the store failure and hand the caller an opaque error.
fn store_failure(err: StoreError) -> Error {
    tracing::error!(error = %err, "store operation failed");
    Error::new("internal store error").extend_with(|_, e| e.set("code", "STORE_ERROR"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;
    use crate::models::{Client, NewClient, NewProject, Project, ProjectUpdate};
    use async_graphql::{Request, Variables};
    use async_trait::async_trait;
    use serde_json::{Value, json};

    fn schema() -> (ProjectSchema, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        (build_schema(store.clone()), store)
    }

    async fn run(schema: &ProjectSchema, query: &str, variables: Value) -> Value {
        let request = Request::new(query).variables(Variables::from_json(variables));
        let response = schema.execute(request).await;
        assert!(response.errors.is_empty(), "unexpected errors: {:?}", response.errors);
        response.data.into_json().unwrap()
    }

    async fn add_client(schema: &ProjectSchema, name: &str) -> String {
        let data = run(
            schema,
            r#"mutation ($name: String!) {
                addClient(name: $name, email: "team@example.com", phone: "555-0000") { id }
            }"#,
            json!({ "name": name }),
        )
        .await;
        data["addClient"]["id"].as_str().unwrap().to_string()
    }

    async fn add_project(schema: &ProjectSchema, name: &str, client_id: &str) -> String {
        let data = run(
            schema,
            r#"mutation ($name: String!, $clientId: ID!) {
                addProject(name: $name, description: "work", clientId: $clientId) { id }
            }"#,
            json!({ "name": name, "clientId": client_id }),
        )
        .await;
        data["addProject"]["id"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_add_client_returns_submitted_fields() {
        let (schema, _) = schema();

        let data = run(
            &schema,
            r#"mutation {
                addClient(name: "Acme", email: "a@acme.com", phone: "555-1234") {
                    id name email phone
                }
            }"#,
            json!({}),
        )
        .await;
        let created = &data["addClient"];
        assert_eq!(created["name"], "Acme");
        assert_eq!(created["email"], "a@acme.com");
        assert_eq!(created["phone"], "555-1234");

        let id = created["id"].as_str().unwrap();
        let lookup = run(
            &schema,
            "query ($id: ID!) { client(id: $id) { id name email phone } }",
            json!({ "id": id }),
        )
        .await;
        assert_eq!(&lookup["client"], created);

        let listed = run(&schema, "{ clients { id name email phone } }", json!({})).await;
        assert_eq!(listed["clients"], json!([created]));
    }

    #[tokio::test]
    async fn test_add_project_defaults_to_not_started() {
        let (schema, _) = schema();
        let client_id = add_client(&schema, "Acme").await;

        let data = run(
            &schema,
            r#"mutation ($clientId: ID!) {
                addProject(name: "Site", description: "New site", clientId: $clientId) {
                    name description status client { id name }
                }
            }"#,
            json!({ "clientId": client_id }),
        )
        .await;

        assert_eq!(data["addProject"]["status"], "Not Started");
        assert_eq!(data["addProject"]["client"]["id"], client_id.as_str());
        assert_eq!(data["addProject"]["client"]["name"], "Acme");
    }

    #[tokio::test]
    async fn test_add_project_accepts_status_value_names() {
        let (schema, _) = schema();
        let client_id = add_client(&schema, "Acme").await;

        let data = run(
            &schema,
            r#"mutation ($clientId: ID!) {
                addProject(name: "Site", description: "d", status: progress, clientId: $clientId) {
                    status
                }
            }"#,
            json!({ "clientId": client_id }),
        )
        .await;

        assert_eq!(data["addProject"]["status"], "In Progress");
    }

    #[tokio::test]
    async fn test_add_project_rejects_malformed_client_id() {
        let (schema, store) = schema();

        let response = schema
            .execute(r#"mutation { addProject(name: "x", description: "y", clientId: "nope") { id } }"#)
            .await;

        assert_eq!(response.errors.len(), 1);
        assert_eq!(response.errors[0].message, "invalid client id");
        assert!(store.get_projects().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_required_argument_fails_validation() {
        let (schema, store) = schema();

        let response = schema
            .execute(r#"mutation { addClient(name: "Acme", email: "a@acme.com") { id } }"#)
            .await;

        assert!(!response.errors.is_empty());
        assert!(response.errors[0].message.contains("phone"));
        assert!(store.get_clients().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_client_cascades_to_projects() {
        let (schema, _) = schema();
        let acme = add_client(&schema, "Acme").await;
        let globex = add_client(&schema, "Globex").await;
        add_project(&schema, "A1", &acme).await;
        add_project(&schema, "A2", &acme).await;
        let kept = add_project(&schema, "G1", &globex).await;

        let deleted = run(
            &schema,
            "mutation ($id: ID!) { deleteClient(id: $id) { id name } }",
            json!({ "id": acme }),
        )
        .await;
        assert_eq!(deleted["deleteClient"]["name"], "Acme");

        let listed = run(&schema, "{ projects { id } }", json!({})).await;
        assert_eq!(listed["projects"], json!([{ "id": kept }]));
    }

    #[tokio::test]
    async fn test_delete_unknown_ids_return_null() {
        let (schema, _) = schema();
        let missing = Uuid::new_v4().to_string();

        let data = run(
            &schema,
            r#"mutation ($id: ID!) {
                deleteClient(id: $id) { id }
                deleteProject(id: $id) { id }
            }"#,
            json!({ "id": missing }),
        )
        .await;

        assert_eq!(data["deleteClient"], Value::Null);
        assert_eq!(data["deleteProject"], Value::Null);
    }

    #[tokio::test]
    async fn test_delete_project_returns_removed_record() {
        let (schema, store) = schema();
        let client_id = add_client(&schema, "Acme").await;
        let project_id = add_project(&schema, "Site", &client_id).await;

        let data = run(
            &schema,
            "mutation ($id: ID!) { deleteProject(id: $id) { id name } }",
            json!({ "id": project_id }),
        )
        .await;

        assert_eq!(data["deleteProject"]["name"], "Site");
        assert!(store.get_projects().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_project_replaces_fields() {
        let (schema, _) = schema();
        let client_id = add_client(&schema, "Acme").await;
        let project_id = add_project(&schema, "Site", &client_id).await;

        let data = run(
            &schema,
            r#"mutation ($id: ID!) {
                updateProject(id: $id, name: "Site v2", description: "Relaunch", status: completed) {
                    id name description status
                }
            }"#,
            json!({ "id": project_id }),
        )
        .await;

        assert_eq!(
            data["updateProject"],
            json!({
                "id": project_id,
                "name": "Site v2",
                "description": "Relaunch",
                "status": "Completed",
            })
        );
    }

    #[tokio::test]
    async fn test_update_project_without_status_keeps_it() {
        let (schema, _) = schema();
        let client_id = add_client(&schema, "Acme").await;
        let project_id = add_project(&schema, "Site", &client_id).await;
        run(
            &schema,
            r#"mutation ($id: ID!) { updateProject(id: $id, name: "a", description: "b", status: progress) { id } }"#,
            json!({ "id": project_id }),
        )
        .await;

        let data = run(
            &schema,
            r#"mutation ($id: ID!) { updateProject(id: $id, name: "c", description: "d") { name status } }"#,
            json!({ "id": project_id }),
        )
        .await;

        assert_eq!(data["updateProject"], json!({ "name": "c", "status": "In Progress" }));
    }

    #[tokio::test]
    async fn test_update_unknown_project_returns_null_and_changes_nothing() {
        let (schema, store) = schema();
        let client_id = add_client(&schema, "Acme").await;
        add_project(&schema, "Site", &client_id).await;
        let before = store.get_projects().await.unwrap();

        let data = run(
            &schema,
            r#"mutation ($id: ID!) { updateProject(id: $id, name: "x", description: "y") { id } }"#,
            json!({ "id": Uuid::new_v4().to_string() }),
        )
        .await;

        assert_eq!(data["updateProject"], Value::Null);
        assert_eq!(store.get_projects().await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_dangling_client_reference_resolves_to_null() {
        let (schema, _) = schema();
        let ghost = Uuid::new_v4().to_string();
        let project_id = add_project(&schema, "Orphan", &ghost).await;

        let data = run(
            &schema,
            "query ($id: ID!) { project(id: $id) { name client { id } } }",
            json!({ "id": project_id }),
        )
        .await;

        assert_eq!(data["project"], json!({ "name": "Orphan", "client": null }));
    }

    #[tokio::test]
    async fn test_lookup_with_foreign_id_returns_null() {
        let (schema, _) = schema();

        let data = run(
            &schema,
            r#"{ client(id: "507f1f77bcf86cd799439011") { id } project(id: "abc") { id } }"#,
            json!({}),
        )
        .await;

        assert_eq!(data, json!({ "client": null, "project": null }));
    }

    #[test]
    fn test_sdl_uses_expected_type_names() {
        let (schema, _) = schema();
        let sdl = schema.sdl();

        assert!(sdl.contains("type RootQueryType"));
        assert!(sdl.contains("type Mutation"));
        assert!(sdl.contains("enum ProjectStatus {"));
        assert!(sdl.contains("enum ProjectStatusUpdate {"));
        assert!(sdl.contains("List of all clients"));
    }

    #[tokio::test]
    async fn test_update_project_takes_status_update_variable() {
        let (schema, _) = schema();
        let client_id = add_client(&schema, "Acme").await;
        let id = add_project(&schema, "Site", &client_id).await;

        let data = run(
            &schema,
            r#"mutation ($id: ID!, $status: ProjectStatusUpdate!) {
                updateProject(id: $id, name: "Site", description: "work", status: $status) {
                    status
                }
            }"#,
            json!({ "id": id, "status": "completed" }),
        )
        .await;

        assert_eq!(data["updateProject"]["status"], "Completed");
    }

    struct FailingStore;

    fn down() -> StoreError {
        StoreError::Database(sqlx::Error::PoolTimedOut)
    }

    #[async_trait]
    impl Store for FailingStore {
        async fn get_clients(&self) -> crate::error::Result<Vec<Client>> {
            Err(down())
        }
        async fn get_client(&self, _: Uuid) -> crate::error::Result<Option<Client>> {
            Err(down())
        }
        async fn create_client(&self, _: &NewClient) -> crate::error::Result<Client> {
            Err(down())
        }
        async fn delete_client(&self, _: Uuid) -> crate::error::Result<Option<Client>> {
            Err(down())
        }
        async fn get_projects(&self) -> crate::error::Result<Vec<Project>> {
            Err(down())
        }
        async fn get_project(&self, _: Uuid) -> crate::error::Result<Option<Project>> {
            Err(down())
        }
        async fn create_project(&self, _: &NewProject) -> crate::error::Result<Project> {
            Err(down())
        }
        async fn update_project(
            &self,
            _: Uuid,
            _: &ProjectUpdate,
        ) -> crate::error::Result<Option<Project>> {
            Err(down())
        }
        async fn delete_project(&self, _: Uuid) -> crate::error::Result<Option<Project>> {
            Err(down())
        }
    }

    #[tokio::test]
    async fn test_store_failure_is_opaque_to_caller() {
        let schema = build_schema(Arc::new(FailingStore));

        let response = schema.execute("{ clients { id } }").await;

        assert_eq!(response.errors.len(), 1);
        let error = &response.errors[0];
        assert_eq!(error.message, "internal store error");
        assert!(!error.message.contains("pool"));
        let code = error.extensions.as_ref().and_then(|ext| ext.get("code"));
        assert_eq!(code, Some(&async_graphql::Value::from("STORE_ERROR")));
    }
}
