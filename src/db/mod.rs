mod memory;

use async_trait::async_trait;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{FromRow, PgPool, Row};
use uuid::Uuid;

use crate::error::Result;
use crate::models::{Client, NewClient, NewProject, Project, ProjectStatus, ProjectUpdate};

pub use memory::MemoryStore;

/// Persistence operations behind the GraphQL resolvers.
///
/// Lookups report absence as `Ok(None)`; errors are reserved for store
/// failures.
#[async_trait]
pub trait Store: Send + Sync {
    async fn get_clients(&self) -> Result<Vec<Client>>;

    async fn get_client(&self, id: Uuid) -> Result<Option<Client>>;

    async fn create_client(&self, client: &NewClient) -> Result<Client>;

    /// Delete a client and every project referencing it, as one unit.
    /// Returns the client as it was before deletion.
    async fn delete_client(&self, id: Uuid) -> Result<Option<Client>>;

    async fn get_projects(&self) -> Result<Vec<Project>>;

    async fn get_project(&self, id: Uuid) -> Result<Option<Project>>;

    async fn create_project(&self, project: &NewProject) -> Result<Project>;

    async fn update_project(&self, id: Uuid, update: &ProjectUpdate) -> Result<Option<Project>>;

    async fn delete_project(&self, id: Uuid) -> Result<Option<Project>>;
}

const CLIENT_COLUMNS: &str = "id, name, email, phone, created_at";
const PROJECT_COLUMNS: &str = "id, client_id, name, description, status, created_at";

/// Read the stored status label back into a [`ProjectStatus`]
fn decode_status(label: &str) -> std::result::Result<ProjectStatus, sqlx::Error> {
    label
        .parse::<ProjectStatus>()
        .map_err(|e| sqlx::Error::Decode(Box::new(e)))
}

impl<'r> FromRow<'r, PgRow> for Project {
    fn from_row(row: &'r PgRow) -> std::result::Result<Self, sqlx::Error> {
        let status = decode_status(row.try_get("status")?)?;

        Ok(Self {
            id: row.try_get("id")?,
            client_id: row.try_get("client_id")?,
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            status,
            created_at: row.try_get("created_at")?,
        })
    }
}

/// PostgreSQL-backed store
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Create a new Database instance with a connection pool
    pub async fn new(database_url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await?;

        Ok(Self { pool })
    }

    /// Get a reference to the connection pool
    pub fn get_pool(&self) -> &PgPool {
        &self.pool
    }

    /// Create or upgrade the `clients` and `projects` tables
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!().run(self.get_pool()).await?;
        Ok(())
    }
}

#[async_trait]
impl Store for Database {
    // Client operations
    async fn get_clients(&self) -> Result<Vec<Client>> {
        let clients = sqlx::query_as::<_, Client>(&format!(
            "SELECT {CLIENT_COLUMNS} FROM clients ORDER BY created_at ASC"
        ))
        .fetch_all(self.get_pool())
        .await?;

        Ok(clients)
    }

    async fn get_client(&self, id: Uuid) -> Result<Option<Client>> {
        let client = sqlx::query_as::<_, Client>(&format!(
            "SELECT {CLIENT_COLUMNS} FROM clients WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.get_pool())
        .await?;

        Ok(client)
    }

    async fn create_client(&self, client: &NewClient) -> Result<Client> {
        let created = sqlx::query_as::<_, Client>(&format!(
            r#"
            INSERT INTO clients (name, email, phone)
            VALUES ($1, $2, $3)
            RETURNING {CLIENT_COLUMNS}
            "#
        ))
        .bind(&client.name)
        .bind(&client.email)
        .bind(&client.phone)
        .fetch_one(self.get_pool())
        .await?;

        Ok(created)
    }

    async fn delete_client(&self, id: Uuid) -> Result<Option<Client>> {
        let mut tx = self.pool.begin().await?;

        // Projects first, so a failure leaves the client and its projects intact
        let removed = sqlx::query("DELETE FROM projects WHERE client_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let client = sqlx::query_as::<_, Client>(&format!(
            "DELETE FROM clients WHERE id = $1 RETURNING {CLIENT_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::debug!(
            client_id = %id,
            projects = removed.rows_affected(),
            found = client.is_some(),
            "deleted client and its projects"
        );

        Ok(client)
    }

    // Project operations
    async fn get_projects(&self) -> Result<Vec<Project>> {
        let projects = sqlx::query_as::<_, Project>(&format!(
            "SELECT {PROJECT_COLUMNS} FROM projects ORDER BY created_at ASC"
        ))
        .fetch_all(self.get_pool())
        .await?;

        Ok(projects)
    }

    async fn get_project(&self, id: Uuid) -> Result<Option<Project>> {
        let project = sqlx::query_as::<_, Project>(&format!(
            "SELECT {PROJECT_COLUMNS} FROM projects WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.get_pool())
        .await?;

        Ok(project)
    }

    async fn create_project(&self, project: &NewProject) -> Result<Project> {
        let created = sqlx::query_as::<_, Project>(&format!(
            r#"
            INSERT INTO projects (client_id, name, description, status)
            VALUES ($1, $2, $3, $4)
            RETURNING {PROJECT_COLUMNS}
            "#
        ))
        .bind(project.client_id)
        .bind(&project.name)
        .bind(&project.description)
        .bind(project.status.label())
        .fetch_one(self.get_pool())
        .await?;

        Ok(created)
    }

    async fn update_project(&self, id: Uuid, update: &ProjectUpdate) -> Result<Option<Project>> {
        let updated = sqlx::query_as::<_, Project>(&format!(
            r#"
            UPDATE projects
            SET name = $1, description = $2, status = COALESCE($3, status)
            WHERE id = $4
            RETURNING {PROJECT_COLUMNS}
            "#
        ))
        .bind(&update.name)
        .bind(&update.description)
        .bind(update.status.map(ProjectStatus::label))
        .bind(id)
        .fetch_optional(self.get_pool())
        .await?;

        Ok(updated)
    }

    async fn delete_project(&self, id: Uuid) -> Result<Option<Project>> {
        let deleted = sqlx::query_as::<_, Project>(&format!(
            "DELETE FROM projects WHERE id = $1 RETURNING {PROJECT_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(self.get_pool())
        .await?;

        Ok(deleted)
    }
}

/// Connect to PostgreSQL and bring the schema up to date
pub async fn init(database_url: &str) -> Result<Database> {
    let db = Database::new(database_url).await?;
    db.migrate().await?;

    Ok(db)
}
