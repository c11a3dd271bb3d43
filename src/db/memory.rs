use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::Store;
use crate::error::Result;
use crate::models::{Client, NewClient, NewProject, Project, ProjectUpdate};

#[derive(Default)]
struct Collections {
    clients: Vec<Client>,
    projects: Vec<Project>,
}

/// In-process store keeping records in insertion order.
///
/// Every operation runs under a single lock, so the client cascade delete is
/// atomic here just as it is inside a PostgreSQL transaction.
#[derive(Default)]
pub struct MemoryStore {
    collections: RwLock<Collections>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn get_clients(&self) -> Result<Vec<Client>> {
        Ok(self.collections.read().await.clients.clone())
    }

    async fn get_client(&self, id: Uuid) -> Result<Option<Client>> {
        let collections = self.collections.read().await;
        Ok(collections.clients.iter().find(|c| c.id == id).cloned())
    }

    async fn create_client(&self, client: &NewClient) -> Result<Client> {
        let created = Client {
            id: Uuid::new_v4(),
            name: client.name.clone(),
            email: client.email.clone(),
            phone: client.phone.clone(),
            created_at: Utc::now(),
        };
        self.collections.write().await.clients.push(created.clone());

        Ok(created)
    }

    async fn delete_client(&self, id: Uuid) -> Result<Option<Client>> {
        let mut collections = self.collections.write().await;

        let before = collections.projects.len();
        collections.projects.retain(|p| p.client_id != id);
        let removed = before - collections.projects.len();

        let client = collections
            .clients
            .iter()
            .position(|c| c.id == id)
            .map(|index| collections.clients.remove(index));

        tracing::debug!(
            client_id = %id,
            projects = removed,
            found = client.is_some(),
            "deleted client and its projects"
        );

        Ok(client)
    }

    async fn get_projects(&self) -> Result<Vec<Project>> {
        Ok(self.collections.read().await.projects.clone())
    }

    async fn get_project(&self, id: Uuid) -> Result<Option<Project>> {
        let collections = self.collections.read().await;
        Ok(collections.projects.iter().find(|p| p.id == id).cloned())
    }

    async fn create_project(&self, project: &NewProject) -> Result<Project> {
        let created = Project {
            id: Uuid::new_v4(),
            client_id: project.client_id,
            name: project.name.clone(),
            description: project.description.clone(),
            status: project.status,
            created_at: Utc::now(),
        };
        self.collections.write().await.projects.push(created.clone());

        Ok(created)
    }

    async fn update_project(&self, id: Uuid, update: &ProjectUpdate) -> Result<Option<Project>> {
        let mut collections = self.collections.write().await;
        let updated = collections
            .projects
            .iter_mut()
            .find(|p| p.id == id)
            .map(|project| {
                update.apply(project);
                project.clone()
            });

        Ok(updated)
    }

    async fn delete_project(&self, id: Uuid) -> Result<Option<Project>> {
        let mut collections = self.collections.write().await;
        let deleted = collections
            .projects
            .iter()
            .position(|p| p.id == id)
            .map(|index| collections.projects.remove(index));

        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ProjectStatus;

    fn new_client(name: &str) -> NewClient {
        NewClient {
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            phone: "555-0000".to_string(),
        }
    }

    fn new_project(name: &str, client_id: Uuid) -> NewProject {
        NewProject {
            name: name.to_string(),
            description: format!("{name} description"),
            status: ProjectStatus::InProgress,
            client_id,
        }
    }

    #[tokio::test]
    async fn test_lists_keep_insertion_order() {
        let store = MemoryStore::new();
        let first = store.create_client(&new_client("First")).await.unwrap();
        let second = store.create_client(&new_client("Second")).await.unwrap();

        let clients = store.get_clients().await.unwrap();
        assert_eq!(clients, vec![first, second]);
    }

    #[tokio::test]
    async fn test_delete_client_only_removes_its_projects() {
        let store = MemoryStore::new();
        let acme = store.create_client(&new_client("Acme")).await.unwrap();
        let globex = store.create_client(&new_client("Globex")).await.unwrap();
        store.create_project(&new_project("A1", acme.id)).await.unwrap();
        store.create_project(&new_project("A2", acme.id)).await.unwrap();
        let kept = store.create_project(&new_project("G1", globex.id)).await.unwrap();

        let deleted = store.delete_client(acme.id).await.unwrap();

        assert_eq!(deleted.map(|c| c.id), Some(acme.id));
        assert_eq!(store.get_projects().await.unwrap(), vec![kept]);
        assert_eq!(store.get_clients().await.unwrap(), vec![globex]);
    }

    #[tokio::test]
    async fn test_delete_unknown_client_still_clears_dangling_projects() {
        let store = MemoryStore::new();
        let ghost = Uuid::new_v4();
        store.create_project(&new_project("Orphan", ghost)).await.unwrap();

        assert!(store.delete_client(ghost).await.unwrap().is_none());
        assert!(store.get_projects().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_missing_project_changes_nothing() {
        let store = MemoryStore::new();
        let client = store.create_client(&new_client("Acme")).await.unwrap();
        let project = store.create_project(&new_project("Site", client.id)).await.unwrap();

        let result = store
            .update_project(
                Uuid::new_v4(),
                &ProjectUpdate {
                    name: "Changed".to_string(),
                    description: "Changed".to_string(),
                    status: Some(ProjectStatus::Completed),
                },
            )
            .await
            .unwrap();

        assert!(result.is_none());
        assert_eq!(store.get_projects().await.unwrap(), vec![project]);
    }

    #[tokio::test]
    async fn test_delete_project_returns_pre_image() {
        let store = MemoryStore::new();
        let client = store.create_client(&new_client("Acme")).await.unwrap();
        let project = store.create_project(&new_project("Site", client.id)).await.unwrap();

        let deleted = store.delete_project(project.id).await.unwrap();

        assert_eq!(deleted, Some(project));
        assert!(store.get_projects().await.unwrap().is_empty());
    }
}
