use std::fmt;
use std::str::FromStr;

use async_graphql::Enum;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Progress of a project.
///
/// On the wire the GraphQL value names are `new`, `progress` and
/// `completed`; the human-readable label is what gets stored and what
/// `Project.status` reports.
#[derive(Enum, Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[graphql(name = "ProjectStatus")]
pub enum ProjectStatus {
    #[default]
    #[graphql(name = "new")]
    #[serde(rename = "new")]
    NotStarted,
    #[graphql(name = "progress")]
    #[serde(rename = "progress")]
    InProgress,
    #[graphql(name = "completed")]
    #[serde(rename = "completed")]
    Completed,
}

impl ProjectStatus {
    pub const ALL: [ProjectStatus; 3] = [
        ProjectStatus::NotStarted,
        ProjectStatus::InProgress,
        ProjectStatus::Completed,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ProjectStatus::NotStarted => "Not Started",
            ProjectStatus::InProgress => "In Progress",
            ProjectStatus::Completed => "Completed",
        }
    }

    pub fn next(self) -> Self {
        match self {
            ProjectStatus::NotStarted => ProjectStatus::InProgress,
            ProjectStatus::InProgress => ProjectStatus::Completed,
            ProjectStatus::Completed => ProjectStatus::NotStarted,
        }
    }

    pub fn previous(self) -> Self {
        match self {
            ProjectStatus::NotStarted => ProjectStatus::Completed,
            ProjectStatus::InProgress => ProjectStatus::NotStarted,
            ProjectStatus::Completed => ProjectStatus::InProgress,
        }
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Status argument of `updateProject`.
///
/// A distinct GraphQL type with the same values as [`ProjectStatus`].
#[derive(Enum, Debug, Clone, Copy, PartialEq, Eq)]
#[graphql(name = "ProjectStatusUpdate")]
pub enum ProjectStatusUpdate {
    #[graphql(name = "new")]
    NotStarted,
    #[graphql(name = "progress")]
    InProgress,
    #[graphql(name = "completed")]
    Completed,
}

impl From<ProjectStatusUpdate> for ProjectStatus {
    fn from(status: ProjectStatusUpdate) -> Self {
        match status {
            ProjectStatusUpdate::NotStarted => ProjectStatus::NotStarted,
            ProjectStatusUpdate::InProgress => ProjectStatus::InProgress,
            ProjectStatusUpdate::Completed => ProjectStatus::Completed,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown project status: {0:?}")]
pub struct UnknownStatus(pub String);

impl FromStr for ProjectStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ProjectStatus::ALL
            .into_iter()
            .find(|status| status.label() == s)
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    pub id: Uuid,
    pub client_id: Uuid,
    pub name: String,
    pub description: String,
    pub status: ProjectStatus,
    pub created_at: DateTime<Utc>,
}

/// Fields accepted by `addProject`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProject {
    pub name: String,
    pub description: String,
    pub status: ProjectStatus,
    pub client_id: Uuid,
}

/// Fields accepted by `updateProject`; `status` is left alone when `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectUpdate {
    pub name: String,
    pub description: String,
    pub status: Option<ProjectStatus>,
}

impl ProjectUpdate {
    pub fn apply(&self, project: &mut Project) {
        project.name = self.name.clone();
        project.description = self.description.clone();
        if let Some(status) = self.status {
            project.status = status;
        }
    }
}
