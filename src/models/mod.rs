mod client;
mod project;

pub use client::{Client, NewClient};
pub use project::{NewProject, Project, ProjectStatus, ProjectStatusUpdate, ProjectUpdate};
