//! One function per CLI operation.
//!
//! Every command logs its own failures and returns an [`Outcome`] instead of
//! an error, so a failed operation never changes the process exit code.

use std::io::Write;

use crate::db::Database;
use crate::models::Project;
use crate::remote::ProjectSource;
use crate::sync::{self, FetchReport};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Applied,
    NotFound,
    Failed,
}

pub async fn fetch<S: ProjectSource>(
    db: &Database,
    source: &S,
    per_page: u32,
    page: u32,
) -> Option<FetchReport> {
    match sync::fetch_projects(db, source, per_page, page).await {
        Ok(report) => Some(report),
        Err(err) => {
            tracing::error!("Error fetching projects: {err}");
            None
        }
    }
}

pub async fn list<W: Write>(db: &Database, out: &mut W) -> Outcome {
    let projects = match db.list_projects().await {
        Ok(projects) => projects,
        Err(err) => {
            tracing::error!("Error listing projects: {err}");
            return Outcome::Failed;
        }
    };

    let written = if projects.is_empty() {
        writeln!(out, "No projects found in database.")
    } else {
        projects.iter().try_for_each(|p| writeln!(out, "{p}"))
    };

    match written {
        Ok(()) => Outcome::Applied,
        Err(err) => {
            tracing::error!("Error writing project list: {err}");
            Outcome::Failed
        }
    }
}

pub async fn add(db: &Database, id: i64, name: &str, description: Option<String>) -> Outcome {
    let project = Project::new(id, name, description);

    match db.create_project(&project).await {
        Ok(()) => {
            tracing::info!("Added project [{id}] {name}");
            Outcome::Applied
        }
        Err(err) => {
            tracing::error!("Failed to add project: {err}");
            Outcome::Failed
        }
    }
}

pub async fn update(db: &Database, id: i64, description: &str) -> Outcome {
    match db.update_description(id, description).await {
        Ok(Some(project)) => {
            tracing::info!("Updated project [{id}] {} with new description.", project.name);
            Outcome::Applied
        }
        Ok(None) => {
            tracing::warn!("No project found with ID {id}");
            Outcome::NotFound
        }
        Err(err) => {
            tracing::error!("Failed to update project: {err}");
            Outcome::Failed
        }
    }
}

pub async fn delete(db: &Database, id: i64) -> Outcome {
    match db.delete_project(id).await {
        Ok(Some(project)) => {
            tracing::info!("Deleted project [{id}] {}", project.name);
            Outcome::Applied
        }
        Ok(None) => {
            tracing::warn!("No project found with ID {id}");
            Outcome::NotFound
        }
        Err(err) => {
            tracing::error!("Failed to delete project: {err}");
            Outcome::Failed
        }
    }
}
