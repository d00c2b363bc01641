use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Executor, Sqlite, SqlitePool};

use crate::errors::{AppError, Result};
use crate::models::Project;

const CREATE_PROJECTS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS projects (
        id INTEGER PRIMARY KEY,
        name TEXT NOT NULL,
        description TEXT
    )
"#;

/// Handle to the local project store
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open the store at `url`, creating the file and the `projects` table if absent
    pub async fn open(url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);

        // Commands run one after another, a single connection is all we need
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;

        let db = Self { pool };
        db.ensure_schema().await?;

        tracing::debug!(url, "Database opened");
        Ok(db)
    }

    /// Get a reference to the connection pool
    pub fn get_pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn ensure_schema(&self) -> Result<()> {
        sqlx::query(CREATE_PROJECTS_TABLE)
            .execute(self.get_pool())
            .await?;

        Ok(())
    }

    /// Close the underlying connection, waiting for it to be released
    pub async fn close(self) {
        self.pool.close().await;
    }

    pub async fn list_projects(&self) -> Result<Vec<Project>> {
        let projects = sqlx::query_as::<_, Project>(
            "SELECT id, name, description FROM projects ORDER BY id ASC",
        )
        .fetch_all(self.get_pool())
        .await?;

        Ok(projects)
    }

    #[cfg(test)]
    pub async fn get_project(&self, id: i64) -> Result<Option<Project>> {
        find_project(self.get_pool(), id).await
    }

    pub async fn create_project(&self, project: &Project) -> Result<()> {
        insert_project(self.get_pool(), project).await
    }

    /// Replace the description of project `id`, returning the updated row
    pub async fn update_description(
        &self,
        id: i64,
        description: &str,
    ) -> Result<Option<Project>> {
        let mut tx = self.pool.begin().await?;

        let Some(mut project) = find_project(&mut *tx, id).await? else {
            return Ok(None);
        };

        sqlx::query("UPDATE projects SET description = ?1 WHERE id = ?2")
            .bind(description)
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        project.description = Some(description.to_string());
        Ok(Some(project))
    }

    /// Delete project `id`, returning the removed row
    pub async fn delete_project(&self, id: i64) -> Result<Option<Project>> {
        let mut tx = self.pool.begin().await?;

        let Some(project) = find_project(&mut *tx, id).await? else {
            return Ok(None);
        };

        sqlx::query("DELETE FROM projects WHERE id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(Some(project))
    }
}

pub async fn find_project<'e, E>(executor: E, id: i64) -> Result<Option<Project>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let project = sqlx::query_as::<_, Project>(
        "SELECT id, name, description FROM projects WHERE id = ?1",
    )
    .bind(id)
    .fetch_optional(executor)
    .await?;

    Ok(project)
}

pub async fn project_exists<'e, E>(executor: E, id: i64) -> Result<bool>
where
    E: Executor<'e, Database = Sqlite>,
{
    let found: Option<i64> = sqlx::query_scalar("SELECT id FROM projects WHERE id = ?1")
        .bind(id)
        .fetch_optional(executor)
        .await?;

    Ok(found.is_some())
}

/// Insert a project, mapping a primary key collision to `DuplicateProject`
pub async fn insert_project<'e, E>(executor: E, project: &Project) -> Result<()>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query("INSERT INTO projects (id, name, description) VALUES (?1, ?2, ?3)")
        .bind(project.id)
        .bind(&project.name)
        .bind(&project.description)
        .execute(executor)
        .await;

    match result {
        Ok(_) => Ok(()),
        Err(sqlx::Error::Database(err)) if err.is_unique_violation() => {
            Err(AppError::DuplicateProject(project.id))
        }
        Err(err) => Err(err.into()),
    }
}

/// Initialize the database handle
pub async fn init(config: &crate::config::Config) -> Result<Database> {
    Database::open(config.database_url()).await
}
