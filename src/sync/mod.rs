use crate::db::{self, Database};
use crate::errors::Result;
use crate::models::parse_remote_project;
use crate::remote::ProjectSource;

/// Counts gathered while reconciling one page
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FetchReport {
    pub received: usize,
    pub saved: usize,
    pub skipped_invalid: usize,
    pub skipped_existing: usize,
}

/// Pull one page from `source` and insert every project whose id is not stored yet.
///
/// Existing rows are never modified. All inserts share one transaction, so an
/// error anywhere leaves the store untouched.
pub async fn fetch_projects<S: ProjectSource>(
    db: &Database,
    source: &S,
    per_page: u32,
    page: u32,
) -> Result<FetchReport> {
    let items = source.list_projects(per_page, page).await?;

    let mut report = FetchReport {
        received: items.len(),
        ..FetchReport::default()
    };

    let mut tx = db.get_pool().begin().await?;

    for item in &items {
        let Some(remote) = parse_remote_project(item) else {
            tracing::debug!(item = %item, "Skipping project item without an integer id");
            report.skipped_invalid += 1;
            continue;
        };

        if db::project_exists(&mut *tx, remote.id).await? {
            tracing::debug!(id = remote.id, "Project already stored, skipping");
            report.skipped_existing += 1;
            continue;
        }

        db::insert_project(&mut *tx, &remote.into_project()).await?;
        report.saved += 1;
    }

    tx.commit().await?;

    tracing::info!(
        received = report.received,
        skipped_invalid = report.skipped_invalid,
        skipped_existing = report.skipped_existing,
        "Saved {} projects to database.",
        report.saved
    );
    Ok(report)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::db::tests::temp_db;
    use crate::errors::AppError;
    use crate::models::{Project, UNKNOWN_NAME};
    use serde_json::{Value, json};

    /// In-memory listing, paged the way the GitLab API pages
    pub(crate) struct FakeSource {
        pub items: Vec<Value>,
    }

    impl ProjectSource for FakeSource {
        async fn list_projects(&self, per_page: u32, page: u32) -> Result<Vec<Value>> {
            let start = (page.saturating_sub(1) * per_page) as usize;
            Ok(self
                .items
                .iter()
                .skip(start)
                .take(per_page as usize)
                .cloned()
                .collect())
        }
    }

    pub(crate) struct FailingSource;

    impl ProjectSource for FailingSource {
        async fn list_projects(&self, _per_page: u32, _page: u32) -> Result<Vec<Value>> {
            Err(AppError::UnexpectedResponse("connection reset".to_string()))
        }
    }

    fn listing(n: i64) -> FakeSource {
        FakeSource {
            items: (1..=n)
                .map(|id| json!({"id": id, "name": format!("project-{id}"), "description": null}))
                .collect(),
        }
    }

    #[tokio::test]
    async fn saves_every_new_project() {
        let (db, _dir) = temp_db().await;
        let report = fetch_projects(&db, &listing(4), 10, 1).await.unwrap();

        assert_eq!(report.received, 4);
        assert_eq!(report.saved, 4);
        assert_eq!(db.list_projects().await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn second_fetch_of_same_page_saves_nothing() {
        let (db, _dir) = temp_db().await;
        let source = listing(3);

        fetch_projects(&db, &source, 10, 1).await.unwrap();
        let again = fetch_projects(&db, &source, 10, 1).await.unwrap();

        assert_eq!(again.saved, 0);
        assert_eq!(again.skipped_existing, 3);
        assert_eq!(db.list_projects().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn respects_pagination() {
        let (db, _dir) = temp_db().await;
        let report = fetch_projects(&db, &listing(25), 10, 3).await.unwrap();

        assert_eq!(report.saved, 5);
        let ids: Vec<i64> = db.list_projects().await.unwrap().iter().map(|p| p.id).collect();
        assert_eq!(ids, (21..=25).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn skips_malformed_items_without_failing() {
        let (db, _dir) = temp_db().await;
        let source = FakeSource {
            items: vec![
                json!({"id": "abc", "name": "bad"}),
                json!("not an object"),
                json!({"id": "12", "name": "stringly"}),
                json!({"id": 13}),
            ],
        };

        let report = fetch_projects(&db, &source, 10, 1).await.unwrap();
        assert_eq!(report.saved, 2);
        assert_eq!(report.skipped_invalid, 2);

        assert_eq!(
            db.list_projects().await.unwrap(),
            vec![
                Project::new(12, "stringly", None),
                Project::new(13, UNKNOWN_NAME, None),
            ]
        );
    }

    #[tokio::test]
    async fn never_overwrites_existing_rows() {
        let (db, _dir) = temp_db().await;
        db.create_project(&Project::new(1, "local", Some("mine".to_string())))
            .await
            .unwrap();

        let source = FakeSource {
            items: vec![json!({"id": 1, "name": "remote", "description": "theirs"})],
        };
        let report = fetch_projects(&db, &source, 10, 1).await.unwrap();

        assert_eq!(report.skipped_existing, 1);
        let stored = db.get_project(1).await.unwrap().unwrap();
        assert_eq!(stored, Project::new(1, "local", Some("mine".to_string())));
    }

    #[tokio::test]
    async fn duplicate_ids_within_a_page_are_saved_once() {
        let (db, _dir) = temp_db().await;
        let source = FakeSource {
            items: vec![json!({"id": 4, "name": "first"}), json!({"id": 4, "name": "second"})],
        };

        let report = fetch_projects(&db, &source, 10, 1).await.unwrap();
        assert_eq!(report.saved, 1);
        assert_eq!(report.skipped_existing, 1);
        assert_eq!(db.get_project(4).await.unwrap().unwrap().name, "first");
    }

    #[tokio::test]
    async fn report_counts_every_outcome() {
        let (db, _dir) = temp_db().await;
        db.create_project(&Project::new(1, "local", None)).await.unwrap();

        let source = FakeSource {
            items: vec![
                json!({"id": 1, "name": "remote"}),
                json!({"id": 2, "name": ""}),
                json!({"id": 9_223_372_036_854_775_808u64}),
            ],
        };

        let report = fetch_projects(&db, &source, 10, 1).await.unwrap();
        assert_eq!(
            report,
            FetchReport {
                received: 3,
                saved: 1,
                skipped_invalid: 1,
                skipped_existing: 1,
            }
        );
        assert_eq!(db.get_project(2).await.unwrap().unwrap().name, UNKNOWN_NAME);
    }

    #[tokio::test]
    async fn source_failure_writes_nothing() {
        let (db, _dir) = temp_db().await;
        assert!(fetch_projects(&db, &FailingSource, 10, 1).await.is_err());
        assert!(db.list_projects().await.unwrap().is_empty());
    }
}
