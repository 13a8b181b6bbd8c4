//! Backup orchestration

use super::types::{CollectionChoice, DatabasePlan, RunReport, UnitOutcome};
use crate::codec;
use crate::connection::Connection;
use crate::error::{self, Result};
use crate::project;
use log::{debug, info, warn};
use std::path::{Path, PathBuf};

/// Snapshots selected collections to disk, one JSON array file per
/// collection, isolating per-collection failure.
pub struct Backup<'a, C: Connection> {
    conn: &'a C,
    root: PathBuf,
}

impl<'a, C: Connection> Backup<'a, C> {
    /// Create a backup orchestrator over an existing connection and a target
    /// root directory. The connection's lifetime is owned by the caller.
    pub fn new(conn: &'a C, root: impl Into<PathBuf>) -> Self {
        Self {
            conn,
            root: root.into(),
        }
    }

    /// Run the backup for one project over a pre-resolved plan.
    ///
    /// Creates `root/<project>/<database>/` directories as needed and writes
    /// one `<collection>.json` per collection, overwriting prior files. Every
    /// per-collection failure is folded into a
    /// [`UnitOutcome::Skipped`] entry and the run continues.
    ///
    /// # Errors
    ///
    /// Fails only when the project directory itself cannot be created -
    /// nothing can be written in that case.
    pub fn run(&self, project: &str, plan: &[DatabasePlan]) -> Result<RunReport> {
        info!("Starting backup for project '{project}'");
        let project_dir = project::project_dir(&self.root, project);
        error::create_dir(&project_dir)?;

        let mut report = RunReport::new();

        for db_plan in plan {
            let database = db_plan.database.as_str();
            let collections = match &db_plan.collections {
                CollectionChoice::Named(names) => names.clone(),
                CollectionChoice::All => match self.conn.list_collections(database) {
                    Ok(names) => names,
                    Err(e) => {
                        warn!("Could not list collections of '{database}': {e}");
                        continue;
                    }
                },
            };

            if collections.is_empty() {
                info!("No collections found in database '{database}'");
                continue;
            }

            let db_dir = project_dir.join(database);
            if let Err(e) = error::create_dir(&db_dir) {
                // Nothing from this database can be written
                warn!("Skipping database '{database}': {e}");
                for collection in &collections {
                    report.push(
                        database,
                        collection,
                        UnitOutcome::Skipped {
                            reason: e.to_string(),
                        },
                    );
                }
                continue;
            }

            for collection in &collections {
                let outcome = self.backup_collection(database, collection, &db_dir);
                report.push(database, collection, outcome);
            }
        }

        info!(
            "Backup of '{project}' finished: {} collections written, {} skipped",
            report.completed(),
            report.skipped()
        );
        Ok(report)
    }

    fn backup_collection(&self, database: &str, collection: &str, db_dir: &Path) -> UnitOutcome {
        if let Err(e) = self.conn.ping() {
            warn!("✗ Skipping {database}.{collection}: connection check failed: {e}");
            return UnitOutcome::Skipped {
                reason: format!("connection check failed: {e}"),
            };
        }

        match self.write_snapshot(database, collection, db_dir) {
            Ok(count) => {
                info!("✓ Backed up {count} documents from {database}.{collection}");
                UnitOutcome::Completed { documents: count }
            }
            Err(e) => {
                warn!("✗ Error backing up {database}.{collection}: {e}");
                UnitOutcome::Skipped {
                    reason: e.to_string(),
                }
            }
        }
    }

    fn write_snapshot(&self, database: &str, collection: &str, db_dir: &Path) -> Result<usize> {
        let documents = self.conn.fetch_all(database, collection)?;
        let encoded = codec::encode_documents(&documents);
        let text = serde_json::to_string_pretty(&encoded)?;

        let path = project::collection_file(db_dir, collection);
        error::write_file(&path, text)?;
        debug!("Wrote snapshot {}", path.display());

        // A zero-document collection still produces an empty-array file:
        // evidence it existed and was considered.
        Ok(documents.len())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::MemoryConnection;
    use crate::doc;
    use std::fs;
    use tempfile::tempdir;

    fn seeded_connection() -> MemoryConnection {
        let conn = MemoryConnection::new();
        conn.insert_many(
            "app",
            "users",
            vec![doc! { "name" => "ada" }, doc! { "name" => "grace" }],
        )
        .unwrap();
        conn.create_collection("app", "logs");
        conn
    }

    #[test]
    fn test_backup_writes_one_file_per_collection() {
        let conn = seeded_connection();
        let temp = tempdir().unwrap();

        let report = Backup::new(&conn, temp.path())
            .run("nightly", &[DatabasePlan::all("app")])
            .unwrap();

        assert_eq!(report.completed(), 2);
        assert_eq!(report.total_documents(), 2);
        assert!(temp.path().join("nightly/app/users.json").is_file());
        assert!(temp.path().join("nightly/app/logs.json").is_file());
    }

    #[test]
    fn test_empty_collection_produces_empty_array_file() {
        let conn = seeded_connection();
        let temp = tempdir().unwrap();

        Backup::new(&conn, temp.path())
            .run("nightly", &[DatabasePlan::named("app", vec!["logs".into()])])
            .unwrap();

        let text = fs::read_to_string(temp.path().join("nightly/app/logs.json")).unwrap();
        assert_eq!(text, "[]");
    }

    #[test]
    fn test_rebackup_is_idempotent() {
        let conn = seeded_connection();
        let temp = tempdir().unwrap();
        let backup = Backup::new(&conn, temp.path());
        let plan = [DatabasePlan::all("app")];

        backup.run("nightly", &plan).unwrap();
        let first = fs::read_to_string(temp.path().join("nightly/app/users.json")).unwrap();

        backup.run("nightly", &plan).unwrap();
        let second = fs::read_to_string(temp.path().join("nightly/app/users.json")).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_failing_collection_does_not_abort_run() {
        let conn = MemoryConnection::new();
        conn.insert_many("app", "first", vec![doc! { "n" => 1 }]).unwrap();
        conn.insert_many("app", "second", vec![doc! { "n" => 2 }]).unwrap();
        conn.insert_many("app", "third", vec![doc! { "n" => 3 }]).unwrap();
        conn.fail_collection("app", "second");

        let temp = tempdir().unwrap();
        let report = Backup::new(&conn, temp.path())
            .run(
                "run1",
                &[DatabasePlan::named(
                    "app",
                    vec!["first".into(), "second".into(), "third".into()],
                )],
            )
            .unwrap();

        assert_eq!(report.completed(), 2);
        assert_eq!(report.skipped(), 1);
        assert!(temp.path().join("run1/app/first.json").is_file());
        assert!(!temp.path().join("run1/app/second.json").exists());
        assert!(temp.path().join("run1/app/third.json").is_file());

        let skipped = &report.units[1];
        assert_eq!(skipped.collection, "second");
        assert!(matches!(skipped.outcome, UnitOutcome::Skipped { .. }));
    }

    #[test]
    fn test_offline_connection_skips_with_reason() {
        let conn = seeded_connection();
        conn.set_online(false);
        let temp = tempdir().unwrap();

        let report = Backup::new(&conn, temp.path())
            .run("nightly", &[DatabasePlan::named("app", vec!["users".into()])])
            .unwrap();

        assert_eq!(report.completed(), 0);
        assert!(matches!(
            report.units[0].outcome,
            UnitOutcome::Skipped { ref reason } if reason.contains("connection check failed")
        ));
        assert!(!temp.path().join("nightly/app/users.json").exists());
    }
}
