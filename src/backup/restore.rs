//! Restore orchestration

use super::types::{CollectionChoice, DatabasePlan, RunReport, UnitOutcome};
use crate::codec;
use crate::connection::Connection;
use crate::error::{self, Error, Result};
use crate::project;
use log::{debug, info, warn};
use std::path::{Path, PathBuf};

/// Replays stored snapshots into the database, isolating per-collection
/// failure.
pub struct Restore<'a, C: Connection> {
    conn: &'a C,
    root: PathBuf,
}

impl<'a, C: Connection> Restore<'a, C> {
    /// Create a restore orchestrator over an existing connection and the
    /// backup root directory.
    pub fn new(conn: &'a C, root: impl Into<PathBuf>) -> Self {
        Self {
            conn,
            root: root.into(),
        }
    }

    /// Run the restore for one stored project over a pre-resolved plan.
    ///
    /// Non-empty snapshots replace the live collection wholesale (delete all,
    /// then insert). An empty snapshot file is treated as "nothing to
    /// restore", not as "clear this collection": the live collection is left
    /// untouched. Per-collection failures become
    /// [`UnitOutcome::Skipped`] entries and the run continues.
    ///
    /// # Errors
    ///
    /// Fails only when the project directory does not exist.
    pub fn run(&self, project: &str, plan: &[DatabasePlan]) -> Result<RunReport> {
        let project_dir = project::project_dir(&self.root, project);
        if !project_dir.is_dir() {
            return Err(Error::ProjectNotFound(project.to_string()));
        }
        info!("Restoring project '{project}'");

        let mut report = RunReport::new();

        for db_plan in plan {
            let database = db_plan.database.as_str();
            let collections = match &db_plan.collections {
                CollectionChoice::Named(names) => names.clone(),
                CollectionChoice::All => {
                    match project::list_collections(&self.root, project, database) {
                        Ok(names) => names,
                        Err(e) => {
                            warn!("Could not list snapshots of '{database}': {e}");
                            continue;
                        }
                    }
                }
            };

            if collections.is_empty() {
                info!("No collections found in database '{database}'");
                continue;
            }

            let db_dir = project_dir.join(database);
            for collection in &collections {
                let outcome = self.restore_collection(database, collection, &db_dir);
                report.push(database, collection, outcome);
            }
        }

        if report.any_completed() {
            info!(
                "Restore of '{project}' finished: {} collections restored, {} skipped",
                report.completed(),
                report.skipped()
            );
        } else {
            info!("No collections found to restore");
        }
        Ok(report)
    }

    fn restore_collection(&self, database: &str, collection: &str, db_dir: &Path) -> UnitOutcome {
        if let Err(e) = self.conn.ping() {
            warn!("✗ Connection lost before restoring {database}.{collection}: {e}");
            return UnitOutcome::Skipped {
                reason: format!("connection check failed: {e}"),
            };
        }

        match self.replay_snapshot(database, collection, db_dir) {
            Ok(count) => {
                info!("✓ Restored {count} documents to {database}.{collection}");
                UnitOutcome::Completed { documents: count }
            }
            Err(e) => {
                warn!("✗ Error restoring {database}.{collection}: {e}");
                UnitOutcome::Skipped {
                    reason: e.to_string(),
                }
            }
        }
    }

    fn replay_snapshot(&self, database: &str, collection: &str, db_dir: &Path) -> Result<usize> {
        let path = project::collection_file(db_dir, collection);
        let text = error::read_file(&path)?;
        let json: serde_json::Value = serde_json::from_str(&text)?;

        let Some(elements) = json.as_array() else {
            return Err(Error::MalformedSnapshotFile { path });
        };
        let documents = codec::decode_documents(elements)?;

        if documents.is_empty() {
            debug!("Empty snapshot for {database}.{collection}, leaving collection untouched");
            return Ok(0);
        }

        let count = documents.len();
        self.conn.delete_all(database, collection)?;
        self.conn.insert_many(database, collection, documents)?;
        Ok(count)
    }
}

// =============================================================================
// Tests
// =============================================================================
