//! Plan and report types shared by backup and restore

use chrono::{DateTime, Utc};
use serde::Serialize;

/// One database to process, with its collection choice.
///
/// Plans are built by the prompt layer from resolved
/// [`Selection`](crate::Selection)s. When the user answered `all` at the
/// database level, the collection prompt is skipped entirely and every
/// database gets [`CollectionChoice::All`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatabasePlan {
    pub database: String,
    pub collections: CollectionChoice,
}

impl DatabasePlan {
    /// Every collection of the database, resolved at run time from the
    /// connection (backup) or the stored snapshot files (restore).
    pub fn all(database: impl Into<String>) -> Self {
        Self {
            database: database.into(),
            collections: CollectionChoice::All,
        }
    }

    /// An explicit collection selection, processed in the given order.
    pub fn named(database: impl Into<String>, collections: Vec<String>) -> Self {
        Self {
            database: database.into(),
            collections: CollectionChoice::Named(collections),
        }
    }
}

/// Which collections of a database to process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CollectionChoice {
    /// Inherited "all": no per-database prompt happened.
    All,
    Named(Vec<String>),
}

/// Outcome of one per-collection unit of work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum UnitOutcome {
    /// The transfer ran to completion with this many documents.
    Completed { documents: usize },
    /// The unit was skipped; the run continued.
    Skipped { reason: String },
}

/// Report for one collection, identified by database and collection name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnitReport {
    pub database: String,
    pub collection: String,
    pub outcome: UnitOutcome,
}

/// Aggregate report of one backup or restore run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub started_at: DateTime<Utc>,
    pub units: Vec<UnitReport>,
}

impl RunReport {
    pub(crate) fn new() -> Self {
        Self {
            started_at: Utc::now(),
            units: Vec::new(),
        }
    }

    pub(crate) fn push(
        &mut self,
        database: impl Into<String>,
        collection: impl Into<String>,
        outcome: UnitOutcome,
    ) {
        self.units.push(UnitReport {
            database: database.into(),
            collection: collection.into(),
            outcome,
        });
    }

    /// Number of units that ran to completion.
    #[must_use]
    pub fn completed(&self) -> usize {
        self.units
            .iter()
            .filter(|u| matches!(u.outcome, UnitOutcome::Completed { .. }))
            .count()
    }

    /// Number of units skipped with a reason.
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.units.len() - self.completed()
    }

    /// Total documents transferred across completed units.
    #[must_use]
    pub fn total_documents(&self) -> usize {
        self.units
            .iter()
            .filter_map(|u| match u.outcome {
                UnitOutcome::Completed { documents } => Some(documents),
                UnitOutcome::Skipped { .. } => None,
            })
            .sum()
    }

    /// True if at least one unit ran to completion.
    #[must_use]
    pub fn any_completed(&self) -> bool {
        self.completed() > 0
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_counters() {
        let mut report = RunReport::new();
        report.push("app", "users", UnitOutcome::Completed { documents: 2 });
        report.push("app", "logs", UnitOutcome::Completed { documents: 0 });
        report.push("app", "bad", UnitOutcome::Skipped { reason: "boom".into() });

        assert_eq!(report.completed(), 2);
        assert_eq!(report.skipped(), 1);
        assert_eq!(report.total_documents(), 2);
        assert!(report.any_completed());
    }

    #[test]
    fn test_report_serializes_with_status_tag() {
        let mut report = RunReport::new();
        report.push("app", "users", UnitOutcome::Completed { documents: 1 });

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["units"][0]["outcome"]["status"], "completed");
        assert_eq!(json["units"][0]["outcome"]["documents"], 1);
    }

    #[test]
    fn test_plan_constructors() {
        assert_eq!(
            DatabasePlan::all("app"),
            DatabasePlan {
                database: "app".into(),
                collections: CollectionChoice::All
            }
        );
        assert_eq!(
            DatabasePlan::named("app", vec!["users".into()]),
            DatabasePlan {
                database: "app".into(),
                collections: CollectionChoice::Named(vec!["users".into()])
            }
        );
    }
}
