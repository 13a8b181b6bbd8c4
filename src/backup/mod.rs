//! Snapshot backup and restore orchestration.
//!
//! Both orchestrators walk a pre-resolved plan of databases and collections
//! strictly sequentially over one shared connection, re-checking liveness
//! before each unit of work. A failed unit is reported and skipped; the run
//! continues. Partial success is the expected outcome, not an exceptional
//! one.

mod operations;
mod restore;
mod types;

pub use operations::Backup;
pub use restore::Restore;
pub use types::{CollectionChoice, DatabasePlan, RunReport, UnitOutcome, UnitReport};
