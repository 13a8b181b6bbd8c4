//! # mongovault
//!
//! Selective MongoDB backup and restore with type-preserving extended JSON
//! snapshots.
//!
//! Collections are dumped one at a time to a directory tree of
//! pretty-printed JSON files (`<root>/<project>/<database>/<collection>.json`)
//! and replayed back later. Database-native scalar types that plain JSON
//! cannot express - ObjectId, Date, Decimal128, Int32, Int64, Double, and
//! logical Timestamp - survive the round trip through `$`-tagged wrapper
//! objects.
//!
//! ## Features
//!
//! - **Extended JSON codec**: lossless round trip for the seven tagged
//!   scalar types, order-preserving for documents and arrays
//! - **Selection resolution**: one free-form answer ("3", "alpha,beta",
//!   "all") against an ordered candidate listing
//! - **Failure isolation**: each collection is a unit of work behind its own
//!   liveness check; a dropped connection mid-run skips the unit and the run
//!   continues
//! - **Driver-agnostic**: orchestrators work over the [`Connection`] trait;
//!   [`MemoryConnection`] ships for tests and embedding
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use mongovault::backup::{Backup, DatabasePlan, Restore};
//! use mongovault::{doc, MemoryConnection, Connection};
//!
//! # fn main() -> mongovault::Result<()> {
//! let conn = MemoryConnection::new();
//! conn.insert_many("app", "users", vec![doc! { "name" => "ada" }])?;
//!
//! // Snapshot every collection of "app" under backups/nightly/
//! let report = Backup::new(&conn, "backups").run("nightly", &[DatabasePlan::all("app")])?;
//! println!("{} collections written", report.completed());
//!
//! // Replay the stored project
//! let report = Restore::new(&conn, "backups").run("nightly", &[DatabasePlan::all("app")])?;
//! println!("{} documents restored", report.total_documents());
//! # Ok(())
//! # }
//! ```
//!
//! ## Resolving user selections
//!
//! The interactive prompt loop lives outside this crate; it feeds raw answer
//! text to [`resolve`] and re-asks while the result is `None`:
//!
//! ```rust
//! use mongovault::resolve;
//!
//! let candidates = vec!["users".to_string(), "logs".to_string()];
//! let selection = resolve("2,users", &candidates).unwrap();
//! assert_eq!(selection.names(), ["logs", "users"]);
//!
//! // "all" at the database level short-circuits the collection prompt:
//! assert!(resolve("all", &candidates).unwrap().all_selected());
//! ```

// Core modules
mod connection;
mod error;
mod select;
mod sync;
mod value;

pub mod backup;
pub mod codec;
pub mod project;

// Re-exports from core
pub use connection::{Connection, MemoryConnection};
pub use error::{Error, Result};
pub use select::{resolve, Selection};
pub use value::{Document, ObjectId, Value};

// Orchestration re-exports
pub use backup::{Backup, CollectionChoice, DatabasePlan, Restore, RunReport, UnitOutcome, UnitReport};
