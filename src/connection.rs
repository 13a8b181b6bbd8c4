//! Database connection seam.
//!
//! The orchestrators never open a connection themselves: the caller owns the
//! handle's lifetime and passes it in, which keeps acquisition/release scoped
//! and deterministic. Every operation on the trait is fallible; the
//! orchestrators treat each call as a suspension point that may find the
//! connection gone.

use crate::error::{Error, Result};
use crate::sync::RwLockExt;
use crate::value::Document;
use indexmap::IndexMap;
use std::collections::HashSet;
use std::sync::RwLock;

/// A live handle to a document database.
///
/// Implement this for a real driver; [`MemoryConnection`] is the shipped
/// in-process implementation used in tests and examples.
pub trait Connection {
    /// Cheap liveness round-trip, used before every per-collection transfer
    /// to detect a dropped connection early.
    fn ping(&self) -> Result<()>;

    /// Names of all databases, in the order the server returns them.
    fn list_databases(&self) -> Result<Vec<String>>;

    /// Names of all collections in a database, in server return order.
    fn list_collections(&self, database: &str) -> Result<Vec<String>>;

    /// Every document of a collection, in the database's natural return
    /// order. A missing collection yields an empty sequence.
    fn fetch_all(&self, database: &str, collection: &str) -> Result<Vec<Document>>;

    /// Delete all documents of a collection, returning the removed count.
    fn delete_all(&self, database: &str, collection: &str) -> Result<u64>;

    /// Insert a batch of documents, creating the collection if needed.
    fn insert_many(&self, database: &str, collection: &str, documents: Vec<Document>)
    -> Result<()>;
}

// =============================================================================
// In-Memory Connection
// =============================================================================

#[derive(Default)]
struct MemoryState {
    // IndexMap keeps listing order stable (creation order, like a server
    // returning namespaces in catalog order).
    databases: IndexMap<String, IndexMap<String, Vec<Document>>>,
    online: bool,
    failing: HashSet<(String, String)>,
}

/// In-memory document store implementing [`Connection`] (not persisted).
///
/// Besides plain storage it can simulate the failure modes the orchestrators
/// must isolate: [`set_online`](MemoryConnection::set_online) makes the
/// liveness check fail, and
/// [`fail_collection`](MemoryConnection::fail_collection) makes transfers
/// against one collection error out.
pub struct MemoryConnection {
    state: RwLock<MemoryState>,
}

impl MemoryConnection {
    /// Create a new, empty, online connection.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: RwLock::new(MemoryState {
                online: true,
                ..MemoryState::default()
            }),
        }
    }

    /// Create an empty collection so it shows up in listings.
    pub fn create_collection(&self, database: &str, collection: &str) {
        let mut state = self.state.write_recovered();
        state
            .databases
            .entry(database.to_string())
            .or_default()
            .entry(collection.to_string())
            .or_default();
    }

    /// Toggle connectivity. While offline, every operation fails with
    /// [`Error::ConnectionUnavailable`].
    pub fn set_online(&self, online: bool) {
        self.state.write_recovered().online = online;
    }

    /// Make every fetch and insert against one collection fail.
    pub fn fail_collection(&self, database: &str, collection: &str) {
        self.state
            .write_recovered()
            .failing
            .insert((database.to_string(), collection.to_string()));
    }

    fn check(&self, state: &MemoryState) -> Result<()> {
        if state.online {
            Ok(())
        } else {
            Err(Error::ConnectionUnavailable("connection is offline".to_string()))
        }
    }

    fn check_failing(state: &MemoryState, database: &str, collection: &str) -> Result<()> {
        if state
            .failing
            .contains(&(database.to_string(), collection.to_string()))
        {
            Err(Error::Connection(format!(
                "simulated failure for {database}.{collection}"
            )))
        } else {
            Ok(())
        }
    }
}

impl Default for MemoryConnection {
    fn default() -> Self {
        Self::new()
    }
}

impl Connection for MemoryConnection {
    fn ping(&self) -> Result<()> {
        let state = self.state.read_recovered();
        self.check(&state)
    }

    fn list_databases(&self) -> Result<Vec<String>> {
        let state = self.state.read_recovered();
        self.check(&state)?;
        Ok(state.databases.keys().cloned().collect())
    }

    fn list_collections(&self, database: &str) -> Result<Vec<String>> {
        let state = self.state.read_recovered();
        self.check(&state)?;
        Ok(state
            .databases
            .get(database)
            .map(|db| db.keys().cloned().collect())
            .unwrap_or_default())
    }

    fn fetch_all(&self, database: &str, collection: &str) -> Result<Vec<Document>> {
        let state = self.state.read_recovered();
        self.check(&state)?;
        Self::check_failing(&state, database, collection)?;
        Ok(state
            .databases
            .get(database)
            .and_then(|db| db.get(collection))
            .cloned()
            .unwrap_or_default())
    }

    fn delete_all(&self, database: &str, collection: &str) -> Result<u64> {
        let mut state = self.state.write_recovered();
        self.check(&state)?;
        let removed = state
            .databases
            .get_mut(database)
            .and_then(|db| db.get_mut(collection))
            .map(|docs| {
                let n = docs.len();
                docs.clear();
                n
            })
            .unwrap_or(0);
        Ok(removed as u64)
    }

    fn insert_many(
        &self,
        database: &str,
        collection: &str,
        documents: Vec<Document>,
    ) -> Result<()> {
        let mut state = self.state.write_recovered();
        self.check(&state)?;
        Self::check_failing(&state, database, collection)?;
        state
            .databases
            .entry(database.to_string())
            .or_default()
            .entry(collection.to_string())
            .or_default()
            .extend(documents);
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================
