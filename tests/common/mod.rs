//! Shared test fixtures for integration tests

use chrono::DateTime;
use mongovault::{doc, Connection, Document, MemoryConnection, ObjectId, Value};
use tempfile::TempDir;

/// An in-memory connection plus a temporary backup root.
pub struct TestFixture {
    pub conn: MemoryConnection,
    pub root: TempDir,
}

impl TestFixture {
    pub fn new() -> Self {
        let _ = env_logger::builder().is_test(true).try_init();
        Self {
            conn: MemoryConnection::new(),
            root: TempDir::new().unwrap(),
        }
    }

    /// A database `app` with `users` (two documents carrying an identifier
    /// and a date) and an empty `logs` collection.
    pub fn seeded() -> Self {
        let fixture = Self::new();
        fixture
            .conn
            .insert_many("app", "users", user_documents())
            .unwrap();
        fixture.conn.create_collection("app", "logs");
        fixture
    }
}

pub fn user_documents() -> Vec<Document> {
    vec![
        doc! {
            "_id" => ObjectId::parse("507f1f77bcf86cd799439011").unwrap(),
            "name" => "ada",
            "joined" => DateTime::from_timestamp_millis(1_700_000_000_123).unwrap(),
        },
        doc! {
            "_id" => ObjectId::parse("507f191e810c19729de860ea").unwrap(),
            "name" => "grace",
            "balance" => Value::Decimal128("42.0000000001".to_string()),
        },
    ]
}
