//! Database Connection Management
//!
//! This module provides the core database connection and initialization
//! functionality using libsql for the OrgTree node table.
//!
//! # Architecture
//!
//! - **Path-agnostic**: accepts any valid PathBuf
//! - **WAL mode**: Write-Ahead Logging for better concurrency
//! - **Foreign keys**: enabled for referential integrity on `parent_id`
//!
//! # Database Connection Patterns
//!
//! **Always use `connect_with_timeout()` in async functions** to avoid
//! SQLite thread-safety violations when the Tokio runtime moves futures
//! between threads. The 5-second busy timeout allows concurrent operations
//! to wait and retry instead of failing immediately with `SQLITE_BUSY`
//! errors.
//!
//! ```no_run
//! # use orgtree_core::db::DatabaseService;
//! # use std::path::PathBuf;
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! # let db_service = DatabaseService::new(PathBuf::from("./data/orgtree.db")).await?;
//! let conn = db_service.connect_with_timeout().await?;
//! # Ok(())
//! # }
//! ```

use crate::db::error::DatabaseError;
use libsql::{Builder, Database};
use std::path::PathBuf;
use std::sync::Arc;

/// Database service for managing the libsql connection and schema
///
/// # Examples
///
/// ```no_run
/// use orgtree_core::db::DatabaseService;
/// use std::path::PathBuf;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let db_path = PathBuf::from("/path/to/orgtree.db");
///     let db_service = DatabaseService::new(db_path).await?;
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct DatabaseService {
    /// libsql database handle (wrapped in Arc for sharing)
    pub db: Arc<Database>,

    /// Path to the database file
    pub db_path: PathBuf,
}

impl DatabaseService {
    /// Create a new DatabaseService with the specified database path
    ///
    /// This will:
    /// 1. Ensure the parent directory exists (create if needed)
    /// 2. Open/create the database file
    /// 3. Initialize the schema (CREATE TABLE IF NOT EXISTS)
    /// 4. Enable SQLite features (WAL mode, foreign keys)
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if:
    /// - Parent directory cannot be created
    /// - Database connection fails
    /// - Schema initialization fails
    pub async fn new(db_path: PathBuf) -> Result<Self, DatabaseError> {
        // Only checkpoint the WAL for databases created by this call
        let is_new_database = !db_path.exists();

        // Ensure parent directory exists
        if let Some(parent) = db_path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    if e.kind() == std::io::ErrorKind::PermissionDenied {
                        DatabaseError::permission_denied(db_path.clone())
                    } else {
                        DatabaseError::DirectoryCreationFailed(e)
                    }
                })?;
            }
        }

        let db = Builder::new_local(&db_path)
            .build()
            .await
            .map_err(|e| DatabaseError::connection_failed(db_path.clone(), e))?;

        let service = Self {
            db: Arc::new(db),
            db_path,
        };

        service.initialize_schema(is_new_database).await?;

        Ok(service)
    }

    /// Execute a PRAGMA statement
    ///
    /// PRAGMA statements return rows, so we must use query() instead of
    /// execute(). This helper encapsulates that pattern.
    async fn execute_pragma(
        &self,
        conn: &libsql::Connection,
        pragma: &str,
    ) -> Result<(), DatabaseError> {
        let mut stmt = conn.prepare(pragma).await.map_err(|e| {
            DatabaseError::sql_execution(format!("Failed to execute '{}': {}", pragma, e))
        })?;
        let _ = stmt.query(()).await.map_err(|e| {
            DatabaseError::sql_execution(format!("Failed to execute '{}': {}", pragma, e))
        })?;
        Ok(())
    }

    /// Initialize database schema and configuration
    ///
    /// Creates the nodes table and its indexes using CREATE TABLE IF NOT
    /// EXISTS, ensuring idempotent initialization (safe to call multiple
    /// times).
    ///
    /// # Schema
    ///
    /// The `parent_id` foreign key deliberately has no `ON DELETE CASCADE`:
    /// cascading subtree removal is owned by the tree engine, which deletes
    /// children before parents. The plain constraint only guarantees a
    /// `parent_id` always references an existing node.
    async fn initialize_schema(&self, is_new_database: bool) -> Result<(), DatabaseError> {
        let conn = self.connect_with_timeout().await?;

        // Enable WAL mode for better concurrency
        self.execute_pragma(&conn, "PRAGMA journal_mode = WAL")
            .await?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS nodes (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                parent_id TEXT,
                height INTEGER NOT NULL DEFAULT 0,
                managing_department TEXT,
                preferred_programming_language TEXT,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
                modified_at DATETIME DEFAULT CURRENT_TIMESTAMP,
                FOREIGN KEY (parent_id) REFERENCES nodes(id)
            )",
            (),
        )
        .await
        .map_err(|e| {
            DatabaseError::sql_execution(format!("Failed to create nodes table: {}", e))
        })?;

        // Index on parent_id (hierarchy queries)
        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_nodes_parent ON nodes(parent_id)",
            (),
        )
        .await
        .map_err(|e| {
            DatabaseError::sql_execution(format!(
                "Failed to create index 'idx_nodes_parent': {}",
                e
            ))
        })?;

        // Force WAL checkpoint only for newly created databases. This
        // prevents race conditions where rapid database swaps in tests cause
        // "no such table" errors due to WAL entries not being flushed.
        if is_new_database {
            self.execute_pragma(&conn, "PRAGMA wal_checkpoint(TRUNCATE)")
                .await?;
        }

        Ok(())
    }

    /// Get a synchronous connection to the database
    ///
    /// Only use this in synchronous, single-threaded contexts. In async
    /// functions use `connect_with_timeout()` instead.
    pub fn connect(&self) -> Result<libsql::Connection, DatabaseError> {
        self.db.connect().map_err(DatabaseError::LibsqlError)
    }

    /// Get an async connection with busy timeout and foreign keys configured
    ///
    /// This is the safe default for all async code. Sets a 5-second busy
    /// timeout so concurrent operations wait and retry instead of failing
    /// immediately when the database is locked, and enables foreign-key
    /// enforcement (a per-connection setting in SQLite).
    pub async fn connect_with_timeout(&self) -> Result<libsql::Connection, DatabaseError> {
        let conn = self.connect()?;

        self.execute_pragma(&conn, "PRAGMA busy_timeout = 5000")
            .await?;
        self.execute_pragma(&conn, "PRAGMA foreign_keys = ON")
            .await?;

        Ok(conn)
    }
}
