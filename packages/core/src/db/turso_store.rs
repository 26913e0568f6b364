//! TursoStore - NodeStore Implementation for the libsql Backend
//!
//! This module implements the store traits for the embedded libsql
//! database.
//!
//! # Architecture
//!
//! The SQL for each record operation lives in connection-scoped helpers
//! shared by two front-ends:
//!
//! - [`TursoStore`] opens a fresh connection per call (autocommit)
//! - [`TursoTransaction`] owns a single dedicated connection between
//!   `BEGIN TRANSACTION` and `COMMIT`/`ROLLBACK`, so every read inside the
//!   transaction observes the transaction's own prior writes
//!
//! Row conversion is centralized in `row_to_node`.

use crate::db::node_store::{NodeRecords, NodeStore, StoreTransaction};
use crate::db::DatabaseService;
use crate::models::{Node, NodeUpdate};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use libsql::{Connection, Row};
use std::sync::Arc;

const NODE_COLUMNS: &str = "id, name, parent_id, height, managing_department, \
     preferred_programming_language, created_at, modified_at";

/// Parse a timestamp from the database - handles both SQLite and RFC3339
/// formats.
///
/// SQLite CURRENT_TIMESTAMP returns: "YYYY-MM-DD HH:MM:SS"
fn parse_timestamp(s: &str) -> Result<DateTime<Utc>> {
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Ok(naive.and_utc());
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    Err(anyhow::anyhow!(
        "Unable to parse timestamp '{}' as SQLite or RFC3339 format",
        s
    ))
}

/// Convert a libsql::Row to the Node model
///
/// # Row Format
///
/// Expected columns (in order): id, name, parent_id, height,
/// managing_department, preferred_programming_language, created_at,
/// modified_at.
fn row_to_node(row: &Row) -> Result<Node> {
    let id: String = row.get(0).context("Failed to get id")?;
    let name: String = row.get(1).context("Failed to get name")?;
    let parent_id: Option<String> = row.get(2).context("Failed to get parent_id")?;
    let height: i64 = row.get(3).context("Failed to get height")?;
    let managing_department: Option<String> =
        row.get(4).context("Failed to get managing_department")?;
    let preferred_programming_language: Option<String> = row
        .get(5)
        .context("Failed to get preferred_programming_language")?;
    let created_at_str: String = row.get(6).context("Failed to get created_at")?;
    let modified_at_str: String = row.get(7).context("Failed to get modified_at")?;

    let created_at = parse_timestamp(&created_at_str).context("Failed to parse created_at")?;
    let modified_at = parse_timestamp(&modified_at_str).context("Failed to parse modified_at")?;

    Ok(Node {
        id,
        name,
        parent_id,
        height,
        managing_department,
        preferred_programming_language,
        created_at,
        modified_at,
    })
}

async fn get_node_on(conn: &Connection, id: &str) -> Result<Option<Node>> {
    let mut stmt = conn
        .prepare(&format!("SELECT {} FROM nodes WHERE id = ?", NODE_COLUMNS))
        .await
        .context("Failed to prepare get_node query")?;

    let mut rows = stmt
        .query([id])
        .await
        .context("Failed to execute get_node query")?;

    match rows.next().await.context("Failed to read get_node row")? {
        Some(row) => Ok(Some(row_to_node(&row)?)),
        None => Ok(None),
    }
}

async fn get_children_on(conn: &Connection, id: &str) -> Result<Vec<Node>> {
    let mut stmt = conn
        .prepare(&format!(
            "SELECT {} FROM nodes WHERE parent_id = ? ORDER BY created_at ASC",
            NODE_COLUMNS
        ))
        .await
        .context("Failed to prepare get_children query")?;

    let mut rows = stmt
        .query([id])
        .await
        .context("Failed to execute get_children query")?;

    let mut nodes = Vec::new();
    while let Some(row) = rows.next().await.context("Failed to read children row")? {
        nodes.push(row_to_node(&row)?);
    }
    Ok(nodes)
}

async fn find_all_on(conn: &Connection) -> Result<Vec<Node>> {
    let mut stmt = conn
        .prepare(&format!(
            "SELECT {} FROM nodes ORDER BY created_at ASC",
            NODE_COLUMNS
        ))
        .await
        .context("Failed to prepare find_all query")?;

    let mut rows = stmt
        .query(())
        .await
        .context("Failed to execute find_all query")?;

    let mut nodes = Vec::new();
    while let Some(row) = rows.next().await.context("Failed to read find_all row")? {
        nodes.push(row_to_node(&row)?);
    }
    Ok(nodes)
}

async fn create_node_on(conn: &Connection, node: Node) -> Result<Node> {
    conn.execute(
        "INSERT INTO nodes (id, name, parent_id, height, managing_department, \
         preferred_programming_language) VALUES (?, ?, ?, ?, ?, ?)",
        (
            node.id.as_str(),
            node.name.as_str(),
            node.parent_id.as_deref(),
            node.height,
            node.managing_department.as_deref(),
            node.preferred_programming_language.as_deref(),
        ),
    )
    .await
    .context("Failed to insert node")?;

    get_node_on(conn, &node.id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Node not found after creation"))
}

async fn update_node_on(conn: &Connection, id: &str, update: NodeUpdate) -> Result<Node> {
    let current = get_node_on(conn, id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Node not found: {}", id))?;

    // Merge the sparse update over the stored row. For the nullable columns
    // the outer Option decides whether the field is touched at all.
    let name = update.name.unwrap_or(current.name);
    let parent_id = match update.parent_id {
        None => current.parent_id,
        Some(new_parent) => new_parent,
    };
    let height = update.height.unwrap_or(current.height);
    let managing_department = match update.managing_department {
        None => current.managing_department,
        Some(new_department) => new_department,
    };
    let preferred_programming_language = match update.preferred_programming_language {
        None => current.preferred_programming_language,
        Some(new_language) => new_language,
    };

    conn.execute(
        "UPDATE nodes SET name = ?, parent_id = ?, height = ?, managing_department = ?, \
         preferred_programming_language = ?, modified_at = CURRENT_TIMESTAMP WHERE id = ?",
        (
            name.as_str(),
            parent_id.as_deref(),
            height,
            managing_department.as_deref(),
            preferred_programming_language.as_deref(),
            id,
        ),
    )
    .await
    .context("Failed to update node")?;

    get_node_on(conn, id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Node not found after update"))
}

async fn delete_node_on(conn: &Connection, id: &str) -> Result<u64> {
    conn.execute("DELETE FROM nodes WHERE id = ?", [id])
        .await
        .context("Failed to delete node")
}

/// TursoStore implements the store traits for the libsql backend.
pub struct TursoStore {
    /// Underlying database service (connection + schema management)
    db: Arc<DatabaseService>,
}

impl TursoStore {
    /// Create a new TursoStore
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// # use orgtree_core::db::{DatabaseService, TursoStore};
    /// # use std::path::PathBuf;
    /// # use std::sync::Arc;
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let db = Arc::new(DatabaseService::new(PathBuf::from("./orgtree.db")).await?);
    /// let store = TursoStore::new(db);
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(db: Arc<DatabaseService>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl NodeRecords for TursoStore {
    async fn get_node(&self, id: &str) -> Result<Option<Node>> {
        let conn = self.db.connect_with_timeout().await?;
        get_node_on(&conn, id).await
    }

    async fn get_children(&self, id: &str) -> Result<Vec<Node>> {
        let conn = self.db.connect_with_timeout().await?;
        get_children_on(&conn, id).await
    }

    async fn find_all(&self) -> Result<Vec<Node>> {
        let conn = self.db.connect_with_timeout().await?;
        find_all_on(&conn).await
    }

    async fn create_node(&self, node: Node) -> Result<Node> {
        let conn = self.db.connect_with_timeout().await?;
        create_node_on(&conn, node).await
    }

    async fn update_node(&self, id: &str, update: NodeUpdate) -> Result<Node> {
        let conn = self.db.connect_with_timeout().await?;
        update_node_on(&conn, id, update).await
    }

    async fn delete_node(&self, id: &str) -> Result<u64> {
        let conn = self.db.connect_with_timeout().await?;
        delete_node_on(&conn, id).await
    }
}

#[async_trait]
impl NodeStore for TursoStore {
    async fn begin(&self) -> Result<Box<dyn StoreTransaction>> {
        let conn = self.db.connect_with_timeout().await?;
        conn.execute("BEGIN TRANSACTION", ())
            .await
            .context("Failed to begin transaction")?;
        Ok(Box::new(TursoTransaction { conn }))
    }
}

/// A libsql transaction handle. All operations run on one dedicated
/// connection, so reads observe the transaction's own prior writes.
///
/// Dropping the handle without committing closes the connection and the
/// underlying transaction rolls back.
pub struct TursoTransaction {
    conn: Connection,
}

#[async_trait]
impl NodeRecords for TursoTransaction {
    async fn get_node(&self, id: &str) -> Result<Option<Node>> {
        get_node_on(&self.conn, id).await
    }

    async fn get_children(&self, id: &str) -> Result<Vec<Node>> {
        get_children_on(&self.conn, id).await
    }

    async fn find_all(&self) -> Result<Vec<Node>> {
        find_all_on(&self.conn).await
    }

    async fn create_node(&self, node: Node) -> Result<Node> {
        create_node_on(&self.conn, node).await
    }

    async fn update_node(&self, id: &str, update: NodeUpdate) -> Result<Node> {
        update_node_on(&self.conn, id, update).await
    }

    async fn delete_node(&self, id: &str) -> Result<u64> {
        delete_node_on(&self.conn, id).await
    }
}

#[async_trait]
impl StoreTransaction for TursoTransaction {
    async fn commit(self: Box<Self>) -> Result<()> {
        self.conn
            .execute("COMMIT", ())
            .await
            .context("Failed to commit transaction")?;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<()> {
        self.conn
            .execute("ROLLBACK", ())
            .await
            .context("Failed to roll back transaction")?;
        Ok(())
    }
}
