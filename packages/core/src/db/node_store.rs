//! NodeStore Traits - Database Abstraction Layer
//!
//! This module defines the traits that abstract node persistence for
//! OrgTree. The traits separate business logic in NodeService from the
//! concrete libsql backend.
//!
//! # Architecture
//!
//! - [`NodeRecords`] is the record-level CRUD surface. It is implemented by
//!   BOTH the plain store and the transaction handle, so the tree engine is
//!   written once against `&dyn NodeRecords` and runs unchanged inside or
//!   outside a transaction.
//! - [`NodeStore`] adds the transaction-scoping primitive: `begin()` hands
//!   out a [`StoreTransaction`] whose reads observe its own prior writes.
//! - [`StoreTransaction`] adds `commit`/`rollback`, consuming the handle.
//!
//! Every mutating tree operation runs its whole read-modify sequence on one
//! transaction handle and commits at the end; any error aborts the handle
//! and leaves the tree untouched.
//!
//! # Design Decisions
//!
//! 1. **Async-first**: all methods are async to match the libsql backend
//! 2. **Ownership semantics**: `create_node` takes ownership of the node
//!    (caller can clone if needed)
//! 3. **Error handling**: `anyhow::Result` for flexible error context;
//!    the service layer folds these into its own error taxonomy
//!
//! # Examples
//!
//! ```rust,no_run
//! use orgtree_core::db::{DatabaseService, NodeRecords, NodeStore, StoreTransaction, TursoStore};
//! use orgtree_core::models::Node;
//! use std::path::PathBuf;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let db = Arc::new(DatabaseService::new(PathBuf::from("./data/orgtree.db")).await?);
//!     let store: Arc<dyn NodeStore> = Arc::new(TursoStore::new(db));
//!
//!     let node = Node::new("Alice".to_string(), None, 0);
//!     let created = store.create_node(node).await?;
//!
//!     let tx = store.begin().await?;
//!     tx.update_node(
//!         &created.id,
//!         orgtree_core::models::NodeUpdate::new().with_height(0),
//!     )
//!     .await?;
//!     tx.commit().await?;
//!     Ok(())
//! }
//! ```

use crate::models::{Node, NodeUpdate};
use anyhow::Result;
use async_trait::async_trait;

/// Record-level CRUD surface shared by the plain store and transactions.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` to allow usage in async contexts
/// where futures may be moved between threads.
#[async_trait]
pub trait NodeRecords: Send + Sync {
    /// Get a node by ID.
    ///
    /// Returns `Ok(None)` if the node does not exist (not an error).
    async fn get_node(&self, id: &str) -> Result<Option<Node>>;

    /// Get all direct children of a node (nodes whose `parent_id` is `id`),
    /// ordered by creation time.
    async fn get_children(&self, id: &str) -> Result<Vec<Node>>;

    /// Get every node in the store, roots first by creation time.
    async fn find_all(&self) -> Result<Vec<Node>>;

    /// Create a new node.
    ///
    /// # Errors
    ///
    /// Returns an error if the node ID already exists or `parent_id`
    /// references a missing node (foreign key violation).
    async fn create_node(&self, node: Node) -> Result<Node>;

    /// Apply a sparse update and return the stored node with all fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the node does not exist.
    async fn update_node(&self, id: &str, update: NodeUpdate) -> Result<Node>;

    /// Delete a single node row. Returns the number of rows removed (0 or 1).
    ///
    /// This does NOT cascade: deleting a node that still has children is a
    /// foreign-key violation. Cascading removal is the tree engine's job.
    async fn delete_node(&self, id: &str) -> Result<u64>;
}

/// A scoped store transaction. Reads observe the transaction's own prior
/// writes; nothing is visible to other connections until `commit`.
#[async_trait]
pub trait StoreTransaction: NodeRecords {
    /// Commit all writes made through this handle.
    async fn commit(self: Box<Self>) -> Result<()>;

    /// Discard all writes made through this handle.
    async fn rollback(self: Box<Self>) -> Result<()>;
}

/// Abstraction layer for node persistence with transaction scoping.
#[async_trait]
pub trait NodeStore: NodeRecords {
    /// Begin a transaction. All writes through the returned handle commit
    /// together or not at all.
    async fn begin(&self) -> Result<Box<dyn StoreTransaction>>;
}
