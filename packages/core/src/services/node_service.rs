//! Node Service - Tree Mutation Operations
//!
//! Orchestrates the tree invariant engine against the store, one
//! transaction per mutating operation:
//!
//! - **Create**: new root, or new child under an existing parent
//! - **Move**: re-parent a node onto a different existing parent
//! - **Detach**: cut a node from its parent, making it a new root
//! - **Delete**: remove a node and its entire subtree
//! - **Get**: read a node with its direct children, or the whole forest
//!
//! Each mutating operation validates its input, begins a store
//! transaction, runs the engine's read-modify sequence, and commits. Any
//! error rolls the transaction back, so no partial height updates or
//! partial cascades are ever observable.
//!
//! Structural preconditions (self-parenting, moving a node under its own
//! descendant) are checked here, at the caller boundary; the engine
//! itself does not re-validate them.

use crate::db::{NodeRecords, NodeStore, StoreTransaction};
use crate::models::roles::{generate_department_name, generate_programming_language};
use crate::models::{DeleteResult, Node, NodeUpdate, ValidationError};
use crate::services::error::NodeServiceError;
use crate::services::tree_engine;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

/// Business service for the employee hierarchy.
///
/// # Examples
///
/// ```no_run
/// use orgtree_core::db::{DatabaseService, TursoStore};
/// use orgtree_core::services::NodeService;
/// use std::path::PathBuf;
/// use std::sync::Arc;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let db = Arc::new(DatabaseService::new(PathBuf::from("./orgtree.db")).await?);
///     let service = NodeService::new(Arc::new(TursoStore::new(db)));
///
///     let alice = service.create_node("Alice", None).await?;
///     let bob = service.create_node("Bob", Some(&alice.id)).await?;
///     assert_eq!(bob.height, 1);
///     Ok(())
/// }
/// ```
pub struct NodeService {
    store: Arc<dyn NodeStore>,
}

impl NodeService {
    /// Create a new NodeService over a store implementation.
    pub fn new(store: Arc<dyn NodeStore>) -> Self {
        Self { store }
    }

    /// Access the underlying store.
    pub fn store(&self) -> &Arc<dyn NodeStore> {
        &self.store
    }

    /// Create a node.
    ///
    /// Without a parent the node becomes a new root at height 0 and is
    /// seeded with BOTH role attributes: an isolated root is presented as
    /// manager-and-leaf until it gains a child. With a parent, the parent
    /// is promoted (department assigned if absent, language cleared) and
    /// the child is created one level below it with a generated language
    /// preference, all in one transaction.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` if `name` is empty (rejected before any store
    ///   access)
    /// - `NodeNotFound` if `parent_id` does not resolve
    pub async fn create_node(
        &self,
        name: &str,
        parent_id: Option<&str>,
    ) -> Result<Node, NodeServiceError> {
        if name.trim().is_empty() {
            return Err(ValidationError::EmptyName.into());
        }

        let Some(parent_id) = parent_id else {
            let mut node = Node::new(name.to_string(), None, 0);
            node.managing_department = Some(generate_department_name());
            node.preferred_programming_language = Some(generate_programming_language());

            let created = self
                .store
                .create_node(node)
                .await
                .map_err(NodeServiceError::store_failure)?;
            debug!("Created root node {}", created.id);
            return Ok(created);
        };

        let tx = self.begin().await?;
        let result = Self::create_under_parent(&*tx, name, parent_id).await;
        match result {
            Ok(node) => {
                self.commit(tx).await?;
                debug!("Created node {} under {}", node.id, parent_id);
                Ok(node)
            }
            Err(err) => {
                let _ = tx.rollback().await;
                Err(err)
            }
        }
    }

    /// Get nodes.
    ///
    /// With an `id`: the node followed by its direct children, as a flat
    /// list (callers reconstruct relationships from `parent_id`). Without:
    /// every node in the forest.
    ///
    /// # Errors
    ///
    /// `NodeNotFound` if `id` is given and does not resolve.
    pub async fn get_nodes(&self, id: Option<&str>) -> Result<Vec<Node>, NodeServiceError> {
        match id {
            Some(id) => {
                let node = self
                    .store
                    .get_node(id)
                    .await
                    .map_err(NodeServiceError::store_failure)?
                    .ok_or_else(|| NodeServiceError::node_not_found(id))?;
                let children = self
                    .store
                    .get_children(id)
                    .await
                    .map_err(NodeServiceError::store_failure)?;

                let mut nodes = vec![node];
                nodes.extend(children);
                Ok(nodes)
            }
            None => self
                .store
                .find_all()
                .await
                .map_err(NodeServiceError::store_failure),
        }
    }

    /// Move a node onto a different existing parent.
    ///
    /// In one transaction: the old parent is demoted if this node was its
    /// last child, the node is re-pointed at the new parent with
    /// `height = new_parent.height + 1` and its own department cleared (it
    /// is no longer a root, whatever its department status was), and the
    /// heights of its entire subtree are recomputed.
    ///
    /// # Errors
    ///
    /// - `NodeNotFound` if either `id` or `new_parent_id` does not resolve
    /// - `CircularReference` on self-parenting or when `new_parent_id` lies
    ///   inside the moved node's own subtree
    pub async fn move_node(
        &self,
        id: &str,
        new_parent_id: &str,
    ) -> Result<Node, NodeServiceError> {
        if id == new_parent_id {
            return Err(NodeServiceError::circular_reference(format!(
                "Node {} cannot become its own parent",
                id
            )));
        }

        debug!("Moving node {} under {}", id, new_parent_id);
        let tx = self.begin().await?;
        let result = Self::move_in_tx(&*tx, id, new_parent_id).await;
        match result {
            Ok(node) => {
                self.commit(tx).await?;
                Ok(node)
            }
            Err(err) => {
                let _ = tx.rollback().await;
                Err(err)
            }
        }
    }

    /// Detach a node from its parent, making it a new root.
    ///
    /// The node's height resets to 0, its subtree heights are recomputed
    /// from 1, and root-promotion reconciliation seeds its role attributes.
    /// The old parent is demoted if this node was its last child.
    ///
    /// # Errors
    ///
    /// - `NodeNotFound` if `id` does not resolve
    /// - `CannotDetachRoot` if the node has no parent (terminal; no retry
    ///   is meaningful)
    pub async fn detach_node(&self, id: &str) -> Result<Node, NodeServiceError> {
        debug!("Detaching node {}", id);
        let tx = self.begin().await?;
        let result = Self::detach_in_tx(&*tx, id).await;
        match result {
            Ok(node) => {
                self.commit(tx).await?;
                Ok(node)
            }
            Err(err) => {
                let _ = tx.rollback().await;
                Err(err)
            }
        }
    }

    /// Delete a node and its entire subtree.
    ///
    /// The old parent is demoted if this node was its last child; the
    /// subtree is then removed children-first. Returns the pre-delete
    /// representation of the node with its direct children attached.
    ///
    /// # Errors
    ///
    /// `NodeNotFound` if `id` does not resolve.
    pub async fn delete_node(&self, id: &str) -> Result<DeleteResult, NodeServiceError> {
        let tx = self.begin().await?;
        let outcome = Self::delete_in_tx(&*tx, id).await;
        match outcome {
            Ok(result) => {
                self.commit(tx).await?;
                debug!(
                    "Deleted node {} ({} row(s) removed)",
                    id, result.deleted_count
                );
                Ok(result)
            }
            Err(err) => {
                let _ = tx.rollback().await;
                Err(err)
            }
        }
    }

    async fn begin(&self) -> Result<Box<dyn StoreTransaction>, NodeServiceError> {
        self.store
            .begin()
            .await
            .map_err(|e| NodeServiceError::transaction_failed(e.to_string()))
    }

    async fn commit(&self, tx: Box<dyn StoreTransaction>) -> Result<(), NodeServiceError> {
        tx.commit()
            .await
            .map_err(|e| NodeServiceError::transaction_failed(e.to_string()))
    }

    async fn create_under_parent<R>(
        records: &R,
        name: &str,
        parent_id: &str,
    ) -> Result<Node, NodeServiceError>
    where
        R: NodeRecords + ?Sized,
    {
        let parent = records
            .get_node(parent_id)
            .await
            .map_err(NodeServiceError::store_failure)?
            .ok_or_else(|| NodeServiceError::node_not_found(parent_id))?;

        tree_engine::promote_parent(records, &parent).await?;

        let mut child = Node::new(name.to_string(), Some(parent.id.clone()), parent.height + 1);
        child.preferred_programming_language = Some(generate_programming_language());

        records
            .create_node(child)
            .await
            .map_err(NodeServiceError::store_failure)
    }

    async fn move_in_tx<R>(
        records: &R,
        id: &str,
        new_parent_id: &str,
    ) -> Result<Node, NodeServiceError>
    where
        R: NodeRecords + ?Sized,
    {
        let node = records
            .get_node(id)
            .await
            .map_err(NodeServiceError::store_failure)?
            .ok_or_else(|| NodeServiceError::node_not_found(id))?;

        let new_parent = records
            .get_node(new_parent_id)
            .await
            .map_err(NodeServiceError::store_failure)?
            .ok_or_else(|| NodeServiceError::node_not_found(new_parent_id))?;

        if Self::is_descendant(records, id, new_parent_id).await? {
            return Err(NodeServiceError::circular_reference(format!(
                "Cannot move node {} under its descendant {}",
                id, new_parent_id
            )));
        }

        if let Some(old_parent_id) = &node.parent_id {
            let old_parent = records
                .get_node(old_parent_id)
                .await
                .map_err(NodeServiceError::store_failure)?
                .ok_or_else(|| NodeServiceError::node_not_found(old_parent_id))?;
            let siblings = records
                .get_children(old_parent_id)
                .await
                .map_err(NodeServiceError::store_failure)?;

            // The moved node is still counted here, so one sibling means
            // the old parent is about to lose its last child.
            if siblings.len() == 1 {
                tree_engine::demote_parent(records, &old_parent).await?;
            }
        }

        let updated = records
            .update_node(
                id,
                NodeUpdate::new()
                    .with_parent(Some(new_parent.id.clone()))
                    .with_height(new_parent.height + 1)
                    .with_managing_department(None),
            )
            .await
            .map_err(NodeServiceError::store_failure)?;

        let children = records
            .get_children(id)
            .await
            .map_err(NodeServiceError::store_failure)?;
        for child in children {
            tree_engine::propagate_height(records, &child.id, updated.height + 1).await?;
        }

        Ok(updated)
    }

    async fn detach_in_tx<R>(records: &R, id: &str) -> Result<Node, NodeServiceError>
    where
        R: NodeRecords + ?Sized,
    {
        let node = records
            .get_node(id)
            .await
            .map_err(NodeServiceError::store_failure)?
            .ok_or_else(|| NodeServiceError::node_not_found(id))?;

        let parent_id = node
            .parent_id
            .clone()
            .ok_or_else(|| NodeServiceError::cannot_detach_root(id))?;

        let children = records
            .get_children(id)
            .await
            .map_err(NodeServiceError::store_failure)?;

        if children.is_empty() {
            return records
                .update_node(
                    id,
                    NodeUpdate::new()
                        .with_parent(None)
                        .with_height(0)
                        .with_managing_department(Some(
                            node.managing_department
                                .clone()
                                .unwrap_or_else(generate_department_name),
                        ))
                        .with_preferred_programming_language(Some(
                            node.preferred_programming_language
                                .clone()
                                .unwrap_or_else(generate_programming_language),
                        )),
                )
                .await
                .map_err(NodeServiceError::store_failure);
        }

        let parent = records
            .get_node(&parent_id)
            .await
            .map_err(NodeServiceError::store_failure)?
            .ok_or_else(|| NodeServiceError::node_not_found(&parent_id))?;
        let siblings = records
            .get_children(&parent_id)
            .await
            .map_err(NodeServiceError::store_failure)?;
        if siblings.len() == 1 {
            tree_engine::demote_parent(records, &parent).await?;
        }

        // A detached node with children keeps whatever language preference
        // it already had; only the department is seeded in this branch.
        let updated = records
            .update_node(
                id,
                NodeUpdate::new()
                    .with_parent(None)
                    .with_height(0)
                    .with_managing_department(Some(
                        node.managing_department
                            .clone()
                            .unwrap_or_else(generate_department_name),
                    )),
            )
            .await
            .map_err(NodeServiceError::store_failure)?;

        let children = records
            .get_children(id)
            .await
            .map_err(NodeServiceError::store_failure)?;
        for child in children {
            tree_engine::propagate_height(records, &child.id, 1).await?;
        }

        Ok(updated)
    }

    async fn delete_in_tx<R>(records: &R, id: &str) -> Result<DeleteResult, NodeServiceError>
    where
        R: NodeRecords + ?Sized,
    {
        let node = records
            .get_node(id)
            .await
            .map_err(NodeServiceError::store_failure)?
            .ok_or_else(|| NodeServiceError::node_not_found(id))?;

        if let Some(parent_id) = &node.parent_id {
            let parent = records
                .get_node(parent_id)
                .await
                .map_err(NodeServiceError::store_failure)?
                .ok_or_else(|| NodeServiceError::node_not_found(parent_id))?;
            let siblings = records
                .get_children(parent_id)
                .await
                .map_err(NodeServiceError::store_failure)?;
            if siblings.len() == 1 {
                tree_engine::demote_parent(records, &parent).await?;
            }
        }

        let children = records
            .get_children(id)
            .await
            .map_err(NodeServiceError::store_failure)?;

        let deleted_count = tree_engine::cascade_delete(records, id).await?;

        Ok(DeleteResult {
            node,
            children,
            deleted_count,
        })
    }

    /// Whether `candidate_id` lies inside the subtree rooted at `node_id`,
    /// determined by walking the parent chain upward from the candidate.
    async fn is_descendant<R>(
        records: &R,
        node_id: &str,
        candidate_id: &str,
    ) -> Result<bool, NodeServiceError>
    where
        R: NodeRecords + ?Sized,
    {
        let mut visited = HashSet::new();
        let mut current = candidate_id.to_string();

        loop {
            let node = records
                .get_node(&current)
                .await
                .map_err(NodeServiceError::store_failure)?
                .ok_or_else(|| NodeServiceError::node_not_found(&current))?;

            match node.parent_id {
                None => return Ok(false),
                Some(parent_id) => {
                    if parent_id == node_id {
                        return Ok(true);
                    }
                    // Stored data is cycle-free by construction; stop anyway
                    // if a chain revisits a node.
                    if !visited.insert(parent_id.clone()) {
                        return Ok(false);
                    }
                    current = parent_id;
                }
            }
        }
    }
}
