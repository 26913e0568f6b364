//! Tree Invariant Engine
//!
//! Pure read-modify algorithms that keep the hierarchy consistent under
//! structural change. Given a store view, they decide which nodes must be
//! read, updated, or deleted, and in what order.
//!
//! All functions take `&R where R: NodeRecords + ?Sized` and are expected
//! to run against a [`StoreTransaction`](crate::db::StoreTransaction)
//! belonging to the triggering operation, so a failure partway aborts the
//! whole structural change.
//!
//! Every walk step loads its node and child list fresh from the store,
//! never from a cached snapshot: a prior step of the same operation may
//! already have rewritten them.

use crate::db::NodeRecords;
use crate::models::roles::{generate_department_name, generate_programming_language};
use crate::models::{Node, NodeUpdate};
use crate::services::error::NodeServiceError;

/// Set a node's height and recompute the height of every descendant.
///
/// Pre-order walk over the subtree rooted at `node_id`: each node is set to
/// its parent's new height plus one. Sibling order is irrelevant (sibling
/// subtrees are independent), so the walk uses an explicit work stack
/// instead of call-stack recursion.
pub async fn propagate_height<R>(
    records: &R,
    node_id: &str,
    new_height: i64,
) -> Result<(), NodeServiceError>
where
    R: NodeRecords + ?Sized,
{
    let mut stack = vec![(node_id.to_string(), new_height)];

    while let Some((id, height)) = stack.pop() {
        let node = records
            .get_node(&id)
            .await
            .map_err(NodeServiceError::store_failure)?
            .ok_or_else(|| NodeServiceError::node_not_found(&id))?;

        records
            .update_node(&node.id, NodeUpdate::new().with_height(height))
            .await
            .map_err(NodeServiceError::store_failure)?;

        let children = records
            .get_children(&node.id)
            .await
            .map_err(NodeServiceError::store_failure)?;
        for child in children {
            stack.push((child.id, height + 1));
        }
    }

    Ok(())
}

/// Delete a node and every transitive descendant, children first.
///
/// The subtree is collected in pre-order (each child list loaded fresh),
/// then deleted in reverse, so every node is removed before its parent.
/// The store enforces referential integrity on `parent_id`, which rules
/// out parent-first deletion: it would leave child rows referencing a
/// missing parent mid-cascade.
///
/// Returns the number of deleted rows.
pub async fn cascade_delete<R>(records: &R, node_id: &str) -> Result<u64, NodeServiceError>
where
    R: NodeRecords + ?Sized,
{
    let mut stack = vec![node_id.to_string()];
    let mut order = Vec::new();

    while let Some(id) = stack.pop() {
        let node = records
            .get_node(&id)
            .await
            .map_err(NodeServiceError::store_failure)?
            .ok_or_else(|| NodeServiceError::node_not_found(&id))?;

        let children = records
            .get_children(&node.id)
            .await
            .map_err(NodeServiceError::store_failure)?;
        for child in children {
            stack.push(child.id);
        }

        order.push(node.id);
    }

    let mut deleted = 0;
    for id in order.iter().rev() {
        deleted += records
            .delete_node(id)
            .await
            .map_err(NodeServiceError::store_failure)?;
    }

    tracing::debug!("Cascade removed {} node(s) under {}", deleted, node_id);
    Ok(deleted)
}

/// Reconcile a parent that is gaining a child.
///
/// Assigns a department if the parent lacks one and always clears its
/// language preference: a node with reports is no longer a leaf
/// contributor.
pub async fn promote_parent<R>(records: &R, parent: &Node) -> Result<Node, NodeServiceError>
where
    R: NodeRecords + ?Sized,
{
    let department = parent
        .managing_department
        .clone()
        .unwrap_or_else(generate_department_name);

    records
        .update_node(
            &parent.id,
            NodeUpdate::new()
                .with_managing_department(Some(department))
                .with_preferred_programming_language(None),
        )
        .await
        .map_err(NodeServiceError::store_failure)
}

/// Reconcile a parent that is losing its last child.
///
/// Assigns a language preference if the parent lacks one. The department
/// is cleared only when the parent itself has a parent: a root's
/// managerial designation is retained even after losing all reports.
pub async fn demote_parent<R>(records: &R, parent: &Node) -> Result<Node, NodeServiceError>
where
    R: NodeRecords + ?Sized,
{
    let language = parent
        .preferred_programming_language
        .clone()
        .unwrap_or_else(generate_programming_language);
    let department = if parent.parent_id.is_some() {
        None
    } else {
        parent.managing_department.clone()
    };

    records
        .update_node(
            &parent.id,
            NodeUpdate::new()
                .with_managing_department(department)
                .with_preferred_programming_language(Some(language)),
        )
        .await
        .map_err(NodeServiceError::store_failure)
}
