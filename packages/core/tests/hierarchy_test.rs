//! Integration tests for the tree-mutation operations
//!
//! Covers the consistency guarantees of Create/Move/Detach/Delete:
//! - the height invariant (root height 0, child height = parent height + 1,
//!   transitively after every operation)
//! - role-attribute reconciliation when a child-count crosses 0/1
//! - cascade completeness on delete
//! - structural error cases (detach root, missing ids, cycles)

use orgtree_core::db::{DatabaseService, TursoStore};
use orgtree_core::models::{Node, NodeRole};
use orgtree_core::services::{NodeService, NodeServiceError};
use std::collections::HashMap;
use std::sync::Arc;
use tempfile::TempDir;

/// Helper to create a test service backed by a fresh database.
/// The TempDir must be kept alive for the duration of the test.
async fn create_test_service() -> (NodeService, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("test.db");

    let db = Arc::new(DatabaseService::new(db_path).await.unwrap());
    let service = NodeService::new(Arc::new(TursoStore::new(db)));

    (service, temp_dir)
}

/// Every root must sit at height 0 and every child one level below its
/// parent.
fn assert_heights_consistent(nodes: &[Node]) {
    let by_id: HashMap<&str, &Node> = nodes.iter().map(|n| (n.id.as_str(), n)).collect();
    for node in nodes {
        match &node.parent_id {
            None => assert_eq!(node.height, 0, "root '{}' must have height 0", node.name),
            Some(parent_id) => {
                let parent = by_id
                    .get(parent_id.as_str())
                    .unwrap_or_else(|| panic!("parent of '{}' missing from forest", node.name));
                assert_eq!(
                    node.height,
                    parent.height + 1,
                    "height of '{}' inconsistent with its parent",
                    node.name
                );
            }
        }
    }
}

#[tokio::test]
async fn test_create_root_seeds_both_role_attributes() {
    let (service, _temp) = create_test_service().await;

    let alice = service.create_node("Alice", None).await.unwrap();

    assert_eq!(alice.height, 0);
    assert!(alice.parent_id.is_none());
    assert!(alice.managing_department.is_some());
    assert!(alice.preferred_programming_language.is_some());
    assert_eq!(alice.role(), NodeRole::RootManager);
}

#[tokio::test]
async fn test_create_child_promotes_parent() {
    let (service, _temp) = create_test_service().await;

    let alice = service.create_node("Alice", None).await.unwrap();
    let bob = service.create_node("Bob", Some(&alice.id)).await.unwrap();

    assert_eq!(bob.height, 1);
    assert_eq!(bob.parent_id.as_deref(), Some(alice.id.as_str()));
    assert!(bob.preferred_programming_language.is_some());
    assert!(bob.managing_department.is_none());

    let alice = service.get_nodes(Some(&alice.id)).await.unwrap().remove(0);
    assert!(alice.preferred_programming_language.is_none());
    assert!(alice.managing_department.is_some());
    assert_eq!(alice.role(), NodeRole::Manager);
}

#[tokio::test]
async fn test_create_with_empty_name_is_rejected() {
    let (service, _temp) = create_test_service().await;

    let err = service.create_node("", None).await.unwrap_err();
    assert!(matches!(err, NodeServiceError::ValidationFailed(_)));

    let err = service.create_node("   ", None).await.unwrap_err();
    assert!(matches!(err, NodeServiceError::ValidationFailed(_)));

    // Nothing was written
    assert!(service.get_nodes(None).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_create_with_missing_parent_is_not_found() {
    let (service, _temp) = create_test_service().await;

    let err = service
        .create_node("Bob", Some("no-such-node"))
        .await
        .unwrap_err();
    assert!(matches!(err, NodeServiceError::NodeNotFound { .. }));
    assert!(service.get_nodes(None).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_move_leaf_demotes_old_parent() {
    let (service, _temp) = create_test_service().await;

    // A(root) - B - C
    let a = service.create_node("A", None).await.unwrap();
    let b = service.create_node("B", Some(&a.id)).await.unwrap();
    let c = service.create_node("C", Some(&b.id)).await.unwrap();

    let c = service.move_node(&c.id, &a.id).await.unwrap();

    assert_eq!(c.parent_id.as_deref(), Some(a.id.as_str()));
    assert_eq!(c.height, 1);
    assert!(c.preferred_programming_language.is_some());

    // B lost its only child: language assigned, department cleared (B is
    // not a root)
    let b = service.get_nodes(Some(&b.id)).await.unwrap().remove(0);
    assert!(b.preferred_programming_language.is_some());
    assert!(b.managing_department.is_none());
    assert_eq!(b.role(), NodeRole::Contributor);

    assert_heights_consistent(&service.get_nodes(None).await.unwrap());
}

#[tokio::test]
async fn test_move_repropagates_subtree_heights() {
    let (service, _temp) = create_test_service().await;

    // Two trees: r1, and r2 - m - g1 - g2
    let r1 = service.create_node("r1", None).await.unwrap();
    let r2 = service.create_node("r2", None).await.unwrap();
    let m = service.create_node("m", Some(&r2.id)).await.unwrap();
    let g1 = service.create_node("g1", Some(&m.id)).await.unwrap();
    let g2 = service.create_node("g2", Some(&g1.id)).await.unwrap();

    // Re-root the m subtree under r1
    let m = service.move_node(&m.id, &r1.id).await.unwrap();
    assert_eq!(m.height, 1);

    let g1 = service.get_nodes(Some(&g1.id)).await.unwrap().remove(0);
    let g2 = service.get_nodes(Some(&g2.id)).await.unwrap().remove(0);
    assert_eq!(g1.height, 2);
    assert_eq!(g2.height, 3);

    assert_heights_consistent(&service.get_nodes(None).await.unwrap());
}

#[tokio::test]
async fn test_move_clears_department_of_moved_node() {
    let (service, _temp) = create_test_service().await;

    // root1 is a root with a department; moving it under root2 clears it
    let root1 = service.create_node("root1", None).await.unwrap();
    let root2 = service.create_node("root2", None).await.unwrap();
    assert!(root1.managing_department.is_some());

    let moved = service.move_node(&root1.id, &root2.id).await.unwrap();
    assert!(moved.managing_department.is_none());
    assert_eq!(moved.height, 1);
}

#[tokio::test]
async fn test_move_missing_ids_are_not_found() {
    let (service, _temp) = create_test_service().await;

    let a = service.create_node("A", None).await.unwrap();

    let err = service.move_node("ghost", &a.id).await.unwrap_err();
    assert!(matches!(err, NodeServiceError::NodeNotFound { .. }));

    let err = service.move_node(&a.id, "ghost").await.unwrap_err();
    assert!(matches!(err, NodeServiceError::NodeNotFound { .. }));
}

#[tokio::test]
async fn test_move_rejects_self_parenting() {
    let (service, _temp) = create_test_service().await;

    let a = service.create_node("A", None).await.unwrap();
    let err = service.move_node(&a.id, &a.id).await.unwrap_err();
    assert!(matches!(err, NodeServiceError::CircularReference { .. }));
}

#[tokio::test]
async fn test_move_rejects_descendant_as_new_parent() {
    let (service, _temp) = create_test_service().await;

    // A - B - C; moving A under C would close a cycle
    let a = service.create_node("A", None).await.unwrap();
    let b = service.create_node("B", Some(&a.id)).await.unwrap();
    let c = service.create_node("C", Some(&b.id)).await.unwrap();

    let err = service.move_node(&a.id, &c.id).await.unwrap_err();
    assert!(matches!(err, NodeServiceError::CircularReference { .. }));

    // The tree is untouched
    let forest = service.get_nodes(None).await.unwrap();
    assert_heights_consistent(&forest);
    assert_eq!(forest.len(), 3);
}

#[tokio::test]
async fn test_delete_cascades_whole_subtree() {
    let (service, _temp) = create_test_service().await;

    // A(root) - B - C - D
    let a = service.create_node("A", None).await.unwrap();
    let b = service.create_node("B", Some(&a.id)).await.unwrap();
    let c = service.create_node("C", Some(&b.id)).await.unwrap();
    let _d = service.create_node("D", Some(&c.id)).await.unwrap();

    let result = service.delete_node(&b.id).await.unwrap();

    assert_eq!(result.node.id, b.id);
    assert_eq!(result.deleted_count, 3);
    assert_eq!(result.children.len(), 1);
    assert_eq!(result.children[0].id, c.id);

    // Only A remains, with no orphan referencing a deleted ancestor
    let forest = service.get_nodes(None).await.unwrap();
    assert_eq!(forest.len(), 1);
    assert_eq!(forest[0].id, a.id);

    // A lost its only child: language assigned, department retained (A is
    // a root)
    assert!(forest[0].preferred_programming_language.is_some());
    assert!(forest[0].managing_department.is_some());
}

#[tokio::test]
async fn test_delete_leaf_demotes_non_root_parent() {
    let (service, _temp) = create_test_service().await;

    // A(root) - B - C
    let a = service.create_node("A", None).await.unwrap();
    let b = service.create_node("B", Some(&a.id)).await.unwrap();
    let c = service.create_node("C", Some(&b.id)).await.unwrap();

    let result = service.delete_node(&c.id).await.unwrap();
    assert_eq!(result.deleted_count, 1);

    let b = service.get_nodes(Some(&b.id)).await.unwrap().remove(0);
    assert!(b.preferred_programming_language.is_some());
    assert!(b.managing_department.is_none());

    // A keeps its manager status: it did not lose a child
    let a = service.get_nodes(Some(&a.id)).await.unwrap().remove(0);
    assert!(a.managing_department.is_some());
    assert!(a.preferred_programming_language.is_none());
}

#[tokio::test]
async fn test_delete_missing_node_is_not_found() {
    let (service, _temp) = create_test_service().await;

    let err = service.delete_node("ghost").await.unwrap_err();
    assert!(matches!(err, NodeServiceError::NodeNotFound { .. }));
}

#[tokio::test]
async fn test_delete_root_removes_whole_tree() {
    let (service, _temp) = create_test_service().await;

    let a = service.create_node("A", None).await.unwrap();
    let b = service.create_node("B", Some(&a.id)).await.unwrap();
    let _c1 = service.create_node("C1", Some(&b.id)).await.unwrap();
    let _c2 = service.create_node("C2", Some(&b.id)).await.unwrap();
    let other = service.create_node("other", None).await.unwrap();

    let result = service.delete_node(&a.id).await.unwrap();
    assert_eq!(result.deleted_count, 4);

    let forest = service.get_nodes(None).await.unwrap();
    assert_eq!(forest.len(), 1);
    assert_eq!(forest[0].id, other.id);
}

#[tokio::test]
async fn test_detach_mid_tree_node_becomes_root() {
    let (service, _temp) = create_test_service().await;

    // A(root) - C, with C managing D and E
    let a = service.create_node("A", None).await.unwrap();
    let c = service.create_node("C", Some(&a.id)).await.unwrap();
    let d = service.create_node("D", Some(&c.id)).await.unwrap();
    let e = service.create_node("E", Some(&c.id)).await.unwrap();

    let c = service.detach_node(&c.id).await.unwrap();

    assert!(c.parent_id.is_none());
    assert_eq!(c.height, 0);
    assert!(c.managing_department.is_some());

    // C's children restart at height 1
    let d = service.get_nodes(Some(&d.id)).await.unwrap().remove(0);
    let e = service.get_nodes(Some(&e.id)).await.unwrap().remove(0);
    assert_eq!(d.height, 1);
    assert_eq!(e.height, 1);

    // A lost its only child: language assigned, department retained (root)
    let a = service.get_nodes(Some(&a.id)).await.unwrap().remove(0);
    assert!(a.preferred_programming_language.is_some());
    assert!(a.managing_department.is_some());

    assert_heights_consistent(&service.get_nodes(None).await.unwrap());
}

#[tokio::test]
async fn test_detach_with_children_does_not_assign_language() {
    let (service, _temp) = create_test_service().await;

    let a = service.create_node("A", None).await.unwrap();
    let c = service.create_node("C", Some(&a.id)).await.unwrap();
    let _d = service.create_node("D", Some(&c.id)).await.unwrap();

    // C gained a child, so its language was cleared; detaching it must not
    // bring the language back
    let c = service.detach_node(&c.id).await.unwrap();
    assert!(c.preferred_programming_language.is_none());
    assert!(c.managing_department.is_some());
}

#[tokio::test]
async fn test_detach_childless_node_seeds_both_attributes() {
    let (service, _temp) = create_test_service().await;

    let a = service.create_node("A", None).await.unwrap();
    let b = service.create_node("B", Some(&a.id)).await.unwrap();
    assert!(b.managing_department.is_none());

    let b = service.detach_node(&b.id).await.unwrap();

    assert!(b.parent_id.is_none());
    assert_eq!(b.height, 0);
    assert!(b.managing_department.is_some());
    assert!(b.preferred_programming_language.is_some());
    assert_eq!(b.role(), NodeRole::RootManager);

    // Detaching a childless node does not reconcile the old parent, even
    // when it just lost its last child
    let a = service.get_nodes(Some(&a.id)).await.unwrap().remove(0);
    assert!(a.preferred_programming_language.is_none());
    assert!(a.managing_department.is_some());
}

#[tokio::test]
async fn test_detach_root_is_fatal() {
    let (service, _temp) = create_test_service().await;

    let a = service.create_node("A", None).await.unwrap();
    let err = service.detach_node(&a.id).await.unwrap_err();
    assert!(matches!(err, NodeServiceError::CannotDetachRoot { .. }));

    let err = service.detach_node("ghost").await.unwrap_err();
    assert!(matches!(err, NodeServiceError::NodeNotFound { .. }));
}

#[tokio::test]
async fn test_detach_keeps_remaining_sibling_parent_roles() {
    let (service, _temp) = create_test_service().await;

    // B has two children; detaching one must not demote B
    let a = service.create_node("A", None).await.unwrap();
    let b = service.create_node("B", Some(&a.id)).await.unwrap();
    let c1 = service.create_node("C1", Some(&b.id)).await.unwrap();
    let _c2 = service.create_node("C2", Some(&b.id)).await.unwrap();

    service.detach_node(&c1.id).await.unwrap();

    let b = service.get_nodes(Some(&b.id)).await.unwrap().remove(0);
    assert!(b.managing_department.is_some());
    assert!(b.preferred_programming_language.is_none());
}

#[tokio::test]
async fn test_nodes_with_children_never_hold_a_language() {
    let (service, _temp) = create_test_service().await;

    let a = service.create_node("A", None).await.unwrap();
    let b = service.create_node("B", Some(&a.id)).await.unwrap();
    let c = service.create_node("C", Some(&b.id)).await.unwrap();
    service.create_node("D", Some(&c.id)).await.unwrap();
    service.move_node(&c.id, &a.id).await.unwrap();

    let forest = service.get_nodes(None).await.unwrap();
    let has_children: Vec<&str> = forest
        .iter()
        .filter_map(|n| n.parent_id.as_deref())
        .collect();

    for node in &forest {
        if has_children.contains(&node.id.as_str()) {
            assert!(
                node.preferred_programming_language.is_none(),
                "'{}' has children but still holds a language",
                node.name
            );
        }
    }
    assert_heights_consistent(&forest);
}

#[tokio::test]
async fn test_get_returns_node_then_children() {
    let (service, _temp) = create_test_service().await;

    let a = service.create_node("A", None).await.unwrap();
    let b = service.create_node("B", Some(&a.id)).await.unwrap();
    let c = service.create_node("C", Some(&a.id)).await.unwrap();
    service.create_node("G", Some(&b.id)).await.unwrap();

    let nodes = service.get_nodes(Some(&a.id)).await.unwrap();

    // The node itself, then each direct child (grandchildren excluded)
    assert_eq!(nodes.len(), 3);
    assert_eq!(nodes[0].id, a.id);
    let child_ids: Vec<&str> = nodes[1..].iter().map(|n| n.id.as_str()).collect();
    assert!(child_ids.contains(&b.id.as_str()));
    assert!(child_ids.contains(&c.id.as_str()));
}

#[tokio::test]
async fn test_get_without_id_returns_whole_forest() {
    let (service, _temp) = create_test_service().await;

    let a = service.create_node("A", None).await.unwrap();
    service.create_node("B", Some(&a.id)).await.unwrap();
    service.create_node("other", None).await.unwrap();

    let forest = service.get_nodes(None).await.unwrap();
    assert_eq!(forest.len(), 3);
}

#[tokio::test]
async fn test_get_missing_node_is_not_found() {
    let (service, _temp) = create_test_service().await;

    let err = service.get_nodes(Some("ghost")).await.unwrap_err();
    assert!(matches!(err, NodeServiceError::NodeNotFound { .. }));
}
