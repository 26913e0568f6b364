//! Node Data Structures
//!
//! This module defines the core `Node` struct and related types for the
//! OrgTree employee hierarchy.
//!
//! # Architecture
//!
//! - **Strict forest**: every node has at most one parent (`parent_id`);
//!   a node with `parent_id = None` is the root of its own tree
//! - **Derived height**: `height` is the distance (in edges) from the node
//!   to its root; the root itself has height 0
//! - **Role attributes**: manager/contributor status is encoded via the
//!   nullability of `managing_department` and
//!   `preferred_programming_language`, adjusted opportunistically when a
//!   node's child-count crosses the 0/1 boundary
//!
//! # Examples
//!
//! ```rust
//! use orgtree_core::models::Node;
//!
//! // A root employee
//! let alice = Node::new("Alice".to_string(), None, 0);
//! assert_eq!(alice.height, 0);
//!
//! // A direct report
//! let bob = Node::new("Bob".to_string(), Some(alice.id.clone()), 1);
//! assert_eq!(bob.parent_id.as_deref(), Some(alice.id.as_str()));
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Validation errors for Node operations
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Node name must not be empty")]
    EmptyName,

    #[error("Missing required field: {0}")]
    MissingField(String),
}

/// Employee node, the sole entity of the hierarchy.
///
/// # Fields
///
/// - `id`: unique identifier (UUID), assigned at creation, immutable
/// - `name`: non-empty display string
/// - `parent_id`: optional reference to the parent node; `None` marks a root
/// - `height`: derived distance from the node's root (root has height 0)
/// - `managing_department`: non-null signals "currently manages at least one
///   other node"
/// - `preferred_programming_language`: non-null signals "currently has no
///   children" (an individual contributor)
/// - `created_at` / `modified_at`: maintained by the store
///
/// The two role attributes are not continuously re-validated: they are
/// assigned or cleared at the moment a node's child-count transitions, so
/// pre-existing data may carry stale combinations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    /// Unique identifier (UUID v4)
    pub id: String,

    /// Display name of the employee
    pub name: String,

    /// Parent node ID; `None` for roots
    pub parent_id: Option<String>,

    /// Distance from this node to its root, in edges
    pub height: i64,

    /// Department name; present while the node is considered a manager
    pub managing_department: Option<String>,

    /// Language preference; present while the node is considered a leaf
    /// contributor
    pub preferred_programming_language: Option<String>,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last modification timestamp
    pub modified_at: DateTime<Utc>,
}

/// Informal role of a node, inferred from the nullability of its two role
/// attributes (see [`Node::role`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeRole {
    /// Neither attribute set. Typical for an intermediate whose department
    /// was cleared by a re-parenting and whose language was cleared when it
    /// first gained a child.
    Root,
    /// Department only: the node manages at least one other node.
    Manager,
    /// Language only: the node is a leaf contributor.
    Contributor,
    /// Both attributes set. An isolated root is presented as
    /// manager-and-leaf until it gains a child.
    RootManager,
}

impl Node {
    /// Create a new Node with an auto-generated UUID.
    ///
    /// Role attributes start unset; the service layer assigns them according
    /// to the node's position in the tree.
    ///
    /// # Arguments
    ///
    /// * `name` - Display name
    /// * `parent_id` - Optional parent node reference
    /// * `height` - Distance from the root (0 for a new root)
    pub fn new(name: String, parent_id: Option<String>, height: i64) -> Self {
        let now = Utc::now();
        let id = Uuid::new_v4().to_string();

        Self {
            id,
            name,
            parent_id,
            height,
            managing_department: None,
            preferred_programming_language: None,
            created_at: now,
            modified_at: now,
        }
    }

    /// Whether this node is the root of its own tree.
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    /// Classify the node by the nullability of its role attributes.
    ///
    /// Persistence stays two nullable columns; this is a read-only view for
    /// consumers and tests.
    pub fn role(&self) -> NodeRole {
        match (
            &self.managing_department,
            &self.preferred_programming_language,
        ) {
            (Some(_), Some(_)) => NodeRole::RootManager,
            (Some(_), None) => NodeRole::Manager,
            (None, Some(_)) => NodeRole::Contributor,
            (None, None) => NodeRole::Root,
        }
    }
}

/// Sparse update for a node. Only provided fields are changed.
///
/// The nullable columns use `Option<Option<_>>`: the outer `Option` is
/// "touch this field or not", the inner one is the new column value (so
/// `Some(None)` clears the column).
///
/// # Examples
///
/// ```rust
/// use orgtree_core::models::NodeUpdate;
///
/// // Re-root a node and clear its department in one update
/// let update = NodeUpdate::new()
///     .with_parent(None)
///     .with_height(0)
///     .with_managing_department(None);
/// assert_eq!(update.height, Some(0));
/// ```
#[derive(Debug, Clone, Default)]
pub struct NodeUpdate {
    pub name: Option<String>,
    pub parent_id: Option<Option<String>>,
    pub height: Option<i64>,
    pub managing_department: Option<Option<String>>,
    pub preferred_programming_language: Option<Option<String>>,
}

impl NodeUpdate {
    /// Create an empty update (touches nothing).
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the display name.
    pub fn with_name(mut self, name: String) -> Self {
        self.name = Some(name);
        self
    }

    /// Set or clear the parent reference.
    pub fn with_parent(mut self, parent_id: Option<String>) -> Self {
        self.parent_id = Some(parent_id);
        self
    }

    /// Set the height.
    pub fn with_height(mut self, height: i64) -> Self {
        self.height = Some(height);
        self
    }

    /// Set or clear the managing department.
    pub fn with_managing_department(mut self, department: Option<String>) -> Self {
        self.managing_department = Some(department);
        self
    }

    /// Set or clear the preferred programming language.
    pub fn with_preferred_programming_language(mut self, language: Option<String>) -> Self {
        self.preferred_programming_language = Some(language);
        self
    }
}

/// Result of a cascading delete: the pre-delete representation of the
/// deleted node, its direct children at deletion time, and the total number
/// of rows removed (the node plus every transitive descendant).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResult {
    pub node: Node,
    pub children: Vec<Node>,
    pub deleted_count: u64,
}
