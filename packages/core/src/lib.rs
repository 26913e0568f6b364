//! OrgTree Core Business Logic Layer
//!
//! This crate provides the tree-mutation core for the OrgTree org-chart
//! editor: a strict forest of employee nodes persisted in an embedded
//! relational store, kept consistent under insertion, re-parenting,
//! detachment, and cascading deletion.
//!
//! # Architecture
//!
//! - **Single entity**: every employee is a `Node` row; hierarchy is encoded
//!   by a nullable `parent_id` self-reference
//! - **Derived attributes**: `height` (distance from the node's root) and the
//!   two nullable role attributes (`managing_department`,
//!   `preferred_programming_language`) are maintained by the service layer,
//!   never by callers
//! - **libsql/Turso**: embedded SQLite-compatible database behind a store
//!   trait, one transaction per mutating operation
//!
//! # Modules
//!
//! - [`models`] - Data structures (Node, NodeUpdate, role catalogs)
//! - [`services`] - Business services (NodeService, tree invariant engine)
//! - [`db`] - Database layer with libsql integration
//! - [`rpc`] - JSON-RPC 2.0 stdio server for UI/API clients

pub mod db;
pub mod models;
pub mod rpc;
pub mod services;

// Re-export commonly used types
pub use db::*;
pub use models::*;
pub use services::*;
