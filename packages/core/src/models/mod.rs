//! Data Models
//!
//! This module contains the core data structures used throughout OrgTree:
//!
//! - `Node` - the employee node, sole entity of the hierarchy
//! - `NodeUpdate` - sparse store-level update
//! - `DeleteResult` - pre-delete representation returned by cascading delete
//! - role catalogs and generators for the two nullable role attributes

mod node;
pub mod roles;

pub use node::{DeleteResult, Node, NodeRole, NodeUpdate, ValidationError};
