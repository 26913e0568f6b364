//! Business Services
//!
//! This module contains the core business logic:
//!
//! - `NodeService` - the mutating operations (create, move, detach, delete)
//!   and the read-only query
//! - `tree_engine` - the invariant algorithms those operations orchestrate
//!
//! Services coordinate between the database layer and callers, running each
//! structural change as a single store transaction.

pub mod error;
pub mod node_service;
pub mod tree_engine;

pub use error::NodeServiceError;
pub use node_service::NodeService;
