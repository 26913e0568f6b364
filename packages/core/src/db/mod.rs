//! Database Layer
//!
//! This module handles all database interactions using libsql:
//!
//! - Database initialization and connection management
//! - Store traits abstracting record CRUD and transaction scoping
//! - The libsql implementation of those traits
//!
//! Every mutating tree operation runs against a single [`StoreTransaction`]
//! so a failure partway leaves the hierarchy exactly as it was.

mod database;
mod error;
mod node_store;
mod turso_store;

pub use database::DatabaseService;
pub use error::DatabaseError;
pub use node_store::{NodeRecords, NodeStore, StoreTransaction};
pub use turso_store::{TursoStore, TursoTransaction};
