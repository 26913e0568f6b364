//! Service Layer Error Types
//!
//! This module defines error types for service-layer operations, providing
//! detailed error handling for business logic failures.

use crate::db::DatabaseError;
use crate::models::ValidationError;
use thiserror::Error;

/// Service operation errors
///
/// Provides high-level error types for all node operations. Engine-level
/// failures propagate straight to the operation boundary; the service
/// performs no local recovery, so a failed step aborts the whole
/// transaction.
#[derive(Error, Debug)]
pub enum NodeServiceError {
    /// Node not found by ID
    #[error("Node not found: {id}")]
    NodeNotFound { id: String },

    /// Validation failed before any store access
    #[error("Node validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),

    /// Database operation failed
    #[error("Database operation failed: {0}")]
    DatabaseError(#[from] DatabaseError),

    /// Detaching a node that has no parent is structurally disallowed
    #[error("Cannot detach root node: {id}")]
    CannotDetachRoot { id: String },

    /// Circular reference detected
    #[error("Circular reference detected: {context}")]
    CircularReference { context: String },

    /// Store operation failed (propagated unchanged; the caller may retry
    /// the whole operation)
    #[error("Store operation failed: {0}")]
    StoreFailure(String),

    /// Transaction could not be started, committed, or rolled back
    #[error("Transaction failed: {context}")]
    TransactionFailed { context: String },
}

impl NodeServiceError {
    /// Create a node not found error
    pub fn node_not_found(id: impl Into<String>) -> Self {
        Self::NodeNotFound { id: id.into() }
    }

    /// Create a cannot-detach-root error
    pub fn cannot_detach_root(id: impl Into<String>) -> Self {
        Self::CannotDetachRoot { id: id.into() }
    }

    /// Create a circular reference error
    pub fn circular_reference(context: impl Into<String>) -> Self {
        Self::CircularReference {
            context: context.into(),
        }
    }

    /// Fold a store-layer error into the service taxonomy
    pub fn store_failure(err: anyhow::Error) -> Self {
        Self::StoreFailure(err.to_string())
    }

    /// Create a transaction failed error
    pub fn transaction_failed(context: impl Into<String>) -> Self {
        Self::TransactionFailed {
            context: context.into(),
        }
    }
}
