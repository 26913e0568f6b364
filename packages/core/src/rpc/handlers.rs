//! RPC Operation Handlers
//!
//! Wraps NodeService for JSON-RPC access, one handler per operation.
//! Pure business logic - no transport assumptions beyond JSON values in
//! and out.

use crate::rpc::types::{
    RpcError, INVALID_OPERATION, NODE_NOT_FOUND, STORE_ERROR, VALIDATION_ERROR,
};
use crate::services::{NodeService, NodeServiceError};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

/// Parameters for the create method
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateParams {
    pub name: String,
    #[serde(default)]
    pub parent_id: Option<String>,
}

/// Parameters for the get method
#[derive(Debug, Default, Deserialize)]
pub struct GetParams {
    #[serde(default)]
    pub id: Option<String>,
}

/// Parameters for the move method
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveParams {
    pub id: String,
    pub new_parent_id: String,
}

/// Parameters for the detach method
#[derive(Debug, Deserialize)]
pub struct DetachParams {
    pub id: String,
}

/// Parameters for the delete method
#[derive(Debug, Deserialize)]
pub struct DeleteParams {
    pub id: String,
}

/// Map a service error onto the wire taxonomy.
fn map_service_error(err: NodeServiceError) -> RpcError {
    let code = match &err {
        NodeServiceError::NodeNotFound { .. } => NODE_NOT_FOUND,
        NodeServiceError::ValidationFailed(_) => VALIDATION_ERROR,
        NodeServiceError::CannotDetachRoot { .. } | NodeServiceError::CircularReference { .. } => {
            INVALID_OPERATION
        }
        NodeServiceError::DatabaseError(_)
        | NodeServiceError::StoreFailure(_)
        | NodeServiceError::TransactionFailed { .. } => STORE_ERROR,
    };
    RpcError::new(code, err.to_string())
}

fn to_value<T: serde::Serialize>(value: &T) -> Result<Value, RpcError> {
    serde_json::to_value(value)
        .map_err(|e| RpcError::internal_error(format!("Failed to serialize result: {}", e)))
}

/// Handle a create request
pub async fn handle_create(service: &Arc<NodeService>, params: Value) -> Result<Value, RpcError> {
    let params: CreateParams = serde_json::from_value(params)
        .map_err(|e| RpcError::invalid_params(format!("Invalid parameters: {}", e)))?;

    let node = service
        .create_node(&params.name, params.parent_id.as_deref())
        .await
        .map_err(map_service_error)?;

    to_value(&node)
}

/// Handle a get request
pub async fn handle_get(service: &Arc<NodeService>, params: Value) -> Result<Value, RpcError> {
    // get is the only method callable with no params at all
    let params: GetParams = if params.is_null() {
        GetParams::default()
    } else {
        serde_json::from_value(params)
            .map_err(|e| RpcError::invalid_params(format!("Invalid parameters: {}", e)))?
    };

    let nodes = service
        .get_nodes(params.id.as_deref())
        .await
        .map_err(map_service_error)?;

    to_value(&nodes)
}

/// Handle a move request
pub async fn handle_move(service: &Arc<NodeService>, params: Value) -> Result<Value, RpcError> {
    let params: MoveParams = serde_json::from_value(params)
        .map_err(|e| RpcError::invalid_params(format!("Invalid parameters: {}", e)))?;

    let node = service
        .move_node(&params.id, &params.new_parent_id)
        .await
        .map_err(map_service_error)?;

    to_value(&node)
}

/// Handle a detach request
pub async fn handle_detach(service: &Arc<NodeService>, params: Value) -> Result<Value, RpcError> {
    let params: DetachParams = serde_json::from_value(params)
        .map_err(|e| RpcError::invalid_params(format!("Invalid parameters: {}", e)))?;

    let node = service
        .detach_node(&params.id)
        .await
        .map_err(map_service_error)?;

    to_value(&node)
}

/// Handle a delete request
pub async fn handle_delete(service: &Arc<NodeService>, params: Value) -> Result<Value, RpcError> {
    let params: DeleteParams = serde_json::from_value(params)
        .map_err(|e| RpcError::invalid_params(format!("Invalid parameters: {}", e)))?;

    let result = service
        .delete_node(&params.id)
        .await
        .map_err(map_service_error)?;

    to_value(&result)
}
