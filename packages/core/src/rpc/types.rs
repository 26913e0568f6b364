//! RPC JSON-RPC 2.0 Types
//!
//! Type definitions for the OrgTree call boundary.
//! Implements the JSON-RPC 2.0 specification for stdio transport.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// JSON-RPC 2.0 request structure
///
/// # Example
///
/// ```json
/// {
///     "jsonrpc": "2.0",
///     "id": 123,
///     "method": "create",
///     "params": { "name": "Alice" }
/// }
/// ```
#[derive(Debug, Deserialize)]
pub struct RpcRequest {
    /// JSON-RPC version (must be "2.0")
    pub jsonrpc: String,

    /// Request identifier (used to match responses)
    pub id: u64,

    /// Method name to invoke
    pub method: String,

    /// Method parameters as JSON value
    #[serde(default)]
    pub params: Value,
}

/// JSON-RPC 2.0 response structure
///
/// # Success Example
///
/// ```json
/// {
///     "jsonrpc": "2.0",
///     "id": 123,
///     "result": { "id": "abc123", "name": "Alice", "height": 0 }
/// }
/// ```
#[derive(Debug, Serialize)]
pub struct RpcResponse {
    /// JSON-RPC version (always "2.0")
    pub jsonrpc: String,

    /// Request identifier (matches request)
    pub id: u64,

    /// Success result (mutually exclusive with error)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,

    /// Error information (mutually exclusive with result)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcError>,
}

/// JSON-RPC 2.0 error structure
#[derive(Debug, Serialize, Clone)]
pub struct RpcError {
    /// Error code (standard JSON-RPC or OrgTree-specific)
    pub code: i32,

    /// Human-readable error message
    pub message: String,
}

// JSON-RPC 2.0 standard error codes
pub const PARSE_ERROR: i32 = -32700;
pub const INVALID_REQUEST: i32 = -32600;
pub const METHOD_NOT_FOUND: i32 = -32601;
pub const INVALID_PARAMS: i32 = -32602;
pub const INTERNAL_ERROR: i32 = -32603;

// OrgTree-specific error codes (application errors: -32000 to -32099)
pub const NODE_NOT_FOUND: i32 = -32000;
pub const VALIDATION_ERROR: i32 = -32001;
pub const INVALID_OPERATION: i32 = -32002;
pub const STORE_ERROR: i32 = -32003;

impl RpcError {
    /// Create an error with an explicit code
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Create a parse error
    pub fn parse_error(message: String) -> Self {
        Self::new(PARSE_ERROR, message)
    }

    /// Create a method not found error
    pub fn method_not_found(method: &str) -> Self {
        Self::new(METHOD_NOT_FOUND, format!("Method not found: {}", method))
    }

    /// Create an invalid params error
    pub fn invalid_params(message: String) -> Self {
        Self::new(INVALID_PARAMS, message)
    }

    /// Create an internal error
    pub fn internal_error(message: String) -> Self {
        Self::new(INTERNAL_ERROR, message)
    }
}

impl RpcResponse {
    /// Create a success response
    pub fn success(id: u64, result: Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    /// Create an error response
    pub fn error(id: u64, error: RpcError) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: None,
            error: Some(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_valid_request() {
        let json_str = r#"{
            "jsonrpc": "2.0",
            "id": 123,
            "method": "create",
            "params": { "name": "Alice" }
        }"#;

        let request: RpcRequest = serde_json::from_str(json_str).unwrap();

        assert_eq!(request.jsonrpc, "2.0");
        assert_eq!(request.id, 123);
        assert_eq!(request.method, "create");
        assert_eq!(request.params["name"], "Alice");
    }

    #[test]
    fn test_parse_request_missing_jsonrpc() {
        let json_str = r#"{
            "id": 123,
            "method": "create",
            "params": {}
        }"#;

        let result: Result<RpcRequest, _> = serde_json::from_str(json_str);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_request_without_params() {
        let json_str = r#"{
            "jsonrpc": "2.0",
            "id": 7,
            "method": "get"
        }"#;

        let request: RpcRequest = serde_json::from_str(json_str).unwrap();
        assert!(request.params.is_null());
    }

    #[test]
    fn test_serialize_success_response() {
        let response = RpcResponse::success(42, json!({"id": "abc123", "height": 0}));

        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["jsonrpc"], "2.0");
        assert_eq!(json["id"], 42);
        assert_eq!(json["result"]["id"], "abc123");
        assert!(json.get("error").is_none()); // Should be omitted
    }

    #[test]
    fn test_serialize_error_response() {
        let response = RpcResponse::error(
            99,
            RpcError::new(NODE_NOT_FOUND, "Node not found: xyz789".to_string()),
        );

        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["jsonrpc"], "2.0");
        assert_eq!(json["id"], 99);
        assert_eq!(json["error"]["code"], NODE_NOT_FOUND);
        assert_eq!(json["error"]["message"], "Node not found: xyz789");
        assert!(json.get("result").is_none()); // Should be omitted
    }

    #[test]
    fn test_error_codes_constants() {
        // Standard JSON-RPC error codes
        assert_eq!(PARSE_ERROR, -32700);
        assert_eq!(INVALID_REQUEST, -32600);
        assert_eq!(METHOD_NOT_FOUND, -32601);
        assert_eq!(INVALID_PARAMS, -32602);
        assert_eq!(INTERNAL_ERROR, -32603);

        // Application error codes (JSON-RPC reserves -32000 to -32099)
        assert_eq!(NODE_NOT_FOUND, -32000);
        assert_eq!(VALIDATION_ERROR, -32001);
        assert_eq!(INVALID_OPERATION, -32002);
        assert_eq!(STORE_ERROR, -32003);
    }
}
