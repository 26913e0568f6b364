//! RPC Call Boundary
//!
//! JSON-RPC 2.0 over stdin/stdout, one method per tree operation:
//! `create`, `get`, `move`, `detach`, `delete`.
//!
//! # Architecture
//!
//! - **Pure business logic**: handlers wrap NodeService with no transport
//!   assumptions, so they can be driven directly in tests
//! - **stdio transport**: line-delimited JSON-RPC 2.0, one request per line
//!
//! # Usage
//!
//! Clients send JSON-RPC requests via stdio:
//!
//! ```json
//! {
//!   "jsonrpc": "2.0",
//!   "id": 1,
//!   "method": "create",
//!   "params": { "name": "Alice" }
//! }
//! ```

pub mod handlers;
pub mod server;
pub mod types;

pub use server::{handle_request, init_tracing, run_rpc_server};
pub use types::{RpcError, RpcRequest, RpcResponse};
