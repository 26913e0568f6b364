//! RPC stdio Server
//!
//! Async Tokio task that handles JSON-RPC 2.0 requests over stdin/stdout.
//! Pure protocol implementation with no framework dependencies: the UI or
//! any API client writes one request per line and reads one response per
//! line.

use crate::rpc::handlers;
use crate::rpc::types::{RpcError, RpcRequest, RpcResponse};
use crate::services::NodeService;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, BufWriter};
use tracing::{debug, error, info, instrument, warn};

/// Initialize tracing with an environment-driven filter.
///
/// Safe to call more than once; later calls are no-ops.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

/// Run the RPC stdio server
///
/// Reads JSON-RPC requests from stdin, processes them via handlers,
/// and writes responses to stdout. Runs until EOF on stdin.
///
/// # Arguments
///
/// * `node_service` - Shared NodeService instance
///
/// # Returns
///
/// Returns Ok(()) when stdin is closed, or Err on fatal I/O errors
#[instrument(skip(node_service))]
pub async fn run_rpc_server(node_service: Arc<NodeService>) -> anyhow::Result<()> {
    info!("🔌 RPC stdio server started");

    let stdin = tokio::io::stdin();
    let stdout = tokio::io::stdout();

    let reader = BufReader::new(stdin);
    let mut writer = BufWriter::new(stdout);
    let mut lines = reader.lines();

    while let Some(line) = lines.next_line().await? {
        debug!("📥 RPC request: {}", line);

        let request: RpcRequest = match serde_json::from_str(&line) {
            Ok(req) => req,
            Err(e) => {
                warn!("❌ Failed to parse JSON-RPC request: {}", e);
                let error_response = RpcResponse::error(
                    0, // Unknown ID since parsing failed
                    RpcError::parse_error(format!("Invalid JSON: {}", e)),
                );
                write_response(&mut writer, &error_response).await?;
                continue;
            }
        };

        let response = handle_request(&node_service, request).await;
        write_response(&mut writer, &response).await?;
    }

    info!("🔌 RPC stdio server stopped (stdin closed)");
    Ok(())
}

/// Handle a JSON-RPC request and return a response
#[instrument(skip(service), fields(method = %request.method, id = %request.id))]
pub async fn handle_request(service: &Arc<NodeService>, request: RpcRequest) -> RpcResponse {
    let result = match request.method.as_str() {
        "create" => handlers::handle_create(service, request.params).await,
        "get" => handlers::handle_get(service, request.params).await,
        "move" => handlers::handle_move(service, request.params).await,
        "detach" => handlers::handle_detach(service, request.params).await,
        "delete" => handlers::handle_delete(service, request.params).await,
        _ => {
            warn!("⚠️  Unknown RPC method: {}", request.method);
            Err(RpcError::method_not_found(&request.method))
        }
    };

    match result {
        Ok(result) => {
            debug!("✅ RPC request {} succeeded", request.id);
            RpcResponse::success(request.id, result)
        }
        Err(err) => {
            error!(
                "❌ RPC request {} failed: {} (code: {})",
                request.id, err.message, err.code
            );
            RpcResponse::error(request.id, err)
        }
    }
}

async fn write_response(
    writer: &mut BufWriter<tokio::io::Stdout>,
    response: &RpcResponse,
) -> anyhow::Result<()> {
    let json = serde_json::to_string(response)?;
    writer.write_all(json.as_bytes()).await?;
    writer.write_all(b"\n").await?;
    writer.flush().await?;
    Ok(())
}
