//! The `RpcTransport` trait: the seam between the resolver and the network.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::TransportError;
use crate::request::{next_request_id, JsonRpcRequest, JsonRpcResponse};

/// A JSON-RPC endpoint.
///
/// Implementations must be `Send + Sync` and are stored as
/// `Arc<dyn RpcTransport>`; tests substitute in-memory doubles.
#[async_trait]
pub trait RpcTransport: Send + Sync + 'static {
    /// Send a single JSON-RPC request and return the response.
    async fn send(&self, req: JsonRpcRequest) -> Result<JsonRpcResponse, TransportError>;

    /// The transport's identifier (URL or name), for logs.
    fn url(&self) -> &str;

    /// Send a request and return its `result`, mapping node errors to
    /// [`TransportError::Rpc`].
    async fn request(&self, req: JsonRpcRequest) -> Result<Value, TransportError> {
        let resp = self.send(req).await?;
        resp.into_result().map_err(TransportError::Rpc)
    }

    /// Call `method` with a fresh request ID.
    async fn call(&self, method: &str, params: Vec<Value>) -> Result<Value, TransportError> {
        self.request(JsonRpcRequest::new(next_request_id(), method, params))
            .await
    }
}
