//! chainname-rpc: the JSON-RPC transport used by ChainName.
//!
//! - [`RpcTransport`]: the async trait the resolver talks to
//! - [`JsonRpcRequest`] / [`JsonRpcResponse`]: wire types, plus the `eth_call` shape
//! - [`TransportError`]: structured error type
//! - [`HttpRpcClient`]: reqwest-backed implementation

pub mod error;
pub mod http;
pub mod request;
pub mod transport;

pub use error::TransportError;
pub use http::{HttpClientConfig, HttpRpcClient};
pub use request::{CallRequest, JsonRpcError, JsonRpcRequest, JsonRpcResponse, RpcId};
pub use transport::RpcTransport;
