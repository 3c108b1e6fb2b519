//! `HttpRpcClient` against a minimal in-process HTTP responder.

use std::time::Duration;

use chainname_rpc::{
    CallRequest, HttpClientConfig, HttpRpcClient, JsonRpcRequest, RpcTransport, TransportError,
};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Read one HTTP request (headers plus `Content-Length` body) and return the body.
async fn read_request(stream: &mut tokio::net::TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let n = stream.read(&mut chunk).await.unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
        let text = String::from_utf8_lossy(&buf);
        if let Some(end) = text.find("\r\n\r\n") {
            let length = text[..end]
                .lines()
                .find_map(|l| {
                    let (name, value) = l.split_once(':')?;
                    name.eq_ignore_ascii_case("content-length")
                        .then(|| value.trim().parse::<usize>().ok())
                        .flatten()
                })
                .unwrap_or(0);
            if buf.len() >= end + 4 + length {
                return String::from_utf8_lossy(&buf[end + 4..end + 4 + length]).into_owned();
            }
        }
    }
    String::new()
}

/// Serve a single request with `status` and `body`; returns the endpoint URL
/// and a handle yielding the request body that was received.
async fn serve_once(status: &'static str, body: &'static str) -> (String, tokio::task::JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());
    let handle = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let request = read_request(&mut stream).await;
        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        stream.write_all(response.as_bytes()).await.unwrap();
        stream.shutdown().await.ok();
        request
    });
    (url, handle)
}

fn call() -> JsonRpcRequest {
    JsonRpcRequest::eth_call(
        1,
        &CallRequest {
            to: "0x0000000000000000000000000000000000000001".into(),
            data: "0x0178b8bf".into(),
        },
    )
}

#[tokio::test]
async fn posts_request_and_parses_result() {
    let (url, server) = serve_once("200 OK", r#"{"jsonrpc":"2.0","id":1,"result":"0x1234"}"#).await;
    let client = HttpRpcClient::default_for(&url).unwrap();

    let result = client.request(call()).await.unwrap();
    assert_eq!(result, serde_json::json!("0x1234"));

    let sent: serde_json::Value = serde_json::from_str(&server.await.unwrap()).unwrap();
    assert_eq!(sent["method"], "eth_call");
    assert_eq!(sent["params"][1], "latest");
}

#[tokio::test]
async fn node_error_is_rpc_error() {
    let (url, _server) = serve_once(
        "200 OK",
        r#"{"jsonrpc":"2.0","id":1,"error":{"code":3,"message":"execution reverted"}}"#,
    )
    .await;
    let client = HttpRpcClient::default_for(&url).unwrap();

    let err = client.request(call()).await.unwrap_err();
    assert!(err.is_execution_error(), "got {err:?}");
}

#[tokio::test]
async fn non_success_status_is_http_error() {
    let (url, _server) = serve_once("503 Service Unavailable", r#"{"message":"down"}"#).await;
    let client = HttpRpcClient::default_for(&url).unwrap();

    match client.send(call()).await {
        Err(TransportError::Http(msg)) => assert!(msg.starts_with("HTTP 503"), "{msg}"),
        other => panic!("expected HTTP error, got {other:?}"),
    }
}

#[tokio::test]
async fn silent_endpoint_times_out() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());
    let _server = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        tokio::time::sleep(Duration::from_secs(5)).await;
        drop(stream);
    });

    let client = HttpRpcClient::new(
        &url,
        HttpClientConfig {
            request_timeout: Duration::from_millis(100),
            ..Default::default()
        },
    )
    .unwrap();

    let err = client.send(call()).await.unwrap_err();
    assert!(matches!(err, TransportError::Timeout { ms: 100 }), "got {err:?}");
}

#[tokio::test]
async fn unreachable_endpoint_is_http_error() {
    // Bind then drop to get a port nobody listens on.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let client = HttpRpcClient::default_for(&url).unwrap();
    let err = client.send(call()).await.unwrap_err();
    assert!(err.is_retryable(), "got {err:?}");
}

#[tokio::test]
async fn non_json_body_is_deserialization_error() {
    let (url, _server) = serve_once("200 OK", "<html>gateway</html>").await;
    let client = HttpRpcClient::default_for(&url).unwrap();

    let err = client.send(call()).await.unwrap_err();
    assert!(matches!(err, TransportError::Deserialization(_)), "got {err:?}");
    assert!(!err.is_retryable());
}
