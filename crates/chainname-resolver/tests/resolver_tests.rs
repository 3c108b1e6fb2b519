//! `NameResolver` against an in-memory node that answers registry and
//! resolver calls from a record table.

use alloy_primitives::Address;
use async_trait::async_trait;
use chainname_core::chain::chains;
use chainname_core::{namehash, ContentHash, CoreError, Node, ProtocolType};
use chainname_resolver::{
    NameAbi, NameCall, NameResolver, Network, ResolveError, Resolution, ResolverAddressCache,
    ResolverConfig,
};
use chainname_rpc::{JsonRpcError, JsonRpcRequest, JsonRpcResponse, RpcTransport, TransportError};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

const IPFS_CONTENT_HASH: &str =
    "e3010170122029f2d17be6139079dc48696d1f582a8530eb9805b561eda517e22a892c7e3f1f";

#[derive(Default)]
struct Record {
    content_hash: Vec<u8>,
    text: HashMap<String, String>,
}

struct MockNode {
    abi: NameAbi,
    resolver: Address,
    records: HashMap<Node, Record>,
    delay: Option<Duration>,
    fail_text: bool,
    resolver_calls: AtomicUsize,
    calls: AtomicUsize,
}

impl MockNode {
    fn new(resolver: Address) -> Self {
        Self {
            abi: NameAbi::new().unwrap(),
            resolver,
            records: HashMap::new(),
            delay: None,
            fail_text: false,
            resolver_calls: AtomicUsize::new(0),
            calls: AtomicUsize::new(0),
        }
    }

    fn record(mut self, domain: &str, content_hash: &[u8], text: &[(&str, &str)]) -> Self {
        self.records.insert(
            namehash(domain).unwrap(),
            Record {
                content_hash: content_hash.to_vec(),
                text: text
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
            },
        );
        self
    }

    fn answer(&self, call: NameCall) -> Option<Vec<u8>> {
        let empty = Record::default();
        match call {
            NameCall::Resolver { node } => {
                assert_eq!(node, namehash("resolver.eth").unwrap());
                self.resolver_calls.fetch_add(1, Ordering::SeqCst);
                Some(self.abi.encode_resolver_output(self.resolver))
            }
            NameCall::ContentHash { node } => {
                let record = self.records.get(&node).unwrap_or(&empty);
                Some(self.abi.encode_content_hash_output(&record.content_hash))
            }
            NameCall::Text { node, key } => {
                if self.fail_text {
                    return None;
                }
                let record = self.records.get(&node).unwrap_or(&empty);
                let value = record.text.get(&key).map(String::as_str).unwrap_or("");
                Some(self.abi.encode_text_output(value))
            }
        }
    }
}

#[async_trait]
impl RpcTransport for MockNode {
    async fn send(&self, req: JsonRpcRequest) -> Result<JsonRpcResponse, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        assert_eq!(req.method, "eth_call");
        assert_eq!(req.params[1], "latest");
        let data = req.params[0]["data"].as_str().unwrap();
        let calldata = hex::decode(data.trim_start_matches("0x")).unwrap();
        let call = self.abi.decode_call(&calldata).unwrap();

        Ok(match self.answer(call) {
            Some(output) => JsonRpcResponse::success(
                req.id,
                serde_json::json!(format!("0x{}", hex::encode(output))),
            ),
            None => JsonRpcResponse::failure(
                req.id,
                JsonRpcError {
                    code: 3,
                    message: "execution reverted".into(),
                    data: None,
                },
            ),
        })
    }

    fn url(&self) -> &str {
        "mock://node"
    }
}

fn resolver_address() -> Address {
    Address::repeat_byte(0x42)
}

fn populated_node() -> MockNode {
    let ipfs = hex::decode(IPFS_CONTENT_HASH).unwrap();
    MockNode::new(resolver_address())
        .record(
            "alice.bch",
            b"ipfs://Qm123",
            &[
                ("url", "alice.example"),
                ("unknownfield", "hello"),
                ("com.twitter", "alice"),
                ("email", "alice@example.com"),
            ],
        )
        .record("bob.bch", b"", &[("url", "example.com")])
        .record("dave.bch", &ipfs, &[])
}

fn setup(node: MockNode) -> (NameResolver, Network, Arc<MockNode>) {
    setup_with(node, ResolverConfig::default())
}

fn setup_with(node: MockNode, config: ResolverConfig) -> (NameResolver, Network, Arc<MockNode>) {
    let node = Arc::new(node);
    let network = Network::new(chains::smartbch(), node.clone());
    let resolver = NameResolver::new(Arc::new(ResolverAddressCache::new()), config).unwrap();
    (resolver, network, node)
}

#[tokio::test]
async fn root_prefers_content_hash_link() {
    let (resolver, network, _) = setup(populated_node());
    let resolution = resolver.resolve_root("alice.bch", &network).await.unwrap();
    assert_eq!(
        resolution,
        Resolution::LinkFound("https://dweb.link/ipfs/Qm123".into())
    );
}

#[tokio::test]
async fn root_falls_back_to_url_record() {
    let (resolver, network, _) = setup(populated_node());
    let resolution = resolver.resolve_root("bob.bch", &network).await.unwrap();
    assert_eq!(resolution, Resolution::LinkFound("https://example.com".into()));
}

#[tokio::test]
async fn root_without_records_is_not_found() {
    let (resolver, network, _) = setup(populated_node());
    let resolution = resolver.resolve_root("carol.bch", &network).await.unwrap();
    assert_eq!(resolution, Resolution::NotFound);
}

#[tokio::test]
async fn byte_form_cid_resolves() {
    let (resolver, network, _) = setup(populated_node());

    let links = resolver.resolve_links("dave.bch", &network).await.unwrap();
    assert_eq!(links.content_hash.protocol_type(), Some(ProtocolType::Ipfs));
    assert_eq!(
        links.content_hash.payload(),
        Some("QmRAQB6YaCyidP37UdDnjFY5vQuiBrcqdyoW1CuDgwxkD4")
    );
    assert_eq!(links.url, None);

    let redirect = resolver
        .content_hash_redirect("dave.bch", &network)
        .await
        .unwrap();
    assert_eq!(
        redirect.as_deref(),
        Some("https://dweb.link/ipfs/QmRAQB6YaCyidP37UdDnjFY5vQuiBrcqdyoW1CuDgwxkD4")
    );
}

#[tokio::test]
async fn text_form_content_hash_is_opaque_but_linked() {
    let (resolver, network, _) = setup(populated_node());
    let links = resolver.resolve_links("alice.bch", &network).await.unwrap();
    assert!(matches!(links.content_hash, ContentHash::Opaque { .. }));
    assert_eq!(
        links.content_hash_link.canonical_uri.as_deref(),
        Some("ipfs://Qm123")
    );
    assert_eq!(links.url.as_deref(), Some("alice.example"));
}

#[tokio::test]
async fn raw_content_hash_bytes() {
    let (resolver, network, _) = setup(populated_node());
    let raw = resolver
        .resolve_content_hash("dave.bch", &network)
        .await
        .unwrap();
    assert_eq!(hex::encode(raw), IPFS_CONTENT_HASH);

    let redirect = resolver
        .content_hash_redirect("bob.bch", &network)
        .await
        .unwrap();
    assert_eq!(redirect, None);
}

#[tokio::test]
async fn field_lookups() {
    let (resolver, network, _) = setup(populated_node());

    let unknown = resolver
        .resolve_field("alice.bch", &network, "unknownfield")
        .await
        .unwrap();
    assert_eq!(unknown, Resolution::RawValue("hello".into()));

    let twitter = resolver
        .resolve_field("alice.bch", &network, "twitter")
        .await
        .unwrap();
    assert_eq!(twitter, Resolution::LinkFound("https://twitter.com/alice".into()));

    let email = resolver
        .resolve_field("alice.bch", &network, "email")
        .await
        .unwrap();
    assert_eq!(email, Resolution::LinkFound("mailto:alice@example.com".into()));

    let github = resolver
        .resolve_field("alice.bch", &network, "github")
        .await
        .unwrap();
    assert_eq!(github, Resolution::NotFound);
}

#[tokio::test]
async fn resolver_address_is_read_once_per_chain() {
    let (resolver, network, node) = setup(populated_node());

    resolver.resolve_root("alice.bch", &network).await.unwrap();
    resolver
        .resolve_field("alice.bch", &network, "twitter")
        .await
        .unwrap();

    assert_eq!(node.resolver_calls.load(Ordering::SeqCst), 1);
    assert_eq!(resolver.cache().get(10000), Some(resolver_address()));
    // resolver + contenthash + url + text
    assert_eq!(node.calls.load(Ordering::SeqCst), 4);
}

#[tokio::test]
async fn failed_read_fails_the_pair() {
    let mut node = populated_node();
    node.fail_text = true;
    let (resolver, network, _) = setup(node);

    let err = resolver.resolve_root("alice.bch", &network).await.unwrap_err();
    assert!(err.is_rpc_failure(), "got {err:?}");
    assert!(matches!(err, ResolveError::Rpc(TransportError::Rpc(_))));
}

#[tokio::test]
async fn slow_node_times_out() {
    let mut node = populated_node();
    node.delay = Some(Duration::from_millis(500));
    let config = ResolverConfig {
        rpc_timeout: Duration::from_millis(50),
    };
    let (resolver, network, _) = setup_with(node, config);

    let err = resolver.resolve_root("alice.bch", &network).await.unwrap_err();
    assert!(
        matches!(err, ResolveError::Rpc(TransportError::Timeout { ms: 50 })),
        "got {err:?}"
    );
    assert!(resolver.cache().is_empty());
}

#[tokio::test]
async fn zero_resolver_is_not_cached() {
    let (resolver, network, node) = setup(MockNode::new(Address::ZERO));

    for _ in 0..2 {
        let err = resolver.resolve_root("alice.bch", &network).await.unwrap_err();
        assert!(matches!(err, ResolveError::NoResolver { chain_id: 10000 }));
    }
    assert!(resolver.cache().is_empty());
    assert_eq!(node.resolver_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn invalid_name_is_rejected_before_any_call() {
    let (resolver, network, node) = setup(populated_node());

    let err = resolver
        .resolve_field("alice..bch", &network, "url")
        .await
        .unwrap_err();
    assert!(matches!(err, ResolveError::Name(CoreError::InvalidName { .. })));
    assert!(!err.is_rpc_failure());
    assert_eq!(node.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn shared_cache_serves_other_resolvers() {
    let node = Arc::new(populated_node());
    let network = Network::new(chains::smartbch(), node.clone());
    let cache = Arc::new(ResolverAddressCache::new());

    let first = NameResolver::new(cache.clone(), ResolverConfig::default()).unwrap();
    let second = NameResolver::new(cache, ResolverConfig::default()).unwrap();
    first.resolve_root("alice.bch", &network).await.unwrap();
    second.resolve_root("bob.bch", &network).await.unwrap();

    assert_eq!(node.resolver_calls.load(Ordering::SeqCst), 1);
}
