//! `NameResolver`: registry and resolver reads for one name.
//!
//! Every read is an `eth_call` against the `latest` block, bounded by
//! [`ResolverConfig::rpc_timeout`]. The resolver contract address is looked
//! up once per chain through the registry and kept in the shared
//! [`ResolverAddressCache`].

use alloy_primitives::Address;
use chainname_core::{
    alias_to_key, build_link, content_hash_link, link_with_fallback, namehash, ContentHash, Node,
    RESOLVER_NAME,
};
use chainname_rpc::request::next_request_id;
use chainname_rpc::{CallRequest, JsonRpcRequest, TransportError};
use std::sync::Arc;
use std::time::Duration;

use crate::abi::NameAbi;
use crate::cache::ResolverAddressCache;
use crate::error::ResolveError;
use crate::network::Network;
use crate::outcome::{Links, Resolution};

/// Resolver tuning.
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Upper bound for each `eth_call`.
    pub rpc_timeout: Duration,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            rpc_timeout: Duration::from_secs(10),
        }
    }
}

/// Resolves names against a [`Network`].
pub struct NameResolver {
    abi: NameAbi,
    cache: Arc<ResolverAddressCache>,
    config: ResolverConfig,
}

impl NameResolver {
    pub fn new(cache: Arc<ResolverAddressCache>, config: ResolverConfig) -> Result<Self, ResolveError> {
        Ok(Self {
            abi: NameAbi::new()?,
            cache,
            config,
        })
    }

    pub fn cache(&self) -> &Arc<ResolverAddressCache> {
        &self.cache
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// One `eth_call`; returns the decoded return-data bytes.
    async fn eth_call(
        &self,
        network: &Network,
        to: Address,
        calldata: Vec<u8>,
        method: &'static str,
    ) -> Result<Vec<u8>, ResolveError> {
        let req = JsonRpcRequest::eth_call(
            next_request_id(),
            &CallRequest {
                to: to.to_string(),
                data: format!("0x{}", hex::encode(calldata)),
            },
        );

        let timeout = self.config.rpc_timeout;
        let result = tokio::time::timeout(timeout, network.transport().request(req))
            .await
            .map_err(|_| TransportError::Timeout {
                ms: timeout.as_millis() as u64,
            })?;

        let value = result.map_err(|e| {
            tracing::warn!(
                chain_id = network.chain_id(),
                method,
                error = %e,
                "eth_call failed"
            );
            e
        })?;

        let text = value.as_str().ok_or_else(|| ResolveError::InvalidResponse {
            method,
            reason: format!("result is not a hex string: {value}"),
        })?;
        hex::decode(text.strip_prefix("0x").unwrap_or(text)).map_err(|e| {
            ResolveError::InvalidResponse {
                method,
                reason: format!("result is not valid hex: {e}"),
            }
        })
    }

    /// Address of the resolver contract on `network`, cached per chain.
    pub async fn resolver_address(&self, network: &Network) -> Result<Address, ResolveError> {
        let chain_id = network.chain_id();
        self.cache
            .get_or_try_compute(chain_id, || async {
                let registry = network.registry_address()?;
                let node = namehash(RESOLVER_NAME)?;
                let calldata = self.abi.resolver_call(&node)?;
                let data = self.eth_call(network, registry, calldata, "resolver").await?;
                let address = self.abi.decode_resolver(&data)?;
                if address == Address::ZERO {
                    return Err(ResolveError::NoResolver { chain_id });
                }
                tracing::debug!(chain_id, %address, "resolver address resolved");
                Ok::<_, ResolveError>(address)
            })
            .await
    }

    async fn read_content_hash(
        &self,
        network: &Network,
        resolver: Address,
        node: &Node,
    ) -> Result<Vec<u8>, ResolveError> {
        let calldata = self.abi.content_hash_call(node)?;
        let data = self
            .eth_call(network, resolver, calldata, "contenthash")
            .await?;
        self.abi.decode_content_hash(&data)
    }

    async fn read_text(
        &self,
        network: &Network,
        resolver: Address,
        node: &Node,
        key: &str,
    ) -> Result<String, ResolveError> {
        let calldata = self.abi.text_call(node, key)?;
        let data = self.eth_call(network, resolver, calldata, "text").await?;
        self.abi.decode_text(&data)
    }

    /// Content hash and `url` record, read concurrently.
    ///
    /// Fails as a whole if either read fails.
    pub async fn resolve_links(&self, domain: &str, network: &Network) -> Result<Links, ResolveError> {
        let node = namehash(domain)?;
        let resolver = self.resolver_address(network).await?;
        tracing::debug!(chain_id = network.chain_id(), domain, %resolver, "reading contenthash and url");

        let (raw, url) = tokio::try_join!(
            self.read_content_hash(network, resolver, &node),
            self.read_text(network, resolver, &node, "url"),
        )?;

        let content_hash = ContentHash::decode(&raw);
        if let Some(error) = content_hash.error() {
            tracing::warn!(chain_id = network.chain_id(), domain, %error, "content hash did not decode");
        }
        let content_hash_link = link_with_fallback(&content_hash, &raw);

        Ok(Links {
            content_hash,
            content_hash_link,
            url: (!url.is_empty()).then_some(url),
        })
    }

    /// Link for the bare domain: the content hash first, then the `url` record.
    pub async fn resolve_root(&self, domain: &str, network: &Network) -> Result<Resolution, ResolveError> {
        let links = self.resolve_links(domain, network).await?;
        Ok(match links.best_link() {
            Some(link) => Resolution::LinkFound(link),
            None => Resolution::NotFound,
        })
    }

    /// Raw content-hash bytes as stored in the resolver.
    pub async fn resolve_content_hash(
        &self,
        domain: &str,
        network: &Network,
    ) -> Result<Vec<u8>, ResolveError> {
        let node = namehash(domain)?;
        let resolver = self.resolver_address(network).await?;
        self.read_content_hash(network, resolver, &node).await
    }

    /// Gateway link of the content hash, if it has one.
    pub async fn content_hash_redirect(
        &self,
        domain: &str,
        network: &Network,
    ) -> Result<Option<String>, ResolveError> {
        let raw = self.resolve_content_hash(domain, network).await?;
        Ok(content_hash_link(&raw).external_link)
    }

    /// The text record `key`; empty when unset.
    pub async fn resolve_text(
        &self,
        domain: &str,
        network: &Network,
        key: &str,
    ) -> Result<String, ResolveError> {
        let node = namehash(domain)?;
        let resolver = self.resolver_address(network).await?;
        tracing::debug!(chain_id = network.chain_id(), domain, key, "reading text record");
        self.read_text(network, resolver, &node, key).await
    }

    /// Look up a field by alias.
    ///
    /// Known aliases become links; other keys are returned as raw values.
    pub async fn resolve_field(
        &self,
        domain: &str,
        network: &Network,
        alias: &str,
    ) -> Result<Resolution, ResolveError> {
        let (key, known) = alias_to_key(alias);
        let value = self.resolve_text(domain, network, key).await?;

        Ok(if value.is_empty() {
            Resolution::NotFound
        } else if known {
            Resolution::LinkFound(build_link(key, &value))
        } else {
            Resolution::RawValue(value)
        })
    }
}
