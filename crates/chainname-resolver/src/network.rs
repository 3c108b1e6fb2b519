//! A chain paired with the transport used to read it.

use alloy_primitives::Address;
use chainname_core::{ChainConfig, ChainRegistry};
use chainname_rpc::{HttpClientConfig, HttpRpcClient, RpcTransport, TransportError};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::error::ResolveError;

/// One chain and its RPC transport.
#[derive(Clone)]
pub struct Network {
    config: ChainConfig,
    transport: Arc<dyn RpcTransport>,
}

impl Network {
    pub fn new(config: ChainConfig, transport: Arc<dyn RpcTransport>) -> Self {
        Self { config, transport }
    }

    /// Network backed by an HTTP client for `config.rpc_url`.
    pub fn http(config: ChainConfig, http: &HttpClientConfig) -> Result<Self, TransportError> {
        let client = HttpRpcClient::new(&config.rpc_url, http.clone())?;
        Ok(Self::new(config, Arc::new(client)))
    }

    pub fn config(&self) -> &ChainConfig {
        &self.config
    }

    pub fn chain_id(&self) -> u64 {
        self.config.id
    }

    pub fn transport(&self) -> &Arc<dyn RpcTransport> {
        &self.transport
    }

    /// Parsed registry contract address.
    pub fn registry_address(&self) -> Result<Address, ResolveError> {
        self.config
            .registry_address
            .parse::<Address>()
            .map_err(|_| ResolveError::InvalidAddress {
                address: self.config.registry_address.clone(),
            })
    }
}

impl fmt::Debug for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Network")
            .field("chain", &self.config.name)
            .field("id", &self.config.id)
            .field("rpc", &self.transport.url())
            .finish()
    }
}

/// Networks keyed by chain ID.
#[derive(Debug, Clone, Default)]
pub struct Networks {
    by_id: HashMap<u64, Network>,
}

impl Networks {
    pub fn new() -> Self {
        Self::default()
    }

    /// One HTTP-backed network per registry entry.
    pub fn from_registry(
        registry: &ChainRegistry,
        http: &HttpClientConfig,
    ) -> Result<Self, TransportError> {
        let mut networks = Self::new();
        for chain in registry.iter() {
            networks.insert(Network::http(chain.clone(), http)?);
        }
        Ok(networks)
    }

    /// Add or replace the network for its chain ID.
    pub fn insert(&mut self, network: Network) {
        self.by_id.insert(network.chain_id(), network);
    }

    pub fn get(&self, chain_id: u64) -> Result<&Network, ResolveError> {
        self.by_id
            .get(&chain_id)
            .ok_or(ResolveError::UnknownChain { chain_id })
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}
