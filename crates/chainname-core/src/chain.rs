//! Chain configuration and the chain registry.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use crate::error::CoreError;

/// Connection and registry parameters for one chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainConfig {
    /// EVM chain ID, e.g. 10000 for smartBCH.
    pub id: u64,
    /// Slug, e.g. "smartbch".
    pub name: String,
    /// HTTP JSON-RPC endpoint.
    pub rpc_url: String,
    /// Registry contract address (0x-prefixed).
    pub registry_address: String,
    /// Subgraph endpoint. Carried as configuration only; never queried.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subgraph_url: Option<String>,
}

impl ChainConfig {
    pub fn new(
        id: u64,
        name: impl Into<String>,
        rpc_url: impl Into<String>,
        registry_address: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            rpc_url: rpc_url.into(),
            registry_address: registry_address.into(),
            subgraph_url: None,
        }
    }

    pub fn with_subgraph(mut self, url: impl Into<String>) -> Self {
        self.subgraph_url = Some(url.into());
        self
    }
}

impl fmt::Display for ChainConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}

/// Built-in chains.
pub mod chains {
    use super::ChainConfig;

    pub fn smartbch() -> ChainConfig {
        ChainConfig::new(
            10000,
            "smartbch",
            "https://smartbch.fountainhead.cash/mainnet",
            "0xCfb86556760d03942EBf1ba88a9870e67D77b627",
        )
        .with_subgraph("https://graph.bch.domains/subgraphs/name/graphprotocol/ens")
    }

    pub fn smartbch_amber() -> ChainConfig {
        ChainConfig::new(
            10001,
            "smartbch-amber",
            "http://moeing.tech:8545",
            "0x32f1FBE59D771bdB7FB247FE97A635f50659202b",
        )
        .with_subgraph("https://graph.bch.domains/subgraphs/name/graphprotocol/ens-amber")
    }

    pub fn dogechain() -> ChainConfig {
        ChainConfig::new(
            2000,
            "dogechain",
            "https://rpc.yodeswap.dog",
            "0x834C46666c1dE7367B252682B9ABAb458DD333bf",
        )
        .with_subgraph("https://graph.bch.domains/subgraphs/name/graphprotocol/ens-dogechain")
    }

    pub fn dogechain_testnet() -> ChainConfig {
        ChainConfig::new(
            568,
            "dogechain-testnet",
            "https://rpc-testnet.dogechain.dog",
            "0x08850859CE6B62A39918c8B806AfbE3442fE7b0b",
        )
        .with_subgraph(
            "https://graph.bch.domains/subgraphs/name/graphprotocol/ens-dogechain-testnet",
        )
    }

    pub fn mainnet() -> ChainConfig {
        ChainConfig::new(
            1,
            "mainnet",
            "https://cloudflare-eth.com",
            "0x00000000000C2E074eC69A0dFb2997BA6C7d2e1e",
        )
        .with_subgraph("https://api.thegraph.com/subgraphs/name/ensdomains/ens")
    }
}

/// Ordered, immutable table of chains keyed by chain ID.
#[derive(Debug, Clone)]
pub struct ChainRegistry {
    chains: Vec<ChainConfig>,
}

impl ChainRegistry {
    /// Build a registry, rejecting duplicate IDs or names.
    pub fn new(chains: Vec<ChainConfig>) -> Result<Self, CoreError> {
        let mut ids = HashSet::new();
        let mut names = HashSet::new();
        for chain in &chains {
            if !ids.insert(chain.id) {
                return Err(CoreError::InvalidChainTable(format!(
                    "duplicate chain id {}",
                    chain.id
                )));
            }
            if !names.insert(chain.name.as_str()) {
                return Err(CoreError::InvalidChainTable(format!(
                    "duplicate chain name '{}'",
                    chain.name
                )));
            }
        }
        Ok(Self { chains })
    }

    /// The built-in table.
    pub fn builtin() -> Self {
        Self {
            chains: vec![
                chains::smartbch(),
                chains::smartbch_amber(),
                chains::dogechain(),
                chains::dogechain_testnet(),
                chains::mainnet(),
            ],
        }
    }

    /// Load a table from a JSON array of [`ChainConfig`].
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        let chains: Vec<ChainConfig> = serde_json::from_str(json)
            .map_err(|e| CoreError::InvalidChainTable(e.to_string()))?;
        Self::new(chains)
    }

    /// Replace the RPC endpoint of the chain named `name`.
    pub fn with_rpc_url(mut self, name: &str, url: impl Into<String>) -> Result<Self, CoreError> {
        let chain = self
            .chains
            .iter_mut()
            .find(|c| c.name == name)
            .ok_or_else(|| CoreError::InvalidChainTable(format!("unknown chain '{name}'")))?;
        chain.rpc_url = url.into();
        Ok(self)
    }

    pub fn get(&self, id: u64) -> Option<&ChainConfig> {
        self.chains.iter().find(|c| c.id == id)
    }

    pub fn by_name(&self, name: &str) -> Option<&ChainConfig> {
        self.chains.iter().find(|c| c.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChainConfig> {
        self.chains.iter()
    }

    pub fn len(&self) -> usize {
        self.chains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chains.is_empty()
    }
}

impl Default for ChainRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
