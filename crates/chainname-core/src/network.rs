//! Host → chain selection.

use serde::{Deserialize, Serialize};

use crate::chain::{ChainConfig, ChainRegistry};
use crate::error::CoreError;

/// Maps hosts ending in `suffix` to a chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostRoute {
    pub suffix: String,
    pub chain_id: u64,
}

impl HostRoute {
    pub fn new(suffix: impl Into<String>, chain_id: u64) -> Self {
        Self {
            suffix: suffix.into().to_ascii_lowercase(),
            chain_id,
        }
    }
}

/// What to do when no route matches a host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FallbackPolicy {
    /// Fail with [`CoreError::UnknownNetwork`].
    #[default]
    Reject,
    /// Serve the given chain for every unmatched host.
    Default(u64),
}

/// Chooses the chain for an inbound host by suffix.
#[derive(Debug, Clone)]
pub struct NetworkSelector {
    registry: ChainRegistry,
    routes: Vec<HostRoute>,
    fallback: FallbackPolicy,
}

impl NetworkSelector {
    /// Build a selector. Every route and the fallback must name a chain in
    /// `registry`.
    pub fn new(
        registry: ChainRegistry,
        routes: Vec<HostRoute>,
        fallback: FallbackPolicy,
    ) -> Result<Self, CoreError> {
        let missing = routes
            .iter()
            .map(|r| r.chain_id)
            .chain(match fallback {
                FallbackPolicy::Default(id) => Some(id),
                FallbackPolicy::Reject => None,
            })
            .find(|id| registry.get(*id).is_none());
        if let Some(id) = missing {
            return Err(CoreError::InvalidChainTable(format!(
                "route refers to unknown chain id {id}"
            )));
        }
        Ok(Self {
            registry,
            routes,
            fallback,
        })
    }

    /// Built-in routes over `registry`, rejecting unmatched hosts.
    pub fn with_registry(registry: ChainRegistry) -> Result<Self, CoreError> {
        Self::new(registry, builtin_routes(), FallbackPolicy::Reject)
    }

    pub fn builtin() -> Result<Self, CoreError> {
        Self::with_registry(ChainRegistry::builtin())
    }

    /// Pick the chain for `host`. The first route whose suffix ends the host
    /// wins; matching ignores ASCII case.
    pub fn select(&self, host: &str) -> Result<&ChainConfig, CoreError> {
        let host = host.to_ascii_lowercase();
        let chain_id = self
            .routes
            .iter()
            .find(|r| host.ends_with(&r.suffix))
            .map(|r| r.chain_id)
            .or(match self.fallback {
                FallbackPolicy::Default(id) => Some(id),
                FallbackPolicy::Reject => None,
            });

        chain_id
            .and_then(|id| self.registry.get(id))
            .ok_or(CoreError::UnknownNetwork { host })
    }

    pub fn registry(&self) -> &ChainRegistry {
        &self.registry
    }

    pub fn routes(&self) -> &[HostRoute] {
        &self.routes
    }

    pub fn fallback(&self) -> FallbackPolicy {
        self.fallback
    }
}

/// Built-in host routes.
pub fn builtin_routes() -> Vec<HostRoute> {
    vec![
        HostRoute::new("bch.is", 10000),
        HostRoute::new("doge.wf", 2000),
        HostRoute::new("dcdomain.wf", 2000),
    ]
}
