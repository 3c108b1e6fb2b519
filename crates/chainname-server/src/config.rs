//! Server configuration from the environment.
//!
//! | variable                   | meaning                                   | default |
//! |----------------------------|-------------------------------------------|---------|
//! | `PORT`                     | listen port                               | 8080    |
//! | `CHAINNAME_LOG`            | log level or `EnvFilter` directives       | `info`  |
//! | `CHAINNAME_LOG_JSON`       | JSON log lines                            | `false` |
//! | `CHAINNAME_LOG_<TARGET>`   | level for one log target                  | unset   |
//! | `CHAINNAME_RPC_TIMEOUT_MS` | bound for each `eth_call`                 | 10000   |
//! | `CHAINNAME_CHAINS_FILE`    | JSON chain table replacing the built-ins  | unset   |
//! | `CHAINNAME_RPC_<NAME>`     | RPC endpoint for the chain named `name`   | unset   |
//! | `CHAINNAME_DEFAULT_CHAIN`  | chain ID served for unmatched hosts       | unset   |
//!
//! `<NAME>` is the chain name upper-cased with `-` written as `_`, so
//! `CHAINNAME_RPC_SMARTBCH_AMBER` targets `smartbch-amber`. `<TARGET>` is a
//! crate name the same way: `CHAINNAME_LOG_TOWER_HTTP=debug`.

use chainname_core::network::builtin_routes;
use chainname_core::{ChainRegistry, CoreError, FallbackPolicy, NetworkSelector};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

use crate::telemetry::{LogConfig, TelemetryError};

const RPC_PREFIX: &str = "CHAINNAME_RPC_";
const RPC_TIMEOUT_VAR: &str = "CHAINNAME_RPC_TIMEOUT_MS";
const LOG_VAR: &str = "CHAINNAME_LOG";
const LOG_JSON_VAR: &str = "CHAINNAME_LOG_JSON";
const LOG_PREFIX: &str = "CHAINNAME_LOG_";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{var}: invalid value '{value}': {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },

    #[error("cannot read chain table {path}: {reason}")]
    ChainsFile { path: PathBuf, reason: String },

    #[error("{var}: no chain named like '{name}'")]
    UnknownChainOverride { var: String, name: String },

    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Everything the server needs at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub port: u16,
    pub log: LogConfig,
    pub rpc_timeout: Duration,
    pub chains_file: Option<PathBuf>,
    /// `(ENV_NAME, url)` pairs from `CHAINNAME_RPC_*`, in name order.
    pub rpc_overrides: Vec<(String, String)>,
    pub default_chain: Option<u64>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            log: LogConfig::default(),
            rpc_timeout: Duration::from_secs(10),
            chains_file: None,
            rpc_overrides: Vec::new(),
            default_chain: None,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(std::env::vars())
    }

    /// Build from `(name, value)` pairs; unknown variables are ignored.
    pub fn from_vars<I, K, V>(vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let vars: BTreeMap<String, String> = vars
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        let mut config = Self::default();

        if let Some(port) = vars.get("PORT") {
            config.port = parse("PORT", port)?;
        }
        if let Some(level) = vars.get(LOG_VAR) {
            config.log.level = level.clone();
        }
        if let Some(json) = vars.get(LOG_JSON_VAR) {
            config.log.json = parse_bool(LOG_JSON_VAR, json)?;
        }
        config.log.components = vars
            .iter()
            .filter(|(k, _)| k.as_str() != LOG_JSON_VAR)
            .filter_map(|(k, v)| {
                let target = k.strip_prefix(LOG_PREFIX)?;
                (!target.is_empty()).then(|| (target.to_ascii_lowercase(), v.clone()))
            })
            .collect();
        if let Err(TelemetryError::Filter { directives, source }) = config.log.filter() {
            return Err(ConfigError::Invalid {
                var: LOG_VAR,
                value: directives,
                reason: source.to_string(),
            });
        }
        if let Some(ms) = vars.get(RPC_TIMEOUT_VAR) {
            let ms: u64 = parse(RPC_TIMEOUT_VAR, ms)?;
            if ms == 0 {
                return Err(ConfigError::Invalid {
                    var: RPC_TIMEOUT_VAR,
                    value: "0".into(),
                    reason: "timeout must be positive".into(),
                });
            }
            config.rpc_timeout = Duration::from_millis(ms);
        }
        if let Some(path) = vars.get("CHAINNAME_CHAINS_FILE") {
            config.chains_file = Some(PathBuf::from(path));
        }
        if let Some(id) = vars.get("CHAINNAME_DEFAULT_CHAIN") {
            config.default_chain = Some(parse("CHAINNAME_DEFAULT_CHAIN", id)?);
        }

        config.rpc_overrides = vars
            .iter()
            .filter(|(k, _)| k.as_str() != RPC_TIMEOUT_VAR)
            .filter_map(|(k, v)| {
                let name = k.strip_prefix(RPC_PREFIX)?;
                (!name.is_empty()).then(|| (name.to_string(), v.clone()))
            })
            .collect();

        Ok(config)
    }

    /// The chain table: the configured file or the built-ins, with RPC
    /// overrides applied.
    pub fn registry(&self) -> Result<ChainRegistry, ConfigError> {
        let mut registry = match &self.chains_file {
            Some(path) => {
                let json = std::fs::read_to_string(path).map_err(|e| ConfigError::ChainsFile {
                    path: path.clone(),
                    reason: e.to_string(),
                })?;
                ChainRegistry::from_json(&json)?
            }
            None => ChainRegistry::builtin(),
        };

        for (env_name, url) in &self.rpc_overrides {
            let chain_name = registry
                .iter()
                .find(|c| env_key(&c.name) == *env_name)
                .map(|c| c.name.clone())
                .ok_or_else(|| ConfigError::UnknownChainOverride {
                    var: format!("{RPC_PREFIX}{env_name}"),
                    name: env_name.clone(),
                })?;
            tracing::info!(chain = %chain_name, url = %url, "RPC endpoint overridden");
            registry = registry.with_rpc_url(&chain_name, url.clone())?;
        }
        Ok(registry)
    }

    pub fn fallback(&self) -> FallbackPolicy {
        match self.default_chain {
            Some(id) => FallbackPolicy::Default(id),
            None => FallbackPolicy::Reject,
        }
    }

    /// Built-in host routes over `registry`, with the configured fallback.
    pub fn selector(&self, registry: ChainRegistry) -> Result<NetworkSelector, ConfigError> {
        Ok(NetworkSelector::new(registry, builtin_routes(), self.fallback())?)
    }
}

fn env_key(chain_name: &str) -> String {
    chain_name.to_ascii_uppercase().replace('-', "_")
}

fn parse<T>(var: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
        var,
        value: value.to_string(),
        reason: e.to_string(),
    })
}

fn parse_bool(var: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(ConfigError::Invalid {
            var,
            value: value.to_string(),
            reason: "expected a boolean".into(),
        }),
    }
}
