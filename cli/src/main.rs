//! ChainName CLI: content hashes, links and name resolution from the shell.
//!
//! # Commands
//! ```text
//! chainname decode  <hex>
//! chainname encode  --protocol <p> <payload>
//! chainname link    <text>
//! chainname resolve <domain> [--host <site>] [--rpc <url>]
//! chainname text    <domain> <alias> [--host <site>] [--rpc <url>]
//! chainname chains
//! ```

use anyhow::{Context, Result};
use chainname_core::{
    link_with_fallback, match_protocol, resolve_link, ChainRegistry, ContentHash, LinkTarget,
    NetworkSelector, ProtocolType,
};
use chainname_resolver::{
    NameResolver, Network, Resolution, ResolverAddressCache, ResolverConfig,
};
use chainname_rpc::HttpClientConfig;
use clap::{Args, Parser, Subcommand};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;

#[derive(Parser)]
#[command(
    name = "chainname",
    about = "ChainName CLI: decode content hashes and resolve on-chain names",
    version
)]
struct Cli {
    /// Enable debug logs on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode a content hash (hex, 0x-prefixed or bare)
    Decode {
        hex: String,
    },

    /// Encode a payload as content-hash bytes
    Encode {
        /// ipfs | ipns | bzz | onion | onion3 | sia | arweave
        #[arg(short, long)]
        protocol: ProtocolType,
        /// Payload as printed by `decode`
        payload: String,
    },

    /// Build a link from a `scheme://…` URI or an `/ipfs/…` path
    Link {
        text: String,
    },

    /// Resolve the redirect link of a name
    Resolve {
        /// Name, e.g. alice.bch
        domain: String,
        #[command(flatten)]
        net: NetArgs,
    },

    /// Resolve one text field of a name by alias or raw key
    Text {
        domain: String,
        /// twitter | github | gitlab | reddit | telegram | email | url | avatar | <key>
        alias: String,
        #[command(flatten)]
        net: NetArgs,
    },

    /// List the built-in chains and host routes
    Chains,
}

#[derive(Args)]
struct NetArgs {
    /// Site whose chain to read, e.g. bch.is or doge.wf
    #[arg(long, default_value = "bch.is")]
    host: String,
    /// RPC URL overriding the chain's default endpoint
    #[arg(long)]
    rpc: Option<String>,
    /// Timeout for each RPC call, in milliseconds
    #[arg(long, default_value_t = 10_000)]
    timeout_ms: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let output = match cli.command {
        Commands::Decode { hex } => cmd_decode(&hex),
        Commands::Encode { protocol, payload } => cmd_encode(protocol, &payload)?,
        Commands::Link { text } => cmd_link(&text),
        Commands::Resolve { domain, net } => cmd_resolve(&domain, &net).await?,
        Commands::Text { domain, alias, net } => cmd_text(&domain, &alias, &net).await?,
        Commands::Chains => cmd_chains(),
    };

    print(&output, cli.json)?;
    Ok(())
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));
    // A second subscriber can only come from a test harness; ignore it.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Print a command result: pretty JSON, or one `key: value` line per field.
fn print(output: &Value, as_json: bool) -> Result<()> {
    if as_json {
        println!("{}", serde_json::to_string_pretty(output)?);
        return Ok(());
    }
    match output {
        Value::Object(map) => {
            for (key, value) in map {
                match value {
                    Value::Null => {}
                    Value::String(s) => println!("{key:<14} {s}"),
                    Value::Array(items) => {
                        println!("{key}:");
                        for item in items {
                            println!("  {}", render_inline(item));
                        }
                    }
                    other => println!("{key:<14} {other}"),
                }
            }
        }
        other => println!("{}", render_inline(other)),
    }
    Ok(())
}

fn render_inline(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Object(map) => map
            .iter()
            .filter(|(_, v)| !v.is_null())
            .map(|(k, v)| match v {
                Value::String(s) => format!("{k}={s}"),
                other => format!("{k}={other}"),
            })
            .collect::<Vec<_>>()
            .join("  "),
        other => other.to_string(),
    }
}

fn link_fields(link: &LinkTarget) -> (Value, Value) {
    (json!(link.external_link), json!(link.canonical_uri))
}

// ─── Command implementations ─────────────────────────────────────────────────

fn cmd_decode(hex_text: &str) -> Value {
    let decoded = ContentHash::decode_hex(hex_text);
    let raw = hex::decode(hex_text.strip_prefix("0x").unwrap_or(hex_text)).unwrap_or_default();
    let (external_link, canonical_uri) = link_fields(&link_with_fallback(&decoded, &raw));

    let kind = match &decoded {
        ContentHash::Empty => "empty",
        ContentHash::Decoded { .. } => "decoded",
        ContentHash::Opaque { .. } => "opaque",
        ContentHash::Invalid { .. } => "invalid",
    };
    json!({
        "kind": kind,
        "protocolType": decoded.protocol_type().map(ProtocolType::as_str),
        "payload": decoded.payload(),
        "error": decoded.error(),
        "externalLink": external_link,
        "canonicalUri": canonical_uri,
    })
}

fn cmd_encode(protocol: ProtocolType, payload: &str) -> Result<Value> {
    let bytes = ContentHash::encode(protocol, payload)
        .with_context(|| format!("cannot encode {protocol} payload '{payload}'"))?;
    Ok(json!({ "contentHash": format!("0x{}", hex::encode(bytes)) }))
}

fn cmd_link(text: &str) -> Value {
    match match_protocol(text) {
        Some((protocol, payload)) => {
            let (external_link, canonical_uri) =
                link_fields(&resolve_link(Some(protocol), &payload));
            json!({
                "protocolType": protocol.as_str(),
                "payload": payload,
                "externalLink": external_link,
                "canonicalUri": canonical_uri,
            })
        }
        None => json!({ "protocolType": null, "error": format!("no protocol found in '{text}'") }),
    }
}

fn network_for(net: &NetArgs) -> Result<Network> {
    let selector = NetworkSelector::builtin()?;
    let mut chain = selector
        .select(&net.host)
        .with_context(|| format!("no chain serves '{}'", net.host))?
        .clone();
    if let Some(rpc) = &net.rpc {
        chain.rpc_url = rpc.clone();
    }
    let http = HttpClientConfig {
        request_timeout: Duration::from_millis(net.timeout_ms),
        ..Default::default()
    };
    Ok(Network::http(chain, &http)?)
}

fn resolver_for(net: &NetArgs) -> Result<NameResolver> {
    Ok(NameResolver::new(
        Arc::new(ResolverAddressCache::new()),
        ResolverConfig {
            rpc_timeout: Duration::from_millis(net.timeout_ms),
        },
    )?)
}

fn resolution_fields(resolution: &Resolution) -> (&'static str, Option<&str>) {
    match resolution {
        Resolution::LinkFound(link) => ("link_found", Some(link)),
        Resolution::RawValue(value) => ("raw_value", Some(value)),
        Resolution::NotFound => ("not_found", None),
    }
}

async fn cmd_resolve(domain: &str, net: &NetArgs) -> Result<Value> {
    let network = network_for(net)?;
    let resolver = resolver_for(net)?;

    let links = resolver
        .resolve_links(domain, &network)
        .await
        .with_context(|| format!("resolving {domain} on {}", network.config()))?;
    let resolution = match links.best_link() {
        Some(link) => Resolution::LinkFound(link),
        None => Resolution::NotFound,
    };
    let (state, value) = resolution_fields(&resolution);

    Ok(json!({
        "domain": domain,
        "chain": network.config().name,
        "state": state,
        "link": value,
        "protocolType": links.content_hash.protocol_type().map(ProtocolType::as_str),
        "payload": links.content_hash.payload(),
        "error": links.content_hash.error(),
        "url": links.url,
    }))
}

async fn cmd_text(domain: &str, alias: &str, net: &NetArgs) -> Result<Value> {
    let network = network_for(net)?;
    let resolver = resolver_for(net)?;

    let resolution = resolver
        .resolve_field(domain, &network, alias)
        .await
        .with_context(|| format!("reading {alias} of {domain} on {}", network.config()))?;
    let (state, value) = resolution_fields(&resolution);

    Ok(json!({
        "domain": domain,
        "field": alias,
        "state": state,
        "value": value,
    }))
}

fn cmd_chains() -> Value {
    let registry = ChainRegistry::builtin();
    let routes = chainname_core::network::builtin_routes();

    let chains: Vec<Value> = registry
        .iter()
        .map(|chain| {
            let hosts: Vec<&str> = routes
                .iter()
                .filter(|r| r.chain_id == chain.id)
                .map(|r| r.suffix.as_str())
                .collect();
            json!({
                "id": chain.id,
                "name": chain.name,
                "rpcUrl": chain.rpc_url,
                "registry": chain.registry_address,
                "hosts": hosts.join(","),
            })
        })
        .collect();
    json!({ "chains": chains })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["chainname", "decode", "0x", "--json", "-v"]).unwrap();
        assert!(cli.json);
        assert!(cli.verbose);
    }

    #[test]
    fn rejects_unknown_protocol() {
        assert!(Cli::try_parse_from(["chainname", "encode", "--protocol", "ftp", "x"]).is_err());
        assert!(Cli::try_parse_from(["chainname", "encode", "--protocol", "ipfs", "x"]).is_ok());
    }

    #[test]
    fn net_args_defaults() {
        let cli = Cli::try_parse_from(["chainname", "text", "alice.bch", "twitter"]).unwrap();
        match cli.command {
            Commands::Text { net, .. } => {
                assert_eq!(net.host, "bch.is");
                assert_eq!(net.timeout_ms, 10_000);
                assert!(net.rpc.is_none());
            }
            _ => panic!("expected text command"),
        }
    }

    #[test]
    fn decode_report() {
        let report = cmd_decode(
            "0xe3010170122029f2d17be6139079dc48696d1f582a8530eb9805b561eda517e22a892c7e3f1f",
        );
        assert_eq!(report["kind"], "decoded");
        assert_eq!(report["protocolType"], "ipfs");
        assert_eq!(
            report["externalLink"],
            "https://dweb.link/ipfs/QmRAQB6YaCyidP37UdDnjFY5vQuiBrcqdyoW1CuDgwxkD4"
        );

        let empty = cmd_decode("0x");
        assert_eq!(empty["kind"], "empty");
        assert!(empty["externalLink"].is_null());

        let invalid = cmd_decode("0xzz");
        assert_eq!(invalid["kind"], "invalid");
        assert!(invalid["error"].as_str().is_some_and(|e| !e.is_empty()));
    }

    #[test]
    fn encode_then_decode() {
        let out = cmd_encode(ProtocolType::Onion, "zqktlwi4fecvo6ri").unwrap();
        let hex = out["contentHash"].as_str().unwrap();
        assert_eq!(cmd_decode(hex)["payload"], "zqktlwi4fecvo6ri");
    }

    #[test]
    fn link_report() {
        let report = cmd_link("/ipfs/Qm123/index.html");
        assert_eq!(report["protocolType"], "ipfs");
        let none = cmd_link("hello");
        assert!(none["protocolType"].is_null());
    }

    #[test]
    fn chains_report_lists_hosts() {
        let report = cmd_chains();
        let chains = report["chains"].as_array().unwrap();
        let smartbch = chains.iter().find(|c| c["id"] == 10000).unwrap();
        assert_eq!(smartbch["hosts"], "bch.is");
        let doge = chains.iter().find(|c| c["id"] == 2000).unwrap();
        assert_eq!(doge["hosts"], "doge.wf,dcdomain.wf");
    }

    #[test]
    fn render_skips_nulls() {
        let line = render_inline(&json!({"a": "x", "b": null, "c": 1}));
        assert_eq!(line, "a=x  c=1");
    }
}
