//! ChainName - name resolution and redirect service

use anyhow::Context;
use chainname_server::{init_tracing, run, ServerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::from_env().context("invalid configuration")?;
    init_tracing(&config.log).context("failed to install tracing subscriber")?;

    tracing::info!("Starting ChainName resolution service");

    run(config).await?;

    Ok(())
}
