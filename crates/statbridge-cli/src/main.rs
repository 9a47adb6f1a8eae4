// Copyright (C) 2026  statbridge contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.
use anyhow::{Context, Result};
use clap::Parser;
use prometheus::Registry;
use reqwest::Url;
use statbridge_clusterinfo::{IdentityCache, Retriever};
use statbridge_config::{Config, ConfigLoader};
use statbridge_exporter::{IndicesCollector, MetricsServer};
use statbridge_observability::{init_tracing, LogFormat};
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

#[derive(Parser)]
#[command(name = "statbridge")]
#[command(version, about = "Elasticsearch index statistics exporter for Prometheus")]
#[command(author = "statbridge contributors")]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Base URL of the Elasticsearch cluster
    #[arg(long, value_name = "URL")]
    es_url: Option<String>,

    /// Address to serve metrics on (host:port)
    #[arg(long, value_name = "ADDR")]
    listen: Option<String>,

    /// Log level filter (error|warn|info|debug|trace)
    #[arg(long, value_name = "LEVEL")]
    log_level: Option<String>,

    /// Log output format (pretty|compact|json)
    #[arg(long, value_name = "FORMAT")]
    log_format: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to build tokio runtime")?;

    let config = runtime.block_on(load_config(&cli))?;

    let format = LogFormat::parse(&config.logging.format)?;
    init_tracing(format, Some(config.logging.level.as_str()))?;

    let base_url: Url = config
        .elasticsearch
        .url
        .parse()
        .with_context(|| format!("invalid elasticsearch URL: {}", config.elasticsearch.url))?;

    info!(
        cluster = %base_url,
        listen = %config.server.socket_addr(),
        "starting statbridge"
    );

    // The collector uses a blocking HTTP client, so it is built before
    // entering the runtime.
    let identity = IdentityCache::new();
    let collector = IndicesCollector::new(
        reqwest::blocking::Client::new(),
        base_url.clone(),
        identity.clone(),
    )
    .context("failed to build indices collector")?;

    let registry = Registry::new();
    registry
        .register(Box::new(collector))
        .context("failed to register indices collector")?;

    runtime.block_on(run(config, base_url, identity, registry))
}

async fn load_config(cli: &Cli) -> Result<Config> {
    let loader = ConfigLoader::new();

    let mut config = match &cli.config {
        Some(path) => loader
            .load_with_overrides(path)
            .await
            .with_context(|| format!("failed to load configuration from {}", path.display()))?,
        None => {
            let mut config = Config::default();
            loader.apply_env_overrides(&mut config)?;
            config
        }
    };

    if let Some(url) = &cli.es_url {
        config.elasticsearch.url = url.clone();
    }
    if let Some(listen) = &cli.listen {
        let (addr, port) = listen
            .rsplit_once(':')
            .context("--listen expects host:port")?;
        config.server.bind_address = addr.to_string();
        config.server.port = port
            .parse()
            .with_context(|| format!("invalid port in --listen: {}", port))?;
    }
    if let Some(level) = &cli.log_level {
        config.logging.level = level.clone();
    }
    if let Some(format) = &cli.log_format {
        config.logging.format = format.clone();
    }

    config.validate()?;
    Ok(config)
}

async fn run(
    config: Config,
    base_url: Url,
    identity: IdentityCache,
    registry: Registry,
) -> Result<()> {
    // Identity updates flow: retriever -> channel -> receive loop -> cache
    let identity_tx = identity.spawn_receiver();
    let retriever = Retriever::new(
        reqwest::Client::new(),
        base_url,
        Duration::from_secs(config.clusterinfo.poll_interval_secs),
    );
    tokio::spawn(retriever.run(identity_tx));

    MetricsServer::new(registry, config.server.socket_addr())
        .serve()
        .await
}
