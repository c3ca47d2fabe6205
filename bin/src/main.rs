#![allow(clippy::cognitive_complexity)]
use anyhow::{Context, Result};

mod activation;

use activation::Activation;
use config::{ClientProperties, ConfigBuilder};
use grid_client::ClientRegistry;
use grid_core::{
    config::{
        cli::{self, Parser},
        trace,
    },
    metrics::{self, START_TIME},
    tokio::{self, runtime::Builder, signal},
    tracing::*,
};

#[cfg(not(target_env = "musl"))]
use jemallocator::Jemalloc;

#[cfg(not(target_env = "musl"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

fn main() -> Result<()> {
    // .env first so its values reach the env fallbacks below
    let dotenv_res = dotenv::dotenv();
    // parses from cli or environment var
    let config = cli::Config::parse();
    let trace_config = trace::Config::parse(&config.grid_log, &config.log_format)?;
    debug!(?config, ?trace_config);
    if let Err(err) = dotenv_res {
        debug!(?err, ".env file not loaded");
    }

    let mut builder = Builder::new_multi_thread();
    // configure thread name & enable IO/time
    builder.thread_name(&config.thread_name).enable_all();
    // default num threads will be num logical CPUs
    if let Some(num) = config.threads {
        builder.worker_threads(num);
    }
    let rt = builder.build()?;

    rt.block_on(async move {
        match tokio::spawn(async move { start(config).await }).await {
            Err(err) => {
                error!(?err, "client task failed");
                Err(err.into())
            }
            Ok(Err(err)) => {
                error!(?err, "exited with error");
                Err(err)
            }
            Ok(Ok(())) => {
                debug!("exiting...");
                Ok(())
            }
        }
    })
}

async fn start(config: cli::Config) -> Result<()> {
    debug!(start_time = ?*START_TIME, "starting data grid client");
    debug!(path = %config.properties_path.display(), "loading client properties");
    let props = ClientProperties::parse(&config.properties_path)?;

    let provider = match activation::decide(&props, activation::discovery_provider(&config)?) {
        Activation::Disabled => {
            info!("data grid client disabled in properties, not connecting");
            return Ok(());
        }
        Activation::NoDiscovery => {
            info!("no discovery provider configured, not connecting");
            return Ok(());
        }
        Activation::Enabled(provider) => provider,
    };

    let client_config =
        ConfigBuilder::build(&props, provider).context("failed to build data grid client config")?;

    let registry = ClientRegistry::new();
    let client = registry
        .get_or_try_init(client_config)
        .await
        .context("failed to create data grid client")?;
    info!(
        member = %client.member(),
        members = ?client.members(),
        cluster_name = ?client.cluster_name(),
        "data grid client ready"
    );

    signal::ctrl_c()
        .await
        .context("failed to listen for shutdown signal")?;
    info!(
        uptime_secs = START_TIME.elapsed().as_secs(),
        "shutting down data grid client"
    );
    match metrics::encode_text() {
        Ok(text) => info!(metrics = %text, "final client metrics"),
        Err(err) => error!(?err, "error text encoding prometheus metrics"),
    }
    Ok(())
}
