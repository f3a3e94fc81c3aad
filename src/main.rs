use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use truenas_provider::config::Config;
use truenas_provider::framework::{ConfigureRequest, ReadRequest};
use truenas_provider::provider::TrueNasProvider;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/Default.toml")]
    config: String,

    /// TrueNAS host (overrides config)
    #[arg(long, env = "TRUENAS_HOST")]
    truenas_host: Option<String>,

    /// TrueNAS API key (overrides config)
    #[arg(long, env = "TRUENAS_API_KEY")]
    truenas_api_key: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print data source schemas as JSON
    Schema {
        /// Full type name, e.g. truenas_pool; all data sources when omitted
        data_source: Option<String>,
    },
    /// Read a data source and print its state as JSON
    Read {
        /// Full type name, e.g. truenas_pool
        data_source: String,

        /// Configuration object, e.g. '{"name": "tank"}'
        #[arg(short, long, default_value = "{}")]
        input: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr; stdout carries JSON only
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    let mut config = Config::load(&args.config)?;
    if let Some(host) = args.truenas_host {
        config.truenas.host = host;
    }
    if let Some(api_key) = args.truenas_api_key {
        config.truenas.api_key = secrecy::SecretString::new(api_key.into());
    }

    let provider = TrueNasProvider::new(config.provider.type_name.clone());

    match args.command {
        Command::Schema { data_source } => print_schemas(&provider, data_source.as_deref()),
        Command::Read { data_source, input } => {
            read(&provider, &config, &data_source, &input).await
        }
    }
}

fn print_schemas(provider: &TrueNasProvider, only: Option<&str>) -> Result<()> {
    let req = provider.metadata_request();
    let mut schemas = serde_json::Map::new();
    for ds in provider.data_sources() {
        let name = ds.metadata(&req).type_name;
        if only.map_or(true, |o| o == name) {
            schemas.insert(name, serde_json::to_value(ds.schema())?);
        }
    }
    if schemas.is_empty() {
        bail!("Unknown data source: {}", only.unwrap_or_default());
    }
    println!("{}", serde_json::to_string_pretty(&schemas)?);
    Ok(())
}

async fn read(provider: &TrueNasProvider, config: &Config, name: &str, input: &str) -> Result<()> {
    let mut data_source = provider.data_source(name).with_context(|| {
        format!(
            "Unknown data source {}; available: {}",
            name,
            provider.data_source_names().join(", ")
        )
    })?;
    let payload: serde_json::Value =
        serde_json::from_str(input).context("Failed to parse --input as JSON")?;

    info!("TrueNAS host: {}", config.truenas.host);
    let registry = Arc::new(provider.connect(&config.truenas));
    let diags = data_source.configure(ConfigureRequest::new(registry));
    if diags.has_error() {
        for d in &diags {
            error!("{}", d);
        }
        bail!("Failed to configure {}", name);
    }

    // The host owns the deadline; the data source only observes the token
    let cancel = CancellationToken::new();
    let timeout = Duration::from_secs(config.provider.request_timeout_seconds);
    let watchdog = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = tokio::time::sleep(timeout) => warn!("Read timed out after {:?}", timeout),
                _ = tokio::signal::ctrl_c() => warn!("Interrupted, aborting read"),
            }
            cancel.cancel();
        })
    };

    let response = data_source
        .read(ReadRequest::new(payload).with_cancel(cancel))
        .await;
    watchdog.abort();

    if let Some(state) = response.state {
        println!("{}", serde_json::to_string_pretty(&state)?);
    }
    if response.diagnostics.has_error() {
        eprintln!("{}", serde_json::to_string_pretty(&response.diagnostics)?);
        std::process::exit(1);
    }
    Ok(())
}
