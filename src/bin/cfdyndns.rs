//! Keeps a Cloudflare DNS record pointed at the public address of this host
use std::path::PathBuf;

use clap::Parser;
use tokio::signal;
use tracing::{error, info, level_filters::LevelFilter};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};
use whatismyip::{config::UpdaterConfig, updater::Updater};

#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Path to config file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> whatismyip::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .with(fmt::layer())
        .init();

    let args = Args::parse();
    let config = UpdaterConfig::load(&args.config).inspect_err(|err| {
        error!(path = %args.config.display(), %err, "failed to load config");
    })?;

    info!(
        record = %config.cloudflare.record,
        resolver = %config.public_ip_resolver,
        "starting"
    );
    let updater = Updater::connect(&config).await?;
    updater
        .run(async {
            if let Err(err) = signal::ctrl_c().await {
                error!(%err, "failed to listen for ctrl-c");
                std::future::pending::<()>().await;
            }
        })
        .await;
    Ok(())
}
