use clap::Parser;
use mcserver::config::Config;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::prelude::*;

/// Arguments to configure this runtime of the application before it is started. `server_address`
/// only overrides [`Config`]'s own environment/file sources (see [`mcserver::config`]) when the
/// flag or its env var is actually supplied; otherwise the layered config value stands.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    #[arg(long, env, default_value = "INFO")]
    log_level: LevelFilter,
    #[arg(long, env)]
    server_address: Option<String>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_filter(args.log_level),
        )
        .init();

    let mut config = Config::read()?;
    if let Some(server_address) = args.server_address {
        config.server_address = server_address;
    }

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .unwrap()
        .block_on(async { mcserver::start(config).await })?;

    Ok(())
}
