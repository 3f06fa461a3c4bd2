use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use simple_cache::cache::{MemoryStore, Server, ServerConfig};

#[derive(Parser, Debug)]
#[command(author, version, about = "In-memory key-value cache over a line protocol")]
struct Args {
    /// Socket address to listen on (overrides the config file).
    #[arg(long)]
    listen: Option<String>,

    /// JSON config file with `listen`, `banner` and `seed` fields.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Preload an entry, as key=value. May be repeated.
    #[arg(long = "seed", value_name = "KEY=VALUE")]
    seeds: Vec<String>,
}

fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt().with_env_filter(filter).with_target(false).try_init();
}

fn load_config(args: &Args) -> Result<ServerConfig> {
    let mut config = match &args.config {
        Some(path) => ServerConfig::from_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => ServerConfig::default(),
    };

    if let Some(listen) = &args.listen {
        config.listen = listen.clone();
    }
    for seed in &args.seeds {
        config.add_seed(seed)?;
    }
    config.validate()?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let args = Args::parse();
    let config = load_config(&args)?;

    let store = MemoryStore::with_entries(config.seed.clone()).shared();
    let server = Server::bind(&config.listen, store)
        .await
        .context("cannot start listener")?
        .with_banner(config.banner.as_str());

    info!(
        "simple-cache listening on {} ({} seeded entries)",
        server.local_addr()?,
        config.seed.len()
    );
    server.run_until_ctrl_c().await?;

    Ok(())
}
