use clap::Parser;
use diskcache::{CacheConfig, ConfigSource, DiskCache};
use std::path::PathBuf;

mod commands;

use commands::Commands;

#[derive(Parser)]
#[command(name = "diskcache")]
#[command(about = "Read and write entries of a diskcache directory", long_about = None)]
#[command(version)]
struct Cli {
    /// Cache directory (default: $DISKCACHE_DIR, then $XDG_CACHE_HOME/diskcache)
    #[arg(long, global = true, value_name = "DIR")]
    dir: Option<PathBuf>,

    /// Bytes of recently read values kept in memory
    #[arg(long, global = true, value_name = "BYTES")]
    memory_budget: Option<u64>,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, global = true, value_name = "LEVEL", default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    /// Defaults, then environment, then flags
    fn cache_config(&self) -> eyre::Result<CacheConfig> {
        let mut config = CacheConfig::from_env()?;

        if let Some(dir) = &self.dir {
            config.base_dir = dir.clone();
            config.source = ConfigSource::Explicit;
        }
        if let Some(budget) = self.memory_budget {
            config.memory_budget_bytes = budget;
            config.source = ConfigSource::Explicit;
        }

        Ok(config)
    }
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    let cli = Cli::parse();

    if let Err(e) = diskcache_utils::tracing::init(&cli.log_level) {
        eyre::bail!("failed to initialise logging: {e}");
    }

    let config = cli.cache_config()?;
    tracing::debug!(
        base_dir = %config.base_dir.display(),
        source = ?config.source,
        "opening cache"
    );

    let cache = DiskCache::open(config).await?;
    cli.command.execute(&cache).await
}
