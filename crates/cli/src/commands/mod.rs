use clap::Subcommand;
use diskcache::DiskCache;
use std::path::PathBuf;

mod entry;
mod maintenance;

#[derive(Subcommand)]
pub enum Commands {
    /// Write the value stored under KEY to stdout
    Get { key: String },

    /// Store a value under KEY, read from --file or stdin
    Set {
        key: String,

        /// Read the value from this file instead of stdin
        #[arg(short, long, value_name = "PATH")]
        file: Option<PathBuf>,
    },

    /// Remove the entry stored under KEY
    #[command(visible_alias = "rm")]
    Delete { key: String },

    /// List stored storage keys
    #[command(visible_alias = "ls")]
    Keys {
        /// Only list storage keys starting with this hex prefix
        #[arg(long, value_name = "HEX")]
        prefix: Option<String>,
    },

    /// Print the storage key and on-disk path for KEY
    Path { key: String },

    /// Remove every entry
    Clear,
}

impl Commands {
    pub async fn execute(self, cache: &DiskCache) -> eyre::Result<()> {
        let store = cache.store();
        match self {
            Commands::Get { key } => entry::get(store, &key).await,
            Commands::Set { key, file } => entry::set(store, &key, file).await,
            Commands::Delete { key } => entry::delete(store, &key).await,
            Commands::Path { key } => {
                entry::path(store, &key);
                Ok(())
            }
            Commands::Keys { prefix } => maintenance::keys(store, prefix.as_deref()).await,
            Commands::Clear => maintenance::clear(store).await,
        }
    }
}
