use std::env;
use std::path::PathBuf;

/// Name of the per-user directory diskcache keeps its data under
pub const APP_DIR_NAME: &str = "diskcache";

/// XDG Base Directory paths for diskcache
pub struct XdgPaths;

impl XdgPaths {
    /// Get XDG_CACHE_HOME/diskcache or fallback
    pub fn cache_dir() -> PathBuf {
        Self::cache_home().join(APP_DIR_NAME)
    }

    fn cache_home() -> PathBuf {
        env::var_os("XDG_CACHE_HOME")
            .filter(|dir| !dir.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| {
                dirs::home_dir()
                    .map(|home| home.join(".cache"))
                    .unwrap_or_else(|| PathBuf::from(".cache"))
            })
    }
}
