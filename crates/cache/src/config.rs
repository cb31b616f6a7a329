//! Cache configuration with defaults, environment overrides and validation
use crate::core::ShardLayout;
use crate::errors::{CacheError, RecoveryHint, Result};
use diskcache_utils::xdg::XdgPaths;
use std::env;
use std::path::PathBuf;

/// Default in-memory tier budget (100 MiB)
pub const DEFAULT_MEMORY_BUDGET: u64 = 100 * 1024 * 1024;

/// Default capacity of the pipe between a writer sink and its persist task
pub const DEFAULT_PIPE_CAPACITY: usize = 64 * 1024;

/// Overrides the base directory
pub const ENV_CACHE_DIR: &str = "DISKCACHE_DIR";

/// Overrides the memory budget, in bytes
pub const ENV_MEMORY_BUDGET: &str = "DISKCACHE_MEMORY_BUDGET";

/// Configuration for a disk-backed store
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Base directory for cache storage
    pub base_dir: PathBuf,
    /// Maximum bytes kept in the in-memory tier
    pub memory_budget_bytes: u64,
    /// Number of nested shard directories
    pub shard_depth: usize,
    /// Hex characters of the storage key per shard directory
    pub shard_width: usize,
    /// fsync every entry before it becomes visible
    pub sync_writes: bool,
    /// Bytes buffered between a writer sink and its background persist task
    pub pipe_capacity: usize,
    /// Unix permission bits for entry files (unix only)
    pub file_mode: Option<u32>,
    /// Where the configuration came from
    pub source: ConfigSource,
}

impl Default for CacheConfig {
    fn default() -> Self {
        // Use XDG cache directory which respects XDG_CACHE_HOME
        Self {
            base_dir: XdgPaths::cache_dir(),
            memory_budget_bytes: DEFAULT_MEMORY_BUDGET,
            shard_depth: ShardLayout::DEFAULT_DEPTH,
            shard_width: ShardLayout::DEFAULT_WIDTH,
            sync_writes: true,
            pipe_capacity: DEFAULT_PIPE_CAPACITY,
            file_mode: None,
            source: ConfigSource::Default,
        }
    }
}

impl CacheConfig {
    /// Configuration rooted at `base_dir` with the given memory budget
    pub fn new(base_dir: impl Into<PathBuf>, memory_budget_bytes: u64) -> Self {
        Self {
            base_dir: base_dir.into(),
            memory_budget_bytes,
            source: ConfigSource::Explicit,
            ..Self::default()
        }
    }

    /// Defaults with `DISKCACHE_DIR` / `DISKCACHE_MEMORY_BUDGET` applied
    pub fn from_env() -> Result<Self> {
        Self::default().with_env_overrides()
    }

    /// Apply environment overrides on top of this configuration
    pub fn with_env_overrides(mut self) -> Result<Self> {
        if let Some(dir) = env::var_os(ENV_CACHE_DIR) {
            if !dir.is_empty() {
                self.base_dir = PathBuf::from(dir);
                self.source = ConfigSource::EnvironmentVariable(ENV_CACHE_DIR.to_string());
            }
        }

        if let Ok(budget) = env::var(ENV_MEMORY_BUDGET) {
            self.memory_budget_bytes = match budget.trim().parse::<u64>() {
                Ok(bytes) => bytes,
                Err(e) => {
                    return Err(CacheError::Configuration {
                        message: format!("{ENV_MEMORY_BUDGET}={budget:?} is not a byte count: {e}"),
                        recovery_hint: RecoveryHint::UseDefault {
                            value: DEFAULT_MEMORY_BUDGET.to_string(),
                        },
                    });
                }
            };
            self.source = ConfigSource::EnvironmentVariable(ENV_MEMORY_BUDGET.to_string());
        }

        Ok(self)
    }

    /// Validate the configuration and derive its shard layout
    pub fn validate(&self) -> Result<ShardLayout> {
        if self.base_dir.as_os_str().is_empty() {
            return Err(CacheError::configuration("base directory must not be empty"));
        }

        if self.pipe_capacity == 0 {
            return Err(CacheError::Configuration {
                message: "pipe capacity must be at least one byte".to_string(),
                recovery_hint: RecoveryHint::UseDefault {
                    value: DEFAULT_PIPE_CAPACITY.to_string(),
                },
            });
        }

        ShardLayout::new(self.shard_depth, self.shard_width)
    }
}

/// Source of configuration for debugging and precedence tracking
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Default configuration
    Default,
    /// Environment variable
    EnvironmentVariable(String),
    /// Constructed by the caller
    Explicit,
}

/// Builder for creating cache configurations
#[derive(Debug, Default)]
pub struct CacheConfigBuilder {
    config: CacheConfig,
}

impl CacheConfigBuilder {
    /// Create a new builder with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Set base directory
    pub fn with_base_dir(mut self, base_dir: impl Into<PathBuf>) -> Self {
        self.config.base_dir = base_dir.into();
        self.config.source = ConfigSource::Explicit;
        self
    }

    /// Set the in-memory tier budget
    pub fn with_memory_budget(mut self, bytes: u64) -> Self {
        self.config.memory_budget_bytes = bytes;
        self
    }

    /// Set shard depth and width
    pub fn with_shard_layout(mut self, depth: usize, width: usize) -> Self {
        self.config.shard_depth = depth;
        self.config.shard_width = width;
        self
    }

    pub fn with_sync_writes(mut self, sync: bool) -> Self {
        self.config.sync_writes = sync;
        self
    }

    pub fn with_pipe_capacity(mut self, bytes: usize) -> Self {
        self.config.pipe_capacity = bytes;
        self
    }

    /// Set unix permission bits for entry files
    pub fn with_file_mode(mut self, mode: u32) -> Self {
        self.config.file_mode = Some(mode);
        self
    }

    /// Apply environment overrides
    pub fn with_env_overrides(mut self) -> Result<Self> {
        self.config = self.config.with_env_overrides()?;
        Ok(self)
    }

    /// Build the final configuration
    pub fn build(self) -> Result<CacheConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
