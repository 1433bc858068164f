use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{PoolError, Result};

/// Engine tuning knobs supplied by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Evaluate entries on the rayon pool
    pub parallel: bool,
    /// Size of a dedicated rayon pool; `None` uses the global pool
    pub threads: Option<usize>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            parallel: true,
            threads: None,
        }
    }
}

impl EngineConfig {
    /// Sequential evaluation on the calling thread
    pub fn sequential() -> Self {
        Self {
            parallel: false,
            threads: None,
        }
    }

    /// Parse a config from TOML; missing keys fall back to defaults.
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: EngineConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.threads == Some(0) {
            return Err(PoolError::config("threads must be at least 1"));
        }
        Ok(())
    }

    /// Run `op` on the configured thread pool.
    ///
    /// Falls back to the calling context if a dedicated pool cannot be built.
    pub fn install<R, F>(&self, op: F) -> R
    where
        R: Send,
        F: FnOnce() -> R + Send,
    {
        let threads = match self.threads {
            Some(n) if self.parallel => n,
            _ => return op(),
        };
        match rayon::ThreadPoolBuilder::new().num_threads(threads).build() {
            Ok(pool) => pool.install(op),
            Err(err) => {
                warn!(threads, error = %err, "could not build thread pool, using global pool");
                op()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_toml() {
        let config = EngineConfig::from_toml("").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert!(config.parallel);
    }

    #[test]
    fn test_partial_toml() {
        let config = EngineConfig::from_toml("threads = 2").unwrap();
        assert_eq!(config.threads, Some(2));
        assert!(config.parallel);
    }

    #[test]
    fn test_zero_threads_rejected() {
        let err = EngineConfig::from_toml("threads = 0").unwrap_err();
        assert!(matches!(err, PoolError::Config(_)));
    }

    #[test]
    fn test_malformed_toml() {
        let err = EngineConfig::from_toml("parallel = \"sometimes\"").unwrap_err();
        assert!(matches!(err, PoolError::Toml(_)));
    }

    #[test]
    fn test_install_runs_on_dedicated_pool() {
        let config = EngineConfig {
            parallel: true,
            threads: Some(2),
        };
        assert_eq!(config.install(rayon::current_num_threads), 2);
        assert_eq!(EngineConfig::sequential().install(|| 7), 7);
    }
}
