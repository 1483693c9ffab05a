//! CLI configuration management.
//!
//! Consolidates all environment variable reads and provides validated configuration.
//! Command-line flags override the environment.

use std::path::PathBuf;

use league_engine::DEFAULT_DIVISION_NAME;

/// Default snapshot file
pub const DEFAULT_DATA_PATH: &str = "league.json";

/// Complete CLI configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliConfig {
    /// JSON snapshot of every tournament
    pub data_path: PathBuf,
    /// Seed for reproducible fixture shuffles
    pub seed: Option<u64>,
    /// Name of the division a new tournament starts with
    pub initial_division: String,
}

impl CliConfig {
    /// Load configuration from environment variables
    ///
    /// # Arguments
    ///
    /// * `data_override` - Snapshot path override (from CLI args)
    /// * `seed_override` - Seed override (from CLI args)
    ///
    /// # Errors
    ///
    /// Returns error if `LEAGUE_SEED` is set but is not an unsigned integer
    pub fn from_env(
        data_override: Option<PathBuf>,
        seed_override: Option<u64>,
    ) -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok(), data_override, seed_override)
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(
        lookup: F,
        data_override: Option<PathBuf>,
        seed_override: Option<u64>,
    ) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let data_path = data_override.unwrap_or_else(|| {
            parse_var_or(&lookup, "LEAGUE_DATA", PathBuf::from(DEFAULT_DATA_PATH))
        });

        let seed = match seed_override {
            Some(seed) => Some(seed),
            None => lookup("LEAGUE_SEED")
                .map(|raw| {
                    raw.trim().parse::<u64>().map_err(|_| ConfigError::Invalid {
                        var: "LEAGUE_SEED".to_string(),
                        reason: format!("'{raw}' is not an unsigned integer"),
                    })
                })
                .transpose()?,
        };

        let initial_division = parse_var_or(
            &lookup,
            "LEAGUE_INITIAL_DIVISION",
            DEFAULT_DIVISION_NAME.to_string(),
        );

        Ok(CliConfig {
            data_path,
            seed,
            initial_division,
        })
    }

    /// Validate configuration after loading
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.data_path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid {
                var: "LEAGUE_DATA".to_string(),
                reason: "Must not be empty".to_string(),
            });
        }

        if self.initial_division.trim().is_empty() {
            return Err(ConfigError::Invalid {
                var: "LEAGUE_INITIAL_DIVISION".to_string(),
                reason: "Must not be blank".to_string(),
            });
        }

        Ok(())
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration for {var}: {reason}")]
    Invalid { var: String, reason: String },
}

/// Helper to parse a variable with default fallback
fn parse_var_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    lookup(key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
