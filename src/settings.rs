use std::path::PathBuf;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

const CONFIG_FILE: &str = "yagl";
const ENV_PREFIX: &str = "YAGL";

/// Defaults, then `yagl.toml` in the working directory, then `YAGL_*`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// `env_logger` filter used when no `-v` is given.
    pub log_level: String,
    /// Where outputs go when `-o` is absent. Next to the input if unset.
    pub output_dir: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
            output_dir: None,
        }
    }
}

impl Settings {
    pub fn load() -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::with_name(CONFIG_FILE).required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX))
            .build()?
            .try_deserialize()
    }
}
