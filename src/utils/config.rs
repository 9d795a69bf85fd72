use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, Environment, File};
use serde::Deserialize;

use crate::error::Result;

pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:5000/";

/// Looked up in the working directory (any format `config` understands) when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "timetable-viewer";

pub const ENV_PREFIX: &str = "TIMETABLE";

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct AppConfig {
    pub api_base_url: String,
    pub request_timeout_secs: u64,
    pub output_dir: PathBuf,
}

impl AppConfig {
    /// Defaults, then the config file, then `TIMETABLE_*` environment variables.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let builder = Config::builder()
            .set_default("api_base_url", DEFAULT_API_BASE_URL)?
            .set_default("request_timeout_secs", 30_i64)?
            .set_default("output_dir", ".")?;

        let builder = match path {
            Some(path) => builder.add_source(File::from(path).required(true)),
            None => builder.add_source(File::with_name(DEFAULT_CONFIG_FILE).required(false)),
        };

        let config = builder
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?;
        let config: AppConfig = config.try_deserialize()?;
        log::debug!("loaded configuration: {:?}", config);
        Ok(config)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
