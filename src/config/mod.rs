mod basic;
mod upstream;

pub use basic::BasicConfig;
pub use upstream::{UpstreamConfig, UpstreamContract};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Application configuration managed by Figment.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    /// Core server configuration (see `basic` table in config.toml).
    #[serde(default)]
    pub basic: BasicConfig,

    /// Upstream image API settings (see `upstream` table in config.toml).
    #[serde(default)]
    pub upstream: UpstreamConfig,
}

const DEFAULT_CONFIG_FILE: &str = "config.toml";
const ENV_PREFIX: &str = "LUMEN_";

impl Config {
    /// Builds a Figment that merges defaults, an optional config TOML file and
    /// `LUMEN_`-prefixed environment variables (`__` separates nested keys).
    pub fn figment() -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));
        if PathBuf::from(DEFAULT_CONFIG_FILE).is_file() {
            figment = figment.merge(Toml::file(DEFAULT_CONFIG_FILE));
        }
        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Loads and validates configuration.
    pub fn load() -> Result<Self, figment::Error> {
        Self::from_figment(Self::figment())
    }

    pub fn from_figment(figment: Figment) -> Result<Self, figment::Error> {
        let cfg: Self = figment.extract()?;
        cfg.upstream.validate()?;
        Ok(cfg)
    }
}
