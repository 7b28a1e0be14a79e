use std::path::Path;

use anyhow::Result;
use figment::{
    providers::{Env, Format, Json, Serialized, Toml},
    Figment,
};

use crate::config::TrackerConfig;

const ENV_PREFIX: &str = "TRACKER_";

pub struct ConfigLoader;

impl ConfigLoader {
    /// Loads configuration from `<dir>/Tracker.toml`, `TRACKER_` environment
    /// variables and `<dir>/Tracker.json`, over built-in defaults.
    ///
    /// Nested keys use `__` in variable names, e.g.
    /// `TRACKER_ORDERS__PLACE_ORDERS=true`. Missing files are skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if a present source cannot be parsed.
    pub fn load(dir: impl AsRef<Path>) -> Result<TrackerConfig> {
        let dir = dir.as_ref();
        let config: TrackerConfig = Self::base(dir)
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .join(Json::file(dir.join("Tracker.json")))
            .extract()?;

        Ok(config)
    }

    /// Like [`ConfigLoader::load`], with `<dir>/Tracker.<profile>.toml`
    /// layered over the base file.
    ///
    /// # Errors
    ///
    /// Returns an error if a present source cannot be parsed.
    pub fn load_with_profile(dir: impl AsRef<Path>, profile: &str) -> Result<TrackerConfig> {
        let dir = dir.as_ref();
        let config: TrackerConfig = Self::base(dir)
            .merge(Toml::file(dir.join(format!("Tracker.{profile}.toml"))))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .join(Json::file(dir.join("Tracker.json")))
            .extract()?;

        Ok(config)
    }

    fn base(dir: &Path) -> Figment {
        Figment::from(Serialized::defaults(TrackerConfig::default()))
            .merge(Toml::file(dir.join("Tracker.toml")))
    }
}
