use std::error::Error;
use std::path::{Path, PathBuf};

use quarry_gjk::DEFAULT_MAX_ITERATIONS;
use quarry_runtime::StreamParams;
use quarry_world::WorldGenParams;
use serde::Deserialize;

pub const DEFAULT_CONFIG_PATH: &str = "quarry.toml";

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct GjkConfig {
    pub max_iterations: u32,
}

impl Default for GjkConfig {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

/// Word list used by `quarry word`.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct DictionaryConfig {
    pub path: Option<PathBuf>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct QuarryConfig {
    pub stream: StreamParams,
    pub worldgen: WorldGenParams,
    pub gjk: GjkConfig,
    pub dictionary: DictionaryConfig,
}

impl QuarryConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, Box<dyn Error>> {
        Ok(toml::from_str(s)?)
    }

    pub fn load_from_path(path: &Path) -> Result<Self, Box<dyn Error>> {
        let s = std::fs::read_to_string(path)
            .map_err(|e| format!("read {}: {}", path.display(), e))?;
        let cfg = Self::from_toml_str(&s).map_err(|e| format!("parse {}: {}", path.display(), e))?;
        log::info!("loaded config from {}", path.display());
        Ok(cfg)
    }

    /// An explicit path must exist. Without one, `quarry.toml` is read if
    /// present and defaults are used otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self, Box<dyn Error>> {
        match path {
            Some(p) => Self::load_from_path(p),
            None => {
                let p = Path::new(DEFAULT_CONFIG_PATH);
                if p.exists() {
                    Self::load_from_path(p)
                } else {
                    log::debug!("no {} found, using defaults", DEFAULT_CONFIG_PATH);
                    Ok(Self::default())
                }
            }
        }
    }
}
