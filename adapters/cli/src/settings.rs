//! Loading of the game configuration from TOML and command-line overrides.

use std::{fs, path::Path};

use ananas_core::GameConfig;
use anyhow::{Context, Result};

/// Values given on the command line; each one replaces the file's setting.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct Overrides {
    pub(crate) seed: Option<u64>,
    pub(crate) width: Option<u32>,
    pub(crate) height: Option<u32>,
    pub(crate) markers: Option<usize>,
}

/// Reads the configuration file, or falls back to the defaults without one.
pub(crate) fn load(path: Option<&Path>) -> Result<GameConfig> {
    let Some(path) = path else {
        return Ok(GameConfig::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    parse(&text).with_context(|| format!("failed to parse config file {}", path.display()))
}

fn parse(text: &str) -> Result<GameConfig, toml::de::Error> {
    toml::from_str(text)
}

/// Layers the overrides on top of `config` and validates the result.
pub(crate) fn resolve(mut config: GameConfig, overrides: &Overrides) -> Result<GameConfig> {
    if let Some(seed) = overrides.seed {
        config.seed = Some(seed);
    }
    if let Some(width) = overrides.width {
        config.width = width;
    }
    if let Some(height) = overrides.height {
        config.height = height;
    }
    if let Some(markers) = overrides.markers {
        config.marker_count = markers;
    }
    config.validate().context("invalid game configuration")?;
    Ok(config)
}
