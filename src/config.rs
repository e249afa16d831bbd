//! Optional `braid.toml` configuration: viewer defaults and the data source.
//!
//! Looked up in the working directory; a missing file means defaults. CLI
//! arguments always win over config values.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::Deserialize;

use crate::layout::Orientation;

pub const CONFIG_FILE: &str = "braid.toml";

#[derive(Debug, Clone)]
pub struct Config {
    /// Default posts export (path or http(s) URL).
    pub source: Option<String>,
    pub orientation: Orientation,
    pub show_names: bool,
    /// Layout transition length in milliseconds. Zero disables animation.
    pub transition_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source: None,
            orientation: Orientation::Horizontal,
            show_names: true,
            transition_ms: 750,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    source: Option<String>,
    orientation: Option<String>,
    show_names: Option<bool>,
    transition_ms: Option<u64>,
}

impl Config {
    pub fn load(dir: &Path) -> Result<Self> {
        let path = dir.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }
        let content =
            fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let raw: RawConfig = toml::from_str(content).context("parsing braid.toml")?;
        let defaults = Self::default();

        let orientation = match raw.orientation.as_deref() {
            None => defaults.orientation,
            Some("horizontal") => Orientation::Horizontal,
            Some("vertical") => Orientation::Vertical,
            Some(other) => {
                bail!("unknown orientation '{other}' (expected horizontal or vertical)")
            }
        };

        Ok(Self {
            source: raw.source,
            orientation,
            show_names: raw.show_names.unwrap_or(defaults.show_names),
            transition_ms: raw.transition_ms.unwrap_or(defaults.transition_ms),
        })
    }
}
