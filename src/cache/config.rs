use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use super::error::{Error, Result};
use super::response::WELCOME_BANNER;

/// Server settings, loadable from a JSON file. Every field has a default so a
/// partial file (or none at all) is valid.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address the listener binds to.
    pub listen: String,

    /// First line sent on every new connection.
    pub banner: String,

    /// Entries loaded into the store before the first connection is accepted.
    pub seed: BTreeMap<String, String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            banner: WELCOME_BANNER.to_string(),
            seed: BTreeMap::new(),
        }
    }
}

fn default_listen() -> String {
    "0.0.0.0:12345".to_string()
}

impl ServerConfig {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.listen.trim().is_empty() {
            return Err(Error::Config("listen address must not be empty".into()));
        }
        if self.banner.contains('\n') {
            return Err(Error::Config("banner must be a single line".into()));
        }
        for (key, value) in &self.seed {
            check_entry(key, value)?;
        }
        Ok(())
    }

    /// Adds a `key=value` seed entry, replacing any earlier value for the key.
    pub fn add_seed(&mut self, spec: &str) -> Result<()> {
        let (key, value) = parse_seed(spec)?;
        self.seed.insert(key, value);
        Ok(())
    }
}

fn parse_seed(spec: &str) -> Result<(String, String)> {
    let (key, value) = spec
        .split_once('=')
        .ok_or_else(|| Error::Config(format!("seed '{spec}' is not key=value")))?;
    check_entry(key, value)?;
    Ok((key.to_string(), value.to_string()))
}

// Seeded entries must be reachable through the line protocol.
fn check_entry(key: &str, value: &str) -> Result<()> {
    if key.is_empty() || key.contains(char::is_whitespace) {
        return Err(Error::Config(format!("invalid seed key '{key}'")));
    }
    if value.contains(['\r', '\n']) {
        return Err(Error::Config(format!("seed value for '{key}' spans lines")));
    }
    Ok(())
}
