use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;

fn default_rules_dir() -> PathBuf {
    PathBuf::from("signature-base/yara")
}

/// Top-level configuration from `.sigscan.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory searched recursively for `.yar`/`.yara` files.
    #[serde(default = "default_rules_dir")]
    pub rules_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rules_dir: default_rules_dir(),
        }
    }
}

impl Config {
    /// Load config from a TOML file. Returns default if file doesn't exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Generate a starter config file.
    pub fn starter_toml() -> &'static str {
        r#"# sigscan configuration

# Directory searched recursively for .yar/.yara rule files.
rules_dir = "signature-base/yara"
"#
    }
}
