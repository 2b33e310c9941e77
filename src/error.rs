use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, SigscanError>;

#[derive(Error, Debug)]
pub enum SigscanError {
    #[error("target file not found: {}", .0.display())]
    TargetNotFound(PathBuf),

    #[error("no YARA rule files found in {}", .0.display())]
    NoRulesFound(PathBuf),

    #[error(
        "identifier \"{identifier}\" still undefined after a default was supplied: {message}"
    )]
    UndefinedIdentifierLoop { identifier: String, message: String },

    #[error("rule compilation failed: {0}")]
    Compile(String),

    #[error("scan failed: {0}")]
    Scan(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl SigscanError {
    /// Stable per-category exit codes so calling automation can branch on
    /// why a scan could not run. Codes 0 and 100 are reserved for completed
    /// scans (no detections / detections present).
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::TargetNotFound(_) => 3,
            Self::NoRulesFound(_) => 4,
            Self::UndefinedIdentifierLoop { .. } | Self::Compile(_) => 5,
            Self::Scan(_) => 6,
            _ => 1,
        }
    }
}
