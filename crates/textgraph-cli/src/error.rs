//! Errors surfaced by the CLI.

use std::{io, path::PathBuf};

use thiserror::Error;

use textgraph::{ConfigError, PipelineError, Stage};
use textgraph_extract::ExtractionError;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to parse TOML configuration {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },

    #[error("Missing configuration file: {0}")]
    MissingConfig(PathBuf),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigError),

    #[error("Failed to set up the model client: {0}")]
    Model(#[from] ExtractionError),

    #[error("Graph generation failed: {0}")]
    Pipeline(#[from] PipelineError),

    #[error("Failed to serialize result: {0}")]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Pipeline stage the failure belongs to, if any
    pub fn stage(&self) -> Option<Stage> {
        match self {
            Self::Pipeline(err) => err.stage(),
            Self::InvalidConfig(_) => Some(Stage::Validation),
            _ => None,
        }
    }
}
