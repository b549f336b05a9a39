//! Error types for the textgraph pipeline.
//!
//! Each stage has its own error type. [`PipelineError`] wraps them and tags
//! every failure with the [`Stage`] that produced it, so callers can report
//! where a request failed without exposing internals.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use textgraph_core::color::ColorError;
use textgraph_extract::ExtractionError;

/// Pipeline stage a failure is attributed to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Extraction,
    Validation,
    Layout,
    Render,
}

impl Stage {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Extraction => "extraction",
            Self::Validation => "validation",
            Self::Layout => "layout",
            Self::Render => "render",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Invalid configuration or per-request options
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    #[error("canvas must be between 1x1 and {max}x{max} pixels, got {width}x{height}")]
    Canvas { width: u32, height: u32, max: u32 },

    #[error("`{field}` must be {expected}, got {value}")]
    OutOfRange {
        field: &'static str,
        expected: &'static str,
        value: String,
    },

    #[error(transparent)]
    Color(#[from] ColorError),
}

impl ConfigError {
    pub(crate) fn out_of_range(
        field: &'static str,
        expected: &'static str,
        value: impl fmt::Display,
    ) -> Self {
        Self::OutOfRange {
            field,
            expected,
            value: value.to_string(),
        }
    }
}

#[derive(Debug, Clone, Error)]
pub enum LayoutError {
    #[error("force simulation produced a non-finite position at tick {tick}")]
    Diverged { tick: usize },
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("generated SVG could not be parsed: {0}")]
    Svg(#[from] resvg::usvg::Error),

    #[error("cannot allocate a {width}x{height} pixmap")]
    Pixmap { width: u32, height: u32 },

    #[error("PNG encoding failed: {0}")]
    Encode(String),
}

/// The main error type for pipeline runs.
///
/// # Public messages
///
/// [`Display`](fmt::Display) carries full detail for logs. Responses sent to
/// untrusted callers should use [`PipelineError::public_message`] instead,
/// which never includes model output, URLs or file paths.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("extraction failed: {0}")]
    Extraction(#[from] ExtractionError),

    #[error("input has {actual} characters, the limit is {limit}")]
    InputTooLarge { actual: usize, limit: usize },

    #[error("invalid options: {0}")]
    Config(#[from] ConfigError),

    #[error("layout failed: {0}")]
    Layout(#[from] LayoutError),

    #[error("rendering failed: {0}")]
    Render(#[from] RenderError),

    #[error("request was cancelled")]
    Cancelled,
}

impl PipelineError {
    /// Stage that produced the error; `None` for cancellation.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            Self::Extraction(_) => Some(Stage::Extraction),
            Self::InputTooLarge { .. } | Self::Config(_) => Some(Stage::Validation),
            Self::Layout(_) => Some(Stage::Layout),
            Self::Render(_) => Some(Stage::Render),
            Self::Cancelled => None,
        }
    }

    /// Generic description safe to return to remote callers
    pub fn public_message(&self) -> &'static str {
        match self {
            Self::Extraction(_) => "Failed to extract entities from text",
            Self::InputTooLarge { .. } => "Input text is too long",
            Self::Config(_) => "Invalid graph options",
            Self::Layout(_) => "Failed to lay out graph",
            Self::Render(_) => "Failed to render graph image",
            Self::Cancelled => "Request was cancelled",
        }
    }

    /// Returns true if extraction failed in a way that may succeed on retry
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Extraction(err) if err.is_transient())
    }
}
