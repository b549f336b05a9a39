//! Error adapter for converting [`CliError`] to miette diagnostics.
//!
//! Bridges the CLI's `thiserror` types and miette's graphical report
//! handler. Every error gets a stable diagnostic code; the common failures
//! also carry a short help line.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan};

use textgraph::{PipelineError, Stage};
use textgraph_extract::ExtractionError;

use crate::error::CliError;

/// Wraps a [`CliError`] so miette can render it.
pub struct ErrorAdapter<'a>(pub &'a CliError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match self.0 {
            CliError::Io(_) | CliError::Json(_) => "textgraph::io",
            CliError::ConfigParse { .. } | CliError::MissingConfig(_) => "textgraph::config",
            CliError::Model(_) => "textgraph::extraction",
            CliError::Pipeline(PipelineError::Cancelled) => "textgraph::cancelled",
            CliError::InvalidConfig(_) | CliError::Pipeline(_) => match self.0.stage() {
                Some(Stage::Extraction) => "textgraph::extraction",
                Some(Stage::Validation) => "textgraph::validation",
                Some(Stage::Layout) => "textgraph::layout",
                Some(Stage::Render) => "textgraph::render",
                None => "textgraph::pipeline",
            },
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let help = match self.0 {
            CliError::MissingConfig(_) => "check the --config path",
            CliError::ConfigParse { .. } => "the configuration file must be valid TOML",
            CliError::Model(ExtractionError::Config(_)) => "check the [model] section of the configuration",
            CliError::Pipeline(PipelineError::InputTooLarge { .. }) => {
                "raise [pipeline] max_input_chars or shorten the input"
            }
            CliError::Pipeline(err) if err.is_transient() => {
                "the model service may be unavailable; try again or enable [pipeline] retry_transient"
            }
            CliError::Pipeline(PipelineError::Extraction(_)) => {
                "the model did not return a usable graph; run with --log-level debug for details"
            }
            _ => return None,
        };
        Some(Box::new(help))
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        None
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        None
    }
}

#[cfg(test)]
mod tests {
    use std::{io, path::PathBuf};

    use super::*;

    fn code(err: &CliError) -> Option<String> {
        ErrorAdapter(err).code().map(|code| code.to_string())
    }

    #[test]
    fn test_codes_follow_stage() {
        let extraction = CliError::Pipeline(PipelineError::Extraction(ExtractionError::MissingJson));
        assert_eq!(code(&extraction).as_deref(), Some("textgraph::extraction"));

        let too_large = CliError::Pipeline(PipelineError::InputTooLarge {
            actual: 10,
            limit: 5,
        });
        assert_eq!(code(&too_large).as_deref(), Some("textgraph::validation"));

        let cancelled = CliError::Pipeline(PipelineError::Cancelled);
        assert_eq!(code(&cancelled).as_deref(), Some("textgraph::cancelled"));
    }

    #[test]
    fn test_invalid_config_is_validation() {
        let err = CliError::InvalidConfig(textgraph::ConfigError::Canvas {
            width: 0,
            height: 600,
            max: 8192,
        });
        assert_eq!(err.stage(), Some(Stage::Validation));
        assert_eq!(code(&err).as_deref(), Some("textgraph::validation"));
    }

    #[test]
    fn test_transient_failure_suggests_retry() {
        let err = CliError::Pipeline(PipelineError::Extraction(ExtractionError::Service {
            status: 503,
            message: String::new(),
        }));
        let help = ErrorAdapter(&err).help().unwrap().to_string();
        assert!(help.contains("retry_transient"));
    }

    #[test]
    fn test_io_and_config_codes() {
        let io = CliError::Io(io::Error::new(io::ErrorKind::NotFound, "input.txt"));
        assert_eq!(code(&io).as_deref(), Some("textgraph::io"));

        let missing = CliError::MissingConfig(PathBuf::from("textgraph.toml"));
        assert_eq!(code(&missing).as_deref(), Some("textgraph::config"));
        assert!(ErrorAdapter(&missing).help().is_some());
    }

    #[test]
    fn test_display_is_forwarded() {
        let err = CliError::MissingConfig(PathBuf::from("textgraph.toml"));
        assert_eq!(
            ErrorAdapter(&err).to_string(),
            "Missing configuration file: textgraph.toml"
        );
    }

    #[test]
    fn test_report_renders() {
        let err = CliError::Pipeline(PipelineError::Extraction(ExtractionError::EmptyReply));
        let mut writer = String::new();
        miette::GraphicalReportHandler::new_themed(miette::GraphicalTheme::unicode_nocolor())
            .render_report(&mut writer, &ErrorAdapter(&err))
            .unwrap();
        assert!(writer.contains("textgraph::extraction"));
    }
}
