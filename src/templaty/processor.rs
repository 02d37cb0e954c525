//! In-memory processing API for templates
//!
//! Runs a source buffer through one stage of the pipeline (tokens or tree)
//! and renders the result in one of the output formats. Format names are
//! `stage-format` strings such as `token-simple` or `ast-treeviz`.
//!
//! ```rust,ignore
//! use templaty::templaty::config::load_defaults;
//! use templaty::templaty::processor::{process_source, ProcessingSpec};
//!
//! let spec = ProcessingSpec::from_string("ast-treeviz").unwrap();
//! let out = process_source("{% for x in xs %}{{ x }}{% endfor %}", &spec, &load_defaults()?)?;
//! ```

use serde::Serialize;
use std::fmt;

use crate::templaty::ast::AstNode;
use crate::templaty::config::TemplatyConfig;
use crate::templaty::formats::{to_json, to_source, to_treeviz_str_with, ToSource};
use crate::templaty::lexer::tokenize;
use crate::templaty::parser::{Dialect, ParseError, Standalone, TemplateParser};

/// Represents the processing stage (what data to extract)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessingStage {
    Token,
    Ast,
}

/// Represents the output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Simple,
    Json,
    Treeviz,
    Source,
}

/// Represents a complete processing specification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessingSpec {
    pub stage: ProcessingStage,
    pub format: OutputFormat,
}

impl ProcessingSpec {
    /// Parse a format string like "token-simple" or "ast-json"
    pub fn from_string(format_str: &str) -> Result<Self, ProcessingError> {
        let (stage, format) = format_str
            .split_once('-')
            .ok_or_else(|| ProcessingError::InvalidFormat(format_str.to_string()))?;

        let stage = match stage {
            "token" => ProcessingStage::Token,
            "ast" => ProcessingStage::Ast,
            _ => return Err(ProcessingError::InvalidStage(stage.to_string())),
        };

        let format = match format {
            "simple" => OutputFormat::Simple,
            "json" => OutputFormat::Json,
            "treeviz" => OutputFormat::Treeviz,
            "source" => OutputFormat::Source,
            _ => return Err(ProcessingError::InvalidFormatType(format.to_string())),
        };

        let spec = ProcessingSpec { stage, format };
        if !Self::available_specs().contains(&spec) {
            return Err(ProcessingError::UnsupportedCombination(format_str.to_string()));
        }
        Ok(spec)
    }

    /// Get all available processing specifications
    pub fn available_specs() -> Vec<ProcessingSpec> {
        vec![
            ProcessingSpec {
                stage: ProcessingStage::Token,
                format: OutputFormat::Simple,
            },
            ProcessingSpec {
                stage: ProcessingStage::Token,
                format: OutputFormat::Json,
            },
            ProcessingSpec {
                stage: ProcessingStage::Ast,
                format: OutputFormat::Json,
            },
            ProcessingSpec {
                stage: ProcessingStage::Ast,
                format: OutputFormat::Treeviz,
            },
            ProcessingSpec {
                stage: ProcessingStage::Ast,
                format: OutputFormat::Source,
            },
        ]
    }
}

impl fmt::Display for ProcessingSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stage = match self.stage {
            ProcessingStage::Token => "token",
            ProcessingStage::Ast => "ast",
        };
        let format = match self.format {
            OutputFormat::Simple => "simple",
            OutputFormat::Json => "json",
            OutputFormat::Treeviz => "treeviz",
            OutputFormat::Source => "source",
        };
        write!(f, "{}-{}", stage, format)
    }
}

/// Errors that can occur during processing
#[derive(Debug, Clone, PartialEq)]
pub enum ProcessingError {
    InvalidFormat(String),
    InvalidStage(String),
    InvalidFormatType(String),
    UnsupportedCombination(String),
    Parse(Vec<ParseError>),
    Serialization(String),
}

impl std::error::Error for ProcessingError {}

impl fmt::Display for ProcessingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcessingError::InvalidFormat(format) => write!(f, "Invalid format: {}", format),
            ProcessingError::InvalidStage(stage) => write!(f, "Invalid stage: {}", stage),
            ProcessingError::InvalidFormatType(format_type) => {
                write!(f, "Invalid format type: {}", format_type)
            }
            ProcessingError::UnsupportedCombination(format) => {
                write!(f, "Format '{}' is not available", format)
            }
            ProcessingError::Parse(errors) => {
                write!(f, "Failed to parse template:")?;
                for error in errors {
                    write!(f, "\n  {}", error)?;
                }
                Ok(())
            }
            ProcessingError::Serialization(msg) => write!(f, "Serialization error: {}", msg),
        }
    }
}

impl From<Vec<ParseError>> for ProcessingError {
    fn from(errors: Vec<ParseError>) -> Self {
        ProcessingError::Parse(errors)
    }
}

impl From<serde_json::Error> for ProcessingError {
    fn from(error: serde_json::Error) -> Self {
        ProcessingError::Serialization(error.to_string())
    }
}

/// Process a standalone template according to the given specification
pub fn process_source(
    source: &str,
    spec: &ProcessingSpec,
    config: &TemplatyConfig,
) -> Result<String, ProcessingError> {
    process_source_with(&Standalone, source, spec, config)
}

/// Process a template of any dialect according to the given specification
pub fn process_source_with<D>(
    dialect: &D,
    source: &str,
    spec: &ProcessingSpec,
    config: &TemplatyConfig,
) -> Result<String, ProcessingError>
where
    D: Dialect + ?Sized,
    D::Statement: AstNode + ToSource + Serialize,
{
    tracing::debug!(%spec, bytes = source.len(), "processing source");

    match spec.stage {
        ProcessingStage::Token => {
            let tokens = tokenize(source, dialect.lex_mode());
            match spec.format {
                OutputFormat::Simple => Ok(tokens
                    .iter()
                    .map(|(token, span)| format!("{}..{} {}\n", span.start, span.end, token))
                    .collect()),
                OutputFormat::Json => Ok(to_json(&tokens, config.output.pretty_json)?),
                _ => Err(ProcessingError::UnsupportedCombination(spec.to_string())),
            }
        }
        ProcessingStage::Ast => {
            let tree = TemplateParser::new(dialect)
                .with_source_name(config.parser.source_name.as_str())
                .parse(source)?;

            match spec.format {
                OutputFormat::Json => Ok(to_json(&tree, config.output.pretty_json)?),
                OutputFormat::Treeviz => {
                    Ok(to_treeviz_str_with(&tree, config.output.truncate_labels))
                }
                OutputFormat::Source => Ok(to_source(&tree)),
                OutputFormat::Simple => {
                    Err(ProcessingError::UnsupportedCombination(spec.to_string()))
                }
            }
        }
    }
}

/// Get all available format strings
pub fn available_formats() -> Vec<String> {
    ProcessingSpec::available_specs()
        .iter()
        .map(|spec| spec.to_string())
        .collect()
}
