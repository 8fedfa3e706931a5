//! Template loading utilities
//!
//! `TemplateLoader` loads template text from a file or a string and runs the compiler stages
//! on it. The CLI and the integration tests both go through it.
//!
//! # Example
//!
//! ```rust,ignore
//! use bb_codegen::bb::emitter::{EmitOptions, UnitName};
//! use bb_codegen::TemplateLoader;
//!
//! let java = TemplateLoader::from_string("Hello <%= name %>!")
//!     .compile(&UnitName::new(Some("demo"), "Hello"), &EmitOptions::default())?;
//! ```

use crate::bb::emitter::{EmitOptions, UnitName};
use crate::bb::error::CompileError;
use crate::bb::lexing::{self, LexError};
use crate::bb::token::Token;
use std::fs;
use std::path::Path;

/// Error that can occur when loading or compiling a template
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoaderError {
    /// IO error when reading file
    IoError(String),
    /// The template text could not be tokenized
    Lex(LexError),
    /// The token stream could not be compiled
    Compile(CompileError),
}

impl std::fmt::Display for LoaderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoaderError::IoError(msg) => write!(f, "IO error: {}", msg),
            LoaderError::Lex(err) => write!(f, "{}", err),
            LoaderError::Compile(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for LoaderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoaderError::IoError(_) => None,
            LoaderError::Lex(err) => Some(err),
            LoaderError::Compile(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for LoaderError {
    fn from(err: std::io::Error) -> Self {
        LoaderError::IoError(err.to_string())
    }
}

impl From<LexError> for LoaderError {
    fn from(err: LexError) -> Self {
        LoaderError::Lex(err)
    }
}

impl From<CompileError> for LoaderError {
    fn from(err: CompileError) -> Self {
        LoaderError::Compile(err)
    }
}

/// Template loader with stage shortcuts
pub struct TemplateLoader {
    source: String,
}

impl TemplateLoader {
    /// Load from a file path
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, LoaderError> {
        let source = fs::read_to_string(path)?;
        Ok(TemplateLoader { source })
    }

    /// Load from a string
    pub fn from_string<S: Into<String>>(source: S) -> Self {
        TemplateLoader {
            source: source.into(),
        }
    }

    /// Run the lexer over the source
    pub fn tokenize(&self) -> Result<Vec<Token>, LoaderError> {
        Ok(lexing::tokenize(&self.source)?)
    }

    /// Tokenize and compile the source into Java for the given unit
    pub fn compile(&self, name: &UnitName, options: &EmitOptions) -> Result<String, LoaderError> {
        let tokens = self.tokenize()?;
        Ok(crate::bb::compile(&tokens, name, options)?)
    }
}
