//! Error types shared across the texsvg crates

// Rust 1.92 compiler bug: false positives for thiserror/miette derive macro fields
// https://github.com/rust-lang/rust/issues/147648
#![allow(unused_assignments)]

use miette::Diagnostic;
use std::path::Path;
use thiserror::Error;

/// Error type for rendering, caching and configuration operations
#[derive(Error, Debug, Diagnostic)]
pub enum Error {
    /// I/O error while persisting the formula cache
    #[error("I/O {operation} failed{}", path.as_ref().map_or(String::new(), |p| format!(": {}", p.display())))]
    #[diagnostic(
        code(texsvg::io),
        help("Check file permissions and ensure the cache directory is writable")
    )]
    Io {
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
        /// Path that caused the error, if available
        path: Option<Box<Path>>,
        /// Operation that failed (e.g., "write", "rename", "create_dir_all")
        operation: String,
    },

    /// The external renderer failed to turn a formula into SVG
    #[error("Failed to render {formula}: {message}")]
    #[diagnostic(
        code(texsvg::render),
        help("Check the formula for LaTeX errors and that the LaTeX toolchain is installed")
    )]
    Render {
        /// The formula, including its math-mode delimiters
        formula: String,
        /// Error message reported by the backend
        message: String,
    },

    /// Configuration or validation error
    #[error("Render configuration error: {message}")]
    #[diagnostic(code(texsvg::config))]
    Configuration {
        /// Error message describing the configuration issue
        message: String,
    },

    /// Serialization error
    #[error("Serialization error: {message}")]
    #[diagnostic(code(texsvg::serialization))]
    Serialization {
        /// Error message describing the serialization issue
        message: String,
    },
}

impl Error {
    /// Create a render error for the given formula
    #[must_use]
    pub fn render(formula: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Render {
            formula: formula.into(),
            message: message.into(),
        }
    }

    /// Create a configuration error
    #[must_use]
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration {
            message: msg.into(),
        }
    }

    /// Create an I/O error with path context
    #[must_use]
    pub fn io(
        source: std::io::Error,
        path: impl AsRef<Path>,
        operation: impl Into<String>,
    ) -> Self {
        Self::Io {
            source,
            path: Some(path.as_ref().into()),
            operation: operation.into(),
        }
    }

    /// Create a serialization error
    #[must_use]
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::Serialization {
            message: msg.into(),
        }
    }
}

/// Result type for texsvg operations
pub type Result<T> = std::result::Result<T, Error>;
