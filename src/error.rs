//! # Error Types
//!
//! This module defines error types used throughout the knitgrid library.

use thiserror::Error;

/// Main error type for knitgrid operations
#[derive(Debug, Error)]
pub enum KnitError {
    /// A project id that has no stored document
    #[error("Not found: {0}")]
    NotFound(String),

    /// Malformed persisted or submitted JSON
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Export requested for a grid with no colored cells
    #[error("Nothing to export: the grid has no colored cells")]
    EmptyGrid,

    /// Export whose raster would exceed the pixel budget
    #[error("Chart too large: {0}")]
    TooLarge(String),

    /// Image encoding error
    #[error("Image error: {0}")]
    Image(String),

    /// PDF assembly error
    #[error("PDF error: {0}")]
    Pdf(String),

    /// Server bind or runtime errors
    #[error("Server error: {0}")]
    Server(String),

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for KnitError {
    fn from(err: serde_json::Error) -> Self {
        KnitError::Serialization(err.to_string())
    }
}
