//! Error types for the sticker sheet library

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the sticker sheet library
#[derive(Error, Debug)]
pub enum Error {
    /// PDF processing error
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// QR directory does not exist
    #[error("QR directory not found: {}", .0.display())]
    DirectoryNotFound(PathBuf),

    /// QR directory exists but holds no correctly named files
    #[error("No QR images found in: {}", .0.display())]
    EmptyCatalog(PathBuf),

    /// Default logo file is missing
    #[error("Default logo not found: {}", .0.display())]
    MissingDefaultLogo(PathBuf),

    /// Generation invoked with an empty entry list
    #[error("No QR entries to lay out")]
    NoQrEntries,

    /// Grid constants that cannot produce a usable sheet
    #[error("Invalid grid configuration: {0}")]
    InvalidGridConfig(String),

    /// Override store file exists but cannot be parsed
    #[error("Invalid override store {}: {source}", .path.display())]
    OverrideStore {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// General error
    #[error("{0}")]
    General(String),
}
