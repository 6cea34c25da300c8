//! Error types for enrollbook.
//!
//! This module defines all error types used throughout the enrollbook crate,
//! providing detailed context for debugging and user-friendly error messages.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for enrollbook operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Storage Errors ===
    /// Failed to open or create the database.
    #[error("failed to open database at {path}: {source}")]
    DatabaseOpen {
        /// Path to the database file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: rusqlite::Error,
    },

    /// Executing the schema DDL failed. Unrecoverable at startup.
    #[error("failed to create database schema: {source}")]
    SchemaCreate {
        /// The underlying error.
        #[source]
        source: rusqlite::Error,
    },

    /// A database query failed.
    #[error("database query failed: {0}")]
    DatabaseQuery(#[from] rusqlite::Error),

    /// Failed to run database migrations.
    #[error("database migration failed: {message}")]
    DatabaseMigration {
        /// Description of what went wrong.
        message: String,
    },

    /// Appending a row failed.
    #[error("failed to insert into {table}: {source}")]
    Insert {
        /// Table the row was meant for.
        table: &'static str,
        /// The underlying error.
        #[source]
        source: rusqlite::Error,
    },

    /// The requested record does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    // === Image Errors ===
    /// Encoding a photo to PNG failed.
    #[error("failed to encode image: {0}")]
    ImageEncode(#[source] image::ImageError),

    /// Stored or supplied bytes are not a decodable image.
    #[error("failed to decode image: {0}")]
    ImageDecode(#[source] image::ImageError),

    // === Registration Errors ===
    /// A wizard step is missing required input.
    #[error("{message}")]
    Validation {
        /// User-visible message describing what is missing.
        message: String,
    },

    /// A date of birth could not be parsed.
    #[error("invalid date of birth: '{input}'")]
    InvalidDate {
        /// The text that failed to parse.
        input: String,
    },

    /// An interactive prompt failed (closed terminal, interrupted input).
    #[error("prompt failed: {0}")]
    Prompt(#[from] dialoguer::Error),

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for enrollbook operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a new validation error.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new not-found error.
    #[must_use]
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    /// Check if this error means the requested record is absent.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Check if this error is a wizard validation failure.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }
}
