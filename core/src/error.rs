//! Error types for driver flag-set loading.
//!
//! Conversion and discovery validation have their own error enums
//! ([`ConversionError`] and [`ValidationError`](crate::ValidationError));
//! this one covers reading and checking a flag-set file.

use thiserror::Error;

use crate::{ConversionError, DescriptorError};

/// Errors that can occur while loading a driver flag set.
#[derive(Debug, Error)]
pub enum FlagSetError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML (or JSON) parsing failure, including descriptor defaults that do
    /// not match their declared type.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The flag set parsed but its descriptors are structurally invalid.
    #[error("invalid flag set for driver '{driver}': {source}")]
    InvalidDescriptor {
        /// Driver the flag set belongs to.
        driver: String,
        /// First problem found.
        #[source]
        source: DescriptorError,
    },

    /// A descriptor could not be converted into a parser flag.
    #[error("conversion error: {0}")]
    Conversion(#[from] ConversionError),
}

/// Convenience alias for results with [`FlagSetError`].
pub type Result<T> = std::result::Result<T, FlagSetError>;
