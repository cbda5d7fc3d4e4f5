// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Error types for swath record decoding and encoding.
//!
//! Resynchronization on framed layouts is not an error; it is reported
//! through the frame codec's skip counter. Everything else surfaces here.

use thiserror::Error;

/// Errors raised by the codec, the canonical store and the format drivers.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CodecError {
    /// The stream ended, or a read failed, in the middle of a record.
    #[error("End of stream in {context}: {message}")]
    Eof { context: String, message: String },

    /// Growing one of the canonical arrays failed.
    #[error("Allocation failure: could not grow {array} to {requested} elements")]
    AllocationFailure { array: String, requested: usize },

    /// The operation is not defined for the record kind held by the store.
    #[error("Operation '{operation}' is not valid for a {kind} record")]
    UnexpectedKind { operation: String, kind: String },

    /// The sink accepted fewer bytes than requested.
    #[error("Write failure in {context}: wrote {written} of {requested} bytes")]
    WriteFailure {
        context: String,
        requested: usize,
        written: usize,
    },

    /// A record header could not be recognised.
    #[error("Unintelligible record in {context}: {message}")]
    Unintelligible { context: String, message: String },

    /// Unknown format or an operation the format cannot express.
    #[error("Unsupported feature: '{feature}'")]
    Unsupported { feature: String },
}

impl CodecError {
    /// Create an end-of-stream error.
    pub fn eof(context: impl Into<String>, message: impl Into<String>) -> Self {
        CodecError::Eof {
            context: context.into(),
            message: message.into(),
        }
    }

    /// Create an allocation failure for the named array.
    pub fn allocation(array: impl Into<String>, requested: usize) -> Self {
        CodecError::AllocationFailure {
            array: array.into(),
            requested,
        }
    }

    /// Create an unexpected-kind error.
    pub fn unexpected_kind(operation: impl Into<String>, kind: impl ToString) -> Self {
        CodecError::UnexpectedKind {
            operation: operation.into(),
            kind: kind.to_string(),
        }
    }

    /// Create a short-write error.
    pub fn write_failure(context: impl Into<String>, requested: usize, written: usize) -> Self {
        CodecError::WriteFailure {
            context: context.into(),
            requested,
            written,
        }
    }

    /// Create an unintelligible-record error.
    pub fn unintelligible(context: impl Into<String>, message: impl Into<String>) -> Self {
        CodecError::Unintelligible {
            context: context.into(),
            message: message.into(),
        }
    }

    /// Create an unsupported-feature error.
    pub fn unsupported(feature: impl Into<String>) -> Self {
        CodecError::Unsupported {
            feature: feature.into(),
        }
    }

    /// Create an error for an unknown format name or id.
    pub fn unknown_format(format: impl std::fmt::Display) -> Self {
        CodecError::Unsupported {
            feature: format!("unknown format: {format}"),
        }
    }

    /// True when the error marks the end of the stream.
    pub fn is_eof(&self) -> bool {
        matches!(self, CodecError::Eof { .. })
    }

    /// Get structured fields for logging.
    pub fn log_fields(&self) -> Vec<(&'static str, String)> {
        match self {
            CodecError::Eof { context, message } => {
                vec![("context", context.clone()), ("message", message.clone())]
            }
            CodecError::AllocationFailure { array, requested } => vec![
                ("array", array.clone()),
                ("requested", requested.to_string()),
            ],
            CodecError::UnexpectedKind { operation, kind } => {
                vec![("operation", operation.clone()), ("kind", kind.clone())]
            }
            CodecError::WriteFailure {
                context,
                requested,
                written,
            } => vec![
                ("context", context.clone()),
                ("requested", requested.to_string()),
                ("written", written.to_string()),
            ],
            CodecError::Unintelligible { context, message } => {
                vec![("context", context.clone()), ("message", message.clone())]
            }
            CodecError::Unsupported { feature } => vec![("feature", feature.clone())],
        }
    }
}

impl From<std::io::Error> for CodecError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::WriteZero => CodecError::WriteFailure {
                context: "IO".to_string(),
                requested: 0,
                written: 0,
            },
            _ => CodecError::Eof {
                context: "IO".to_string(),
                message: err.to_string(),
            },
        }
    }
}

/// Result type for swathcodec operations.
pub type Result<T> = std::result::Result<T, CodecError>;
