// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Core types used throughout swathcodec.
//!
//! This module provides the foundational types for the library:
//! - [`CodecError`] - Error handling
//! - [`binary`] - Big-endian primitive codec
//! - [`quantize`] - Adaptive fixed-point quantization
//! - [`SurveyRecord`] - The canonical record store
//! - [`SwathFields`] - The physical-unit view of a record
//! - [`RecordKind`] and [`BeamFlag`] - Record and beam classification

pub mod binary;
pub mod error;
pub mod fields;
pub mod quantize;
pub mod record;

pub use error::{CodecError, Result};
pub use fields::{Altitude, Navigation, SwathFields};
pub use record::{ImageryKind, SidescanKind, SurveyRecord, TopographyKind, COMMENT_MAXLINE};

use serde::{Deserialize, Serialize};

/// Kind of record held by a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RecordKind {
    /// Survey ping with navigation and beam/pixel arrays
    Data,
    /// Free-text comment
    Comment,
    /// Nothing decoded yet
    #[default]
    None,
}

impl RecordKind {
    /// Convert to string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::Data => "Data",
            RecordKind::Comment => "Comment",
            RecordKind::None => "None",
        }
    }

    pub fn is_data(&self) -> bool {
        matches!(self, RecordKind::Data)
    }

    pub fn is_comment(&self) -> bool {
        matches!(self, RecordKind::Comment)
    }
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-beam quality flag.
///
/// The byte form uses the usual bit layout of swath flag bytes: bit 0
/// marks a flagged beam, bit 1 a null beam, bit 2 a manual edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BeamFlag {
    /// Valid sounding
    Good,
    /// Sounding flagged by an operator
    Manual,
    /// No sounding
    #[default]
    Null,
}

impl BeamFlag {
    const FLAG_BIT: u8 = 0x01;
    const NULL_BIT: u8 = 0x02;
    const MANUAL_BIT: u8 = 0x04;

    /// Decode a flag byte. Any flagged byte that is not null is treated as manual.
    pub fn from_byte(byte: u8) -> Self {
        if byte & Self::NULL_BIT != 0 {
            BeamFlag::Null
        } else if byte & Self::FLAG_BIT != 0 {
            BeamFlag::Manual
        } else {
            BeamFlag::Good
        }
    }

    pub fn to_byte(self) -> u8 {
        match self {
            BeamFlag::Good => 0,
            BeamFlag::Manual => Self::MANUAL_BIT | Self::FLAG_BIT,
            BeamFlag::Null => Self::NULL_BIT,
        }
    }

    pub fn is_null(self) -> bool {
        matches!(self, BeamFlag::Null)
    }

    pub fn is_good(self) -> bool {
        matches!(self, BeamFlag::Good)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_kind_display() {
        assert_eq!(RecordKind::Data.to_string(), "Data");
        assert_eq!(RecordKind::default(), RecordKind::None);
        assert!(RecordKind::Comment.is_comment());
        assert!(!RecordKind::Comment.is_data());
    }

    #[test]
    fn test_beam_flag_bytes() {
        for flag in [BeamFlag::Good, BeamFlag::Manual, BeamFlag::Null] {
            assert_eq!(BeamFlag::from_byte(flag.to_byte()), flag);
        }
        assert_eq!(BeamFlag::Manual.to_byte(), 0x05);
        // filter-flagged soundings collapse to manual
        assert_eq!(BeamFlag::from_byte(0x09), BeamFlag::Manual);
        assert_eq!(BeamFlag::from_byte(0x03), BeamFlag::Null);
    }
}
