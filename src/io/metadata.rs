// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Format identifiers and per-session statistics.

use serde::{Deserialize, Serialize};

use crate::CodecError;

/// Wire layouts understood by this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SwathFormat {
    /// Sync-marked fixed-header framed layout ("MB1\0")
    Mb1,
    /// XDR streaming layout with a file header and per-side ping payloads
    Mr1,
    /// Native layout serialising the canonical record directly
    Ldeoih,
}

impl SwathFormat {
    /// All formats, in registry order.
    pub const ALL: [SwathFormat; 3] = [SwathFormat::Mb1, SwathFormat::Mr1, SwathFormat::Ldeoih];

    /// Numeric format id.
    pub fn id(&self) -> u16 {
        match self {
            SwathFormat::Mr1 => 64,
            SwathFormat::Ldeoih => 71,
            SwathFormat::Mb1 => 72,
        }
    }

    pub fn from_id(id: u16) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.id() == id)
    }

    /// Canonical format name.
    pub fn name(&self) -> &'static str {
        match self {
            SwathFormat::Mb1 => "MBARIMB1",
            SwathFormat::Mr1 => "MR1PRVR2",
            SwathFormat::Ldeoih => "MBLDEOIH",
        }
    }

    /// Get the file extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            SwathFormat::Mb1 => "mb1",
            SwathFormat::Mr1 => "mr1",
            SwathFormat::Ldeoih => "fbt",
        }
    }

    /// Guess the format from a file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "mb1" => Some(SwathFormat::Mb1),
            "mr1" => Some(SwathFormat::Mr1),
            "fbt" | "ldeoih" => Some(SwathFormat::Ldeoih),
            _ => None,
        }
    }

    /// True when the layout has a sync marker the reader can resynchronize on.
    pub fn has_sync_marker(&self) -> bool {
        matches!(self, SwathFormat::Mb1)
    }
}

impl std::fmt::Display for SwathFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name(), self.id())
    }
}

impl std::str::FromStr for SwathFormat {
    type Err = CodecError;

    /// Accepts a canonical name (case-insensitive), a short alias, or a numeric id.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(id) = trimmed.parse::<u16>() {
            return Self::from_id(id).ok_or_else(|| CodecError::unknown_format(trimmed));
        }
        match trimmed.to_ascii_lowercase().as_str() {
            "mbarimb1" | "mb1" => Ok(SwathFormat::Mb1),
            "mr1prvr2" | "mr1" => Ok(SwathFormat::Mr1),
            "mbldeoih" | "ldeoih" | "fbt" => Ok(SwathFormat::Ldeoih),
            _ => Err(CodecError::unknown_format(trimmed)),
        }
    }
}

/// Counters kept by a reader or writer session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStats {
    /// Data records decoded or encoded
    pub data_records: u64,
    /// Comment records decoded or encoded
    pub comment_records: u64,
    /// Records the output layout could not represent and dropped
    pub records_dropped: u64,
    /// Bytes discarded while resynchronizing
    pub bytes_skipped: u64,
}
