// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Format detection using magic numbers and file extensions.
//!
//! # Supported Formats
//!
//! - **MB1**: sync marker `MB1\0` anywhere in the first window, since
//!   captures often start mid-record
//! - **MR1**: XDR magic 6666 at offset 0
//! - **LDEOIH**: a known 2-byte record id at offset 0 and room for the
//!   whole first record
//!
//! # Example
//!
//! ```rust,no_run
//! use swathcodec::io::detection::detect_format;
//! use swathcodec::io::metadata::SwathFormat;
//!
//! let format = detect_format("survey.mb1")?;
//! assert_eq!(format, SwathFormat::Mb1);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::fs::File;
use std::io::Read;
use std::path::Path;

use tracing::debug;

use crate::core::{binary, COMMENT_MAXLINE};
use crate::{CodecError, Result};

use super::formats::{ldeoih, mb1, mr1};
use super::metadata::SwathFormat;

/// Bytes inspected for magic numbers.
pub const DETECTION_WINDOW: usize = 1024;

/// Detect the format of a file from its content, falling back to its
/// extension.
pub fn detect_format<P: AsRef<Path>>(path: P) -> Result<SwathFormat> {
    let path_ref = path.as_ref();

    match detect_from_magic(path_ref) {
        Ok(Some(format)) => return Ok(format),
        Ok(None) => {}
        Err(e) => {
            debug!(path = %path_ref.display(), error = %e, "Magic detection failed");
        }
    }

    detect_from_extension(path_ref)
        .ok_or_else(|| CodecError::unknown_format(path_ref.display()))
}

fn detect_from_magic(path: &Path) -> Result<Option<SwathFormat>> {
    let file = File::open(path)
        .map_err(|e| CodecError::eof("FormatDetection", format!("failed to open file: {e}")))?;

    let mut header = Vec::with_capacity(DETECTION_WINDOW);
    file.take(DETECTION_WINDOW as u64)
        .read_to_end(&mut header)
        .map_err(|e| CodecError::eof("FormatDetection", format!("failed to read header: {e}")))?;

    Ok(detect_from_bytes(&header))
}

/// Detect a format from the leading bytes of a stream.
pub fn detect_from_bytes(header: &[u8]) -> Option<SwathFormat> {
    if header.len() >= 4 && binary::get_i32(header, 0) == mr1::MAGIC {
        return Some(SwathFormat::Mr1);
    }
    if is_ldeoih_magic(header) {
        return Some(SwathFormat::Ldeoih);
    }
    let window = &header[..header.len().min(DETECTION_WINDOW)];
    if window.windows(mb1::SYNC.len()).any(|w| w == mb1::SYNC) {
        return Some(SwathFormat::Mb1);
    }
    None
}

/// A known record id at offset 0 followed by at least one whole record.
fn is_ldeoih_magic(header: &[u8]) -> bool {
    if header.len() < 2 {
        return false;
    }
    let min_len = match u16::from_be_bytes([header[0], header[1]]) {
        ldeoih::ID_COMMENT => 2 + COMMENT_MAXLINE,
        ldeoih::ID_DATA_V4 => ldeoih::V4_HEADER_SIZE,
        ldeoih::ID_DATA_V5 => ldeoih::V5_HEADER_SIZE,
        _ => return false,
    };
    header.len() >= min_len
}

/// Detect format by file extension.
pub fn detect_from_extension(path: &Path) -> Option<SwathFormat> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .and_then(SwathFormat::from_extension)
}
