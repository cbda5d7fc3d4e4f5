// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Builder pattern for opening reader sessions.

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use crate::io::detection::detect_format;
use crate::io::metadata::SwathFormat;
use crate::{CodecError, Result};

/// Default read buffer size in bytes.
pub const DEFAULT_BUFFER_SIZE: usize = 64 * 1024;

/// Configuration for opening a reader.
#[derive(Debug, Clone)]
pub struct ReaderConfig {
    /// Path to the file to read
    pub path: PathBuf,
    /// Input format (None = detect from content, then extension)
    pub format: Option<SwathFormat>,
    /// Size of the read buffer wrapped around the file
    pub buffer_size: usize,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::new(),
            format: None,
            buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }
}

/// Builder for reader sessions.
///
/// # Example
///
/// ```rust,no_run
/// use swathcodec::io::{ReaderBuilder, SwathFormat};
///
/// // Detect the format from the file itself
/// let reader = ReaderBuilder::new()
///     .path("line_001.mb1")
///     .build()?;
///
/// // Force a format
/// let reader = ReaderBuilder::new()
///     .path("line_001.dat")
///     .format(SwathFormat::Mr1)
///     .build()?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct ReaderBuilder {
    config: ReaderConfig,
}

impl ReaderBuilder {
    /// Create a new builder with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the path to the file.
    pub fn path<P: AsRef<std::path::Path>>(mut self, path: P) -> Self {
        self.config.path = path.as_ref().to_path_buf();
        self
    }

    /// Set the input format, skipping detection.
    pub fn format(mut self, format: SwathFormat) -> Self {
        self.config.format = Some(format);
        self
    }

    pub fn buffer_size(mut self, size: usize) -> Self {
        self.config.buffer_size = size;
        self
    }

    pub fn config(&self) -> &ReaderConfig {
        &self.config
    }

    /// Open the reader.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The path is not set
    /// - The file cannot be opened
    /// - No format was given and none can be detected
    pub fn build(self) -> Result<super::SwathReader> {
        let path = &self.config.path;

        if path.as_os_str().is_empty() {
            return Err(CodecError::unsupported("reader without a path"));
        }

        let file = File::open(path).map_err(|e| {
            CodecError::eof("ReaderBuilder", format!("{}: {e}", path.display()))
        })?;

        let format = match self.config.format {
            Some(format) => format,
            None => detect_format(path)?,
        };

        let src = BufReader::with_capacity(self.config.buffer_size.max(1), file);
        Ok(super::SwathReader::from_reader(src, format))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let builder = ReaderBuilder::new().path("a.mb1").buffer_size(512);
        assert_eq!(builder.config().path, PathBuf::from("a.mb1"));
        assert_eq!(builder.config().format, None);
        assert_eq!(builder.config().buffer_size, 512);
    }

    #[test]
    fn test_build_without_path() {
        let err = ReaderBuilder::new().build().err().unwrap();
        assert!(matches!(err, CodecError::Unsupported { .. }));
    }

    #[test]
    fn test_build_missing_file() {
        let err = ReaderBuilder::new()
            .path("/nonexistent/line.mb1")
            .build()
            .err()
            .unwrap();
        assert!(err.is_eof());
    }
}
