// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Builder pattern for creating writer sessions.

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use crate::io::detection::detect_from_extension;
use crate::io::metadata::SwathFormat;
use crate::{CodecError, Result};

/// Default write buffer size in bytes.
pub const DEFAULT_BUFFER_SIZE: usize = 64 * 1024;

/// Configuration for creating a writer.
#[derive(Debug, Clone)]
pub struct WriterConfig {
    /// Path to the output file
    pub path: PathBuf,
    /// Output format (None = infer from the file extension)
    pub format: Option<SwathFormat>,
    /// Size of the write buffer wrapped around the file
    pub buffer_size: usize,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::new(),
            format: None,
            buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }
}

/// Builder for writer sessions.
#[derive(Debug, Clone, Default)]
pub struct WriterBuilder {
    config: WriterConfig,
}

impl WriterBuilder {
    /// Create a new builder with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the path to the output file.
    pub fn path<P: AsRef<std::path::Path>>(mut self, path: P) -> Self {
        self.config.path = path.as_ref().to_path_buf();
        self
    }

    /// Set the output format.
    pub fn format(mut self, format: SwathFormat) -> Self {
        self.config.format = Some(format);
        self
    }

    pub fn buffer_size(mut self, size: usize) -> Self {
        self.config.buffer_size = size;
        self
    }

    pub fn config(&self) -> &WriterConfig {
        &self.config
    }

    /// Create the output file and the writer.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The path is not set
    /// - No format was given and the extension names none
    /// - The file cannot be created
    pub fn build(self) -> Result<super::SwathWriter> {
        let path = &self.config.path;

        if path.as_os_str().is_empty() {
            return Err(CodecError::unsupported("writer without a path"));
        }

        let format = match self.config.format {
            Some(format) => format,
            None => detect_from_extension(path).ok_or_else(|| {
                CodecError::unsupported(format!(
                    "cannot infer output format from {}",
                    path.display()
                ))
            })?,
        };

        let file = File::create(path).map_err(|e| {
            tracing::debug!(path = %path.display(), error = %e, "Create failed");
            CodecError::write_failure(path.display().to_string(), 0, 0)
        })?;

        let dst = BufWriter::with_capacity(self.config.buffer_size.max(1), file);
        Ok(super::SwathWriter::from_writer(dst, format))
    }
}
