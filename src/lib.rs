// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! # Swathcodec
//!
//! Codec and normalization layer for swath sonar survey records.
//!
//! Every supported wire layout decodes into one canonical, quantized
//! [`SurveyRecord`] and encodes back out of it, so converting between
//! layouts is a read in one driver followed by a write in another.
//!
//! ## Architecture
//!
//! - `core/` - error type, binary primitive codec, quantization, the
//!   canonical record store and its physical-unit field set
//! - `io/` - driver trait, registry, format detection, frame codec and
//!   reader/writer sessions
//! - `io/formats/` - one driver per wire layout (MB1, MR1, LDEOIH)
//!
//! ## Example: Converting a file
//!
//! ```rust,no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use swathcodec::{SwathReader, SwathWriter};
//!
//! let mut reader = SwathReader::open("line_001.mb1")?;
//! let mut writer = SwathWriter::create("line_001.fbt")?;
//! loop {
//!     match reader.read_record() {
//!         Ok(record) => writer.write_record(record)?,
//!         Err(e) if e.is_eof() => break,
//!         Err(e) => return Err(e.into()),
//!     }
//! }
//! writer.finish()?;
//! println!("skipped {} bytes", reader.bytes_skipped());
//! # Ok(())
//! # }
//! ```

// Core types
pub mod core;

// Re-export core types for convenience
pub use core::{
    Altitude, BeamFlag, CodecError, Navigation, RecordKind, Result, SurveyRecord, SwathFields,
};

// Stream plumbing and format drivers
pub mod io;

// Re-export key I/O types
pub use io::metadata::{SessionStats, SwathFormat};
pub use io::traits::{SwathDriver, SwathSink};
pub use io::{ReaderBuilder, SwathReader, SwathWriter, WriterBuilder};
