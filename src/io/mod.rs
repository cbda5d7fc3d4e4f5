// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! I/O layer for swath survey streams.
//!
//! Drivers translate wire layouts to and from the canonical store; the
//! registry maps format ids to drivers; sessions tie a driver to a stream.

pub mod detection;
pub mod formats;
pub mod frame;
pub mod metadata;
pub mod registry;

// Re-exports
pub use detection::{detect_format, detect_from_bytes};
pub use metadata::{SessionStats, SwathFormat};
pub use registry::{driver_for, driver_for_id, driver_for_name};

// Driver trait
pub mod traits;
pub use traits::{SwathDriver, SwathSink};

// Reader/writer sessions
pub mod reader;
pub mod writer;
pub use reader::{ReaderBuilder, SwathReader};
pub use writer::{SwathWriter, WriterBuilder};
