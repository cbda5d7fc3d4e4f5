// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Reader sessions.
//!
//! A [`SwathReader`] owns one input stream, the driver chosen for it and
//! the working [`SurveyRecord`] every read decodes into.
//!
//! # Working buffer
//!
//! [`SwathReader::read_record`] returns a reference to the working store,
//! which the next read overwrites in place. Use [`SwathReader::read_owned`]
//! or [`SwathReader::records`] when a record has to outlive the next read.
//!
//! # Example
//!
//! ```rust,no_run
//! use swathcodec::io::SwathReader;
//!
//! let mut reader = SwathReader::open("survey.mb1")?;
//! while let Ok(record) = reader.read_record() {
//!     println!("{} beams at {}", record.beam_count(), record.time);
//! }
//! println!("skipped {} bytes", reader.bytes_skipped());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod builder;

pub use builder::{ReaderBuilder, ReaderConfig};

use std::io::Read;
use std::path::Path;

use tracing::debug;

use crate::core::{Altitude, Navigation, RecordKind, SurveyRecord, SwathFields};
use crate::io::metadata::{SessionStats, SwathFormat};
use crate::io::registry::driver_for;
use crate::io::traits::SwathDriver;
use crate::Result;

/// Reader over one swath stream.
pub struct SwathReader {
    src: Box<dyn Read + Send>,
    driver: Box<dyn SwathDriver>,
    store: SurveyRecord,
    stats: SessionStats,
}

impl SwathReader {
    /// Open a file, detecting its format.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        ReaderBuilder::new().path(path).build()
    }

    /// Read `format` records from any byte source.
    pub fn from_reader<R: Read + Send + 'static>(src: R, format: SwathFormat) -> Self {
        let driver = driver_for(format);
        let store = driver.alloc();
        debug!(format = %format, "Opened reader");
        Self {
            src: Box::new(src),
            driver,
            store,
            stats: SessionStats::default(),
        }
    }

    pub fn format(&self) -> SwathFormat {
        self.driver.format()
    }

    /// Decode the next record into the working store.
    ///
    /// The returned reference is only valid until the next read.
    pub fn read_record(&mut self) -> Result<&SurveyRecord> {
        self.driver.read_record(&mut *self.src, &mut self.store)?;
        match self.store.kind {
            RecordKind::Data => self.stats.data_records += 1,
            RecordKind::Comment => self.stats.comment_records += 1,
            RecordKind::None => {}
        }
        Ok(&self.store)
    }

    /// Decode the next record into an independent store.
    pub fn read_owned(&mut self) -> Result<SurveyRecord> {
        self.read_record()?;
        let mut copy = SurveyRecord::new();
        self.driver.copy(&self.store, &mut copy)?;
        Ok(copy)
    }

    /// Decode the next record as physical-unit fields.
    pub fn read_fields(&mut self) -> Result<SwathFields> {
        self.read_record()?;
        Ok(self.driver.extract(&self.store))
    }

    /// Iterate over owned records until the end of the stream.
    pub fn records(&mut self) -> Records<'_> {
        Records {
            reader: self,
            done: false,
        }
    }

    /// The working store as left by the last read.
    pub fn current(&self) -> &SurveyRecord {
        &self.store
    }

    pub fn extract(&self) -> SwathFields {
        self.driver.extract(&self.store)
    }

    pub fn dimensions(&self) -> (usize, usize, usize) {
        self.driver.dimensions(&self.store)
    }

    pub fn navigation(&self) -> Result<Navigation> {
        self.driver.extract_navigation(&self.store)
    }

    pub fn altitude(&self) -> Result<Altitude> {
        self.driver.extract_altitude(&self.store)
    }

    /// Bytes discarded while resynchronizing so far.
    pub fn bytes_skipped(&self) -> u64 {
        self.driver.bytes_skipped()
    }

    pub fn stats(&self) -> SessionStats {
        SessionStats {
            bytes_skipped: self.bytes_skipped(),
            ..self.stats
        }
    }

    /// Downcast to the driver for format-specific state.
    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        self.driver.as_any().downcast_ref::<T>()
    }

    /// Downcast mutably to the driver.
    pub fn downcast_mut<T: 'static>(&mut self) -> Option<&mut T> {
        self.driver.as_any_mut().downcast_mut::<T>()
    }

    /// End the session, releasing the working store.
    pub fn close(mut self) -> SessionStats {
        let stats = self.stats();
        self.driver.dealloc(&mut self.store);
        debug!(
            format = %self.format(),
            data = stats.data_records,
            comments = stats.comment_records,
            skipped = stats.bytes_skipped,
            "Closed reader"
        );
        stats
    }
}

/// Owned-record iterator returned by [`SwathReader::records`].
///
/// Ends at the end of the stream. Any other error is yielded once and
/// ends the iteration.
pub struct Records<'a> {
    reader: &'a mut SwathReader,
    done: bool,
}

impl Iterator for Records<'_> {
    type Item = Result<SurveyRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.reader.read_owned() {
            Ok(record) => Some(Ok(record)),
            Err(e) if e.is_eof() => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}
