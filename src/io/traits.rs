// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Core traits for format drivers.
//!
//! Every wire layout is one [`SwathDriver`] implementation. Sessions hold a
//! `Box<dyn SwathDriver>` chosen at open time and never branch on the
//! concrete format, so adding a layout means adding a driver and a
//! registry entry.
//!
//! The layout-neutral operations (extract, insert, copy, navigation,
//! altitude) default to the canonical store's own implementation; a driver
//! overrides only what its layout changes, typically the default beam
//! widths.

use std::any::Any;
use std::io::{Read, Seek, Write};

use crate::core::{Altitude, Navigation, SurveyRecord, SwathFields};
use crate::Result;

use super::metadata::SwathFormat;

/// Output sink accepted by drivers.
///
/// Seeking lets a driver patch header fields once the stream is complete.
pub trait SwathSink: Write + Seek {}

// Blanket implementation for any matching type
impl<T> SwathSink for T where T: Write + Seek + ?Sized {}

/// Translation between one wire layout and the canonical record store.
///
/// # Example
///
/// ```no_run
/// use std::io::Cursor;
/// use swathcodec::io::registry::driver_for;
/// use swathcodec::io::SwathFormat;
///
/// let mut driver = driver_for(SwathFormat::Mb1);
/// let mut store = driver.alloc();
/// let mut src = Cursor::new(std::fs::read("survey.mb1").unwrap());
/// driver.read_record(&mut src, &mut store).unwrap();
/// println!("{} beams", store.beam_count());
/// ```
pub trait SwathDriver: Send {
    /// The layout this driver implements.
    fn format(&self) -> SwathFormat;

    /// Default `(across, along)` beam widths in degrees used by `insert`
    /// when the store carries none.
    fn default_beam_widths(&self) -> (f64, f64) {
        (0.0, 0.0)
    }

    /// Allocate a fresh working store for one stream.
    fn alloc(&self) -> SurveyRecord {
        SurveyRecord::new()
    }

    /// Release a store at the end of its stream.
    fn dealloc(&self, store: &mut SurveyRecord) {
        store.release();
    }

    /// Decode the next record from `src` into `store`.
    ///
    /// On error the store keeps whatever the previous successful read left
    /// in it.
    fn read_record(&mut self, src: &mut dyn Read, store: &mut SurveyRecord) -> Result<()>;

    /// Encode `store` as the next record of `dst`.
    fn write_record(&mut self, dst: &mut dyn SwathSink, store: &SurveyRecord) -> Result<()>;

    /// Complete the output stream. Called once, after the last record.
    fn finish(&mut self, _dst: &mut dyn SwathSink) -> Result<()> {
        Ok(())
    }

    /// Whether `write_record` emits comment records. Layouts without a
    /// comment record accept and drop them.
    fn writes_comments(&self) -> bool {
        true
    }

    /// Bytes discarded while resynchronizing on this stream.
    fn bytes_skipped(&self) -> u64 {
        0
    }

    fn extract(&self, store: &SurveyRecord) -> SwathFields {
        store.extract()
    }

    fn insert(&self, store: &mut SurveyRecord, fields: &SwathFields) -> Result<()> {
        store.insert(fields, self.default_beam_widths())
    }

    fn copy(&self, src: &SurveyRecord, dst: &mut SurveyRecord) -> Result<()> {
        src.copy_into(dst)
    }

    fn dimensions(&self, store: &SurveyRecord) -> (usize, usize, usize) {
        store.dimensions()
    }

    fn extract_navigation(&self, store: &SurveyRecord) -> Result<Navigation> {
        store.extract_navigation()
    }

    fn insert_navigation(&self, store: &mut SurveyRecord, nav: &Navigation) -> Result<()> {
        store.insert_navigation(nav)
    }

    fn extract_altitude(&self, store: &SurveyRecord) -> Result<Altitude> {
        store.extract_altitude()
    }

    fn insert_altitude(&self, store: &mut SurveyRecord, altitude: &Altitude) -> Result<()> {
        store.insert_altitude(altitude)
    }

    /// Downcast to `Any` for accessing driver-specific state.
    fn as_any(&self) -> &dyn Any;

    /// Downcast mutably to `Any` for accessing driver-specific state.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}
