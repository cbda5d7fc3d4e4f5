// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Writer sessions.
//!
//! A [`SwathWriter`] owns a seekable sink and the driver for its layout.
//! Records go in either as canonical stores or as physical-unit
//! [`SwathFields`], which the writer quantizes into its own scratch store.
//! [`SwathWriter::finish`] lets the driver complete the stream (the MR1
//! driver patches its ping count here) and flushes the sink. Dropping an
//! unfinished writer finishes it and logs any failure.

pub mod builder;

pub use builder::{WriterBuilder, WriterConfig};

use std::path::Path;

use tracing::{debug, warn};

use crate::core::{RecordKind, SurveyRecord, SwathFields};
use crate::io::metadata::{SessionStats, SwathFormat};
use crate::io::registry::driver_for;
use crate::io::traits::{SwathDriver, SwathSink};
use crate::{CodecError, Result};

/// Writer for one swath stream.
pub struct SwathWriter {
    dst: Box<dyn SwathSink + Send>,
    driver: Box<dyn SwathDriver>,
    scratch: SurveyRecord,
    stats: SessionStats,
    finished: bool,
}

impl SwathWriter {
    /// Create a file, choosing the format from its extension.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use swathcodec::io::SwathWriter;
    /// use swathcodec::SwathFields;
    ///
    /// let mut writer = SwathWriter::create("out.fbt")?;
    /// writer.write_fields(&SwathFields::comment("processed"))?;
    /// writer.finish()?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        WriterBuilder::new().path(path).build()
    }

    /// Write `format` records to any seekable sink.
    pub fn from_writer<W: SwathSink + Send + 'static>(dst: W, format: SwathFormat) -> Self {
        let driver = driver_for(format);
        let scratch = driver.alloc();
        debug!(format = %format, "Opened writer");
        Self {
            dst: Box::new(dst),
            driver,
            scratch,
            stats: SessionStats::default(),
            finished: false,
        }
    }

    pub fn format(&self) -> SwathFormat {
        self.driver.format()
    }

    /// Encode one canonical record.
    pub fn write_record(&mut self, record: &SurveyRecord) -> Result<()> {
        if self.finished {
            return Err(CodecError::unsupported("write after finish"));
        }
        self.driver.write_record(&mut *self.dst, record)?;
        match record.kind {
            RecordKind::Data => self.stats.data_records += 1,
            RecordKind::Comment if self.driver.writes_comments() => {
                self.stats.comment_records += 1
            }
            RecordKind::Comment => self.stats.records_dropped += 1,
            RecordKind::None => {}
        }
        Ok(())
    }

    /// Quantize `fields` into the scratch store and encode it.
    pub fn write_fields(&mut self, fields: &SwathFields) -> Result<()> {
        if self.finished {
            return Err(CodecError::unsupported("write after finish"));
        }
        self.driver.insert(&mut self.scratch, fields)?;
        let scratch = std::mem::take(&mut self.scratch);
        let result = self.write_record(&scratch);
        self.scratch = scratch;
        result
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    /// Complete the stream and flush the sink.
    ///
    /// Calling it again after success is a no-op.
    pub fn finish(&mut self) -> Result<SessionStats> {
        if self.finished {
            return Ok(self.stats);
        }
        self.driver.finish(&mut *self.dst)?;
        self.dst.flush().map_err(|e| {
            debug!(error = %e, "Flush failed");
            CodecError::write_failure(self.driver.format().name(), 0, 0)
        })?;
        self.finished = true;
        self.driver.dealloc(&mut self.scratch);
        debug!(
            format = %self.format(),
            data = self.stats.data_records,
            comments = self.stats.comment_records,
            dropped = self.stats.records_dropped,
            "Closed writer"
        );
        Ok(self.stats)
    }

    /// Downcast to the driver for format-specific state.
    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        self.driver.as_any().downcast_ref::<T>()
    }

    /// Downcast mutably to the driver.
    pub fn downcast_mut<T: 'static>(&mut self) -> Option<&mut T> {
        self.driver.as_any_mut().downcast_mut::<T>()
    }
}

impl Drop for SwathWriter {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        if let Err(e) = self.finish() {
            warn!(
                format = %self.format(),
                error = %e,
                "Failed to finish writer on drop"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::BeamFlag;
    use crate::io::formats::mb1::Mb1Driver;
    use crate::io::formats::mr1::{self, Mr1Driver};
    use std::io::{Cursor, Seek, SeekFrom, Write};
    use std::sync::{Arc, Mutex};

    /// Seekable in-memory sink whose bytes stay reachable after the writer
    /// is dropped.
    #[derive(Clone, Default)]
    struct SharedSink(Arc<Mutex<Cursor<Vec<u8>>>>);

    impl SharedSink {
        fn bytes(&self) -> Vec<u8> {
            self.0.lock().unwrap().get_ref().clone()
        }
    }

    impl Write for SharedSink {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().write(buf)
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl Seek for SharedSink {
        fn seek(&mut self, pos: SeekFrom) -> std::io::Result<u64> {
            self.0.lock().unwrap().seek(pos)
        }
    }

    fn ping() -> SwathFields {
        let mut fields = SwathFields::data();
        fields.time = 100.0;
        fields.push_beam(BeamFlag::Good, 12.0, -3.0, 0.0);
        fields.push_beam(BeamFlag::Good, 13.0, 3.0, 0.0);
        fields
    }

    #[test]
    fn test_write_fields_counts_records() {
        let sink = SharedSink::default();
        let mut writer = SwathWriter::from_writer(sink.clone(), SwathFormat::Ldeoih);
        writer.write_fields(&SwathFields::comment("hello")).unwrap();
        writer.write_fields(&ping()).unwrap();
        writer.write_fields(&ping()).unwrap();

        let stats = writer.finish().unwrap();
        assert_eq!(stats.data_records, 2);
        assert_eq!(stats.comment_records, 1);
        assert_eq!(stats.records_dropped, 0);
        assert!(!sink.bytes().is_empty());
    }

    #[test]
    fn test_mb1_comment_counts_as_dropped() {
        let sink = SharedSink::default();
        let mut writer = SwathWriter::from_writer(sink.clone(), SwathFormat::Mb1);
        writer.write_fields(&SwathFields::comment("no room")).unwrap();
        writer.write_fields(&ping()).unwrap();

        let stats = writer.finish().unwrap();
        assert_eq!(stats.data_records, 1);
        assert_eq!(stats.comment_records, 0);
        assert_eq!(stats.records_dropped, 1);
        assert_eq!(sink.bytes().len(), crate::io::formats::mb1::record_size(2));
    }

    #[test]
    fn test_write_after_finish() {
        let mut writer = SwathWriter::from_writer(SharedSink::default(), SwathFormat::Mb1);
        writer.finish().unwrap();
        assert!(writer.finish().is_ok());
        let err = writer.write_fields(&ping()).unwrap_err();
        assert!(matches!(err, CodecError::Unsupported { .. }));
    }

    #[test]
    fn test_drop_finishes_mr1_stream() {
        let sink = SharedSink::default();
        {
            let mut writer = SwathWriter::from_writer(sink.clone(), SwathFormat::Mr1);
            writer.write_fields(&ping()).unwrap();
            writer.write_fields(&ping()).unwrap();
        }
        let bytes = sink.bytes();
        let count_at = mr1::ping::PING_COUNT_OFFSET as usize;
        assert_eq!(&bytes[0..4], &mr1::MAGIC.to_be_bytes());
        assert_eq!(&bytes[count_at..count_at + 4], &2i32.to_be_bytes());
    }

    #[test]
    fn test_downcast() {
        let mut writer = SwathWriter::from_writer(SharedSink::default(), SwathFormat::Mb1);
        assert!(writer.downcast_ref::<Mr1Driver>().is_none());
        assert!(writer.downcast_mut::<Mb1Driver>().is_some());
    }
}
