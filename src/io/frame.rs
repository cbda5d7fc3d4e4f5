// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Frame codec: locating whole records in a byte stream.
//!
//! Two framing styles are supported:
//!
//! - **Sync-marked fixed headers** ([`SyncFramer`]): a header-sized window
//!   is read and, while the marker is not at its start, the window slides
//!   left by one byte and one new byte is read at the end. The number of
//!   discarded bytes is counted, never reported as an error.
//! - **Length-prefixed XDR streams** ([`XdrReader`] / [`XdrWriter`]):
//!   every variable-length part is preceded by its count, which is read
//!   first and used to size the buffer for the data that follows.
//!
//! A read that fails or hits the end of the stream part-way through a
//! record is an `Eof` error.

use std::io::{ErrorKind, Read, Write};

use tracing::{debug, warn};

use crate::core::binary;
use crate::{CodecError, Result};

/// XDR aligns every item to four bytes.
const XDR_UNIT: usize = 4;

/// Fill `buf` completely or fail with `Eof`.
pub fn read_exact_or_eof<R: Read + ?Sized>(src: &mut R, buf: &mut [u8], context: &str) -> Result<()> {
    src.read_exact(buf).map_err(|e| {
        CodecError::eof(
            context,
            format!("failed to read {} bytes: {e}", buf.len()),
        )
    })
}

/// Read exactly `len` bytes into `buf`, growing it only as bytes arrive.
///
/// `buf` is cleared first and keeps its capacity. A declared length the
/// stream cannot satisfy is `Eof`, never an up-front allocation of `len`.
pub fn read_declared<R: Read + ?Sized>(
    src: &mut R,
    len: u64,
    buf: &mut Vec<u8>,
    context: &str,
) -> Result<()> {
    buf.clear();
    let got = Read::take(&mut *src, len)
        .read_to_end(buf)
        .map_err(|e| CodecError::eof(context, format!("failed to read {len} bytes: {e}")))?;
    if (got as u64) < len {
        return Err(CodecError::eof(
            context,
            format!("stream ended after {got} of {len} bytes"),
        ));
    }
    Ok(())
}

/// Write all of `buf` or fail with `WriteFailure` reporting how much got out.
pub fn write_all_or_fail<W: Write + ?Sized>(dst: &mut W, buf: &[u8], context: &str) -> Result<()> {
    let mut written = 0;
    while written < buf.len() {
        match dst.write(&buf[written..]) {
            Ok(0) => return Err(CodecError::write_failure(context, buf.len(), written)),
            Ok(n) => written += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => {}
            Err(_) => return Err(CodecError::write_failure(context, buf.len(), written)),
        }
    }
    Ok(())
}

/// Sliding one-byte resynchronization over fixed-size record headers.
#[derive(Debug)]
pub struct SyncFramer {
    marker: &'static [u8],
    window: Vec<u8>,
    last_skip: u64,
    total_skipped: u64,
}

impl SyncFramer {
    /// Create a framer for headers of `header_len` bytes starting with `marker`.
    pub fn new(marker: &'static [u8], header_len: usize) -> Self {
        debug_assert!(marker.len() <= header_len);
        Self {
            marker,
            window: vec![0; header_len],
            last_skip: 0,
            total_skipped: 0,
        }
    }

    /// Read the next header, skipping bytes until the marker lines up.
    ///
    /// Returns the header window, which starts with the marker.
    pub fn next_header(&mut self, src: &mut dyn Read, context: &str) -> Result<&[u8]> {
        self.last_skip = 0;
        read_exact_or_eof(src, &mut self.window, context)?;

        let last = self.window.len() - 1;
        let mut skip = 0u64;
        while !self.window.starts_with(self.marker) {
            self.window.rotate_left(1);
            if let Err(err) = read_exact_or_eof(src, &mut self.window[last..], context) {
                self.last_skip = skip;
                self.total_skipped += skip;
                return Err(err);
            }
            skip += 1;
        }

        if skip > 0 {
            warn!(
                context = context,
                skipped = skip,
                "Resynchronized on record marker"
            );
        }
        self.last_skip = skip;
        self.total_skipped += skip;
        Ok(&self.window)
    }

    /// Bytes skipped before the most recent header.
    pub fn last_skip(&self) -> u64 {
        self.last_skip
    }

    /// Bytes skipped over the whole stream.
    pub fn total_skipped(&self) -> u64 {
        self.total_skipped
    }
}

/// Big-endian XDR decoding over a blocking reader.
pub struct XdrReader<'a> {
    src: &'a mut dyn Read,
    context: &'static str,
    scratch: [u8; 8],
}

impl<'a> XdrReader<'a> {
    pub fn new(src: &'a mut dyn Read, context: &'static str) -> Self {
        Self {
            src,
            context,
            scratch: [0; 8],
        }
    }

    fn fill(&mut self, len: usize) -> Result<()> {
        read_exact_or_eof(&mut *self.src, &mut self.scratch[..len], self.context)
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        self.fill(4)?;
        Ok(binary::get_i32(&self.scratch, 0))
    }

    pub fn read_f32(&mut self) -> Result<f32> {
        self.fill(4)?;
        Ok(binary::get_f32(&self.scratch, 0))
    }

    pub fn read_f64(&mut self) -> Result<f64> {
        self.fill(8)?;
        Ok(binary::get_f64(&self.scratch, 0))
    }

    /// Read a declared element count. Negative counts are unintelligible.
    pub fn read_count(&mut self, what: &str) -> Result<usize> {
        let count = self.read_i32()?;
        usize::try_from(count).map_err(|_| {
            CodecError::unintelligible(self.context, format!("negative {what} count {count}"))
        })
    }

    /// Read `count` floats whose count was read earlier.
    pub fn read_f32_array(&mut self, count: usize, what: &str) -> Result<Vec<f32>> {
        let len = (count as u64).saturating_mul(XDR_UNIT as u64);
        let mut raw = Vec::new();
        read_declared(&mut *self.src, len, &mut raw, self.context).map_err(|e| {
            debug!(context = self.context, array = what, count = count, "Array cut short");
            e
        })?;
        Ok(raw.chunks_exact(4).map(|c| binary::get_f32(c, 0)).collect())
    }

    /// Read a length-prefixed opaque byte string and its alignment padding.
    pub fn read_opaque(&mut self, what: &str) -> Result<Vec<u8>> {
        let len = self.read_count(what)?;
        let padded = (len as u64).div_ceil(XDR_UNIT as u64) * XDR_UNIT as u64;
        let mut raw = Vec::new();
        read_declared(&mut *self.src, padded, &mut raw, self.context).map_err(|e| {
            debug!(context = self.context, field = what, len = len, "Opaque cut short");
            e
        })?;
        raw.truncate(len);
        Ok(raw)
    }
}

/// Big-endian XDR encoding into an in-memory record buffer.
///
/// Records are assembled completely before a single write so that a
/// failed encode never leaves half a record in the sink.
#[derive(Debug, Default)]
pub struct XdrWriter {
    buf: Vec<u8>,
}

impl XdrWriter {
    pub fn new() -> Self {
        Self::default()
    }

    fn extend(&mut self, width: usize) -> usize {
        let at = self.buf.len();
        self.buf.resize(at + width, 0);
        at
    }

    pub fn put_i32(&mut self, value: i32) {
        let at = self.extend(4);
        binary::put_i32(value, &mut self.buf, at);
    }

    pub fn put_f32(&mut self, value: f32) {
        let at = self.extend(4);
        binary::put_f32(value, &mut self.buf, at);
    }

    pub fn put_f64(&mut self, value: f64) {
        let at = self.extend(8);
        binary::put_f64(value, &mut self.buf, at);
    }

    /// Write a count as XDR int, saturating at `i32::MAX`.
    pub fn put_count(&mut self, count: usize) {
        self.put_i32(i32::try_from(count).unwrap_or(i32::MAX));
    }

    pub fn put_f32_array(&mut self, values: &[f32]) {
        for &v in values {
            self.put_f32(v);
        }
    }

    /// Length-prefixed opaque bytes padded to the XDR unit.
    pub fn put_opaque(&mut self, bytes: &[u8]) {
        self.put_count(bytes.len());
        self.buf.extend_from_slice(bytes);
        let padded = bytes.len().div_ceil(XDR_UNIT) * XDR_UNIT;
        self.buf.resize(self.buf.len() + padded - bytes.len(), 0);
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn framed(garbage: &[u8]) -> Vec<u8> {
        let mut bytes = garbage.to_vec();
        bytes.extend_from_slice(b"MB1\0");
        bytes.extend_from_slice(&[7u8; 12]);
        bytes
    }

    #[test]
    fn test_no_skip_when_aligned() {
        let mut src = Cursor::new(framed(&[]));
        let mut framer = SyncFramer::new(b"MB1\0", 16);
        let header = framer.next_header(&mut src, "test").unwrap();
        assert_eq!(&header[..4], b"MB1\0");
        assert_eq!(framer.last_skip(), 0);
    }

    #[test]
    fn test_skips_garbage() {
        let mut src = Cursor::new(framed(b"xyzMB"));
        let mut framer = SyncFramer::new(b"MB1\0", 16);
        let header = framer.next_header(&mut src, "test").unwrap();
        assert_eq!(&header[4..], &[7u8; 12]);
        assert_eq!(framer.last_skip(), 5);
        assert_eq!(framer.total_skipped(), 5);
    }

    #[test]
    fn test_eof_while_scanning() {
        let mut src = Cursor::new(vec![0u8; 40]);
        let mut framer = SyncFramer::new(b"MB1\0", 16);
        let err = framer.next_header(&mut src, "test").unwrap_err();
        assert!(err.is_eof());
        assert_eq!(framer.last_skip(), 24);
    }

    #[test]
    fn test_eof_on_short_header() {
        let mut src = Cursor::new(b"MB1\0abc".to_vec());
        let mut framer = SyncFramer::new(b"MB1\0", 16);
        assert!(framer.next_header(&mut src, "test").unwrap_err().is_eof());
    }

    #[test]
    fn test_xdr_opaque_padding() {
        let mut w = XdrWriter::new();
        w.put_opaque(b"hello");
        w.put_i32(-3);
        assert_eq!(w.len(), 4 + 8 + 4);

        let bytes = w.as_bytes().to_vec();
        let mut cursor = Cursor::new(bytes);
        let mut r = XdrReader::new(&mut cursor, "test");
        assert_eq!(r.read_opaque("log").unwrap(), b"hello");
        assert_eq!(r.read_i32().unwrap(), -3);
    }

    #[test]
    fn test_xdr_arrays_and_counts() {
        let mut w = XdrWriter::new();
        w.put_count(2);
        w.put_f32_array(&[1.5, -2.25]);
        w.put_f64(0.125);
        w.put_i32(-1);

        let mut cursor = Cursor::new(w.as_bytes().to_vec());
        let mut r = XdrReader::new(&mut cursor, "test");
        let n = r.read_count("samples").unwrap();
        assert_eq!(r.read_f32_array(n, "samples").unwrap(), vec![1.5, -2.25]);
        assert_eq!(r.read_f64().unwrap(), 0.125);
        let err = r.read_count("beams").unwrap_err();
        assert!(matches!(err, CodecError::Unintelligible { .. }));
    }

    #[test]
    fn test_xdr_truncated_is_eof() {
        let mut cursor = Cursor::new(vec![0u8, 0, 0, 3, 0, 0]);
        let mut r = XdrReader::new(&mut cursor, "test");
        let n = r.read_count("samples").unwrap();
        assert!(r.read_f32_array(n, "samples").unwrap_err().is_eof());
    }

    #[test]
    fn test_huge_declared_count_is_eof() {
        let mut cursor = Cursor::new(vec![0x7F, 0xFF, 0xFF, 0xFF, 1, 2, 3, 4]);
        let mut r = XdrReader::new(&mut cursor, "test");
        let n = r.read_count("samples").unwrap();
        assert_eq!(n, i32::MAX as usize);
        assert!(r.read_f32_array(n, "samples").unwrap_err().is_eof());

        let mut cursor = Cursor::new(vec![0x7F, 0xFF, 0xFF, 0xFF, b'l', b'o', b'g']);
        let mut r = XdrReader::new(&mut cursor, "test");
        assert!(r.read_opaque("log").unwrap_err().is_eof());
    }

    #[test]
    fn test_read_declared_keeps_capacity() {
        let mut buf = Vec::new();
        read_declared(&mut Cursor::new(vec![9u8; 64]), 64, &mut buf, "test").unwrap();
        assert_eq!(buf, vec![9u8; 64]);
        let high = buf.capacity();

        read_declared(&mut Cursor::new(vec![1u8; 8]), 8, &mut buf, "test").unwrap();
        assert_eq!(buf, vec![1u8; 8]);
        assert_eq!(buf.capacity(), high);

        let err = read_declared(&mut Cursor::new(vec![0u8; 10]), u64::MAX, &mut buf, "test")
            .unwrap_err();
        assert!(err.is_eof());
        assert_eq!(buf.len(), 10);
    }

    struct ShortSink {
        accepted: usize,
    }

    impl Write for ShortSink {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            let n = buf.len().min(3usize.saturating_sub(self.accepted));
            self.accepted += n;
            Ok(n)
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_short_write() {
        let mut sink = ShortSink { accepted: 0 };
        let err = write_all_or_fail(&mut sink, &[0u8; 8], "test").unwrap_err();
        assert_eq!(err, CodecError::write_failure("test", 8, 3));
    }
}
