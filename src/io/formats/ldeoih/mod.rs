// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! LDEOIH native layout (format 71, `MBLDEOIH`).
//!
//! The canonical store written out as-is: every record starts with a
//! 2-byte big-endian id.
//!
//! - `cc` (25443): comment, followed by a 128-byte NUL-padded text field.
//! - `V4` (22068): data with a 90-byte header and 16-bit counts.
//! - `V5` (22069): data with a 98-byte header and 32-bit counts, used
//!   when a count does not fit 16 bits.
//!
//! Data headers carry time, position, sensor depth and altitude as f64,
//! attitude and beam widths as f32, the three counts and a spare, both
//! scales as f32 and four bytes for the sidescan exponent and the
//! sidescan, imagery and topography kinds. The arrays follow in the order
//! flags (one byte per beam), depth, across, along, amplitude, sidescan,
//! sidescan across and sidescan along, each as big-endian i16. Packed
//! values and scales are stored as they are, so a round trip through this
//! layout is lossless.

use std::any::Any;
use std::io::Read;

use crate::core::binary;
use crate::core::quantize::Scales;
use crate::core::{
    BeamFlag, ImageryKind, RecordKind, SidescanKind, SurveyRecord, TopographyKind,
    COMMENT_MAXLINE,
};
use crate::io::frame::{read_declared, read_exact_or_eof, write_all_or_fail};
use crate::io::metadata::SwathFormat;
use crate::io::traits::{SwathDriver, SwathSink};
use crate::{CodecError, Result};

/// Comment record id ("cc").
pub const ID_COMMENT: u16 = 25443;
/// Data record id with 16-bit counts ("V4").
pub const ID_DATA_V4: u16 = 22068;
/// Data record id with 32-bit counts ("V5").
pub const ID_DATA_V5: u16 = 22069;
/// Ids of legacy layouts that are recognised but not decoded.
const LEGACY_IDS: [u16; 4] = [8995, 25700, 28270, 17476];

pub const V4_HEADER_SIZE: usize = 90;
pub const V5_HEADER_SIZE: usize = 98;

const OFF_TIME: usize = 2;
const OFF_LONGITUDE: usize = 10;
const OFF_LATITUDE: usize = 18;
const OFF_SENSOR_DEPTH: usize = 26;
const OFF_ALTITUDE: usize = 34;
const OFF_HEADING: usize = 42;
const OFF_SPEED: usize = 46;
const OFF_ROLL: usize = 50;
const OFF_PITCH: usize = 54;
const OFF_HEAVE: usize = 58;
const OFF_WIDTH_ACROSS: usize = 62;
const OFF_WIDTH_ALONG: usize = 66;
const OFF_COUNTS: usize = 70;

const CONTEXT: &str = "LDEOIH";

/// Header layout variant of a data record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Version {
    V4,
    V5,
}

impl Version {
    fn header_size(self) -> usize {
        match self {
            Version::V4 => V4_HEADER_SIZE,
            Version::V5 => V5_HEADER_SIZE,
        }
    }

    fn count_width(self) -> usize {
        match self {
            Version::V4 => 2,
            Version::V5 => 4,
        }
    }

    /// Offset of the depth scale, right after the four counts.
    fn scales_offset(self) -> usize {
        OFF_COUNTS + 4 * self.count_width()
    }

    /// Smallest header able to carry the given counts.
    fn for_counts(beams: usize, amps: usize, pixels: usize) -> Self {
        let fits = |n: usize| i16::try_from(n).is_ok();
        if fits(beams) && fits(amps) && fits(pixels) {
            Version::V4
        } else {
            Version::V5
        }
    }
}

/// Decoded data header.
struct DataHeader {
    counts: (usize, usize, usize),
    scales: Scales,
    buf: Vec<u8>,
}

/// Wire size of the array section for the given counts.
fn data_size(beams: usize, amps: usize, pixels: usize) -> Option<usize> {
    let shorts = beams
        .checked_mul(3)?
        .checked_add(amps)?
        .checked_add(pixels.checked_mul(3)?)?;
    shorts.checked_mul(2)?.checked_add(beams)
}

/// Driver for the LDEOIH native layout.
#[derive(Debug, Default)]
pub struct LdeoihDriver {
    scratch: Vec<u8>,
}

impl LdeoihDriver {
    pub fn new() -> Self {
        Self::default()
    }

    fn read_header(src: &mut dyn Read, version: Version, id: [u8; 2]) -> Result<DataHeader> {
        let mut buf = vec![0u8; version.header_size()];
        buf[..2].copy_from_slice(&id);
        read_exact_or_eof(src, &mut buf[2..], CONTEXT)?;

        let mut counts = [0usize; 3];
        for (k, slot) in counts.iter_mut().enumerate() {
            let at = OFF_COUNTS + k * version.count_width();
            let raw = match version {
                Version::V4 => i32::from(binary::get_i16(&buf, at)),
                Version::V5 => binary::get_i32(&buf, at),
            };
            *slot = usize::try_from(raw).map_err(|_| {
                CodecError::unintelligible(CONTEXT, format!("negative array count {raw}"))
            })?;
        }
        let at = version.scales_offset();
        let scales = Scales {
            depth: f64::from(binary::get_f32(&buf, at)),
            distance: f64::from(binary::get_f32(&buf, at + 4)),
            sidescan_exponent: buf[at + 8] as i8,
        };
        Ok(DataHeader {
            counts: (counts[0], counts[1], counts[2]),
            scales,
            buf,
        })
    }

    fn read_data(
        &mut self,
        src: &mut dyn Read,
        version: Version,
        header: DataHeader,
        store: &mut SurveyRecord,
    ) -> Result<()> {
        let (nbeams, namps, npixels) = header.counts;
        let len = data_size(nbeams, namps, npixels).map_or(u64::MAX, |n| n as u64);
        read_declared(src, len, &mut self.scratch, CONTEXT)?;
        store.set_counts(nbeams, namps, npixels)?;

        let buf = &header.buf;
        let kinds = version.scales_offset() + 9;
        store.kind = RecordKind::Data;
        store.time = binary::get_f64(buf, OFF_TIME);
        store.longitude = binary::get_f64(buf, OFF_LONGITUDE);
        store.latitude = binary::get_f64(buf, OFF_LATITUDE);
        store.sensor_depth = binary::get_f64(buf, OFF_SENSOR_DEPTH);
        store.altitude = binary::get_f64(buf, OFF_ALTITUDE);
        store.heading = f64::from(binary::get_f32(buf, OFF_HEADING));
        store.speed = f64::from(binary::get_f32(buf, OFF_SPEED));
        store.roll = f64::from(binary::get_f32(buf, OFF_ROLL));
        store.pitch = f64::from(binary::get_f32(buf, OFF_PITCH));
        store.heave = f64::from(binary::get_f32(buf, OFF_HEAVE));
        store.beam_width_across = f64::from(binary::get_f32(buf, OFF_WIDTH_ACROSS));
        store.beam_width_along = f64::from(binary::get_f32(buf, OFF_WIDTH_ALONG));
        store.sidescan_kind = SidescanKind::from_u8(buf[kinds]);
        store.imagery_kind = ImageryKind::from_u8(buf[kinds + 1]);
        store.topography_kind = TopographyKind::from_u8(buf[kinds + 2]);
        store.set_scales(header.scales);

        let data = &self.scratch[..];
        let mut at = nbeams;
        let mut take = |out: &mut [i16]| {
            binary::get_i16_slice(data, at, out);
            at += 2 * out.len();
        };
        let beams = store.beams_mut();
        for (flag, &byte) in beams.flags.iter_mut().zip(&data[..nbeams]) {
            *flag = BeamFlag::from_byte(byte);
        }
        take(beams.depth);
        take(beams.across);
        take(beams.along);
        take(store.amplitude_mut());
        let pixels = store.pixels_mut();
        take(pixels.sidescan);
        take(pixels.across);
        take(pixels.along);
        Ok(())
    }

    fn read_comment(src: &mut dyn Read, store: &mut SurveyRecord) -> Result<()> {
        let mut text = [0u8; COMMENT_MAXLINE];
        read_exact_or_eof(src, &mut text, CONTEXT)?;
        let end = text.iter().position(|&b| b == 0).unwrap_or(text.len());
        store.kind = RecordKind::Comment;
        store.set_comment(&String::from_utf8_lossy(&text[..end]));
        Ok(())
    }

    fn encode_data(store: &SurveyRecord) -> Vec<u8> {
        let (nbeams, namps, npixels) = (store.beam_count(), store.amp_count(), store.pixel_count());
        let version = Version::for_counts(nbeams, namps, npixels);
        let header_size = version.header_size();
        let size = header_size + data_size(nbeams, namps, npixels).unwrap_or(0);
        let mut buf = vec![0u8; size];

        let id = match version {
            Version::V4 => ID_DATA_V4,
            Version::V5 => ID_DATA_V5,
        };
        buf[..2].copy_from_slice(&id.to_be_bytes());
        binary::put_f64(store.time, &mut buf, OFF_TIME);
        binary::put_f64(store.longitude, &mut buf, OFF_LONGITUDE);
        binary::put_f64(store.latitude, &mut buf, OFF_LATITUDE);
        binary::put_f64(store.sensor_depth, &mut buf, OFF_SENSOR_DEPTH);
        binary::put_f64(store.altitude, &mut buf, OFF_ALTITUDE);
        binary::put_f32(store.heading as f32, &mut buf, OFF_HEADING);
        binary::put_f32(store.speed as f32, &mut buf, OFF_SPEED);
        binary::put_f32(store.roll as f32, &mut buf, OFF_ROLL);
        binary::put_f32(store.pitch as f32, &mut buf, OFF_PITCH);
        binary::put_f32(store.heave as f32, &mut buf, OFF_HEAVE);
        binary::put_f32(store.beam_width_across as f32, &mut buf, OFF_WIDTH_ACROSS);
        binary::put_f32(store.beam_width_along as f32, &mut buf, OFF_WIDTH_ALONG);

        for (k, n) in [nbeams, namps, npixels].into_iter().enumerate() {
            let at = OFF_COUNTS + k * version.count_width();
            match version {
                Version::V4 => binary::put_i16(n as i16, &mut buf, at),
                Version::V5 => binary::put_i32(i32::try_from(n).unwrap_or(i32::MAX), &mut buf, at),
            }
        }
        let at = version.scales_offset();
        binary::put_f32(store.depth_scale() as f32, &mut buf, at);
        binary::put_f32(store.distance_scale() as f32, &mut buf, at + 4);
        buf[at + 8] = store.sidescan_scale_exponent() as u8;
        buf[at + 9] = store.sidescan_kind.as_u8();
        buf[at + 10] = store.imagery_kind.as_u8();
        buf[at + 11] = store.topography_kind.as_u8();

        let mut at = header_size;
        for flag in store.beam_flags() {
            buf[at] = flag.to_byte();
            at += 1;
        }
        for values in [
            store.beam_depth(),
            store.beam_across(),
            store.beam_along(),
            store.amplitude(),
            store.sidescan(),
            store.sidescan_across(),
            store.sidescan_along(),
        ] {
            binary::put_i16_slice(values, &mut buf, at);
            at += 2 * values.len();
        }
        buf
    }
}

impl SwathDriver for LdeoihDriver {
    fn format(&self) -> SwathFormat {
        SwathFormat::Ldeoih
    }

    fn read_record(&mut self, src: &mut dyn Read, store: &mut SurveyRecord) -> Result<()> {
        let mut id = [0u8; 2];
        read_exact_or_eof(src, &mut id, CONTEXT)?;
        match u16::from_be_bytes(id) {
            ID_COMMENT => Self::read_comment(src, store),
            ID_DATA_V4 => {
                let header = Self::read_header(src, Version::V4, id)?;
                self.read_data(src, Version::V4, header, store)
            }
            ID_DATA_V5 => {
                let header = Self::read_header(src, Version::V5, id)?;
                self.read_data(src, Version::V5, header, store)
            }
            legacy if LEGACY_IDS.contains(&legacy) => Err(CodecError::unsupported(format!(
                "legacy LDEOIH record id {legacy}"
            ))),
            other => Err(CodecError::unintelligible(
                CONTEXT,
                format!("unknown record id {other}"),
            )),
        }
    }

    fn write_record(&mut self, dst: &mut dyn SwathSink, store: &SurveyRecord) -> Result<()> {
        match store.kind {
            RecordKind::Comment => {
                let mut buf = [0u8; 2 + COMMENT_MAXLINE];
                buf[..2].copy_from_slice(&ID_COMMENT.to_be_bytes());
                let text = store.comment().as_bytes();
                let n = text.len().min(COMMENT_MAXLINE - 1);
                buf[2..2 + n].copy_from_slice(&text[..n]);
                write_all_or_fail(dst, &buf, CONTEXT)
            }
            RecordKind::Data => write_all_or_fail(dst, &Self::encode_data(store), CONTEXT),
            RecordKind::None => Err(CodecError::unexpected_kind("write_record", store.kind)),
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
