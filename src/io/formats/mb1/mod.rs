// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! MB1 framed layout (format 72, `MBARIMB1`).
//!
//! Every record is a 56-byte header, `N` beam blocks of 28 bytes and a
//! 4-byte trailer, all big-endian:
//!
//! ```text
//! 0   sync "MB1\0"        32  sensor depth f64
//! 4   record size i32     40  heading f64
//! 8   time f64            48  ping number i32
//! 16  latitude f64        52  beam count N i32
//! 24  longitude f64
//!
//! beam: 0 beam index i32, 4 along f64, 12 across f64, 20 depth f64
//! ```
//!
//! Beam depths are relative to the sensor, as in the canonical store, so
//! no sensor depth adjustment happens at this boundary. The layout has no
//! flags, amplitudes, sidescan or comments. The trailer is reserved for a
//! checksum that is never computed: it is discarded on read and written
//! as zero.

use std::any::Any;
use std::io::Read;

use tracing::{debug, warn};

use crate::core::binary;
use crate::core::quantize::{self, ScaleAccumulator};
use crate::core::{BeamFlag, RecordKind, SurveyRecord};
use crate::io::frame::{read_declared, write_all_or_fail, SyncFramer};
use crate::io::metadata::SwathFormat;
use crate::io::traits::{SwathDriver, SwathSink};
use crate::{CodecError, Result};

/// Sync marker at the start of every record.
pub const SYNC: &[u8; 4] = b"MB1\0";
/// Fixed header size.
pub const HEADER_SIZE: usize = 56;
/// Size of one beam block.
pub const BEAM_SIZE: usize = 28;
/// Size of the reserved trailer.
pub const TRAILER_SIZE: usize = 4;

const OFF_RECORD_SIZE: usize = 4;
const OFF_TIME: usize = 8;
const OFF_LATITUDE: usize = 16;
const OFF_LONGITUDE: usize = 24;
const OFF_SENSOR_DEPTH: usize = 32;
const OFF_HEADING: usize = 40;
const OFF_PING: usize = 48;
const OFF_BEAMS: usize = 52;

const BEAM_OFF_INDEX: usize = 0;
const BEAM_OFF_ALONG: usize = 4;
const BEAM_OFF_ACROSS: usize = 12;
const BEAM_OFF_DEPTH: usize = 20;

const CONTEXT: &str = "MB1";

/// Total wire size of a record carrying `beams` beams.
pub fn record_size(beams: usize) -> usize {
    HEADER_SIZE + beams * BEAM_SIZE + TRAILER_SIZE
}

/// Driver for the MB1 framed layout.
#[derive(Debug)]
pub struct Mb1Driver {
    framer: SyncFramer,
    /// Beam section scratch; grows with the bytes actually read and keeps
    /// its largest capacity
    scratch: Vec<u8>,
    next_ping: i32,
}

impl Default for Mb1Driver {
    fn default() -> Self {
        Self::new()
    }
}

impl Mb1Driver {
    pub fn new() -> Self {
        Self {
            framer: SyncFramer::new(SYNC, HEADER_SIZE),
            scratch: Vec::new(),
            next_ping: 0,
        }
    }

    /// Bytes skipped before the most recently read header.
    pub fn last_skip(&self) -> u64 {
        self.framer.last_skip()
    }

    /// Ping number the next written record will carry.
    pub fn next_ping(&self) -> i32 {
        self.next_ping
    }

    /// Capacity of the beam section scratch.
    pub fn scratch_capacity(&self) -> usize {
        self.scratch.capacity()
    }

    fn fill_scratch(&mut self, src: &mut dyn Read, len: u64) -> Result<()> {
        read_declared(src, len, &mut self.scratch, CONTEXT)
    }
}

/// Header fields of one record.
struct Header {
    time: f64,
    latitude: f64,
    longitude: f64,
    sensor_depth: f64,
    heading: f64,
    beams: usize,
}

fn parse_header(buf: &[u8]) -> Result<Header> {
    let declared = binary::get_i32(buf, OFF_RECORD_SIZE);
    let count = binary::get_i32(buf, OFF_BEAMS);
    let beams = usize::try_from(count).map_err(|_| {
        CodecError::unintelligible(CONTEXT, format!("negative beam count {count}"))
    })?;

    let expected = (beams as u64) * BEAM_SIZE as u64 + (HEADER_SIZE + TRAILER_SIZE) as u64;
    if u64::try_from(declared).ok() != Some(expected) {
        warn!(
            context = CONTEXT,
            declared = declared,
            expected = expected,
            beams = beams,
            "Record size does not match beam count"
        );
    }

    Ok(Header {
        time: binary::get_f64(buf, OFF_TIME),
        latitude: binary::get_f64(buf, OFF_LATITUDE),
        longitude: binary::get_f64(buf, OFF_LONGITUDE),
        sensor_depth: binary::get_f64(buf, OFF_SENSOR_DEPTH),
        heading: binary::get_f64(buf, OFF_HEADING),
        beams,
    })
}

impl SwathDriver for Mb1Driver {
    fn format(&self) -> SwathFormat {
        SwathFormat::Mb1
    }

    fn read_record(&mut self, src: &mut dyn Read, store: &mut SurveyRecord) -> Result<()> {
        let header = {
            let buf = self.framer.next_header(src, CONTEXT)?;
            parse_header(buf)?
        };
        let nbeams = header.beams;
        self.fill_scratch(src, (nbeams as u64) * BEAM_SIZE as u64 + TRAILER_SIZE as u64)?;
        let body = &self.scratch[..];

        let beam = |i: usize, field: usize| binary::get_f64(body, i * BEAM_SIZE + field);
        let mut acc = ScaleAccumulator::new();
        for i in 0..nbeams {
            acc.observe_depth(beam(i, BEAM_OFF_DEPTH));
            acc.observe_distance(beam(i, BEAM_OFF_ACROSS));
            acc.observe_distance(beam(i, BEAM_OFF_ALONG));
        }

        // Nothing in the store changes until capacity is secured.
        store.set_counts(nbeams, 0, 0)?;
        store.kind = RecordKind::Data;
        store.time = header.time;
        store.latitude = header.latitude;
        store.longitude = header.longitude;
        store.sensor_depth = header.sensor_depth;
        store.heading = header.heading;
        store.altitude = 0.0;
        store.speed = 0.0;
        store.roll = 0.0;
        store.pitch = 0.0;
        store.heave = 0.0;
        store.set_scales(acc.finish());

        let scales = store.scales();
        let beams = store.beams_mut();
        for i in 0..nbeams {
            beams.flags[i] = BeamFlag::Good;
            beams.depth[i] = quantize::pack(beam(i, BEAM_OFF_DEPTH), scales.depth);
            beams.across[i] = quantize::pack(beam(i, BEAM_OFF_ACROSS), scales.distance);
            beams.along[i] = quantize::pack(beam(i, BEAM_OFF_ALONG), scales.distance);
        }
        Ok(())
    }

    fn write_record(&mut self, dst: &mut dyn SwathSink, store: &SurveyRecord) -> Result<()> {
        match store.kind {
            RecordKind::Data => {}
            RecordKind::Comment => {
                debug!(
                    context = CONTEXT,
                    comment = store.comment(),
                    "Comment not representable, skipped"
                );
                return Ok(());
            }
            RecordKind::None => return Err(CodecError::unexpected_kind("write_record", store.kind)),
        }

        // Null beams carry no sounding. The beam index records the original
        // slot, but readers pack the surviving beams contiguously.
        let live: Vec<usize> = (0..store.beam_count())
            .filter(|&i| !store.beam_flags()[i].is_null())
            .collect();
        let size = record_size(live.len());
        let mut buf = vec![0u8; size];

        buf[..SYNC.len()].copy_from_slice(SYNC);
        binary::put_i32(i32::try_from(size).unwrap_or(i32::MAX), &mut buf, OFF_RECORD_SIZE);
        binary::put_f64(store.time, &mut buf, OFF_TIME);
        binary::put_f64(store.latitude, &mut buf, OFF_LATITUDE);
        binary::put_f64(store.longitude, &mut buf, OFF_LONGITUDE);
        binary::put_f64(store.sensor_depth, &mut buf, OFF_SENSOR_DEPTH);
        binary::put_f64(store.heading, &mut buf, OFF_HEADING);
        binary::put_i32(self.next_ping, &mut buf, OFF_PING);
        binary::put_i32(
            i32::try_from(live.len()).unwrap_or(i32::MAX),
            &mut buf,
            OFF_BEAMS,
        );

        let scales = store.scales();
        for (slot, &i) in live.iter().enumerate() {
            let at = HEADER_SIZE + slot * BEAM_SIZE;
            binary::put_i32(
                i32::try_from(i).unwrap_or(i32::MAX),
                &mut buf,
                at + BEAM_OFF_INDEX,
            );
            binary::put_f64(
                quantize::unpack(store.beam_along()[i], scales.distance),
                &mut buf,
                at + BEAM_OFF_ALONG,
            );
            binary::put_f64(
                quantize::unpack(store.beam_across()[i], scales.distance),
                &mut buf,
                at + BEAM_OFF_ACROSS,
            );
            binary::put_f64(
                quantize::unpack(store.beam_depth()[i], scales.depth),
                &mut buf,
                at + BEAM_OFF_DEPTH,
            );
        }

        write_all_or_fail(dst, &buf, CONTEXT)?;
        self.next_ping = self.next_ping.wrapping_add(1);
        Ok(())
    }

    fn writes_comments(&self) -> bool {
        false
    }

    fn bytes_skipped(&self) -> u64 {
        self.framer.total_skipped()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
