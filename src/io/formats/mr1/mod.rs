// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! MR1 streaming layout (format 64, `MR1PRVR2`).
//!
//! An XDR stream: one file header (magic, ping count, free-text log)
//! followed by pings. Each ping carries a port and a starboard side with
//! their own bathymetry and sidescan counts.
//!
//! Canonical mapping of a ping with `P` port and `S` starboard soundings:
//! `nbath = 2 * max(P, S) + 3` beams around `center = nbath / 2`. Port
//! sounding `i` lands on `center - 2 - i` with a negated across distance,
//! starboard sounding `i` on `center + 2 + i`. The center beam holds the
//! sensor altitude, and `center ± 1` stay null. Sidescan pixels follow the
//! same scheme, with no pixels at all when neither side has sidescan.
//!
//! Depths on the wire are absolute: positive is a good sounding, negative
//! a flagged one and zero no sounding.
//!
//! Header log lines are delivered as comment records before the first
//! ping. On output, comments written before the first ping are gathered
//! into the log; the header goes out with the first ping and its ping
//! count is patched when the stream is finished.

pub mod ping;

use std::any::Any;
use std::collections::VecDeque;
use std::io::{Read, SeekFrom};

use tracing::{debug, warn};

use crate::core::quantize;
use crate::core::record::truncate_utf8;
use crate::core::{BeamFlag, RecordKind, SurveyRecord, SwathFields, COMMENT_MAXLINE};
use crate::io::frame::{write_all_or_fail, XdrWriter};
use crate::io::metadata::SwathFormat;
use crate::io::traits::{SwathDriver, SwathSink};
use crate::{CodecError, Result};

pub use ping::{FileHeader, Ping, SensorSeries, Side, MAGIC};

/// Across-track beam width in degrees.
pub const BEAM_WIDTH_ACROSS: f64 = 0.1;
/// Along-track beam width in degrees.
pub const BEAM_WIDTH_ALONG: f64 = 2.0;

const CONTEXT: &str = "MR1";

/// Driver for the MR1 streaming layout.
#[derive(Debug, Default)]
pub struct Mr1Driver {
    header_read: bool,
    declared_pings: i32,
    pending_comments: VecDeque<String>,

    log: String,
    /// Sink position of the file header once written
    header_start: Option<u64>,
    pings_written: i32,
}

impl Mr1Driver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ping count declared by the header of the stream being read.
    pub fn declared_pings(&self) -> i32 {
        self.declared_pings
    }

    /// Log text gathered for the output header so far.
    pub fn pending_log(&self) -> &str {
        &self.log
    }

    fn write_header(&mut self, dst: &mut dyn SwathSink) -> Result<()> {
        let start = dst
            .stream_position()
            .map_err(|_| CodecError::write_failure(CONTEXT, 0, 0))?;
        let header = FileHeader {
            ping_count: 0,
            log: self.log.as_bytes().to_vec(),
        };
        let mut w = XdrWriter::new();
        header.encode(&mut w);
        write_all_or_fail(dst, w.as_bytes(), CONTEXT)?;
        debug!(
            context = CONTEXT,
            log_bytes = self.log.len(),
            "Wrote file header"
        );
        self.header_start = Some(start);
        Ok(())
    }
}

/// Split a header log into comment lines of at most `COMMENT_MAXLINE - 1`
/// bytes. Longer lines continue in the following comment.
pub fn split_log(log: &[u8]) -> VecDeque<String> {
    let text = String::from_utf8_lossy(log);
    let text = text.trim_end_matches('\0');
    let mut lines = VecDeque::new();
    if text.is_empty() {
        return lines;
    }
    let body = text.strip_suffix('\n').unwrap_or(text);
    for line in body.split('\n') {
        let mut rest = line;
        loop {
            let head = truncate_utf8(rest, COMMENT_MAXLINE - 1);
            lines.push_back(head.to_string());
            rest = &rest[head.len()..];
            if rest.is_empty() {
                break;
            }
        }
    }
    lines
}

/// Classify an absolute wire depth.
fn sounding(depth: f32) -> (BeamFlag, f64) {
    let depth = f64::from(depth);
    if depth > 0.0 {
        (BeamFlag::Good, depth)
    } else if depth < 0.0 {
        (BeamFlag::Manual, -depth)
    } else {
        (BeamFlag::Null, 0.0)
    }
}

fn sidescan_sample(value: f32) -> Option<f64> {
    (value.is_finite() && value > 0.0).then(|| f64::from(value))
}

/// Lay a ping out as canonical fields. Depths are absolute.
fn ping_fields(ping: &Ping, sensor_depth: f64, heading: f64) -> SwathFields {
    let mut fields = SwathFields::data();
    fields.time = ping.time();
    fields.longitude = ping.longitude;
    fields.latitude = ping.latitude;
    fields.heading = heading;
    fields.speed = 0.0;

    let half = ping.port.bathymetry.len().max(ping.starboard.bathymetry.len());
    let nbath = 2 * half + 3;
    let center = nbath / 2;
    for _ in 0..nbath {
        fields.push_beam(BeamFlag::Null, 0.0, 0.0, 0.0);
    }
    let mut place = |j: usize, depth: f32, across: f64| {
        let (flag, depth) = sounding(depth);
        fields.beam_flags[j] = flag;
        if !flag.is_null() {
            fields.bathymetry[j] = depth;
            fields.bath_across[j] = across;
        }
    };
    for (i, &(across, depth)) in ping.port.bathymetry.iter().enumerate() {
        place(center - 2 - i, depth, -f64::from(across));
    }
    for (i, &(across, depth)) in ping.starboard.bathymetry.iter().enumerate() {
        place(center + 2 + i, depth, f64::from(across));
    }

    let altitude = f64::from(ping.altitude);
    if altitude > 0.0 {
        fields.beam_flags[center] = BeamFlag::Good;
        fields.bathymetry[center] = sensor_depth + altitude;
    } else if altitude < 0.0 {
        fields.beam_flags[center] = BeamFlag::Manual;
        fields.bathymetry[center] = sensor_depth - altitude;
    }

    let half = ping.port.sidescan.len().max(ping.starboard.sidescan.len());
    if half > 0 {
        let nss = 2 * half + 3;
        let center = nss / 2;
        for _ in 0..nss {
            fields.push_pixel(None, 0.0, 0.0);
        }
        let spacing = f64::from(ping.pixel_spacing);
        let port_offset = f64::from(ping.port.sidescan_offset);
        for (i, &value) in ping.port.sidescan.iter().enumerate() {
            let j = center - 2 - i;
            fields.sidescan[j] = sidescan_sample(value);
            fields.ss_across[j] = -(port_offset + i as f64 * spacing);
        }
        let stbd_offset = f64::from(ping.starboard.sidescan_offset);
        for (i, &value) in ping.starboard.sidescan.iter().enumerate() {
            let j = center + 2 + i;
            fields.sidescan[j] = sidescan_sample(value);
            fields.ss_across[j] = stbd_offset + i as f64 * spacing;
        }
    }
    fields
}

/// Absolute wire depth of beam `i`, signed by its flag.
fn wire_depth(store: &SurveyRecord, i: usize) -> f32 {
    let flag = store.beam_flags()[i];
    if flag.is_null() {
        return 0.0;
    }
    let depth = quantize::unpack(store.beam_depth()[i], store.depth_scale()) + store.sensor_depth;
    if flag.is_good() {
        depth as f32
    } else {
        -depth as f32
    }
}

/// Rebuild a ping from a canonical data record.
fn store_ping(store: &SurveyRecord) -> Ping {
    let (sec, usec) = Ping::split_time(store.time);
    let distance = store.distance_scale();
    let across = |packed: i16| quantize::unpack(packed, distance);

    let nbath = store.beam_count();
    let center = nbath / 2;
    let mut port = Side::default();
    let mut starboard = Side::default();
    for i in 0..center.saturating_sub(1) {
        let j = center - 2 - i;
        let d = wire_depth(store, j);
        let x = if d == 0.0 { 0.0 } else { -across(store.beam_across()[j]) as f32 };
        port.bathymetry.push((x, d));
    }
    for j in (center + 2)..nbath {
        let d = wire_depth(store, j);
        let x = if d == 0.0 { 0.0 } else { across(store.beam_across()[j]) as f32 };
        starboard.bathymetry.push((x, d));
    }

    let altitude = match store.beam_flags().get(center) {
        Some(flag) if !flag.is_null() => {
            let offset = quantize::unpack(store.beam_depth()[center], store.depth_scale());
            if flag.is_good() {
                offset
            } else {
                -offset
            }
        }
        _ => 0.0,
    };

    let nss = store.pixel_count();
    let mut pixel_spacing = 0.0;
    if nss > 0 {
        let center = nss / 2;
        let exponent = store.sidescan_scale_exponent();
        let sample = |j: usize| {
            quantize::unpack_sidescan(store.sidescan()[j], exponent).unwrap_or(0.0) as f32
        };
        let pixel_across = |j: usize| across(store.sidescan_across()[j]);

        for i in 0..center.saturating_sub(1) {
            port.sidescan.push(sample(center - 2 - i));
        }
        for j in (center + 2)..nss {
            starboard.sidescan.push(sample(j));
        }
        if !port.sidescan.is_empty() {
            port.sidescan_offset = -pixel_across(center - 2) as f32;
        }
        if !starboard.sidescan.is_empty() {
            starboard.sidescan_offset = pixel_across(center + 2) as f32;
        }
        pixel_spacing = if starboard.sidescan.len() > 1 {
            (pixel_across(center + 3) - pixel_across(center + 2)).abs()
        } else if port.sidescan.len() > 1 {
            (pixel_across(center - 3) - pixel_across(center - 2)).abs()
        } else {
            0.0
        };
    }

    Ping {
        sec,
        usec,
        longitude: store.longitude,
        latitude: store.latitude,
        course: store.heading as f32,
        altitude: altitude as f32,
        pixel_spacing: pixel_spacing as f32,
        transmit_time: 0.0,
        temperature: 0.0,
        compass: SensorSeries::representative(store.heading),
        depth: SensorSeries::representative(store.sensor_depth),
        pitch: SensorSeries::representative(store.pitch),
        roll: SensorSeries::representative(store.roll),
        port,
        starboard,
    }
}

impl SwathDriver for Mr1Driver {
    fn format(&self) -> SwathFormat {
        SwathFormat::Mr1
    }

    fn default_beam_widths(&self) -> (f64, f64) {
        (BEAM_WIDTH_ACROSS, BEAM_WIDTH_ALONG)
    }

    fn read_record(&mut self, src: &mut dyn Read, store: &mut SurveyRecord) -> Result<()> {
        if !self.header_read {
            let header = FileHeader::decode(src)?;
            self.header_read = true;
            self.declared_pings = header.ping_count;
            self.pending_comments = split_log(&header.log);
            debug!(
                context = CONTEXT,
                pings = header.ping_count,
                comments = self.pending_comments.len(),
                "Read file header"
            );
        }

        if let Some(text) = self.pending_comments.pop_front() {
            store.kind = RecordKind::Comment;
            store.set_comment(&text);
            return Ok(());
        }

        let ping = Ping::decode(src)?;
        let sensor_depth = f64::from(ping.depth.repval);
        let heading = if ping.course.is_finite() {
            f64::from(ping.course)
        } else {
            f64::from(ping.compass.repval)
        };
        let fields = ping_fields(&ping, sensor_depth, heading);

        // Secure capacity first so the insert cannot fail half way.
        store.ensure_beam_capacity(fields.beam_count())?;
        store.ensure_pixel_capacity(fields.pixel_count())?;

        store.sensor_depth = sensor_depth;
        store.altitude = f64::from(ping.altitude.max(0.0));
        store.pitch = f64::from(ping.pitch.repval);
        store.roll = f64::from(ping.roll.repval);
        store.heave = 0.0;
        store.beam_width_across = BEAM_WIDTH_ACROSS;
        store.beam_width_along = BEAM_WIDTH_ALONG;
        store.insert(&fields, self.default_beam_widths())
    }

    fn write_record(&mut self, dst: &mut dyn SwathSink, store: &SurveyRecord) -> Result<()> {
        match store.kind {
            RecordKind::Comment => {
                if self.header_start.is_some() {
                    warn!(
                        context = CONTEXT,
                        comment = store.comment(),
                        "Comment after file header cannot be stored"
                    );
                    return Err(CodecError::unsupported(
                        "MR1 comment after the first ping",
                    ));
                }
                self.log.push_str(store.comment());
                self.log.push('\n');
                Ok(())
            }
            RecordKind::Data => {
                if self.header_start.is_none() {
                    self.write_header(dst)?;
                }
                let mut w = XdrWriter::new();
                store_ping(store).encode(&mut w);
                write_all_or_fail(dst, w.as_bytes(), CONTEXT)?;
                self.pings_written = self.pings_written.saturating_add(1);
                Ok(())
            }
            RecordKind::None => Err(CodecError::unexpected_kind("write_record", store.kind)),
        }
    }

    fn finish(&mut self, dst: &mut dyn SwathSink) -> Result<()> {
        let Some(start) = self.header_start else {
            return self.write_header(dst);
        };
        let seek_failed = |_: std::io::Error| CodecError::write_failure(CONTEXT, 4, 0);
        let end = dst.stream_position().map_err(seek_failed)?;
        dst.seek(SeekFrom::Start(start + ping::PING_COUNT_OFFSET))
            .map_err(seek_failed)?;
        write_all_or_fail(dst, &self.pings_written.to_be_bytes(), CONTEXT)?;
        dst.seek(SeekFrom::Start(end)).map_err(seek_failed)?;
        debug!(
            context = CONTEXT,
            pings = self.pings_written,
            "Patched ping count"
        );
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
