// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! MR1 wire structures and their XDR codec.
//!
//! Counts are always decoded before the arrays they size. A ping is fully
//! decoded into a [`Ping`] before anything touches the canonical store.

use std::io::Read;

use crate::io::frame::{XdrReader, XdrWriter};
use crate::{CodecError, Result};

/// File header magic number.
pub const MAGIC: i32 = 6666;
/// Offset of the ping count within the file header.
pub const PING_COUNT_OFFSET: u64 = 4;

const CONTEXT: &str = "MR1";

/// File-level header, read once per stream.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FileHeader {
    pub ping_count: i32,
    /// Free-text processing log; lines become comment records
    pub log: Vec<u8>,
}

impl FileHeader {
    pub fn decode(src: &mut dyn Read) -> Result<Self> {
        let mut r = XdrReader::new(src, CONTEXT);
        let magic = r.read_i32()?;
        if magic != MAGIC {
            return Err(CodecError::unintelligible(
                CONTEXT,
                format!("bad file magic {magic}"),
            ));
        }
        let ping_count = r.read_i32()?;
        let log = r.read_opaque("log")?;
        Ok(Self { ping_count, log })
    }

    pub fn encode(&self, w: &mut XdrWriter) {
        w.put_i32(MAGIC);
        w.put_i32(self.ping_count);
        w.put_opaque(&self.log);
    }
}

/// Fixed-interval sensor time series embedded in a ping.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SensorSeries {
    /// Seconds between samples
    pub interval: f32,
    /// Representative value for the ping
    pub repval: f32,
    pub samples: Vec<f32>,
}

impl SensorSeries {
    /// A series carrying only its representative value.
    pub fn representative(value: f64) -> Self {
        Self {
            interval: 0.0,
            repval: value as f32,
            samples: Vec::new(),
        }
    }

    fn decode(r: &mut XdrReader<'_>, what: &str) -> Result<Self> {
        let interval = r.read_f32()?;
        let count = r.read_count(what)?;
        let repval = r.read_f32()?;
        let samples = r.read_f32_array(count, what)?;
        Ok(Self {
            interval,
            repval,
            samples,
        })
    }

    fn encode(&self, w: &mut XdrWriter) {
        w.put_f32(self.interval);
        w.put_count(self.samples.len());
        w.put_f32(self.repval);
        w.put_f32_array(&self.samples);
    }
}

/// One side of a ping.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Side {
    pub transmit: [f32; 2],
    pub gain: f32,
    pub pulse_length: f32,
    /// Across-track distance of the first sidescan sample
    pub sidescan_offset: f32,
    /// `(across, depth)` pairs; across is unsigned distance from nadir
    pub bathymetry: Vec<(f32, f32)>,
    pub sidescan: Vec<f32>,
}

/// Counts declared in a side header, before the side's arrays.
struct SideCounts {
    bathymetry: usize,
    sidescan: usize,
}

impl Side {
    fn decode_header(r: &mut XdrReader<'_>) -> Result<(Self, SideCounts)> {
        let transmit = [r.read_f32()?, r.read_f32()?];
        let gain = r.read_f32()?;
        let pulse_length = r.read_f32()?;
        let bathymetry = r.read_count("bathymetry")?;
        let sidescan_offset = r.read_f32()?;
        let sidescan = r.read_count("sidescan")?;
        let side = Self {
            transmit,
            gain,
            pulse_length,
            sidescan_offset,
            ..Self::default()
        };
        Ok((
            side,
            SideCounts {
                bathymetry,
                sidescan,
            },
        ))
    }

    fn decode_data(&mut self, r: &mut XdrReader<'_>, counts: &SideCounts) -> Result<()> {
        let pairs = r.read_f32_array(counts.bathymetry.saturating_mul(2), "bathymetry")?;
        self.bathymetry = pairs.chunks_exact(2).map(|p| (p[0], p[1])).collect();
        self.sidescan = r.read_f32_array(counts.sidescan, "sidescan")?;
        Ok(())
    }

    fn encode_header(&self, w: &mut XdrWriter) {
        w.put_f32(self.transmit[0]);
        w.put_f32(self.transmit[1]);
        w.put_f32(self.gain);
        w.put_f32(self.pulse_length);
        w.put_count(self.bathymetry.len());
        w.put_f32(self.sidescan_offset);
        w.put_count(self.sidescan.len());
    }

    fn encode_data(&self, w: &mut XdrWriter) {
        for &(across, depth) in &self.bathymetry {
            w.put_f32(across);
            w.put_f32(depth);
        }
        w.put_f32_array(&self.sidescan);
    }
}

/// One decoded ping.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ping {
    pub sec: i32,
    pub usec: i32,
    pub longitude: f64,
    pub latitude: f64,
    pub course: f32,
    /// Altitude above the seafloor; negative when flagged, 0 when unknown
    pub altitude: f32,
    /// Across-track sidescan sample spacing
    pub pixel_spacing: f32,
    pub transmit_time: f32,
    pub temperature: f32,
    pub compass: SensorSeries,
    pub depth: SensorSeries,
    pub pitch: SensorSeries,
    pub roll: SensorSeries,
    pub port: Side,
    pub starboard: Side,
}

impl Ping {
    pub fn decode(src: &mut dyn Read) -> Result<Self> {
        let mut r = XdrReader::new(src, CONTEXT);
        let sec = r.read_i32()?;
        let usec = r.read_i32()?;
        let longitude = r.read_f64()?;
        let latitude = r.read_f64()?;
        let course = r.read_f32()?;
        let altitude = r.read_f32()?;
        let pixel_spacing = r.read_f32()?;
        let transmit_time = r.read_f32()?;
        let temperature = r.read_f32()?;

        let compass = SensorSeries::decode(&mut r, "compass")?;
        let depth = SensorSeries::decode(&mut r, "depth")?;
        let pitch = SensorSeries::decode(&mut r, "pitch")?;
        let roll = SensorSeries::decode(&mut r, "roll")?;

        let (mut port, port_counts) = Side::decode_header(&mut r)?;
        let (mut starboard, stbd_counts) = Side::decode_header(&mut r)?;
        port.decode_data(&mut r, &port_counts)?;
        starboard.decode_data(&mut r, &stbd_counts)?;

        Ok(Self {
            sec,
            usec,
            longitude,
            latitude,
            course,
            altitude,
            pixel_spacing,
            transmit_time,
            temperature,
            compass,
            depth,
            pitch,
            roll,
            port,
            starboard,
        })
    }

    pub fn encode(&self, w: &mut XdrWriter) {
        w.put_i32(self.sec);
        w.put_i32(self.usec);
        w.put_f64(self.longitude);
        w.put_f64(self.latitude);
        w.put_f32(self.course);
        w.put_f32(self.altitude);
        w.put_f32(self.pixel_spacing);
        w.put_f32(self.transmit_time);
        w.put_f32(self.temperature);
        self.compass.encode(w);
        self.depth.encode(w);
        self.pitch.encode(w);
        self.roll.encode(w);
        self.port.encode_header(w);
        self.starboard.encode_header(w);
        self.port.encode_data(w);
        self.starboard.encode_data(w);
    }

    /// Ping time as epoch seconds.
    pub fn time(&self) -> f64 {
        f64::from(self.sec) + 1e-6 * f64::from(self.usec)
    }

    /// Split epoch seconds into whole seconds and microseconds.
    pub fn split_time(time: f64) -> (i32, i32) {
        let mut sec = time.floor();
        let mut usec = ((time - sec) * 1e6).round();
        if usec >= 1e6 {
            sec += 1.0;
            usec = 0.0;
        }
        (sec as i32, usec as i32)
    }
}
