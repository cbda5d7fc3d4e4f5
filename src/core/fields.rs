// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Physical-unit views of a canonical record.
//!
//! [`SwathFields`] is what `extract` returns and `insert` consumes. All
//! depths in it are absolute (positive down); the store keeps them
//! relative to the sensor.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{BeamFlag, RecordKind};

/// Physical-unit content of one record.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SwathFields {
    pub kind: RecordKind,
    /// Epoch seconds
    pub time: f64,
    pub longitude: f64,
    pub latitude: f64,
    /// Speed in km/h
    pub speed: f64,
    /// Heading in decimal degrees
    pub heading: f64,
    pub beam_flags: Vec<BeamFlag>,
    /// Absolute depth per beam, meters positive down
    pub bathymetry: Vec<f64>,
    pub bath_across: Vec<f64>,
    pub bath_along: Vec<f64>,
    pub amplitude: Vec<f64>,
    /// Backscatter per pixel; `None` is no data
    pub sidescan: Vec<Option<f64>>,
    pub ss_across: Vec<f64>,
    pub ss_along: Vec<f64>,
    pub comment: String,
}

impl SwathFields {
    /// Create an empty data record.
    pub fn data() -> Self {
        Self {
            kind: RecordKind::Data,
            ..Self::default()
        }
    }

    /// Create a comment record.
    pub fn comment(text: impl Into<String>) -> Self {
        Self {
            kind: RecordKind::Comment,
            comment: text.into(),
            ..Self::default()
        }
    }

    pub fn beam_count(&self) -> usize {
        self.beam_flags.len()
    }

    pub fn pixel_count(&self) -> usize {
        self.sidescan.len()
    }

    /// Append one beam.
    pub fn push_beam(&mut self, flag: BeamFlag, depth: f64, across: f64, along: f64) {
        self.beam_flags.push(flag);
        self.bathymetry.push(depth);
        self.bath_across.push(across);
        self.bath_along.push(along);
    }

    /// Append one sidescan pixel.
    pub fn push_pixel(&mut self, sample: Option<f64>, across: f64, along: f64) {
        self.sidescan.push(sample);
        self.ss_across.push(across);
        self.ss_along.push(along);
    }

    /// Record time as a UTC timestamp, if representable.
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        if !self.time.is_finite() {
            return None;
        }
        let secs = self.time.floor();
        let nanos = ((self.time - secs) * 1e9).round().min(999_999_999.0) as u32;
        DateTime::<Utc>::from_timestamp(secs as i64, nanos)
    }
}

/// Navigation and attitude of a data record.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Navigation {
    pub time: f64,
    pub longitude: f64,
    pub latitude: f64,
    pub speed: f64,
    pub heading: f64,
    /// Sensor depth plus heave
    pub draft: f64,
    pub roll: f64,
    pub pitch: f64,
    pub heave: f64,
}

/// Sensor depth and altitude above the seafloor.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Altitude {
    pub sensor_depth: f64,
    pub altitude: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_comment_constructor() {
        let fields = SwathFields::comment("processed with swathcodec");
        assert_eq!(fields.kind, RecordKind::Comment);
        assert_eq!(fields.beam_count(), 0);
    }

    #[test]
    fn test_push_keeps_arrays_aligned() {
        let mut fields = SwathFields::data();
        fields.push_beam(BeamFlag::Good, 100.0, 10.0, 5.0);
        fields.push_pixel(Some(12.0), 3.0, 0.0);
        fields.push_pixel(None, 4.0, 0.0);
        assert_eq!(fields.beam_count(), 1);
        assert_eq!(fields.bath_along, vec![5.0]);
        assert_eq!(fields.pixel_count(), 2);
    }

    #[test]
    fn test_timestamp() {
        let fields = SwathFields {
            time: 1_000_000_000.5,
            ..SwathFields::data()
        };
        let ts = fields.timestamp().unwrap();
        assert_eq!(ts.year(), 2001);
        assert_eq!(ts.hour(), 1);
        assert_eq!(ts.nanosecond(), 500_000_000);
    }

    #[test]
    fn test_timestamp_not_finite() {
        let fields = SwathFields {
            time: f64::NAN,
            ..SwathFields::data()
        };
        assert!(fields.timestamp().is_none());
    }
}
