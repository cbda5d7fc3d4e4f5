// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Common utilities for integration tests.

#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;

use byteorder::{BigEndian, WriteBytesExt};

use swathcodec::{BeamFlag, SurveyRecord, SwathFields};

// ============================================================================
// Temporary files
// ============================================================================

fn temp_dir() -> PathBuf {
    let random = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .subsec_nanos();
    std::env::temp_dir().join(format!(
        "swathcodec_test_{}_{}",
        std::process::id(),
        random
    ))
}

/// Create a temporary file path with cleanup guard.
pub fn temp_path(name: &str) -> (PathBuf, CleanupGuard) {
    let dir = temp_dir();
    fs::create_dir_all(&dir).ok();
    let path = dir.join(name);
    let guard = CleanupGuard(dir);
    (path, guard)
}

/// Removes the temporary directory on drop.
pub struct CleanupGuard(PathBuf);

impl Drop for CleanupGuard {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.0);
    }
}

// ============================================================================
// MB1 fixtures
// ============================================================================

/// One MB1 beam: `(along, across, depth below the sensor)`.
pub type Mb1Beam = (f64, f64, f64);

/// Encode one MB1 record by hand.
pub fn mb1_record(time: f64, sensor_depth: f64, beams: &[Mb1Beam]) -> Vec<u8> {
    let size = 56 + 28 * beams.len() + 4;
    let mut buf = Vec::with_capacity(size);
    buf.extend_from_slice(b"MB1\0");
    buf.write_i32::<BigEndian>(size as i32).unwrap();
    buf.write_f64::<BigEndian>(time).unwrap();
    buf.write_f64::<BigEndian>(36.75).unwrap();
    buf.write_f64::<BigEndian>(-122.0).unwrap();
    buf.write_f64::<BigEndian>(sensor_depth).unwrap();
    buf.write_f64::<BigEndian>(180.0).unwrap();
    buf.write_i32::<BigEndian>(1).unwrap();
    buf.write_i32::<BigEndian>(beams.len() as i32).unwrap();
    for (i, &(along, across, depth)) in beams.iter().enumerate() {
        buf.write_i32::<BigEndian>(i as i32).unwrap();
        buf.write_f64::<BigEndian>(along).unwrap();
        buf.write_f64::<BigEndian>(across).unwrap();
        buf.write_f64::<BigEndian>(depth).unwrap();
    }
    buf.write_u32::<BigEndian>(0).unwrap();
    assert_eq!(buf.len(), size);
    buf
}

/// `n` beams fanned out symmetrically below the sensor.
pub fn fan(n: usize, depth: f64) -> Vec<Mb1Beam> {
    (0..n)
        .map(|i| {
            let across = (i as f64 - (n as f64 - 1.0) / 2.0) * 5.0;
            (0.25, across, depth + across.abs() * 0.1)
        })
        .collect()
}

// ============================================================================
// Canonical fixtures
// ============================================================================

/// A data record with beams, amplitudes and sidescan.
pub fn survey_fields(time: f64, beams: usize, pixels: usize) -> SwathFields {
    let mut fields = SwathFields::data();
    fields.time = time;
    fields.longitude = -158.25;
    fields.latitude = 21.5;
    fields.heading = 271.0;
    fields.speed = 11.0;
    for i in 0..beams {
        let across = (i as f64 - beams as f64 / 2.0) * 12.5;
        let flag = if i % 7 == 3 {
            BeamFlag::Manual
        } else {
            BeamFlag::Good
        };
        fields.push_beam(flag, 1500.0 + across.abs() * 0.2, across, 1.5);
        fields.amplitude.push((i % 50) as f64);
    }
    for i in 0..pixels {
        let across = (i as f64 - pixels as f64 / 2.0) * 2.0;
        let sample = if i % 11 == 0 {
            None
        } else {
            Some(20.0 + i as f64)
        };
        fields.push_pixel(sample, across, 0.0);
    }
    fields
}

/// Assert two canonical records carry the same content.
pub fn assert_same_record(a: &SurveyRecord, b: &SurveyRecord) {
    assert_eq!(a.kind, b.kind);
    assert_eq!(a.time, b.time);
    assert_eq!(a.beam_count(), b.beam_count());
    assert_eq!(a.amp_count(), b.amp_count());
    assert_eq!(a.pixel_count(), b.pixel_count());
    assert_eq!(a.beam_flags(), b.beam_flags());
    assert_eq!(a.beam_depth(), b.beam_depth());
    assert_eq!(a.beam_across(), b.beam_across());
    assert_eq!(a.beam_along(), b.beam_along());
    assert_eq!(a.amplitude(), b.amplitude());
    assert_eq!(a.sidescan(), b.sidescan());
    assert_eq!(a.sidescan_across(), b.sidescan_across());
    assert_eq!(a.sidescan_along(), b.sidescan_along());
    assert_eq!(a.scales(), b.scales());
    assert_eq!(a.comment(), b.comment());
}
