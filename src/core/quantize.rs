// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Adaptive fixed-point quantization.
//!
//! Physical values are packed into `i16` with a per-record scale chosen so
//! that the largest magnitude lands near 30000 counts:
//!
//! - Bathymetry and distances: `scale = 0.001 * max(max_abs / 30, 1)`,
//!   a one millimeter floor for ranges up to 30 m that grows linearly past
//!   it. Without any valid sample the scale is 0.001.
//! - Sidescan: a power-of-two exponent
//!   `floor(log2(max_abs / 32767)) + 1`, so `physical = packed * 2^exp`.
//!   A packed sidescan value of 0 is reserved for "no data"; valid
//!   samples that would round to 0 are stored as 1.
//!
//! Scales are rounded to `f32` when computed because the native layout
//! stores them in single precision.

/// Scale used when a record has no valid sample to size it.
pub const DEFAULT_SCALE: f64 = 0.001;

/// Magnitude (in physical units) represented by 1000 counts at the floor scale.
const SCALE_RANGE: f64 = 30.0;

/// Largest sidescan magnitude allowed in packed form.
const SIDESCAN_PACKED_MAX: f64 = 32767.0;

/// Packed sidescan value meaning "no data".
pub const SIDESCAN_NULL: i16 = 0;

/// Compute the bathymetry/distance scale for a maximum absolute value.
pub fn scale_for(max_abs: f64) -> f64 {
    let scale = if max_abs.is_finite() && max_abs > 0.0 {
        DEFAULT_SCALE * (max_abs / SCALE_RANGE).max(1.0)
    } else {
        DEFAULT_SCALE
    };
    f64::from(scale as f32)
}

/// Compute the sidescan power-of-two exponent for a maximum absolute sample.
pub fn sidescan_exponent(max_abs: f64) -> i8 {
    if max_abs.is_finite() && max_abs > 0.0 {
        let exponent = (max_abs / SIDESCAN_PACKED_MAX).log2().floor() + 1.0;
        exponent.clamp(f64::from(i8::MIN), f64::from(i8::MAX)) as i8
    } else {
        0
    }
}

/// Multiplier for a sidescan exponent.
#[inline]
pub fn sidescan_scale(exponent: i8) -> f64 {
    2f64.powi(i32::from(exponent))
}

/// Pack a physical value with `scale`, rounding to nearest and saturating.
#[inline]
pub fn pack(value: f64, scale: f64) -> i16 {
    let counts = (value / scale).round();
    if counts.is_nan() {
        0
    } else {
        counts.clamp(f64::from(i16::MIN), f64::from(i16::MAX)) as i16
    }
}

#[inline]
pub fn unpack(packed: i16, scale: f64) -> f64 {
    scale * f64::from(packed)
}

/// Pack one sidescan sample; `None` is the no-data sentinel.
pub fn pack_sidescan(sample: Option<f64>, exponent: i8) -> i16 {
    match sample {
        Some(value) => match pack(value, sidescan_scale(exponent)) {
            SIDESCAN_NULL => 1,
            packed => packed,
        },
        None => SIDESCAN_NULL,
    }
}

pub fn unpack_sidescan(packed: i16, exponent: i8) -> Option<f64> {
    if packed == SIDESCAN_NULL {
        None
    } else {
        Some(sidescan_scale(exponent) * f64::from(packed))
    }
}

/// Per-record scales produced by [`ScaleAccumulator`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scales {
    pub depth: f64,
    pub distance: f64,
    pub sidescan_exponent: i8,
}

impl Default for Scales {
    fn default() -> Self {
        Self {
            depth: DEFAULT_SCALE,
            distance: DEFAULT_SCALE,
            sidescan_exponent: 0,
        }
    }
}

/// Running maxima over the valid samples of one record.
///
/// Drivers feed every valid beam and pixel, then call [`finish`] before
/// packing anything.
///
/// [`finish`]: ScaleAccumulator::finish
#[derive(Debug, Clone, Copy, Default)]
pub struct ScaleAccumulator {
    depth_max: f64,
    distance_max: f64,
    sidescan_max: f64,
}

impl ScaleAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a depth already expressed relative to the sensor.
    pub fn observe_depth(&mut self, depth_offset: f64) {
        if depth_offset.is_finite() {
            self.depth_max = self.depth_max.max(depth_offset.abs());
        }
    }

    pub fn observe_distance(&mut self, distance: f64) {
        if distance.is_finite() {
            self.distance_max = self.distance_max.max(distance.abs());
        }
    }

    pub fn observe_sidescan(&mut self, sample: f64) {
        if sample.is_finite() {
            self.sidescan_max = self.sidescan_max.max(sample.abs());
        }
    }

    pub fn finish(&self) -> Scales {
        Scales {
            depth: scale_for(self.depth_max),
            distance: scale_for(self.distance_max),
            sidescan_exponent: sidescan_exponent(self.sidescan_max),
        }
    }
}
