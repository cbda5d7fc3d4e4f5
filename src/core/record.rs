// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Canonical survey record store.
//!
//! A [`SurveyRecord`] is a working buffer: one is allocated per open
//! stream and every read overwrites it in place, so its contents are only
//! valid until the next read. [`SurveyRecord::copy_into`] produces an
//! independent record sized to the logical counts.
//!
//! # Growth policy
//!
//! Each array family (beams, amplitudes, pixels) has a logical count and a
//! capacity. Capacity is a high-water mark: it grows when a record needs
//! more slots and never shrinks while the store lives, so streams whose
//! record sizes fluctuate do not reallocate on every ping. Slots past the
//! logical count are never exposed.
//!
//! # Depth reference
//!
//! Packed beam depths are relative to `sensor_depth`:
//! `depth = depth_scale * packed + sensor_depth`. Across/along distances
//! use `distance_scale`; sidescan uses `2^sidescan_scale_exponent` with a
//! packed 0 meaning no data.

use serde::{Deserialize, Serialize};

use super::error::{CodecError, Result};
use super::fields::{Altitude, Navigation, SwathFields};
use super::quantize::{self, ScaleAccumulator, Scales, DEFAULT_SCALE};
use super::{BeamFlag, RecordKind};

/// Maximum comment length in bytes, including the terminating NUL of the
/// fixed-size wire field.
pub const COMMENT_MAXLINE: usize = 128;

/// Provenance of the sidescan samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SidescanKind {
    #[default]
    Unknown,
    /// Samples in dB
    Logarithmic,
    /// Samples in linear intensity units
    Linear,
}

impl SidescanKind {
    pub fn from_u8(value: u8) -> Self {
        match value {
            1 => SidescanKind::Logarithmic,
            2 => SidescanKind::Linear,
            _ => SidescanKind::Unknown,
        }
    }

    pub fn as_u8(self) -> u8 {
        match self {
            SidescanKind::Unknown => 0,
            SidescanKind::Logarithmic => 1,
            SidescanKind::Linear => 2,
        }
    }
}

/// Instrument class that produced the imagery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ImageryKind {
    #[default]
    Unknown,
    Echosounder,
    Multibeam,
    Sidescan,
    Interferometric,
    Lidar,
    Camera,
}

impl ImageryKind {
    pub fn from_u8(value: u8) -> Self {
        match value {
            1 => ImageryKind::Echosounder,
            2 => ImageryKind::Multibeam,
            3 => ImageryKind::Sidescan,
            4 => ImageryKind::Interferometric,
            5 => ImageryKind::Lidar,
            6 => ImageryKind::Camera,
            _ => ImageryKind::Unknown,
        }
    }

    pub fn as_u8(self) -> u8 {
        match self {
            ImageryKind::Unknown => 0,
            ImageryKind::Echosounder => 1,
            ImageryKind::Multibeam => 2,
            ImageryKind::Sidescan => 3,
            ImageryKind::Interferometric => 4,
            ImageryKind::Lidar => 5,
            ImageryKind::Camera => 6,
        }
    }
}

/// Instrument class that produced the bathymetry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TopographyKind {
    #[default]
    Unknown,
    Echosounder,
    Multibeam,
    Sidescan,
    Interferometric,
    Lidar,
}

impl TopographyKind {
    pub fn from_u8(value: u8) -> Self {
        match value {
            1 => TopographyKind::Echosounder,
            2 => TopographyKind::Multibeam,
            3 => TopographyKind::Sidescan,
            4 => TopographyKind::Interferometric,
            5 => TopographyKind::Lidar,
            _ => TopographyKind::Unknown,
        }
    }

    pub fn as_u8(self) -> u8 {
        match self {
            TopographyKind::Unknown => 0,
            TopographyKind::Echosounder => 1,
            TopographyKind::Multibeam => 2,
            TopographyKind::Sidescan => 3,
            TopographyKind::Interferometric => 4,
            TopographyKind::Lidar => 5,
        }
    }
}

/// Mutable views of the active beam slots.
pub struct BeamsMut<'a> {
    pub flags: &'a mut [BeamFlag],
    pub depth: &'a mut [i16],
    pub across: &'a mut [i16],
    pub along: &'a mut [i16],
}

/// Mutable views of the active sidescan slots.
pub struct PixelsMut<'a> {
    pub sidescan: &'a mut [i16],
    pub across: &'a mut [i16],
    pub along: &'a mut [i16],
}

/// Canonical survey record with quantized beam, amplitude and pixel arrays.
#[derive(Debug, Clone)]
pub struct SurveyRecord {
    pub kind: RecordKind,
    /// Epoch seconds
    pub time: f64,
    pub longitude: f64,
    pub latitude: f64,
    /// Meters, positive down
    pub sensor_depth: f64,
    /// Meters above the seafloor; 0 or negative when unknown
    pub altitude: f64,
    pub heading: f64,
    pub speed: f64,
    pub roll: f64,
    pub pitch: f64,
    pub heave: f64,
    pub beam_width_across: f64,
    pub beam_width_along: f64,
    pub sidescan_kind: SidescanKind,
    pub imagery_kind: ImageryKind,
    pub topography_kind: TopographyKind,
    pub sensor_head_id: i32,

    depth_scale: f64,
    distance_scale: f64,
    sidescan_scale_exponent: i8,

    beam_count: usize,
    amp_count: usize,
    pixel_count: usize,

    // Each family shares one length, which is its capacity.
    beam_flag: Vec<BeamFlag>,
    beam_depth: Vec<i16>,
    beam_across: Vec<i16>,
    beam_along: Vec<i16>,
    amplitude: Vec<i16>,
    sidescan: Vec<i16>,
    sidescan_across: Vec<i16>,
    sidescan_along: Vec<i16>,

    comment: String,
}

impl Default for SurveyRecord {
    fn default() -> Self {
        Self::new()
    }
}

/// Extend `values` to `len` slots filled with `fill`, reporting allocation failure.
fn grow<T: Clone>(values: &mut Vec<T>, len: usize, fill: T, array: &str) -> Result<()> {
    values
        .try_reserve_exact(len.saturating_sub(values.len()))
        .map_err(|_| CodecError::allocation(array, len))?;
    values.resize(len, fill);
    Ok(())
}

/// Allocate an exact-length copy of `values`, refusing more than `limit` slots.
fn copy_exact<T: Clone>(values: &[T], array: &str, limit: usize) -> Result<Vec<T>> {
    if values.len() > limit {
        return Err(CodecError::allocation(array, values.len()));
    }
    let mut copy = Vec::new();
    copy.try_reserve_exact(values.len())
        .map_err(|_| CodecError::allocation(array, values.len()))?;
    copy.extend_from_slice(values);
    Ok(copy)
}

impl SurveyRecord {
    /// Create an empty store with no allocated slots.
    pub fn new() -> Self {
        Self {
            kind: RecordKind::None,
            time: 0.0,
            longitude: 0.0,
            latitude: 0.0,
            sensor_depth: 0.0,
            altitude: 0.0,
            heading: 0.0,
            speed: 0.0,
            roll: 0.0,
            pitch: 0.0,
            heave: 0.0,
            beam_width_across: 0.0,
            beam_width_along: 0.0,
            sidescan_kind: SidescanKind::Unknown,
            imagery_kind: ImageryKind::Unknown,
            topography_kind: TopographyKind::Unknown,
            sensor_head_id: 0,
            depth_scale: DEFAULT_SCALE,
            distance_scale: DEFAULT_SCALE,
            sidescan_scale_exponent: 0,
            beam_count: 0,
            amp_count: 0,
            pixel_count: 0,
            beam_flag: Vec::new(),
            beam_depth: Vec::new(),
            beam_across: Vec::new(),
            beam_along: Vec::new(),
            amplitude: Vec::new(),
            sidescan: Vec::new(),
            sidescan_across: Vec::new(),
            sidescan_along: Vec::new(),
            comment: String::new(),
        }
    }

    // ------------------------------------------------------------------
    // Counts, capacities and growth
    // ------------------------------------------------------------------

    pub fn beam_count(&self) -> usize {
        self.beam_count
    }

    pub fn amp_count(&self) -> usize {
        self.amp_count
    }

    pub fn pixel_count(&self) -> usize {
        self.pixel_count
    }

    pub fn beam_capacity(&self) -> usize {
        self.beam_depth.len()
    }

    pub fn amp_capacity(&self) -> usize {
        self.amplitude.len()
    }

    pub fn pixel_capacity(&self) -> usize {
        self.sidescan.len()
    }

    /// Grow the beam arrays to hold `n` beams.
    ///
    /// A no-op when `n` does not exceed the current capacity. On failure
    /// every beam array is restored to its previous capacity.
    pub fn ensure_beam_capacity(&mut self, n: usize) -> Result<()> {
        let old = self.beam_capacity();
        if n <= old {
            return Ok(());
        }
        let grown = grow(&mut self.beam_flag, n, BeamFlag::Null, "beam_flag")
            .and_then(|_| grow(&mut self.beam_depth, n, 0, "beam_depth"))
            .and_then(|_| grow(&mut self.beam_across, n, 0, "beam_across"))
            .and_then(|_| grow(&mut self.beam_along, n, 0, "beam_along"));
        if let Err(err) = grown {
            self.beam_flag.truncate(old);
            self.beam_depth.truncate(old);
            self.beam_across.truncate(old);
            self.beam_along.truncate(old);
            return Err(err);
        }
        Ok(())
    }

    /// Grow the amplitude array to hold `n` values.
    pub fn ensure_amp_capacity(&mut self, n: usize) -> Result<()> {
        if n <= self.amp_capacity() {
            return Ok(());
        }
        grow(&mut self.amplitude, n, 0, "amplitude")
    }

    /// Grow the sidescan arrays to hold `n` pixels.
    pub fn ensure_pixel_capacity(&mut self, n: usize) -> Result<()> {
        let old = self.pixel_capacity();
        if n <= old {
            return Ok(());
        }
        let grown = grow(&mut self.sidescan, n, 0, "sidescan")
            .and_then(|_| grow(&mut self.sidescan_across, n, 0, "sidescan_across"))
            .and_then(|_| grow(&mut self.sidescan_along, n, 0, "sidescan_along"));
        if let Err(err) = grown {
            self.sidescan.truncate(old);
            self.sidescan_across.truncate(old);
            self.sidescan_along.truncate(old);
            return Err(err);
        }
        Ok(())
    }

    /// Set all three logical counts, growing capacity as needed.
    ///
    /// Capacity is grown for every family before any count changes, so a
    /// failure leaves the counts untouched.
    pub fn set_counts(&mut self, beams: usize, amps: usize, pixels: usize) -> Result<()> {
        self.ensure_beam_capacity(beams)?;
        self.ensure_amp_capacity(amps)?;
        self.ensure_pixel_capacity(pixels)?;
        self.beam_count = beams;
        self.amp_count = amps;
        self.pixel_count = pixels;
        Ok(())
    }

    /// Free every array and reset the store to its freshly created state.
    pub fn release(&mut self) {
        *self = Self::new();
    }

    // ------------------------------------------------------------------
    // Scales
    // ------------------------------------------------------------------

    pub fn depth_scale(&self) -> f64 {
        self.depth_scale
    }

    pub fn distance_scale(&self) -> f64 {
        self.distance_scale
    }

    pub fn sidescan_scale_exponent(&self) -> i8 {
        self.sidescan_scale_exponent
    }

    /// Install per-record scales. Non-positive or non-finite scales fall
    /// back to the default so that scales stay strictly positive.
    pub fn set_scales(&mut self, scales: Scales) {
        let sanitize = |s: f64| if s.is_finite() && s > 0.0 { s } else { DEFAULT_SCALE };
        self.depth_scale = sanitize(scales.depth);
        self.distance_scale = sanitize(scales.distance);
        self.sidescan_scale_exponent = scales.sidescan_exponent;
    }

    pub fn scales(&self) -> Scales {
        Scales {
            depth: self.depth_scale,
            distance: self.distance_scale,
            sidescan_exponent: self.sidescan_scale_exponent,
        }
    }

    // ------------------------------------------------------------------
    // Array access (logical length only)
    // ------------------------------------------------------------------

    pub fn beam_flags(&self) -> &[BeamFlag] {
        &self.beam_flag[..self.beam_count]
    }

    pub fn beam_depth(&self) -> &[i16] {
        &self.beam_depth[..self.beam_count]
    }

    pub fn beam_across(&self) -> &[i16] {
        &self.beam_across[..self.beam_count]
    }

    pub fn beam_along(&self) -> &[i16] {
        &self.beam_along[..self.beam_count]
    }

    pub fn amplitude(&self) -> &[i16] {
        &self.amplitude[..self.amp_count]
    }

    pub fn sidescan(&self) -> &[i16] {
        &self.sidescan[..self.pixel_count]
    }

    pub fn sidescan_across(&self) -> &[i16] {
        &self.sidescan_across[..self.pixel_count]
    }

    pub fn sidescan_along(&self) -> &[i16] {
        &self.sidescan_along[..self.pixel_count]
    }

    pub fn beams_mut(&mut self) -> BeamsMut<'_> {
        let n = self.beam_count;
        BeamsMut {
            flags: &mut self.beam_flag[..n],
            depth: &mut self.beam_depth[..n],
            across: &mut self.beam_across[..n],
            along: &mut self.beam_along[..n],
        }
    }

    pub fn amplitude_mut(&mut self) -> &mut [i16] {
        &mut self.amplitude[..self.amp_count]
    }

    pub fn pixels_mut(&mut self) -> PixelsMut<'_> {
        let n = self.pixel_count;
        PixelsMut {
            sidescan: &mut self.sidescan[..n],
            across: &mut self.sidescan_across[..n],
            along: &mut self.sidescan_along[..n],
        }
    }

    pub fn comment(&self) -> &str {
        &self.comment
    }

    /// Set the comment text, truncated to `COMMENT_MAXLINE - 1` bytes.
    pub fn set_comment(&mut self, text: &str) {
        self.comment.clear();
        self.comment.push_str(truncate_utf8(text, COMMENT_MAXLINE - 1));
    }

    /// Logical dimensions `(beams, amps, pixels)`; zero for non-data records.
    pub fn dimensions(&self) -> (usize, usize, usize) {
        if self.kind.is_data() {
            (self.beam_count, self.amp_count, self.pixel_count)
        } else {
            (0, 0, 0)
        }
    }

    // ------------------------------------------------------------------
    // Copy
    // ------------------------------------------------------------------

    /// Deep-copy this record into `dst`, sizing its arrays to the logical
    /// counts of `self`.
    ///
    /// On allocation failure `dst` is left released and empty.
    pub fn copy_into(&self, dst: &mut SurveyRecord) -> Result<()> {
        self.copy_into_within(dst, usize::MAX)
    }

    /// [`copy_into`](Self::copy_into) with every array bounded to `limit` slots.
    fn copy_into_within(&self, dst: &mut SurveyRecord, limit: usize) -> Result<()> {
        match self.copy_exact(limit) {
            Ok(copy) => {
                *dst = copy;
                Ok(())
            }
            Err(err) => {
                dst.release();
                Err(err)
            }
        }
    }

    fn copy_exact(&self, limit: usize) -> Result<SurveyRecord> {
        Ok(SurveyRecord {
            beam_flag: copy_exact(self.beam_flags(), "beam_flag", limit)?,
            beam_depth: copy_exact(self.beam_depth(), "beam_depth", limit)?,
            beam_across: copy_exact(self.beam_across(), "beam_across", limit)?,
            beam_along: copy_exact(self.beam_along(), "beam_along", limit)?,
            amplitude: copy_exact(self.amplitude(), "amplitude", limit)?,
            sidescan: copy_exact(self.sidescan(), "sidescan", limit)?,
            sidescan_across: copy_exact(self.sidescan_across(), "sidescan_across", limit)?,
            sidescan_along: copy_exact(self.sidescan_along(), "sidescan_along", limit)?,
            comment: self.comment.clone(),
            ..self.scalars()
        })
    }

    /// A record with every scalar of `self` and no arrays.
    fn scalars(&self) -> SurveyRecord {
        SurveyRecord {
            kind: self.kind,
            time: self.time,
            longitude: self.longitude,
            latitude: self.latitude,
            sensor_depth: self.sensor_depth,
            altitude: self.altitude,
            heading: self.heading,
            speed: self.speed,
            roll: self.roll,
            pitch: self.pitch,
            heave: self.heave,
            beam_width_across: self.beam_width_across,
            beam_width_along: self.beam_width_along,
            sidescan_kind: self.sidescan_kind,
            imagery_kind: self.imagery_kind,
            topography_kind: self.topography_kind,
            sensor_head_id: self.sensor_head_id,
            depth_scale: self.depth_scale,
            distance_scale: self.distance_scale,
            sidescan_scale_exponent: self.sidescan_scale_exponent,
            beam_count: self.beam_count,
            amp_count: self.amp_count,
            pixel_count: self.pixel_count,
            ..SurveyRecord::new()
        }
    }

    // ------------------------------------------------------------------
    // Extract / insert
    // ------------------------------------------------------------------

    /// Physical-unit view of the record.
    pub fn extract(&self) -> SwathFields {
        match self.kind {
            RecordKind::Data => {
                let mut fields = SwathFields {
                    kind: RecordKind::Data,
                    time: self.time,
                    longitude: self.longitude,
                    latitude: self.latitude,
                    speed: self.speed,
                    heading: self.heading,
                    ..SwathFields::default()
                };
                for i in 0..self.beam_count {
                    let flag = self.beam_flag[i];
                    if flag.is_null() {
                        fields.push_beam(flag, 0.0, 0.0, 0.0);
                    } else {
                        fields.push_beam(
                            flag,
                            quantize::unpack(self.beam_depth[i], self.depth_scale)
                                + self.sensor_depth,
                            quantize::unpack(self.beam_across[i], self.distance_scale),
                            quantize::unpack(self.beam_along[i], self.distance_scale),
                        );
                    }
                }
                fields.amplitude = self.amplitude().iter().map(|&a| f64::from(a)).collect();
                for i in 0..self.pixel_count {
                    fields.push_pixel(
                        quantize::unpack_sidescan(self.sidescan[i], self.sidescan_scale_exponent),
                        quantize::unpack(self.sidescan_across[i], self.distance_scale),
                        quantize::unpack(self.sidescan_along[i], self.distance_scale),
                    );
                }
                fields
            }
            RecordKind::Comment => SwathFields::comment(self.comment.clone()),
            RecordKind::None => SwathFields::default(),
        }
    }

    /// Load physical-unit fields into the store, recomputing the scales.
    ///
    /// Beam and pixel counts follow `beam_flags` and `sidescan`; companion
    /// arrays shorter than those read as 0. Beam widths left at 0 take
    /// `default_widths` (across, along). Sensor depth, altitude and
    /// attitude are untouched; use the navigation and altitude inserts.
    pub fn insert(&mut self, fields: &SwathFields, default_widths: (f64, f64)) -> Result<()> {
        match fields.kind {
            RecordKind::Data => self.insert_data(fields, default_widths),
            RecordKind::Comment => {
                self.kind = RecordKind::Comment;
                self.set_comment(&fields.comment);
                Ok(())
            }
            RecordKind::None => {
                self.kind = RecordKind::None;
                Ok(())
            }
        }
    }

    fn insert_data(&mut self, fields: &SwathFields, default_widths: (f64, f64)) -> Result<()> {
        let nbeams = fields.beam_count();
        let namps = fields.amplitude.len();
        let npixels = fields.pixel_count();
        let at = |values: &[f64], i: usize| values.get(i).copied().unwrap_or(0.0);

        let mut acc = ScaleAccumulator::new();
        for (i, flag) in fields.beam_flags.iter().enumerate() {
            if !flag.is_null() {
                acc.observe_depth(at(&fields.bathymetry, i) - self.sensor_depth);
                acc.observe_distance(at(&fields.bath_across, i));
                acc.observe_distance(at(&fields.bath_along, i));
            }
        }
        for (i, sample) in fields.sidescan.iter().enumerate() {
            if let Some(value) = sample {
                acc.observe_distance(at(&fields.ss_across, i));
                acc.observe_distance(at(&fields.ss_along, i));
                acc.observe_sidescan(*value);
            }
        }

        self.set_counts(nbeams, namps, npixels)?;

        self.kind = RecordKind::Data;
        self.time = fields.time;
        self.longitude = fields.longitude;
        self.latitude = fields.latitude;
        self.heading = fields.heading;
        self.speed = fields.speed;
        if self.beam_width_across == 0.0 {
            self.beam_width_across = default_widths.0;
        }
        if self.beam_width_along == 0.0 {
            self.beam_width_along = default_widths.1;
        }
        self.set_scales(acc.finish());

        let Scales {
            depth,
            distance,
            sidescan_exponent,
        } = self.scales();
        let sensor_depth = self.sensor_depth;

        let beams = self.beams_mut();
        for (i, &flag) in fields.beam_flags.iter().enumerate() {
            beams.flags[i] = flag;
            if flag.is_null() {
                beams.depth[i] = 0;
                beams.across[i] = 0;
                beams.along[i] = 0;
            } else {
                beams.depth[i] = quantize::pack(at(&fields.bathymetry, i) - sensor_depth, depth);
                beams.across[i] = quantize::pack(at(&fields.bath_across, i), distance);
                beams.along[i] = quantize::pack(at(&fields.bath_along, i), distance);
            }
        }

        for (slot, &value) in self.amplitude_mut().iter_mut().zip(&fields.amplitude) {
            *slot = quantize::pack(value, 1.0);
        }

        let pixels = self.pixels_mut();
        for (i, &sample) in fields.sidescan.iter().enumerate() {
            pixels.sidescan[i] = quantize::pack_sidescan(sample, sidescan_exponent);
            pixels.across[i] = quantize::pack(at(&fields.ss_across, i), distance);
            pixels.along[i] = quantize::pack(at(&fields.ss_along, i), distance);
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Navigation and altitude
    // ------------------------------------------------------------------

    fn require_data(&self, operation: &str) -> Result<()> {
        if self.kind.is_data() {
            Ok(())
        } else {
            Err(CodecError::unexpected_kind(operation, self.kind))
        }
    }

    pub fn extract_navigation(&self) -> Result<Navigation> {
        self.require_data("extract_navigation")?;
        Ok(Navigation {
            time: self.time,
            longitude: self.longitude,
            latitude: self.latitude,
            speed: self.speed,
            heading: self.heading,
            draft: self.sensor_depth + self.heave,
            roll: self.roll,
            pitch: self.pitch,
            heave: self.heave,
        })
    }

    pub fn insert_navigation(&mut self, nav: &Navigation) -> Result<()> {
        self.require_data("insert_navigation")?;
        self.time = nav.time;
        self.longitude = nav.longitude;
        self.latitude = nav.latitude;
        self.speed = nav.speed;
        self.heading = nav.heading;
        self.sensor_depth = nav.draft - nav.heave;
        self.roll = nav.roll;
        self.pitch = nav.pitch;
        self.heave = nav.heave;
        Ok(())
    }

    /// Sensor depth and altitude.
    ///
    /// When no positive altitude is stored, it is derived from the
    /// bathymetry: the center beam when it holds a positive depth,
    /// otherwise the non-null beam closest to nadir.
    pub fn extract_altitude(&self) -> Result<Altitude> {
        self.require_data("extract_altitude")?;
        let mut altitude = self.altitude;
        if altitude <= 0.0 && self.beam_count > 0 {
            let center = self.beam_count / 2;
            let best = if !self.beam_flag[center].is_null() && self.beam_depth[center] > 0 {
                Some(center)
            } else {
                (0..self.beam_count)
                    .filter(|&i| !self.beam_flag[i].is_null())
                    .min_by_key(|&i| self.beam_across[i].unsigned_abs())
            };
            if let Some(i) = best {
                altitude = quantize::unpack(self.beam_depth[i], self.depth_scale);
            }
        }
        Ok(Altitude {
            sensor_depth: self.sensor_depth,
            altitude,
        })
    }

    pub fn insert_altitude(&mut self, value: &Altitude) -> Result<()> {
        self.require_data("insert_altitude")?;
        self.sensor_depth = value.sensor_depth;
        self.altitude = value.altitude;
        Ok(())
    }
}

/// Longest prefix of `text` within `max` bytes that ends on a char boundary.
pub(crate) fn truncate_utf8(text: &str, max: usize) -> &str {
    if text.len() <= max {
        return text;
    }
    let mut end = max;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}
