// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Property tests for quantization and the canonical store.
//!
//! Run with: cargo test --test quantization_props

use proptest::prelude::*;

use swathcodec::core::quantize::{self, ScaleAccumulator};
use swathcodec::{BeamFlag, SurveyRecord, SwathFields};

fn beam_flag() -> impl Strategy<Value = BeamFlag> {
    prop_oneof![
        Just(BeamFlag::Good),
        Just(BeamFlag::Manual),
        Just(BeamFlag::Null),
    ]
}

prop_compose! {
    fn data_fields()(
        beams in proptest::collection::vec(
            (beam_flag(), 0.0f64..11_000.0, -20_000.0f64..20_000.0, -50.0f64..50.0),
            0..64,
        ),
        pixels in proptest::collection::vec(
            (proptest::option::of(0.001f64..1.0e6), -30_000.0f64..30_000.0),
            0..128,
        ),
        time in 0.0f64..2.0e9,
    ) -> SwathFields {
        let mut fields = SwathFields::data();
        fields.time = time;
        for (flag, depth, across, along) in beams {
            fields.push_beam(flag, depth, across, along);
        }
        for (sample, across) in pixels {
            fields.push_pixel(sample, across, 0.0);
        }
        fields
    }
}

proptest! {
    /// Packing then unpacking stays within half a scale step.
    #[test]
    fn prop_round_trip_within_half_step(values in proptest::collection::vec(-40_000.0f64..40_000.0, 1..50)) {
        let mut acc = ScaleAccumulator::new();
        for &v in &values {
            acc.observe_distance(v);
        }
        let scale = acc.finish().distance;
        for &v in &values {
            let back = quantize::unpack(quantize::pack(v, scale), scale);
            prop_assert!((back - v).abs() <= scale / 2.0 * (1.0 + 1e-9));
        }
    }

    /// A valid sidescan sample never packs to the null sentinel.
    #[test]
    fn prop_valid_sidescan_never_null(samples in proptest::collection::vec(0.0f64..1.0e7, 1..50)) {
        let mut acc = ScaleAccumulator::new();
        for &s in &samples {
            acc.observe_sidescan(s);
        }
        let exponent = acc.finish().sidescan_exponent;
        for &s in &samples {
            let packed = quantize::pack_sidescan(Some(s), exponent);
            prop_assert_ne!(packed, quantize::SIDESCAN_NULL);
            prop_assert!(quantize::unpack_sidescan(packed, exponent).is_some());
        }
        prop_assert_eq!(quantize::pack_sidescan(None, exponent), quantize::SIDESCAN_NULL);
    }

    /// Insert then extract keeps flags, null pixels and values within tolerance.
    #[test]
    fn prop_insert_extract(fields in data_fields()) {
        let mut store = SurveyRecord::new();
        store.insert(&fields, (0.0, 0.0)).unwrap();
        let back = store.extract();

        prop_assert_eq!(&back.beam_flags, &fields.beam_flags);
        let depth_step = store.depth_scale() / 2.0 * (1.0 + 1e-9);
        let distance_step = store.distance_scale() / 2.0 * (1.0 + 1e-9);
        for i in 0..fields.beam_count() {
            if fields.beam_flags[i].is_null() {
                continue;
            }
            prop_assert!((back.bathymetry[i] - fields.bathymetry[i]).abs() <= depth_step);
            prop_assert!((back.bath_across[i] - fields.bath_across[i]).abs() <= distance_step);
        }
        for i in 0..fields.pixel_count() {
            prop_assert_eq!(back.sidescan[i].is_some(), fields.sidescan[i].is_some());
        }
    }

    /// Copying a copy changes nothing.
    #[test]
    fn prop_copy_is_idempotent(fields in data_fields()) {
        let mut store = SurveyRecord::new();
        store.insert(&fields, (0.0, 0.0)).unwrap();

        let mut once = SurveyRecord::new();
        store.copy_into(&mut once).unwrap();
        let mut twice = SurveyRecord::new();
        once.copy_into(&mut twice).unwrap();

        prop_assert_eq!(once.extract(), store.extract());
        prop_assert_eq!(twice.extract(), once.extract());
        prop_assert_eq!(twice.scales(), store.scales());
        prop_assert_eq!(twice.beam_depth(), store.beam_depth());
        prop_assert_eq!(twice.sidescan(), store.sidescan());
    }

    /// Capacity follows the largest record inserted so far.
    #[test]
    fn prop_insert_growth_is_monotonic(sizes in proptest::collection::vec(0usize..200, 1..10)) {
        let mut store = SurveyRecord::new();
        let mut high = 0;
        for n in sizes {
            let mut fields = SwathFields::data();
            for i in 0..n {
                fields.push_beam(BeamFlag::Good, 100.0, i as f64, 0.0);
                fields.push_pixel(Some(1.0 + i as f64), i as f64, 0.0);
            }
            store.insert(&fields, (0.0, 0.0)).unwrap();
            high = high.max(n);
            prop_assert_eq!(store.beam_count(), n);
            prop_assert_eq!(store.beam_capacity(), high);
            prop_assert_eq!(store.pixel_capacity(), high);
        }
    }
}
