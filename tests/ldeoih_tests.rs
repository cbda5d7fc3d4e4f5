// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! LDEOIH native-layout tests through files.
//!
//! Run with: cargo test --test ldeoih_tests

mod common;

use std::fs;

use common::{assert_same_record, survey_fields, temp_path};
use swathcodec::io::driver_for;
use swathcodec::{
    CodecError, ReaderBuilder, RecordKind, SurveyRecord, SwathFields, SwathFormat, SwathReader,
    SwathWriter,
};

fn canonical(fields: &SwathFields) -> SurveyRecord {
    let driver = driver_for(SwathFormat::Ldeoih);
    let mut store = driver.alloc();
    driver.insert(&mut store, fields).unwrap();
    store
}

#[test]
fn test_file_round_trip_is_lossless() {
    let (path, _guard) = temp_path("line.fbt");
    let records = vec![
        SwathFields::comment("processed by swathcodec"),
        survey_fields(1_000.0, 121, 1024),
        survey_fields(1_001.0, 135, 0),
        survey_fields(1_002.0, 0, 200),
    ];

    let mut writer = SwathWriter::create(&path).unwrap();
    for fields in &records {
        writer.write_fields(fields).unwrap();
    }
    writer.finish().unwrap();

    let mut reader = SwathReader::open(&path).unwrap();
    assert_eq!(reader.format(), SwathFormat::Ldeoih);
    for fields in &records {
        let record = reader.read_record().unwrap();
        assert_same_record(record, &canonical(fields));
    }
    assert!(reader.read_record().unwrap_err().is_eof());
}

#[test]
fn test_extract_after_round_trip() {
    let (path, _guard) = temp_path("extract.fbt");
    let fields = survey_fields(42.0, 31, 64);
    let mut writer = SwathWriter::create(&path).unwrap();
    writer.write_fields(&fields).unwrap();
    writer.finish().unwrap();

    let mut reader = SwathReader::open(&path).unwrap();
    let decoded = reader.read_fields().unwrap();
    let depth_scale = reader.current().depth_scale();
    assert_eq!(decoded.kind, RecordKind::Data);
    assert_eq!(decoded.beam_flags, fields.beam_flags);
    for (got, want) in decoded.bathymetry.iter().zip(&fields.bathymetry) {
        assert!((got - want).abs() <= depth_scale / 2.0 + 1e-9);
    }
    for (got, want) in decoded.sidescan.iter().zip(&fields.sidescan) {
        assert_eq!(got.is_some(), want.is_some());
    }
}

#[test]
fn test_long_comment_is_truncated() {
    let (path, _guard) = temp_path("comment.fbt");
    let long = "x".repeat(300);
    let mut writer = SwathWriter::create(&path).unwrap();
    writer.write_fields(&SwathFields::comment(long)).unwrap();
    writer.finish().unwrap();

    assert_eq!(fs::metadata(&path).unwrap().len(), 2 + 128);
    let mut reader = SwathReader::open(&path).unwrap();
    assert_eq!(reader.read_record().unwrap().comment(), "x".repeat(127));
}

#[test]
fn test_legacy_record_is_unsupported() {
    let (path, _guard) = temp_path("legacy.fbt");
    fs::write(&path, [0x23, 0x23, 0, 0, 0, 0]).unwrap();

    let mut reader = ReaderBuilder::new()
        .path(&path)
        .format(SwathFormat::Ldeoih)
        .build()
        .unwrap();
    let err = reader.read_record().unwrap_err();
    assert!(matches!(err, CodecError::Unsupported { .. }));
}
