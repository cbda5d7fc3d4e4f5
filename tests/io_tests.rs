// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Tests for detection, builders and cross-format conversion.
//!
//! Run with: cargo test --test io_tests

mod common;

use std::fs;

use common::{fan, mb1_record, survey_fields, temp_path};
use swathcodec::io::detection::detect_format;
use swathcodec::{
    CodecError, ReaderBuilder, RecordKind, SwathFields, SwathFormat, SwathReader, SwathWriter,
    WriterBuilder,
};

#[test]
fn test_detect_mb1_by_content() {
    let (path, _guard) = temp_path("capture.dat");
    let mut bytes = vec![0x11; 40];
    bytes.extend(mb1_record(1.0, 0.0, &fan(4, 10.0)));
    fs::write(&path, bytes).unwrap();

    assert_eq!(detect_format(&path).unwrap(), SwathFormat::Mb1);
    let mut reader = SwathReader::open(&path).unwrap();
    assert_eq!(reader.read_record().unwrap().beam_count(), 4);
    assert_eq!(reader.bytes_skipped(), 40);
}

#[test]
fn test_detect_ldeoih_by_content() {
    let (path, _guard) = temp_path("native.bin");
    {
        let mut writer = WriterBuilder::new()
            .path(&path)
            .format(SwathFormat::Ldeoih)
            .build()
            .unwrap();
        writer.write_fields(&survey_fields(3.0, 10, 10)).unwrap();
    }
    assert_eq!(detect_format(&path).unwrap(), SwathFormat::Ldeoih);
}

#[test]
fn test_detect_unknown() {
    let (path, _guard) = temp_path("notes.txt");
    fs::write(&path, b"just some text").unwrap();

    let err = detect_format(&path).unwrap_err();
    assert!(matches!(err, CodecError::Unsupported { .. }));
    assert!(SwathReader::open(&path).is_err());
}

#[test]
fn test_text_starting_with_comment_id_is_unknown() {
    let (path, _guard) = temp_path("build.txt");
    fs::write(&path, b"cc -O2 -o swath swath.c\n").unwrap();

    let err = detect_format(&path).unwrap_err();
    assert!(matches!(err, CodecError::Unsupported { .. }));
}

#[test]
fn test_reader_builder_forced_format() {
    let (path, _guard) = temp_path("forced.raw");
    fs::write(&path, mb1_record(9.0, 0.0, &fan(2, 5.0))).unwrap();

    let mut reader = ReaderBuilder::new()
        .path(&path)
        .format(SwathFormat::Mb1)
        .buffer_size(128)
        .build()
        .unwrap();
    assert_eq!(reader.read_record().unwrap().time, 9.0);
}

#[test]
fn test_writer_builder_requires_format() {
    let (path, _guard) = temp_path("out.raw");
    assert!(WriterBuilder::new().path(&path).build().is_err());
    assert!(WriterBuilder::new()
        .path(&path)
        .format(SwathFormat::Mb1)
        .build()
        .is_ok());
}

#[test]
fn test_mb1_to_ldeoih_and_back() {
    let (mb1_in, _guard) = temp_path("in.mb1");
    let fbt = mb1_in.with_file_name("mid.fbt");
    let mb1_out = mb1_in.with_file_name("out.mb1");

    let mut bytes = Vec::new();
    for (i, n) in [12usize, 30, 7].into_iter().enumerate() {
        bytes.extend(mb1_record(100.0 + i as f64, 4.5, &fan(n, 250.0)));
    }
    fs::write(&mb1_in, bytes).unwrap();

    let original: Vec<SwathFields> = {
        let mut reader = SwathReader::open(&mb1_in).unwrap();
        let mut out = Vec::new();
        while let Ok(fields) = reader.read_fields() {
            out.push(fields);
        }
        out
    };
    assert_eq!(original.len(), 3);

    for (from, to) in [(&mb1_in, &fbt), (&fbt, &mb1_out)] {
        let mut reader = SwathReader::open(from).unwrap();
        let mut writer = SwathWriter::create(to).unwrap();
        loop {
            match reader.read_record() {
                Ok(record) => writer.write_record(record).unwrap(),
                Err(e) if e.is_eof() => break,
                Err(e) => panic!("conversion failed: {e}"),
            }
        }
        assert_eq!(writer.finish().unwrap().data_records, 3);
    }

    let mut reader = SwathReader::open(&mb1_out).unwrap();
    for want in &original {
        let got = reader.read_fields().unwrap();
        let step = reader.current().depth_scale().max(reader.current().distance_scale()) * 1.01;
        assert_eq!(got.kind, RecordKind::Data);
        assert_eq!(got.time, want.time);
        assert_eq!(got.heading, want.heading);
        assert_eq!(got.beam_count(), want.beam_count());
        for i in 0..want.beam_count() {
            assert!((got.bathymetry[i] - want.bathymetry[i]).abs() <= step);
            assert!((got.bath_across[i] - want.bath_across[i]).abs() <= step);
        }
        assert_eq!(reader.altitude().unwrap().sensor_depth, 4.5);
    }
    assert!(reader.read_record().unwrap_err().is_eof());
}

#[test]
fn test_comments_are_dropped_by_mb1() {
    let (path, _guard) = temp_path("with_comment.mb1");
    {
        let mut writer = SwathWriter::create(&path).unwrap();
        writer.write_fields(&SwathFields::comment("not representable")).unwrap();
        writer.write_fields(&survey_fields(5.0, 9, 0)).unwrap();
        let stats = writer.finish().unwrap();
        assert_eq!(stats.comment_records, 0);
        assert_eq!(stats.records_dropped, 1);
        assert_eq!(stats.data_records, 1);
    }
    let mut reader = SwathReader::open(&path).unwrap();
    let record = reader.read_record().unwrap();
    assert_eq!(record.kind, RecordKind::Data);
    assert_eq!(record.time, 5.0);
    assert!(reader.read_record().unwrap_err().is_eof());
}
