// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Fixed-width big-endian field access at byte offsets.
//!
//! Every wire layout in this crate is big-endian, so record layouts are
//! written as offset tables over a byte buffer and decoded with these
//! helpers regardless of host byte order. Callers guarantee that
//! `offset + width <= buf.len()`; an out-of-range offset is a programming
//! error and panics on the slice index.

use byteorder::{BigEndian, ByteOrder};

#[inline]
pub fn get_i16(buf: &[u8], offset: usize) -> i16 {
    BigEndian::read_i16(&buf[offset..offset + 2])
}

#[inline]
pub fn get_u32(buf: &[u8], offset: usize) -> u32 {
    BigEndian::read_u32(&buf[offset..offset + 4])
}

#[inline]
pub fn get_i32(buf: &[u8], offset: usize) -> i32 {
    BigEndian::read_i32(&buf[offset..offset + 4])
}

#[inline]
pub fn get_f32(buf: &[u8], offset: usize) -> f32 {
    BigEndian::read_f32(&buf[offset..offset + 4])
}

#[inline]
pub fn get_f64(buf: &[u8], offset: usize) -> f64 {
    BigEndian::read_f64(&buf[offset..offset + 8])
}

#[inline]
pub fn put_i16(value: i16, buf: &mut [u8], offset: usize) {
    BigEndian::write_i16(&mut buf[offset..offset + 2], value);
}

#[inline]
pub fn put_u32(value: u32, buf: &mut [u8], offset: usize) {
    BigEndian::write_u32(&mut buf[offset..offset + 4], value);
}

#[inline]
pub fn put_i32(value: i32, buf: &mut [u8], offset: usize) {
    BigEndian::write_i32(&mut buf[offset..offset + 4], value);
}

#[inline]
pub fn put_f32(value: f32, buf: &mut [u8], offset: usize) {
    BigEndian::write_f32(&mut buf[offset..offset + 4], value);
}

#[inline]
pub fn put_f64(value: f64, buf: &mut [u8], offset: usize) {
    BigEndian::write_f64(&mut buf[offset..offset + 8], value);
}

/// Decode `count` consecutive big-endian i16 values starting at `offset`.
pub fn get_i16_slice(buf: &[u8], offset: usize, out: &mut [i16]) {
    BigEndian::read_i16_into(&buf[offset..offset + 2 * out.len()], out);
}

/// Encode consecutive big-endian i16 values starting at `offset`.
pub fn put_i16_slice(values: &[i16], buf: &mut [u8], offset: usize) {
    BigEndian::write_i16_into(values, &mut buf[offset..offset + 2 * values.len()]);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_i32_is_big_endian() {
        let mut buf = [0u8; 8];
        put_i32(0x0102_0304, &mut buf, 2);
        assert_eq!(&buf[2..6], &[1, 2, 3, 4]);
        assert_eq!(get_i32(&buf, 2), 0x0102_0304);
    }

    #[test]
    fn test_u32_sync_marker() {
        let buf = *b"MB1\0";
        assert_eq!(get_u32(&buf, 0), 0x4D42_3100);
    }

    #[test]
    fn test_f64_offset() {
        let mut buf = [0u8; 24];
        put_f64(-123.456789, &mut buf, 16);
        assert_eq!(get_f64(&buf, 16), -123.456789);
        assert_eq!(buf[..16], [0u8; 16]);
    }

    #[test]
    fn test_f32_and_i16() {
        let mut buf = [0u8; 6];
        put_f32(1.5, &mut buf, 0);
        put_i16(-2, &mut buf, 4);
        assert_eq!(&buf[..4], &[0x3F, 0xC0, 0x00, 0x00]);
        assert_eq!(get_f32(&buf, 0), 1.5);
        assert_eq!(get_i16(&buf, 4), -2);
    }

    #[test]
    fn test_i16_slice() {
        let values = [1i16, -1, 30000];
        let mut buf = [0u8; 8];
        put_i16_slice(&values, &mut buf, 2);
        let mut out = [0i16; 3];
        get_i16_slice(&buf, 2, &mut out);
        assert_eq!(out, values);
        assert_eq!(&buf[2..4], &[0x00, 0x01]);
    }
}
