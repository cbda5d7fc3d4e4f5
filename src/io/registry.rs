// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Format identifier to driver dispatch.

use crate::{CodecError, Result};

use super::formats::{LdeoihDriver, Mb1Driver, Mr1Driver};
use super::metadata::SwathFormat;
use super::traits::SwathDriver;

/// Create a fresh driver for `format`.
///
/// Drivers carry per-stream state, so every open stream gets its own.
pub fn driver_for(format: SwathFormat) -> Box<dyn SwathDriver> {
    match format {
        SwathFormat::Mb1 => Box::new(Mb1Driver::new()),
        SwathFormat::Mr1 => Box::new(Mr1Driver::new()),
        SwathFormat::Ldeoih => Box::new(LdeoihDriver::new()),
    }
}

/// Create a driver from a numeric format id.
pub fn driver_for_id(id: u16) -> Result<Box<dyn SwathDriver>> {
    SwathFormat::from_id(id)
        .map(driver_for)
        .ok_or_else(|| CodecError::unknown_format(id))
}

/// Create a driver from a format name, alias or numeric id.
pub fn driver_for_name(name: &str) -> Result<Box<dyn SwathDriver>> {
    name.parse::<SwathFormat>().map(driver_for)
}
