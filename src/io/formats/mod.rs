// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Wire layout drivers.
//!
//! This module contains one driver per swath layout:
//! - [`mb1`]: sync-marked fixed-header framed records
//! - [`mr1`]: XDR streaming layout with a file header and two-sided pings
//! - [`ldeoih`]: native layout serialising the canonical store directly

pub mod ldeoih;
pub mod mb1;
pub mod mr1;

// Re-exports
pub use ldeoih::LdeoihDriver;
pub use mb1::Mb1Driver;
pub use mr1::Mr1Driver;
