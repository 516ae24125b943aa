// src/lib.rs

//! Master-side (recorder) driver for the SDI-12 sensor bus.
//!
//! The recorder frames commands, drives the break/marking sequence on the shared
//! half-duplex line, captures the sensor's ASCII response and decodes it into
//! typed results. Transport and timing are supplied by the caller through the
//! traits in [`common::hal_traits`].
//!
//! # Features
//! - `async`: [`recorder::AsyncRecorder`] over `embedded-hal-async`.
//! - `impl-generic-hal`: GPIO line control and delay adapters for `embedded-hal` 1.0.
//! - `std`: a `std::thread::sleep` based timer for host builds.
//! - `defmt` / `log`: protocol tracing through the chosen backend.

#![cfg_attr(not(any(test, feature = "std")), no_std)]

#[cfg(all(feature = "defmt", feature = "log"))]
compile_error!("Features \"defmt\" and \"log\" are mutually exclusive and cannot be enabled together");

// Must come first so the macros are visible to the modules below.
#[macro_use]
mod fmt;

pub mod adapters;
pub mod common;
pub mod recorder;

// Re-export key types for convenience
pub use common::Sdi12Addr;
pub use common::Sdi12Error;
pub use recorder::{RecorderConfig, SyncRecorder};

#[cfg(feature = "async")]
pub use recorder::AsyncRecorder;
