// src/adapters/mod.rs

//! Ready-made building blocks for [`Sdi12Transport`](crate::common::Sdi12Transport)
//! and [`Sdi12Timer`](crate::common::Sdi12Timer).

mod nb_transport;

#[cfg(feature = "impl-generic-hal")]
mod hal;

#[cfg(feature = "std")]
mod std_timer;

pub use nb_transport::{NbTransport, NbTransportError};

#[cfg(feature = "impl-generic-hal")]
pub use hal::{GpioLine, HalDelay};

#[cfg(feature = "std")]
pub use std_timer::StdTimer;
