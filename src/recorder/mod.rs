// src/recorder/mod.rs

mod config;
mod protocol_helpers;
pub mod sync_recorder;

#[cfg(feature = "async")]
pub mod async_recorder;

#[cfg(test)]
pub(crate) mod mock;

pub use config::RecorderConfig;
pub use sync_recorder::SyncRecorder;

#[cfg(feature = "async")]
pub use async_recorder::AsyncRecorder;
