// src/recorder/sync_recorder/transaction.rs

use super::SyncRecorder;
use crate::common::{
    command::Command,
    error::{ExchangeStage, Sdi12Error},
    hal_traits::{Sdi12Timer, Sdi12Transport},
    response::{capture, RawResponse},
};

impl<IF, D> SyncRecorder<IF, D>
where
    IF: Sdi12Transport,
    D: Sdi12Timer,
{
    /// Runs one command/response exchange and returns the captured line.
    ///
    /// There are no retries: a missing or partial response is reported to the
    /// caller, who decides whether to repeat the operation.
    pub(super) fn execute_transaction(&mut self, command: &Command) -> Result<RawResponse, Sdi12Error<IF::Error>> {
        let framed = command.format_into().map_err(Sdi12Error::widen)?;
        trace!("sdi12 {}: {}", ExchangeStage::Framing, framed.as_str());

        self.signal_and_send(framed.as_bytes())?;

        capture(&mut self.interface, self.config.response_timeout_ms).map_err(|e| {
            warn!("sdi12 {} got no usable reply: {}", framed.as_str(), e.kind());
            e
        })
    }
}
