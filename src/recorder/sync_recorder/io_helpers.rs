// src/recorder/sync_recorder/io_helpers.rs

use super::SyncRecorder;
use crate::common::{
    error::{ExchangeStage, Sdi12Error},
    hal_traits::{LineDirection, LineLevel, Sdi12Timer, Sdi12Transport},
};

#[inline]
fn at<E: core::fmt::Debug>(stage: ExchangeStage) -> impl FnOnce(E) -> Sdi12Error<E> {
    move |error| Sdi12Error::Transport { stage, error }
}

// Line signaling. Only `signal_and_send` fixes the order; the individual steps
// just drive the line and wait.
impl<IF, D> SyncRecorder<IF, D>
where
    IF: Sdi12Transport,
    D: Sdi12Timer,
{
    /// Drives the break level and holds it for `break_ms`.
    pub(super) fn assert_break(&mut self) -> Result<(), Sdi12Error<IF::Error>> {
        self.interface
            .set_line_level(LineLevel::Asserted)
            .map_err(at(ExchangeStage::Signaling))?;
        self.timer.delay_ms(self.config.break_ms);
        Ok(())
    }

    /// Returns to marking and holds it for `marking_us`.
    pub(super) fn assert_marking(&mut self) -> Result<(), Sdi12Error<IF::Error>> {
        self.interface
            .set_line_level(LineLevel::Idle)
            .map_err(at(ExchangeStage::Signaling))?;
        self.timer.delay_us(self.config.marking_us);
        Ok(())
    }

    pub(super) fn switch_to_transmit(&mut self) -> Result<(), Sdi12Error<IF::Error>> {
        self.interface
            .set_line_direction(LineDirection::Transmit)
            .map_err(at(ExchangeStage::Signaling))
    }

    pub(super) fn switch_to_receive(&mut self) -> Result<(), Sdi12Error<IF::Error>> {
        self.interface
            .set_line_direction(LineDirection::Receive)
            .map_err(at(ExchangeStage::Signaling))
    }

    pub(super) fn send_command_bytes(&mut self, cmd_bytes: &[u8]) -> Result<(), Sdi12Error<IF::Error>> {
        self.interface
            .transmit(cmd_bytes, self.config.transmit_timeout_ms)
            .map_err(at(ExchangeStage::Transmit))
    }

    /// Break, marking, take the line, send, release the line.
    ///
    /// A failed send still releases the line so the bus is not left driven.
    pub(super) fn signal_and_send(&mut self, cmd_bytes: &[u8]) -> Result<(), Sdi12Error<IF::Error>> {
        self.assert_break()?;
        self.assert_marking()?;
        self.switch_to_transmit()?;
        if let Err(e) = self.send_command_bytes(cmd_bytes) {
            let _ = self.switch_to_receive();
            return Err(e);
        }
        self.switch_to_receive()
    }
}
