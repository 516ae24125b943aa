// src/recorder/async_recorder.rs

use embedded_hal_async::delay::DelayNs;

use crate::common::{
    address::Sdi12Addr,
    command::{Command, DataIndex, MeasurementIndex, Verb},
    error::{ExchangeStage, Sdi12Error},
    hal_traits::{LineDirection, LineLevel, Sdi12TransportAsync},
    response::{DataValues, IdentificationInfo, MeasurementResult, MeasurementTiming, RawResponse, ResponseText},
};
use crate::recorder::{config::RecorderConfig, protocol_helpers};

/// Async counterpart of [`crate::recorder::SyncRecorder`].
///
/// Runs the same exchanges, but every wait goes through [`DelayNs`] and every
/// transport call is awaited, so other tasks can run during break, marking and
/// the measurement ready delay.
#[derive(Debug)]
pub struct AsyncRecorder<IF, D>
where
    IF: Sdi12TransportAsync,
    D: DelayNs,
{
    interface: IF,
    delay: D,
    config: RecorderConfig,
}

impl<IF, D> AsyncRecorder<IF, D>
where
    IF: Sdi12TransportAsync,
    D: DelayNs,
{
    pub fn new(interface: IF, delay: D) -> Self {
        AsyncRecorder { interface, delay, config: RecorderConfig::new() }
    }

    pub fn with_config(interface: IF, delay: D, config: RecorderConfig) -> Result<Self, Sdi12Error<IF::Error>> {
        config.validate().map_err(Sdi12Error::widen)?;
        Ok(AsyncRecorder { interface, delay, config })
    }

    pub fn config(&self) -> &RecorderConfig {
        &self.config
    }

    pub fn release(self) -> (IF, D) {
        (self.interface, self.delay)
    }

    pub async fn query_address(&mut self, address: Sdi12Addr) -> Result<ResponseText, Sdi12Error<IF::Error>> {
        let command = Self::addressed(address, Verb::QueryAddress)?;
        let response = self.execute_transaction(&command).await?;
        Ok(protocol_helpers::decode_acknowledge(response.line(), address)?)
    }

    pub async fn discover_address(&mut self) -> Result<Sdi12Addr, Sdi12Error<IF::Error>> {
        let response = self.execute_transaction(&Command::address_query()).await?;
        let address = protocol_helpers::decode_discovered(response.line())?;
        debug!("sdi12 discovered sensor at '{}'", address);
        Ok(address)
    }

    pub async fn get_info(&mut self, address: Sdi12Addr) -> Result<ResponseText, Sdi12Error<IF::Error>> {
        let command = Self::addressed(address, Verb::GetInfo)?;
        let response = self.execute_transaction(&command).await?;
        Ok(protocol_helpers::to_text(response.line())?)
    }

    pub async fn identify(&mut self, address: Sdi12Addr) -> Result<IdentificationInfo, Sdi12Error<IF::Error>> {
        let text = self.get_info(address).await?;
        Ok(protocol_helpers::decode_identification(text.as_bytes(), address)?)
    }

    pub async fn start_measurement(
        &mut self,
        address: Sdi12Addr,
        index: MeasurementIndex,
    ) -> Result<MeasurementTiming, Sdi12Error<IF::Error>> {
        let command = Self::addressed(address, Verb::Measure(index))?;
        let response = self.execute_transaction(&command).await?;
        let timing = protocol_helpers::decode_timing(response.line(), address)?;
        debug!(
            "sdi12 {}: '{}' ready in {} ms with {} values",
            ExchangeStage::Decoding,
            address,
            timing.ready_delay_ms,
            timing.values_count
        );
        self.delay.delay_ms(timing.ready_delay_ms).await;
        Ok(timing)
    }

    pub async fn retrieve_data(
        &mut self,
        address: Sdi12Addr,
        timing: &MeasurementTiming,
    ) -> Result<DataValues, Sdi12Error<IF::Error>> {
        let expected = timing.values_count;
        let mut values = DataValues::new();
        if expected == 0 {
            return Ok(values);
        }

        let mut index = DataIndex::FIRST;
        loop {
            let command = Self::addressed(address, Verb::GetData(index))?;
            let response = self.execute_transaction(&command).await?;
            protocol_helpers::accumulate_values(response.line(), address, &mut values, expected)?;
            if values.len() >= usize::from(expected) {
                break;
            }
            match index.next() {
                Some(next) => index = next,
                None => break,
            }
        }

        protocol_helpers::check_value_count(&values, expected)?;
        Ok(values)
    }

    pub async fn measure_values(
        &mut self,
        address: Sdi12Addr,
        index: MeasurementIndex,
    ) -> Result<DataValues, Sdi12Error<IF::Error>> {
        let timing = self.start_measurement(address, index).await?;
        self.retrieve_data(address, &timing).await
    }

    pub async fn measure(&mut self, address: Sdi12Addr) -> Result<MeasurementResult, Sdi12Error<IF::Error>> {
        let values = self.measure_values(address, MeasurementIndex::Base).await?;
        Ok(MeasurementResult::from_values(&values)?)
    }

    fn addressed(address: Sdi12Addr, verb: Verb) -> Result<Command, Sdi12Error<IF::Error>> {
        if address.is_query() {
            return Err(Sdi12Error::InvalidParameter("wildcard address only valid for address query"));
        }
        Command::new(address, verb).map_err(Sdi12Error::widen)
    }

    async fn execute_transaction(&mut self, command: &Command) -> Result<RawResponse, Sdi12Error<IF::Error>> {
        let framed = command.format_into().map_err(Sdi12Error::widen)?;
        trace!("sdi12 {}: {}", ExchangeStage::Framing, framed.as_str());

        self.signal_and_send(framed.as_bytes()).await?;

        let mut response = RawResponse::new();
        let received = self
            .interface
            .receive(response.buffer_mut(), self.config.response_timeout_ms)
            .await
            .map_err(|error| Sdi12Error::Transport { stage: ExchangeStage::AwaitingResponse, error })?;
        response.settle(received).map_err(|e| {
            warn!("sdi12 {} got no usable reply: {}", framed.as_str(), e.kind());
            e
        })
    }

    async fn signal_and_send(&mut self, cmd_bytes: &[u8]) -> Result<(), Sdi12Error<IF::Error>> {
        let signaling = |error| Sdi12Error::Transport { stage: ExchangeStage::Signaling, error };

        self.interface.set_line_level(LineLevel::Asserted).await.map_err(signaling)?;
        self.delay.delay_ms(self.config.break_ms).await;
        self.interface.set_line_level(LineLevel::Idle).await.map_err(signaling)?;
        self.delay.delay_us(self.config.marking_us).await;
        self.interface.set_line_direction(LineDirection::Transmit).await.map_err(signaling)?;

        let sent = self.interface.transmit(cmd_bytes, self.config.transmit_timeout_ms).await;
        let released = self.interface.set_line_direction(LineDirection::Receive).await;
        sent.map_err(|error| Sdi12Error::Transport { stage: ExchangeStage::Transmit, error })?;
        released.map_err(signaling)
    }
}
