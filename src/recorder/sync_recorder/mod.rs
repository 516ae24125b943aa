// src/recorder/sync_recorder/mod.rs

mod io_helpers;
mod transaction;

use crate::common::{
    address::Sdi12Addr,
    command::{Command, DataIndex, MeasurementIndex, Verb},
    error::{ExchangeStage, Sdi12Error},
    hal_traits::{Sdi12Timer, Sdi12Transport},
    response::{DataValues, IdentificationInfo, MeasurementResult, MeasurementTiming, ResponseText},
};
use crate::recorder::{config::RecorderConfig, protocol_helpers};

/// Represents an SDI-12 Recorder (Datalogger) instance for blocking operations.
///
/// Owns the transport, the timer used for every wait and the line timing
/// configuration. Each operation takes `&mut self`, so the bus is never shared
/// between two exchanges.
#[derive(Debug)]
pub struct SyncRecorder<IF, D>
where
    IF: Sdi12Transport,
    D: Sdi12Timer,
{
    interface: IF,
    timer: D,
    config: RecorderConfig,
}

impl<IF, D> SyncRecorder<IF, D>
where
    IF: Sdi12Transport,
    D: Sdi12Timer,
{
    /// Creates a recorder with the default (minimum) line timings.
    pub fn new(interface: IF, timer: D) -> Self {
        SyncRecorder { interface, timer, config: RecorderConfig::new() }
    }

    /// Creates a recorder after checking `config` against the protocol floors.
    pub fn with_config(interface: IF, timer: D, config: RecorderConfig) -> Result<Self, Sdi12Error<IF::Error>> {
        config.validate().map_err(Sdi12Error::widen)?;
        Ok(SyncRecorder { interface, timer, config })
    }

    pub fn config(&self) -> &RecorderConfig {
        &self.config
    }

    /// Gives back the transport and timer.
    pub fn release(self) -> (IF, D) {
        (self.interface, self.timer)
    }

    // --- Public Blocking Methods ---

    /// Acknowledge active (`a!`). Returns the sensor's reply line.
    pub fn query_address(&mut self, address: Sdi12Addr) -> Result<ResponseText, Sdi12Error<IF::Error>> {
        let command = Self::addressed(address, Verb::QueryAddress)?;
        let response = self.execute_transaction(&command)?;
        Ok(protocol_helpers::decode_acknowledge(response.line(), address)?)
    }

    /// Address query (`?!`). Only meaningful with a single sensor on the bus.
    pub fn discover_address(&mut self) -> Result<Sdi12Addr, Sdi12Error<IF::Error>> {
        let response = self.execute_transaction(&Command::address_query())?;
        let address = protocol_helpers::decode_discovered(response.line())?;
        debug!("sdi12 discovered sensor at '{}'", address);
        Ok(address)
    }

    /// Send identification (`aI!`). The reply is returned as received.
    pub fn get_info(&mut self, address: Sdi12Addr) -> Result<ResponseText, Sdi12Error<IF::Error>> {
        let command = Self::addressed(address, Verb::GetInfo)?;
        let response = self.execute_transaction(&command)?;
        Ok(protocol_helpers::to_text(response.line())?)
    }

    /// [`get_info`](Self::get_info), split into its fixed-width fields.
    pub fn identify(&mut self, address: Sdi12Addr) -> Result<IdentificationInfo, Sdi12Error<IF::Error>> {
        let text = self.get_info(address)?;
        Ok(protocol_helpers::decode_identification(text.as_bytes(), address)?)
    }

    /// Start measurement (`aM!`/`aMn!`), then wait out the advertised ready delay.
    pub fn start_measurement(
        &mut self,
        address: Sdi12Addr,
        index: MeasurementIndex,
    ) -> Result<MeasurementTiming, Sdi12Error<IF::Error>> {
        let command = Self::addressed(address, Verb::Measure(index))?;
        let response = self.execute_transaction(&command)?;
        let timing = protocol_helpers::decode_timing(response.line(), address)?;
        debug!(
            "sdi12 {}: '{}' ready in {} ms with {} values",
            ExchangeStage::Decoding,
            address,
            timing.ready_delay_ms,
            timing.values_count
        );
        self.timer.delay_ms(timing.ready_delay_ms);
        Ok(timing)
    }

    /// Send data (`aD0!`, `aD1!`, ...) until `timing.values_count` values have arrived.
    pub fn retrieve_data(
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
            let response = self.execute_transaction(&command)?;
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

    /// Trigger, wait and collect every value of one measurement set.
    pub fn measure_values(
        &mut self,
        address: Sdi12Addr,
        index: MeasurementIndex,
    ) -> Result<DataValues, Sdi12Error<IF::Error>> {
        let timing = self.start_measurement(address, index)?;
        self.retrieve_data(address, &timing)
    }

    /// Base measurement of a three-value soil sensor.
    pub fn measure(&mut self, address: Sdi12Addr) -> Result<MeasurementResult, Sdi12Error<IF::Error>> {
        let values = self.measure_values(address, MeasurementIndex::Base)?;
        Ok(MeasurementResult::from_values(&values)?)
    }

    // The wildcard belongs to `discover_address` only.
    fn addressed(address: Sdi12Addr, verb: Verb) -> Result<Command, Sdi12Error<IF::Error>> {
        if address.is_query() {
            return Err(Sdi12Error::InvalidParameter("wildcard address only valid for address query"));
        }
        Command::new(address, verb).map_err(Sdi12Error::widen)
    }
}
