// src/adapters/nb_transport.rs

use core::fmt::Debug;

use crate::common::hal_traits::{LineControl, LineDirection, LineLevel, Received, Sdi12Serial, Sdi12Timer, Sdi12Transport};
use crate::common::response::PARITY_MASK;

/// Sleep between polls of a serial that returned `WouldBlock`.
const POLL_INTERVAL_US: u32 = 100;

#[derive(Debug, thiserror::Error)]
pub enum NbTransportError<SE: Debug, LE: Debug> {
    #[error("serial error: {0:?}")]
    Serial(SE),
    #[error("line control error: {0:?}")]
    Line(LE),
    /// The serial kept refusing bytes until the transmit timeout ran out.
    #[error("transmit timed out")]
    Timeout,
}

/// [`Sdi12Transport`] built from a non-blocking byte serial, a line controller
/// and a timer used to pace polling.
///
/// Timeouts are counted in polling sleeps, so they are only as accurate as the
/// timer and assume each poll itself takes negligible time.
#[derive(Debug)]
pub struct NbTransport<S, L, D> {
    serial: S,
    line: L,
    timer: D,
}

impl<S, L, D> NbTransport<S, L, D>
where
    S: Sdi12Serial,
    L: LineControl,
    D: Sdi12Timer,
{
    pub fn new(serial: S, line: L, timer: D) -> Self {
        NbTransport { serial, line, timer }
    }

    pub fn release(self) -> (S, L, D) {
        (self.serial, self.line, self.timer)
    }

    /// Repeats `op` until it completes, sleeping between attempts.
    /// `Ok(None)` means the budget ran out first.
    fn poll<T>(
        &mut self,
        remaining_us: &mut u64,
        mut op: impl FnMut(&mut S) -> nb::Result<T, S::Error>,
    ) -> Result<Option<T>, S::Error> {
        loop {
            match op(&mut self.serial) {
                Ok(value) => return Ok(Some(value)),
                Err(nb::Error::Other(e)) => return Err(e),
                Err(nb::Error::WouldBlock) => {
                    if *remaining_us == 0 {
                        return Ok(None);
                    }
                    let step = (*remaining_us).min(u64::from(POLL_INTERVAL_US));
                    self.timer.delay_us(step as u32);
                    *remaining_us -= step;
                }
            }
        }
    }
}

impl<S, L, D> Sdi12Transport for NbTransport<S, L, D>
where
    S: Sdi12Serial,
    L: LineControl,
    D: Sdi12Timer,
{
    type Error = NbTransportError<S::Error, L::Error>;

    fn transmit(&mut self, bytes: &[u8], timeout_ms: u32) -> Result<(), Self::Error> {
        let mut remaining_us = u64::from(timeout_ms) * 1000;
        for &byte in bytes {
            self.poll(&mut remaining_us, |s| s.write_byte(byte))
                .map_err(NbTransportError::Serial)?
                .ok_or(NbTransportError::Timeout)?;
        }
        self.poll(&mut remaining_us, |s| s.flush())
            .map_err(NbTransportError::Serial)?
            .ok_or(NbTransportError::Timeout)
    }

    fn receive(&mut self, buffer: &mut [u8], timeout_ms: u32) -> Result<Received, Self::Error> {
        let mut remaining_us = u64::from(timeout_ms) * 1000;
        let mut len = 0;
        while len < buffer.len() {
            let Some(byte) = self.poll(&mut remaining_us, |s| s.read_byte()).map_err(NbTransportError::Serial)? else {
                return Ok(Received { len, truncated: true });
            };
            buffer[len] = byte;
            len += 1;
            if byte & PARITY_MASK == b'\n' {
                break;
            }
        }
        Ok(Received { len, truncated: false })
    }

    fn set_line_direction(&mut self, direction: LineDirection) -> Result<(), Self::Error> {
        self.line.set_line_direction(direction).map_err(NbTransportError::Line)
    }

    fn set_line_level(&mut self, level: LineLevel) -> Result<(), Self::Error> {
        self.line.set_line_level(level).map_err(NbTransportError::Line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::Sdi12Addr;
    use crate::recorder::SyncRecorder;
    use std::cell::Cell;
    use std::collections::VecDeque;
    use std::rc::Rc;

    #[derive(Debug, Copy, Clone, PartialEq, Eq)]
    struct SerialFault;

    /// `None` entries make one poll return `WouldBlock`; an empty queue blocks forever.
    #[derive(Default)]
    struct MockSerial {
        rx: VecDeque<Option<u8>>,
        tx: Vec<u8>,
        flushed: bool,
        write_stalls: usize,
        refuse_writes: bool,
        broken: bool,
    }

    impl Sdi12Serial for MockSerial {
        type Error = SerialFault;

        fn read_byte(&mut self) -> nb::Result<u8, SerialFault> {
            if self.broken {
                return Err(nb::Error::Other(SerialFault));
            }
            match self.rx.pop_front() {
                Some(Some(byte)) => Ok(byte),
                _ => Err(nb::Error::WouldBlock),
            }
        }

        fn write_byte(&mut self, byte: u8) -> nb::Result<(), SerialFault> {
            if self.refuse_writes {
                return Err(nb::Error::WouldBlock);
            }
            if self.write_stalls > 0 {
                self.write_stalls -= 1;
                return Err(nb::Error::WouldBlock);
            }
            self.tx.push(byte);
            Ok(())
        }

        fn flush(&mut self) -> nb::Result<(), SerialFault> {
            self.flushed = true;
            Ok(())
        }
    }

    #[derive(Default)]
    struct MockLine {
        calls: Vec<(Option<LineDirection>, Option<LineLevel>)>,
    }

    impl LineControl for MockLine {
        type Error = ();

        fn set_line_direction(&mut self, direction: LineDirection) -> Result<(), ()> {
            self.calls.push((Some(direction), None));
            Ok(())
        }

        fn set_line_level(&mut self, level: LineLevel) -> Result<(), ()> {
            self.calls.push((None, Some(level)));
            Ok(())
        }
    }

    #[derive(Clone, Default)]
    struct CountingTimer {
        slept_us: Rc<Cell<u64>>,
    }

    impl Sdi12Timer for CountingTimer {
        fn delay_us(&mut self, us: u32) {
            self.slept_us.set(self.slept_us.get() + u64::from(us));
        }

        fn delay_ms(&mut self, ms: u32) {
            self.delay_us(ms * 1000);
        }
    }

    fn serial_with(rx: &[Option<u8>]) -> MockSerial {
        MockSerial { rx: rx.iter().copied().collect(), ..Default::default() }
    }

    #[test]
    fn test_receive_stops_at_masked_line_feed() {
        let serial = serial_with(&[Some(b'0'), None, Some(0x8D), Some(0x8A), Some(b'x')]);
        let mut transport = NbTransport::new(serial, MockLine::default(), CountingTimer::default());

        let mut buffer = [0u8; 16];
        let received = transport.receive(&mut buffer, 100).unwrap();

        assert_eq!(received, Received { len: 3, truncated: false });
        assert_eq!(&buffer[..3], &[b'0', 0x8D, 0x8A]);
        let (serial, _, _) = transport.release();
        assert_eq!(serial.rx.len(), 1);
    }

    #[test]
    fn test_receive_timeout_keeps_partial_bytes() {
        let timer = CountingTimer::default();
        let slept = Rc::clone(&timer.slept_us);
        let mut transport = NbTransport::new(serial_with(&[Some(b'0'), Some(b'+')]), MockLine::default(), timer);

        let mut buffer = [0u8; 16];
        let received = transport.receive(&mut buffer, 2).unwrap();

        assert_eq!(received, Received { len: 2, truncated: true });
        assert_eq!(slept.get(), 2_000);
    }

    #[test]
    fn test_receive_fills_buffer() {
        let mut transport =
            NbTransport::new(serial_with(&[Some(b'1'), Some(b'2'), Some(b'3')]), MockLine::default(), CountingTimer::default());

        let mut buffer = [0u8; 2];
        assert_eq!(transport.receive(&mut buffer, 10).unwrap(), Received { len: 2, truncated: false });
    }

    #[test]
    fn test_transmit_waits_out_stalls_and_flushes() {
        let serial = MockSerial { write_stalls: 3, ..Default::default() };
        let mut transport = NbTransport::new(serial, MockLine::default(), CountingTimer::default());

        transport.transmit(b"0M!", 10).unwrap();

        let (serial, _, _) = transport.release();
        assert_eq!(serial.tx, b"0M!");
        assert!(serial.flushed);
    }

    #[test]
    fn test_transmit_timeout() {
        let serial = MockSerial { refuse_writes: true, ..Default::default() };
        let mut transport = NbTransport::new(serial, MockLine::default(), CountingTimer::default());

        assert!(matches!(transport.transmit(b"0!", 1), Err(NbTransportError::Timeout)));
    }

    #[test]
    fn test_serial_fault_propagates() {
        let serial = MockSerial { broken: true, ..Default::default() };
        let mut transport = NbTransport::new(serial, MockLine::default(), CountingTimer::default());

        let mut buffer = [0u8; 4];
        assert!(matches!(transport.receive(&mut buffer, 10), Err(NbTransportError::Serial(SerialFault))));
    }

    #[test]
    fn test_line_calls_forwarded() {
        let mut transport = NbTransport::new(MockSerial::default(), MockLine::default(), CountingTimer::default());

        transport.set_line_level(LineLevel::Asserted).unwrap();
        transport.set_line_direction(LineDirection::Receive).unwrap();

        let (_, line, _) = transport.release();
        assert_eq!(
            line.calls,
            vec![(None, Some(LineLevel::Asserted)), (Some(LineDirection::Receive), None)]
        );
    }

    #[test]
    fn test_recorder_over_nb_transport() {
        let serial = serial_with(&[None, None, Some(b'3'), Some(b'\r'), Some(b'\n')]);
        let transport = NbTransport::new(serial, MockLine::default(), CountingTimer::default());
        let mut recorder = SyncRecorder::new(transport, CountingTimer::default());

        let address = Sdi12Addr::new('3').unwrap();
        assert_eq!(recorder.query_address(address).unwrap().as_str(), "3");

        let (transport, _) = recorder.release();
        let (serial, line, _) = transport.release();
        assert_eq!(serial.tx, b"3!");
        assert_eq!(line.calls.len(), 4);
    }
}
