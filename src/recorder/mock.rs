// src/recorder/mock.rs
//
// Scripted transport and timer shared by the recorder tests. Both halves write
// into one journal so tests can check the exact order of line operations,
// transmissions and waits.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::string::String;
use std::vec::Vec;

use crate::common::hal_traits::{LineDirection, LineLevel, Received, Sdi12Timer, Sdi12Transport};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Direction(LineDirection),
    Level(LineLevel),
    Transmit(String),
    Receive,
    Delay { us: u64 },
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct MockError;

pub type Journal = Rc<RefCell<Vec<Event>>>;

pub struct MockTransport {
    journal: Journal,
    responses: VecDeque<Vec<u8>>,
    fail_receive: bool,
    fail_transmit: bool,
    fail_direction: bool,
}

impl MockTransport {
    pub fn new() -> Self {
        MockTransport {
            journal: Rc::new(RefCell::new(Vec::new())),
            responses: VecDeque::new(),
            fail_receive: false,
            fail_transmit: false,
            fail_direction: false,
        }
    }

    /// A timer writing into the same journal.
    pub fn timer(&self) -> MockTimer {
        MockTimer { journal: Rc::clone(&self.journal) }
    }

    pub fn journal(&self) -> Journal {
        Rc::clone(&self.journal)
    }

    /// Queues the bytes returned by the next receive.
    pub fn push_response(&mut self, bytes: &[u8]) {
        self.responses.push_back(bytes.to_vec());
    }

    pub fn fail_receive(&mut self) {
        self.fail_receive = true;
    }

    pub fn fail_transmit(&mut self) {
        self.fail_transmit = true;
    }

    pub fn fail_direction(&mut self) {
        self.fail_direction = true;
    }

    fn record(&self, event: Event) {
        self.journal.borrow_mut().push(event);
    }
}

impl Sdi12Transport for MockTransport {
    type Error = MockError;

    fn transmit(&mut self, bytes: &[u8], _timeout_ms: u32) -> Result<(), Self::Error> {
        if self.fail_transmit {
            return Err(MockError);
        }
        self.record(Event::Transmit(String::from_utf8_lossy(bytes).into_owned()));
        Ok(())
    }

    fn receive(&mut self, buffer: &mut [u8], _timeout_ms: u32) -> Result<Received, Self::Error> {
        self.record(Event::Receive);
        if self.fail_receive {
            return Err(MockError);
        }
        let Some(response) = self.responses.pop_front() else {
            return Ok(Received { len: 0, truncated: true });
        };
        let len = response.len().min(buffer.len());
        buffer[..len].copy_from_slice(&response[..len]);
        let terminated = response.iter().any(|b| b & 0x7F == b'\n');
        Ok(Received { len, truncated: !terminated && len < buffer.len() })
    }

    fn set_line_direction(&mut self, direction: LineDirection) -> Result<(), Self::Error> {
        if self.fail_direction {
            return Err(MockError);
        }
        self.record(Event::Direction(direction));
        Ok(())
    }

    fn set_line_level(&mut self, level: LineLevel) -> Result<(), Self::Error> {
        self.record(Event::Level(level));
        Ok(())
    }
}

#[cfg(feature = "async")]
impl crate::common::hal_traits::Sdi12TransportAsync for MockTransport {
    type Error = MockError;

    async fn transmit(&mut self, bytes: &[u8], timeout_ms: u32) -> Result<(), Self::Error> {
        Sdi12Transport::transmit(self, bytes, timeout_ms)
    }

    async fn receive(&mut self, buffer: &mut [u8], timeout_ms: u32) -> Result<Received, Self::Error> {
        Sdi12Transport::receive(self, buffer, timeout_ms)
    }

    async fn set_line_direction(&mut self, direction: LineDirection) -> Result<(), Self::Error> {
        Sdi12Transport::set_line_direction(self, direction)
    }

    async fn set_line_level(&mut self, level: LineLevel) -> Result<(), Self::Error> {
        Sdi12Transport::set_line_level(self, level)
    }
}

pub struct MockTimer {
    journal: Journal,
}

impl Sdi12Timer for MockTimer {
    fn delay_us(&mut self, us: u32) {
        self.journal.borrow_mut().push(Event::Delay { us: u64::from(us) });
    }

    fn delay_ms(&mut self, ms: u32) {
        self.journal.borrow_mut().push(Event::Delay { us: u64::from(ms) * 1000 });
    }
}

#[cfg(feature = "async")]
impl embedded_hal_async::delay::DelayNs for MockTimer {
    async fn delay_ns(&mut self, ns: u32) {
        self.journal.borrow_mut().push(Event::Delay { us: u64::from(ns) / 1000 });
    }

    async fn delay_us(&mut self, us: u32) {
        Sdi12Timer::delay_us(self, us);
    }

    async fn delay_ms(&mut self, ms: u32) {
        Sdi12Timer::delay_ms(self, ms);
    }
}

/// Snapshot of the journal.
pub fn events(journal: &Journal) -> Vec<Event> {
    journal.borrow().clone()
}

/// Every command written to the bus, in order.
pub fn transmitted(journal: &Journal) -> Vec<String> {
    journal
        .borrow()
        .iter()
        .filter_map(|e| match e {
            Event::Transmit(s) => Some(s.clone()),
            _ => None,
        })
        .collect()
}

/// Total simulated sleep after the `nth` receive (0-based), up to the next break.
pub fn delay_after_receive(journal: &Journal, nth: usize) -> u64 {
    let events = journal.borrow();
    let Some(start) = events
        .iter()
        .enumerate()
        .filter(|(_, e)| matches!(e, Event::Receive))
        .nth(nth)
        .map(|(i, _)| i)
    else {
        return 0;
    };
    events[start + 1..]
        .iter()
        .take_while(|e| !matches!(e, Event::Level(LineLevel::Asserted)))
        .map(|e| match e {
            Event::Delay { us } => *us,
            _ => 0,
        })
        .sum()
}

/// Drives a future that never pends (all mock I/O completes immediately).
#[cfg(feature = "async")]
pub fn block_on<F: core::future::Future>(fut: F) -> F::Output {
    use core::task::{Context, Poll, Waker};

    let mut cx = Context::from_waker(Waker::noop());
    let mut fut = core::pin::pin!(fut);
    loop {
        if let Poll::Ready(out) = fut.as_mut().poll(&mut cx) {
            return out;
        }
    }
}
