// src/adapters/std_timer.rs

use std::thread;
use std::time::Duration;

use crate::common::hal_traits::Sdi12Timer;

/// Sleeping timer for host builds, e.g. a recorder behind a USB serial bridge.
#[derive(Debug, Default, Copy, Clone)]
pub struct StdTimer;

impl Sdi12Timer for StdTimer {
    fn delay_us(&mut self, us: u32) {
        thread::sleep(Duration::from_micros(u64::from(us)));
    }

    fn delay_ms(&mut self, ms: u32) {
        thread::sleep(Duration::from_millis(u64::from(ms)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[test]
    fn test_sleeps_at_least_requested() {
        let start = Instant::now();
        StdTimer.delay_ms(2);
        StdTimer.delay_us(500);
        assert!(start.elapsed() >= Duration::from_micros(2_500));
    }
}
