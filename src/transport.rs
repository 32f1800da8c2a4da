//! Collaborator seams: outgoing report transport, link address, time source.

use std::time::Instant;

/// Bluetooth device address of a connected remote.
pub use bluer::Address;

/// Sends one output report to a device. Fire-and-forget: success means the
/// bytes were handed off, not that the remote acted on them.
pub trait Transport {
    fn send(&mut self, address: &Address, report: &[u8]) -> anyhow::Result<()>;
}

/// Monotonic millisecond time source for the report timer.
pub trait Clock {
    fn millis(&self) -> u64;
}

/// [`Clock`] counting from its own creation.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    start: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn millis(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }
}
