//! Transmitter adapters

use crate::layout::OutputId;
use crate::protocol::PulseCode;
use crate::PulseTransmitter;

/// Runs every transmission inside a critical section.
///
/// Interrupts firing mid-frame stretch low pulses past the reset threshold
/// and latch a partial frame. Wrap transmitters that bit-bang or refill a
/// small peripheral FIFO from software.
#[derive(Debug)]
pub struct CriticalSectionTransmitter<T> {
    inner: T,
}

impl<T: PulseTransmitter> CriticalSectionTransmitter<T> {
    pub const fn new(inner: T) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &T {
        &self.inner
    }

    pub fn inner_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    pub fn into_inner(self) -> T {
        self.inner
    }
}

impl<T: PulseTransmitter> PulseTransmitter for CriticalSectionTransmitter<T> {
    type Error = T::Error;

    fn configure(&mut self, output: OutputId) -> Result<(), Self::Error> {
        self.inner.configure(output)
    }

    fn transmit(&mut self, output: OutputId, pulses: &[PulseCode]) -> Result<(), Self::Error> {
        let inner = &mut self.inner;
        critical_section::with(|_| inner.transmit(output, pulses))
    }

    fn release(&mut self, output: OutputId) {
        self.inner.release(output);
    }
}
