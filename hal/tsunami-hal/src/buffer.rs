//! In-memory UART sink
//!
//! Captures everything written to it in a fixed-capacity buffer. Used for
//! host-side testing and for simulating the peripheral end of the link.

use heapless::Vec;

use crate::uart::{UartConfig, UartTx};

/// Errors from [`BufferUart`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BufferUartError {
    /// The write would not fit in the remaining capacity
    Overflow,
}

/// UART transmitter backed by a heapless buffer
///
/// Writes are all-or-nothing: a write that does not fit leaves the buffer
/// untouched and returns [`BufferUartError::Overflow`].
#[derive(Debug, Clone, Default)]
pub struct BufferUart<const N: usize> {
    data: Vec<u8, N>,
    config: Option<UartConfig>,
    writes: usize,
    flushes: usize,
}

impl<const N: usize> BufferUart<N> {
    /// Create an empty, unconfigured sink
    pub const fn new() -> Self {
        Self {
            data: Vec::new(),
            config: None,
            writes: 0,
            flushes: 0,
        }
    }

    /// Bytes written so far
    pub fn written(&self) -> &[u8] {
        &self.data
    }

    /// Line settings from the last `configure` call
    pub fn config(&self) -> Option<&UartConfig> {
        self.config.as_ref()
    }

    /// Number of successful `write_blocking` calls
    pub fn write_count(&self) -> usize {
        self.writes
    }

    /// Number of `flush` calls
    pub fn flush_count(&self) -> usize {
        self.flushes
    }

    /// Discard captured bytes and counters, keeping the configuration
    pub fn clear(&mut self) {
        self.data.clear();
        self.writes = 0;
        self.flushes = 0;
    }
}

impl<const N: usize> UartTx for BufferUart<N> {
    type Error = BufferUartError;

    fn configure(&mut self, config: &UartConfig) -> Result<(), Self::Error> {
        self.config = Some(*config);
        Ok(())
    }

    fn write_blocking(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        self.data
            .extend_from_slice(data)
            .map_err(|_| BufferUartError::Overflow)?;
        self.writes += 1;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.flushes += 1;
        Ok(())
    }
}
