//! Adapter for `embedded-io` serial ports
//!
//! Most chip HALs expose their blocking UARTs through [`embedded_io::Write`].
//! Wrapping one in [`IoUart`] is how a board picks which physical port the
//! Tsunami is wired to.

use embedded_io::Write;

use crate::uart::{UartConfig, UartTx};

/// [`UartTx`] over any [`embedded_io::Write`] port
///
/// The port is expected to be opened at the right baud rate by the code that
/// constructs it; `configure` only records the requested settings so the
/// board code can check them with [`IoUart::requested_config`].
pub struct IoUart<W> {
    port: W,
    requested: Option<UartConfig>,
}

impl<W: Write> IoUart<W> {
    /// Wrap an already opened port
    pub fn new(port: W) -> Self {
        Self {
            port,
            requested: None,
        }
    }

    /// Settings passed to the last `configure` call
    pub fn requested_config(&self) -> Option<&UartConfig> {
        self.requested.as_ref()
    }

    /// Borrow the underlying port
    pub fn port_mut(&mut self) -> &mut W {
        &mut self.port
    }

    /// Give back the underlying port
    pub fn into_inner(self) -> W {
        self.port
    }
}

impl<W: Write> UartTx for IoUart<W> {
    type Error = W::Error;

    fn configure(&mut self, config: &UartConfig) -> Result<(), Self::Error> {
        self.requested = Some(*config);
        Ok(())
    }

    fn write_blocking(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        self.port.write_all(data)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.port.flush()
    }
}
