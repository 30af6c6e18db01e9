//! Tsunami Hardware Abstraction Layer
//!
//! This crate defines the serial transport the Tsunami driver writes to.
//! Board code picks a physical UART and hands it to the driver as a
//! [`UartTx`]; the driver never knows which port it is talking to.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application / board code               │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  tsunami-driver (frame encoder)         │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  tsunami-hal (this crate - UartTx)      │
//! └─────────────────────────────────────────┘
//!         │                       │
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │ IoUart<port>  │       │ BufferUart<N> │
//! │ (embedded-io) │       │ (host / sim)  │
//! └───────────────┘       └───────────────┘
//! ```

#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![deny(unsafe_code)]

pub mod buffer;
pub mod io;
pub mod uart;

// Re-export key types at crate root for convenience
pub use buffer::{BufferUart, BufferUartError};
pub use io::IoUart;
pub use uart::{DataBits, Parity, StopBits, UartConfig, UartTx, TSUNAMI_BAUDRATE};
