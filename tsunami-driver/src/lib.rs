//! Tsunami serial control driver
//!
//! Drives a Tsunami polyphonic WAV player over any [`tsunami_hal::UartTx`].
//! Each method builds one protocol frame and writes it in a single call;
//! the board sends nothing back.
//!
//! ```rust,ignore
//! use tsunami_driver::Tsunami;
//!
//! let mut tsunami = Tsunami::new(uart);
//! tsunami.start()?;
//! tsunami.master_gain(0, -6)?;
//! tsunami.track_play_poly(12, 0, true)?;
//! tsunami.track_fade(12, -70, 2000, true)?;
//! ```
//!
//! Access from several tasks must be serialized by the caller (e.g. a
//! mutex around the driver): interleaved frames corrupt the link.

#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![deny(unsafe_code)]

pub mod tsunami;

pub use tsunami::Tsunami;
pub use tsunami_protocol::{Command, TrackAction, TrackFlags, NUM_OUTPUTS};
