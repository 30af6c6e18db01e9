//! Tsunami Serial Control Protocol
//!
//! This crate defines the host-to-board command frames understood by the
//! Tsunami polyphonic WAV player. The protocol is write-only from the host:
//! the board never answers these commands.
//!
//! # Protocol Overview
//!
//! Every command is a single fixed-size frame:
//! ```text
//! ┌───────────┬────────┬────────┬────────────┬──────┐
//! │ START     │ LENGTH │ OPCODE │ BODY       │ END  │
//! │ F0 AA     │ 1B     │ 1B     │ 0–7B       │ 55   │
//! └───────────┴────────┴────────┴────────────┴──────┘
//! ```
//!
//! LENGTH counts the whole frame, markers included. Multi-byte fields are
//! little-endian. Output numbers are masked to the four output buses and
//! nothing is range-checked.

#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![deny(unsafe_code)]

pub mod command;
pub mod frame;
pub mod opcode;
pub mod parser;

pub use command::{output_bits, track_control_frame, Command, TrackFlags, NUM_OUTPUTS};
pub use frame::{join_le16, split_le16, Frame, FrameError, MAX_FRAME_SIZE};
pub use opcode::{Opcode, TrackAction};
pub use parser::FrameParser;
