//! Typed commands for the Tsunami protocol
//!
//! Each [`Command`] maps to exactly one fixed-size frame. Encoding never
//! validates: output numbers are masked to the four buses and 16-bit fields
//! are sent as-is, signed values reinterpreted as unsigned.

use crate::frame::{join_le16, split_le16, Frame, FrameError};
use crate::opcode::{Opcode, TrackAction};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Number of output buses on the board
pub const NUM_OUTPUTS: u8 = 4;

/// Mask applied to every output number before it is sent
pub const OUTPUT_MASK: u8 = NUM_OUTPUTS - 1;

/// Wrap an output number onto the four buses
///
/// Out-of-range values wrap rather than fail: 4 becomes 0, 255 becomes 3.
pub const fn output_bits(output: u8) -> u8 {
    output & OUTPUT_MASK
}

/// TRACK_CONTROL flags byte
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TrackFlags(u8);

impl TrackFlags {
    /// Reserve the output so other tracks cannot steal it
    pub const LOCK: u8 = 0x01;

    /// No flags set
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Flags for a play/load request
    pub const fn with_lock(lock: bool) -> Self {
        if lock {
            Self(Self::LOCK)
        } else {
            Self(0)
        }
    }

    /// Raw flags byte, unknown bits preserved
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn is_locked(self) -> bool {
        self.0 & Self::LOCK != 0
    }
}

/// Build the 10-byte TRACK_CONTROL frame
///
/// Shared by every play/pause/stop/loop/load request so they all have the
/// same layout: action, track (LE), output, flags.
pub fn track_control_frame(
    track: u16,
    action: TrackAction,
    output: u8,
    flags: TrackFlags,
) -> Frame {
    let (trk_lo, trk_hi) = split_le16(track);
    Frame::pack(
        Opcode::TrackControl,
        [
            action.to_byte(),
            trk_lo,
            trk_hi,
            output_bits(output),
            flags.bits(),
        ],
    )
}

/// A single host-to-board request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Command {
    /// Set an output bus gain
    MasterGain { output: u8, gain: i16 },
    /// Play, pause, resume, stop, loop or load a track
    TrackControl {
        track: u16,
        action: TrackAction,
        output: u8,
        flags: TrackFlags,
    },
    /// Stop every track
    StopAll,
    /// Set a track's gain
    TrackGain { track: u16, gain: i16 },
    /// Ramp a track's gain over `time_ms`, optionally stopping it at the end
    TrackFade {
        track: u16,
        gain: i16,
        time_ms: u16,
        stop_at_end: bool,
    },
    /// Resume every paused or loaded track on the same sample
    ResumeAllInSync,
    /// Trim an output bus playback rate
    SamplerateOffset { output: u8, offset: i16 },
}

impl Command {
    /// Opcode this command is sent with
    pub const fn opcode(&self) -> Opcode {
        match self {
            Command::MasterGain { .. } => Opcode::MasterVolume,
            Command::TrackControl { .. } => Opcode::TrackControl,
            Command::StopAll => Opcode::StopAll,
            Command::TrackGain { .. } => Opcode::TrackVolume,
            Command::TrackFade { .. } => Opcode::TrackFade,
            Command::ResumeAllInSync => Opcode::ResumeAllSync,
            Command::SamplerateOffset { .. } => Opcode::SamplerateOffset,
        }
    }

    /// Encode this command into its wire frame
    pub fn to_frame(&self) -> Frame {
        match *self {
            Command::MasterGain { output, gain } => {
                let (lo, hi) = split_le16(gain as u16);
                Frame::pack(Opcode::MasterVolume, [output_bits(output), lo, hi])
            }
            Command::TrackControl {
                track,
                action,
                output,
                flags,
            } => track_control_frame(track, action, output, flags),
            Command::StopAll => Frame::pack(Opcode::StopAll, []),
            Command::TrackGain { track, gain } => {
                let (trk_lo, trk_hi) = split_le16(track);
                let (gain_lo, gain_hi) = split_le16(gain as u16);
                Frame::pack(Opcode::TrackVolume, [trk_lo, trk_hi, gain_lo, gain_hi])
            }
            Command::TrackFade {
                track,
                gain,
                time_ms,
                stop_at_end,
            } => {
                let (trk_lo, trk_hi) = split_le16(track);
                let (gain_lo, gain_hi) = split_le16(gain as u16);
                let (time_lo, time_hi) = split_le16(time_ms);
                Frame::pack(
                    Opcode::TrackFade,
                    [
                        trk_lo,
                        trk_hi,
                        gain_lo,
                        gain_hi,
                        time_lo,
                        time_hi,
                        stop_at_end as u8,
                    ],
                )
            }
            Command::ResumeAllInSync => Frame::pack(Opcode::ResumeAllSync, []),
            Command::SamplerateOffset { output, offset } => {
                let (lo, hi) = split_le16(offset as u16);
                Frame::pack(Opcode::SamplerateOffset, [output_bits(output), lo, hi])
            }
        }
    }

    /// Decode a frame back into a command (board side, or for inspection)
    ///
    /// Output numbers come back already masked, and any non-zero
    /// stop-at-end byte reads as `true`.
    pub fn from_frame(frame: &Frame) -> Result<Self, FrameError> {
        match (frame.opcode(), frame.body()) {
            (Opcode::MasterVolume, &[output, lo, hi]) => Ok(Command::MasterGain {
                output,
                gain: join_le16(lo, hi) as i16,
            }),
            (Opcode::TrackControl, &[action, trk_lo, trk_hi, output, flags]) => {
                Ok(Command::TrackControl {
                    track: join_le16(trk_lo, trk_hi),
                    action: TrackAction::try_from(action)?,
                    output,
                    flags: TrackFlags::from_bits(flags),
                })
            }
            (Opcode::StopAll, &[]) => Ok(Command::StopAll),
            (Opcode::TrackVolume, &[trk_lo, trk_hi, gain_lo, gain_hi]) => {
                Ok(Command::TrackGain {
                    track: join_le16(trk_lo, trk_hi),
                    gain: join_le16(gain_lo, gain_hi) as i16,
                })
            }
            (
                Opcode::TrackFade,
                &[trk_lo, trk_hi, gain_lo, gain_hi, time_lo, time_hi, stop],
            ) => Ok(Command::TrackFade {
                track: join_le16(trk_lo, trk_hi),
                gain: join_le16(gain_lo, gain_hi) as i16,
                time_ms: join_le16(time_lo, time_hi),
                stop_at_end: stop != 0,
            }),
            (Opcode::ResumeAllSync, &[]) => Ok(Command::ResumeAllInSync),
            (Opcode::SamplerateOffset, &[output, lo, hi]) => Ok(Command::SamplerateOffset {
                output,
                offset: join_le16(lo, hi) as i16,
            }),
            _ => Err(FrameError::InvalidLength),
        }
    }
}

impl From<Command> for Frame {
    fn from(command: Command) -> Self {
        command.to_frame()
    }
}
