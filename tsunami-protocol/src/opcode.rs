//! Command opcodes and track-control actions

use crate::frame::FrameError;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Top-level command selector (byte 3 of every frame)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(u8)]
pub enum Opcode {
    /// Play/pause/stop/loop/load a single track
    TrackControl = 3,
    /// Stop every playing track
    StopAll = 4,
    /// Output bus gain
    MasterVolume = 5,
    /// Per-track gain
    TrackVolume = 8,
    /// Per-track gain ramp
    TrackFade = 10,
    /// Resume all paused tracks on the same sample
    ResumeAllSync = 11,
    /// Output bus playback rate trim
    SamplerateOffset = 12,
}

impl Opcode {
    /// All opcodes, in wire value order
    pub const ALL: [Opcode; 7] = [
        Opcode::TrackControl,
        Opcode::StopAll,
        Opcode::MasterVolume,
        Opcode::TrackVolume,
        Opcode::TrackFade,
        Opcode::ResumeAllSync,
        Opcode::SamplerateOffset,
    ];

    /// Wire value
    pub const fn to_byte(self) -> u8 {
        self as u8
    }

    /// Total frame length for this opcode, markers included
    ///
    /// Every frame kind has a fixed size; nothing in the protocol is
    /// variable length.
    pub const fn frame_len(self) -> usize {
        match self {
            Opcode::TrackControl => 10,
            Opcode::StopAll => 5,
            Opcode::MasterVolume => 8,
            Opcode::TrackVolume => 9,
            Opcode::TrackFade => 12,
            Opcode::ResumeAllSync => 5,
            Opcode::SamplerateOffset => 8,
        }
    }
}

impl From<Opcode> for u8 {
    fn from(opcode: Opcode) -> Self {
        opcode.to_byte()
    }
}

impl TryFrom<u8> for Opcode {
    type Error = FrameError;

    fn try_from(byte: u8) -> Result<Self, Self::Error> {
        match byte {
            3 => Ok(Opcode::TrackControl),
            4 => Ok(Opcode::StopAll),
            5 => Ok(Opcode::MasterVolume),
            8 => Ok(Opcode::TrackVolume),
            10 => Ok(Opcode::TrackFade),
            11 => Ok(Opcode::ResumeAllSync),
            12 => Ok(Opcode::SamplerateOffset),
            other => Err(FrameError::UnknownOpcode(other)),
        }
    }
}

/// Sub-code carried in TRACK_CONTROL frames
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(u8)]
pub enum TrackAction {
    /// Stop everything else, then play this track
    PlaySolo = 0,
    /// Play alongside whatever is already running
    PlayPoly = 1,
    Pause = 2,
    Resume = 3,
    Stop = 4,
    LoopOn = 5,
    LoopOff = 6,
    /// Load paused, ready for `ResumeAllSync`
    Load = 7,
}

impl TrackAction {
    /// Wire value
    pub const fn to_byte(self) -> u8 {
        self as u8
    }

    /// Loop on or off
    pub const fn looping(enable: bool) -> Self {
        if enable {
            TrackAction::LoopOn
        } else {
            TrackAction::LoopOff
        }
    }
}

impl From<TrackAction> for u8 {
    fn from(action: TrackAction) -> Self {
        action.to_byte()
    }
}

impl TryFrom<u8> for TrackAction {
    type Error = FrameError;

    fn try_from(byte: u8) -> Result<Self, Self::Error> {
        match byte {
            0 => Ok(TrackAction::PlaySolo),
            1 => Ok(TrackAction::PlayPoly),
            2 => Ok(TrackAction::Pause),
            3 => Ok(TrackAction::Resume),
            4 => Ok(TrackAction::Stop),
            5 => Ok(TrackAction::LoopOn),
            6 => Ok(TrackAction::LoopOff),
            7 => Ok(TrackAction::Load),
            other => Err(FrameError::UnknownAction(other)),
        }
    }
}
