//! Frame encoding for the Tsunami serial protocol.
//!
//! Frame format:
//! - START (2 bytes): 0xF0 0xAA
//! - LENGTH (1 byte): total frame length, markers included
//! - OPCODE (1 byte): command selector
//! - BODY (0-7 bytes): command-specific fields, 16-bit values little-endian
//! - END (1 byte): 0x55
//!
//! There is no checksum; the end marker is the only trailer.

use crate::opcode::Opcode;

/// Frame start markers
pub const START_MARKER: [u8; 2] = [0xF0, 0xAA];

/// Frame end marker
pub const END_MARKER: u8 = 0x55;

/// START + LENGTH + OPCODE
pub const HEADER_SIZE: usize = 4;

/// END
pub const TRAILER_SIZE: usize = 1;

/// Largest body in the protocol (TRACK_FADE)
pub const MAX_BODY_SIZE: usize = 7;

/// Largest complete frame
pub const MAX_FRAME_SIZE: usize = HEADER_SIZE + MAX_BODY_SIZE + TRAILER_SIZE;

/// Errors raised while decoding frames
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// Missing or corrupt start/end marker
    InvalidMarker,
    /// Length byte or body size does not match the opcode
    InvalidLength,
    /// Opcode byte is not part of the protocol
    UnknownOpcode(u8),
    /// TRACK_CONTROL sub-code is not part of the protocol
    UnknownAction(u8),
    /// Body larger than any frame can carry
    BodyTooLarge,
}

/// Split a 16-bit value into (low, high) bytes
pub const fn split_le16(value: u16) -> (u8, u8) {
    let [lo, hi] = value.to_le_bytes();
    (lo, hi)
}

/// Reassemble a value split by [`split_le16`]
pub const fn join_le16(lo: u8, hi: u8) -> u16 {
    u16::from_le_bytes([lo, hi])
}

struct BodyFits<const N: usize>;

impl<const N: usize> BodyFits<N> {
    const OK: () = assert!(N <= MAX_BODY_SIZE, "frame body larger than MAX_BODY_SIZE");
}

/// A complete wire frame
///
/// Always starts with [`START_MARKER`], carries its own length in byte 2 and
/// ends with [`END_MARKER`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    opcode: Opcode,
    bytes: [u8; MAX_FRAME_SIZE],
    len: usize,
}

impl Frame {
    /// Build a frame around a fixed-size body
    ///
    /// The body size is checked at compile time, so packing never fails.
    /// Crate-private: only the command encoders know which body size goes
    /// with which opcode. Use [`Frame::from_body`] to build one by hand.
    pub(crate) fn pack<const N: usize>(opcode: Opcode, body: [u8; N]) -> Self {
        #[allow(clippy::let_unit_value)]
        let () = BodyFits::<N>::OK;
        debug_assert_eq!(HEADER_SIZE + N + TRAILER_SIZE, opcode.frame_len());
        Self::assemble(opcode, &body)
    }

    /// Build a frame from a decoded body
    ///
    /// The body must be exactly the size the opcode calls for.
    pub fn from_body(opcode: Opcode, body: &[u8]) -> Result<Self, FrameError> {
        if body.len() > MAX_BODY_SIZE {
            return Err(FrameError::BodyTooLarge);
        }
        if HEADER_SIZE + body.len() + TRAILER_SIZE != opcode.frame_len() {
            return Err(FrameError::InvalidLength);
        }
        Ok(Self::assemble(opcode, body))
    }

    fn assemble(opcode: Opcode, body: &[u8]) -> Self {
        let len = HEADER_SIZE + body.len() + TRAILER_SIZE;
        let mut bytes = [0u8; MAX_FRAME_SIZE];
        bytes[0] = START_MARKER[0];
        bytes[1] = START_MARKER[1];
        bytes[2] = len as u8;
        bytes[3] = opcode.to_byte();
        bytes[HEADER_SIZE..HEADER_SIZE + body.len()].copy_from_slice(body);
        bytes[len - 1] = END_MARKER;

        Self { opcode, bytes, len }
    }

    /// Command selector
    pub fn opcode(&self) -> Opcode {
        self.opcode
    }

    /// Bytes between the opcode and the end marker
    pub fn body(&self) -> &[u8] {
        &self.bytes[HEADER_SIZE..self.len - TRAILER_SIZE]
    }

    /// The frame as it goes on the wire
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len]
    }

    /// Total length in bytes
    pub fn len(&self) -> usize {
        self.len
    }

    /// Always false: even the shortest frame has markers
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Copy the frame into `buffer`, returning the number of bytes written
    pub fn encode(&self, buffer: &mut [u8]) -> Option<usize> {
        let out = buffer.get_mut(..self.len)?;
        out.copy_from_slice(self.as_bytes());
        Some(self.len)
    }
}

impl AsRef<[u8]> for Frame {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}
