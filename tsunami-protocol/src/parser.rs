//! Byte-stream frame recovery
//!
//! The board end of the link: recovers frames from raw serial bytes. Used to
//! inspect what a driver actually put on the wire when an in-memory UART
//! stands in for the board.

use heapless::Vec;

use crate::frame::{
    Frame, FrameError, END_MARKER, HEADER_SIZE, MAX_BODY_SIZE, MAX_FRAME_SIZE, START_MARKER,
    TRAILER_SIZE,
};
use crate::opcode::Opcode;

/// State machine for parsing incoming frames
#[derive(Debug, Clone)]
pub struct FrameParser {
    state: ParseState,
    body: Vec<u8, MAX_BODY_SIZE>,
    body_len: usize,
    opcode: Option<Opcode>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseState {
    /// Waiting for the first start marker
    WaitingForStart,
    /// Got 0xF0, waiting for 0xAA
    WaitingForMarker,
    /// Waiting for LENGTH
    WaitingForLength,
    /// Waiting for OPCODE
    WaitingForOpcode,
    /// Reading body bytes
    ReadingBody,
    /// Waiting for the end marker
    WaitingForEnd,
}

impl Default for FrameParser {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameParser {
    /// Create a new frame parser
    pub fn new() -> Self {
        Self {
            state: ParseState::WaitingForStart,
            body: Vec::new(),
            body_len: 0,
            opcode: None,
        }
    }

    /// Reset the parser state
    pub fn reset(&mut self) {
        self.state = ParseState::WaitingForStart;
        self.body.clear();
        self.body_len = 0;
        self.opcode = None;
    }

    /// Feed a single byte to the parser
    ///
    /// Returns `Ok(Some(frame))` when a complete valid frame is parsed,
    /// `Ok(None)` when more bytes are needed, or `Err` on parse error.
    /// After an error the parser is back to hunting for a start marker. If
    /// the offending byte is itself a start marker it counts as the start of
    /// the next frame.
    pub fn feed(&mut self, byte: u8) -> Result<Option<Frame>, FrameError> {
        match self.state {
            ParseState::WaitingForStart => {
                if byte == START_MARKER[0] {
                    self.state = ParseState::WaitingForMarker;
                }
                // Silently ignore anything else while hunting
                Ok(None)
            }
            ParseState::WaitingForMarker => {
                self.state = if byte == START_MARKER[1] {
                    ParseState::WaitingForLength
                } else if byte == START_MARKER[0] {
                    ParseState::WaitingForMarker
                } else {
                    ParseState::WaitingForStart
                };
                Ok(None)
            }
            ParseState::WaitingForLength => {
                let len = byte as usize;
                if !(HEADER_SIZE + TRAILER_SIZE..=MAX_FRAME_SIZE).contains(&len) {
                    return self.fail(byte, FrameError::InvalidLength);
                }
                self.body_len = len - HEADER_SIZE - TRAILER_SIZE;
                self.state = ParseState::WaitingForOpcode;
                Ok(None)
            }
            ParseState::WaitingForOpcode => {
                let opcode = match Opcode::try_from(byte) {
                    Ok(opcode) => opcode,
                    Err(e) => return self.fail(byte, e),
                };
                if opcode.frame_len() != HEADER_SIZE + self.body_len + TRAILER_SIZE {
                    return self.fail(byte, FrameError::InvalidLength);
                }
                self.opcode = Some(opcode);
                self.body.clear();
                self.state = if self.body_len == 0 {
                    ParseState::WaitingForEnd
                } else {
                    ParseState::ReadingBody
                };
                Ok(None)
            }
            ParseState::ReadingBody => {
                // Cannot overflow: body_len <= MAX_BODY_SIZE
                let _ = self.body.push(byte);
                if self.body.len() == self.body_len {
                    self.state = ParseState::WaitingForEnd;
                }
                Ok(None)
            }
            ParseState::WaitingForEnd => {
                let opcode = self.opcode;
                match opcode {
                    Some(opcode) if byte == END_MARKER => {
                        let result = Frame::from_body(opcode, &self.body).map(Some);
                        self.reset();
                        result
                    }
                    _ => self.fail(byte, FrameError::InvalidMarker),
                }
            }
        }
    }

    /// Drop the frame in progress, keeping `byte` if it starts the next one
    fn fail(&mut self, byte: u8, error: FrameError) -> Result<Option<Frame>, FrameError> {
        self.reset();
        if byte == START_MARKER[0] {
            self.state = ParseState::WaitingForMarker;
        }
        Err(error)
    }

    /// Feed multiple bytes to the parser
    ///
    /// Returns the first complete frame found, if any.
    /// Remaining bytes after a complete frame are not consumed.
    pub fn feed_bytes(&mut self, bytes: &[u8]) -> Result<Option<Frame>, FrameError> {
        for &byte in bytes {
            if let Some(frame) = self.feed(byte)? {
                return Ok(Some(frame));
            }
        }
        Ok(None)
    }

    /// Iterate over every frame in `bytes`
    ///
    /// Errors are yielded in place and parsing carries on with the
    /// following bytes.
    pub fn frames<'a>(&'a mut self, bytes: &'a [u8]) -> Frames<'a> {
        Frames {
            parser: self,
            bytes: bytes.iter(),
        }
    }
}

/// Iterator returned by [`FrameParser::frames`]
pub struct Frames<'a> {
    parser: &'a mut FrameParser,
    bytes: core::slice::Iter<'a, u8>,
}

impl Iterator for Frames<'_> {
    type Item = Result<Frame, FrameError>;

    fn next(&mut self) -> Option<Self::Item> {
        for &byte in self.bytes.by_ref() {
            match self.parser.feed(byte) {
                Ok(Some(frame)) => return Some(Ok(frame)),
                Ok(None) => {}
                Err(e) => return Some(Err(e)),
            }
        }
        None
    }
}
