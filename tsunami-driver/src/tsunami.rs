//! Tsunami WAV player driver (serial control)
//!
//! The Tsunami is a polyphonic WAV player with four stereo output buses,
//! controlled over a write-only serial link.
//!
//! # UART Protocol
//!
//! 57600 baud, 8N1. Every request is one fixed-size frame:
//! - Start markers: 0xF0 0xAA
//! - Total length (markers included)
//! - Opcode
//! - Body (track numbers, gains and times little-endian)
//! - End marker: 0x55
//!
//! The board never acknowledges, so every method here is fire-and-forget:
//! build the frame, write it once, return whatever the UART said.

use tsunami_hal::{UartConfig, UartTx};
use tsunami_protocol::{track_control_frame, Command, Frame, TrackAction, TrackFlags};

/// Tsunami driver
///
/// Owns the UART it writes to. Arguments are never validated: output
/// numbers are masked to 0-3 and everything else goes out as given.
pub struct Tsunami<U> {
    uart: U,
}

impl<U: UartTx> Tsunami<U> {
    /// Create a driver on an already constructed UART
    pub fn new(uart: U) -> Self {
        Self { uart }
    }

    /// Configure the UART for the Tsunami (57600 baud, 8N1)
    ///
    /// Call once before sending anything. This only asks the sink for the
    /// line settings: [`tsunami_hal::IoUart`] merely records the request,
    /// so a port behind it must already be open at 57600 8N1.
    pub fn start(&mut self) -> Result<(), U::Error> {
        let config = UartConfig::tsunami();
        self.uart.configure(&config)?;

        #[cfg(feature = "defmt")]
        defmt::debug!("Tsunami UART configured at {} baud", config.baudrate);

        Ok(())
    }

    /// Send any command
    pub fn send(&mut self, command: &Command) -> Result<(), U::Error> {
        self.write_frame(&command.to_frame())
    }

    /// Set the gain of an output bus
    pub fn master_gain(&mut self, out: u8, gain: i16) -> Result<(), U::Error> {
        self.send(&Command::MasterGain { output: out, gain })
    }

    /// Stop all other tracks and play `track` on `out`
    pub fn track_play_solo(&mut self, track: u16, out: u8, lock: bool) -> Result<(), U::Error> {
        self.track_control(track, TrackAction::PlaySolo, out, TrackFlags::with_lock(lock))
    }

    /// Play `track` on `out` alongside anything already playing
    pub fn track_play_poly(&mut self, track: u16, out: u8, lock: bool) -> Result<(), U::Error> {
        self.track_control(track, TrackAction::PlayPoly, out, TrackFlags::with_lock(lock))
    }

    /// Load `track` paused, ready for [`Tsunami::resume_all_in_sync`]
    pub fn track_load(&mut self, track: u16, out: u8, lock: bool) -> Result<(), U::Error> {
        self.track_control(track, TrackAction::Load, out, TrackFlags::with_lock(lock))
    }

    pub fn track_stop(&mut self, track: u16) -> Result<(), U::Error> {
        self.track_control(track, TrackAction::Stop, 0, TrackFlags::empty())
    }

    pub fn track_pause(&mut self, track: u16) -> Result<(), U::Error> {
        self.track_control(track, TrackAction::Pause, 0, TrackFlags::empty())
    }

    pub fn track_resume(&mut self, track: u16) -> Result<(), U::Error> {
        self.track_control(track, TrackAction::Resume, 0, TrackFlags::empty())
    }

    /// Turn looping on or off for a track
    pub fn track_loop(&mut self, track: u16, enable: bool) -> Result<(), U::Error> {
        self.track_control(track, TrackAction::looping(enable), 0, TrackFlags::empty())
    }

    /// Stop every playing track
    pub fn stop_all_tracks(&mut self) -> Result<(), U::Error> {
        self.send(&Command::StopAll)
    }

    /// Start every loaded or paused track on the same sample
    pub fn resume_all_in_sync(&mut self) -> Result<(), U::Error> {
        self.send(&Command::ResumeAllInSync)
    }

    /// Set a track's gain
    pub fn track_gain(&mut self, track: u16, gain: i16) -> Result<(), U::Error> {
        self.send(&Command::TrackGain { track, gain })
    }

    /// Ramp a track to `gain` over `time_ms`
    ///
    /// With `stop_at_end` the board stops the track once the ramp finishes,
    /// which makes a fade-out a single command.
    pub fn track_fade(
        &mut self,
        track: u16,
        gain: i16,
        time_ms: u16,
        stop_at_end: bool,
    ) -> Result<(), U::Error> {
        self.send(&Command::TrackFade {
            track,
            gain,
            time_ms,
            stop_at_end,
        })
    }

    /// Trim the playback rate of an output bus
    pub fn samplerate_offset(&mut self, out: u8, offset: i16) -> Result<(), U::Error> {
        self.send(&Command::SamplerateOffset {
            output: out,
            offset,
        })
    }

    /// Borrow the UART
    pub fn uart(&self) -> &U {
        &self.uart
    }

    /// Mutably borrow the UART
    pub fn uart_mut(&mut self) -> &mut U {
        &mut self.uart
    }

    /// Give back the UART
    pub fn release(self) -> U {
        self.uart
    }

    fn track_control(
        &mut self,
        track: u16,
        action: TrackAction,
        out: u8,
        flags: TrackFlags,
    ) -> Result<(), U::Error> {
        self.write_frame(&track_control_frame(track, action, out, flags))
    }

    fn write_frame(&mut self, frame: &Frame) -> Result<(), U::Error> {
        #[cfg(feature = "defmt")]
        defmt::trace!("Tsunami TX {=[u8]:x}", frame.as_bytes());

        self.uart.write_blocking(frame.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tsunami_hal::{BufferUart, BufferUartError, IoUart};
    use tsunami_protocol::{FrameParser, Opcode};

    type TestDriver = Tsunami<BufferUart<64>>;

    fn driver() -> TestDriver {
        Tsunami::new(BufferUart::new())
    }

    /// UART that rejects everything
    struct BrokenUart;

    #[derive(Debug, PartialEq, Eq)]
    struct LineDown;

    impl UartTx for BrokenUart {
        type Error = LineDown;

        fn configure(&mut self, _config: &UartConfig) -> Result<(), Self::Error> {
            Err(LineDown)
        }

        fn write_blocking(&mut self, _data: &[u8]) -> Result<(), Self::Error> {
            Err(LineDown)
        }

        fn flush(&mut self) -> Result<(), Self::Error> {
            Err(LineDown)
        }
    }

    #[test]
    fn test_start_configures_57600() {
        let mut tsunami = driver();
        tsunami.start().unwrap();

        let config = tsunami.uart().config().copied().unwrap();
        assert_eq!(config.baudrate, 57_600);
        assert!(tsunami.uart().written().is_empty());
    }

    #[test]
    fn test_start_on_io_port_records_request_only() {
        let mut port = [0u8; 8];
        let mut tsunami = Tsunami::new(IoUart::new(&mut port[..]));
        tsunami.start().unwrap();

        let requested = tsunami.uart().requested_config().copied().unwrap();
        assert_eq!(requested, UartConfig::tsunami());

        tsunami.stop_all_tracks().unwrap();
        drop(tsunami);
        assert_eq!(&port[..5], &[0xF0, 0xAA, 0x05, 0x04, 0x55]);
    }

    #[test]
    fn test_stop_all_tracks() {
        let mut tsunami = driver();
        tsunami.stop_all_tracks().unwrap();
        assert_eq!(tsunami.uart().written(), &[0xF0, 0xAA, 0x05, 0x04, 0x55]);
    }

    #[test]
    fn test_resume_all_in_sync() {
        let mut tsunami = driver();
        tsunami.resume_all_in_sync().unwrap();
        assert_eq!(tsunami.uart().written(), &[0xF0, 0xAA, 0x05, 0x0B, 0x55]);
    }

    #[test]
    fn test_master_gain() {
        let mut tsunami = driver();
        tsunami.master_gain(1, -10).unwrap();

        let [lo, hi] = (-10i16 as u16).to_le_bytes();
        assert_eq!(
            tsunami.uart().written(),
            &[0xF0, 0xAA, 0x08, 0x05, 0x01, lo, hi, 0x55]
        );
        assert_eq!((lo, hi), (0xF6, 0xFF));
    }

    #[test]
    fn test_track_play_solo() {
        let mut tsunami = driver();
        tsunami.track_play_solo(300, 2, true).unwrap();
        assert_eq!(
            tsunami.uart().written(),
            &[0xF0, 0xAA, 0x0A, 0x03, 0x00, 0x2C, 0x01, 0x02, 0x01, 0x55]
        );
    }

    #[test]
    fn test_play_poly_and_load_sub_codes() {
        let mut tsunami = driver();
        tsunami.track_play_poly(7, 1, false).unwrap();
        assert_eq!(
            tsunami.uart().written(),
            &[0xF0, 0xAA, 0x0A, 0x03, 0x01, 0x07, 0x00, 0x01, 0x00, 0x55]
        );

        tsunami.uart_mut().clear();
        tsunami.track_load(0x1234, 3, true).unwrap();
        assert_eq!(
            tsunami.uart().written(),
            &[0xF0, 0xAA, 0x0A, 0x03, 0x07, 0x34, 0x12, 0x03, 0x01, 0x55]
        );
    }

    #[test]
    fn test_stop_pause_resume_use_output_zero_and_no_flags() {
        type TrackOp = fn(&mut TestDriver, u16) -> Result<(), BufferUartError>;
        let cases: [(TrackOp, u8); 3] = [
            (Tsunami::track_stop, 4),
            (Tsunami::track_pause, 2),
            (Tsunami::track_resume, 3),
        ];

        for (op, sub_code) in cases {
            let mut tsunami = driver();
            op(&mut tsunami, 513).unwrap();
            assert_eq!(
                tsunami.uart().written(),
                &[0xF0, 0xAA, 0x0A, 0x03, sub_code, 0x01, 0x02, 0x00, 0x00, 0x55]
            );
        }
    }

    #[test]
    fn test_track_loop_differs_only_in_sub_code() {
        let mut on = driver();
        let mut off = driver();
        on.track_loop(42, true).unwrap();
        off.track_loop(42, false).unwrap();

        let on = on.uart().written();
        let off = off.uart().written();
        assert_eq!(on[4], 5);
        assert_eq!(off[4], 6);
        assert_eq!(on[..4], off[..4]);
        assert_eq!(on[5..], off[5..]);
    }

    #[test]
    fn test_track_gain() {
        let mut tsunami = driver();
        tsunami.track_gain(1000, -40).unwrap();
        assert_eq!(
            tsunami.uart().written(),
            &[0xF0, 0xAA, 0x09, 0x08, 0xE8, 0x03, 0xD8, 0xFF, 0x55]
        );
    }

    #[test]
    fn test_track_fade() {
        let mut tsunami = driver();
        tsunami.track_fade(5, 50, 2000, true).unwrap();

        let written = tsunami.uart().written();
        assert_eq!(written.len(), 12);
        assert_eq!(
            written,
            &[0xF0, 0xAA, 0x0C, 0x0A, 0x05, 0x00, 0x32, 0x00, 0xD0, 0x07, 0x01, 0x55]
        );
        assert_eq!(written[10], 1);
    }

    #[test]
    fn test_track_fade_without_stop() {
        let mut tsunami = driver();
        tsunami.track_fade(5, -70, 0, false).unwrap();
        assert_eq!(tsunami.uart().written()[10], 0);
    }

    #[test]
    fn test_samplerate_offset() {
        let mut tsunami = driver();
        tsunami.samplerate_offset(2, -32768).unwrap();
        assert_eq!(
            tsunami.uart().written(),
            &[0xF0, 0xAA, 0x08, 0x0C, 0x02, 0x00, 0x80, 0x55]
        );
    }

    #[test]
    fn test_out_of_range_outputs_wrap() {
        // Out-of-range outputs wrap instead of failing
        for (out, expected) in [(0u8, 0u8), (3, 3), (4, 0), (255, 3)] {
            let mut tsunami = driver();
            tsunami.master_gain(out, 0).unwrap();
            tsunami.track_play_poly(1, out, false).unwrap();
            tsunami.samplerate_offset(out, 0).unwrap();

            let written = tsunami.uart().written();
            assert_eq!(written[4], expected);
            assert_eq!(written[8 + 7], expected);
            assert_eq!(written[18 + 4], expected);
        }
    }

    #[test]
    fn test_one_write_per_operation() {
        let mut tsunami = Tsunami::new(BufferUart::<128>::new());
        tsunami.master_gain(0, 0).unwrap();
        tsunami.track_play_solo(1, 0, false).unwrap();
        tsunami.track_play_poly(1, 0, false).unwrap();
        tsunami.track_load(1, 0, false).unwrap();
        tsunami.track_stop(1).unwrap();
        tsunami.track_pause(1).unwrap();
        tsunami.track_resume(1).unwrap();
        tsunami.track_loop(1, true).unwrap();
        tsunami.stop_all_tracks().unwrap();
        tsunami.resume_all_in_sync().unwrap();
        tsunami.track_gain(1, 0).unwrap();
        tsunami.track_fade(1, 0, 0, false).unwrap();
        tsunami.samplerate_offset(0, 0).unwrap();

        assert_eq!(tsunami.uart().write_count(), 13);
        assert_eq!(tsunami.uart().flush_count(), 0);
    }

    #[test]
    fn test_every_frame_carries_its_length() {
        let mut tsunami = Tsunami::new(BufferUart::<128>::new());
        tsunami.master_gain(0, 0).unwrap();
        tsunami.track_play_solo(1, 0, true).unwrap();
        tsunami.stop_all_tracks().unwrap();
        tsunami.resume_all_in_sync().unwrap();
        tsunami.track_gain(1, 0).unwrap();
        tsunami.track_fade(1, 0, 0, true).unwrap();
        tsunami.samplerate_offset(0, 0).unwrap();

        let mut parser = FrameParser::new();
        let opcodes: heapless::Vec<Opcode, 8> = parser
            .frames(tsunami.uart().written())
            .map(|frame| {
                let frame = frame.unwrap();
                assert_eq!(frame.as_bytes()[2] as usize, frame.len());
                frame.opcode()
            })
            .collect();

        assert_eq!(
            opcodes.as_slice(),
            &[
                Opcode::MasterVolume,
                Opcode::TrackControl,
                Opcode::StopAll,
                Opcode::ResumeAllSync,
                Opcode::TrackVolume,
                Opcode::TrackFade,
                Opcode::SamplerateOffset,
            ]
        );
    }

    #[test]
    fn test_wire_decodes_back_to_commands() {
        let mut tsunami = driver();
        tsunami.track_load(10, 1, true).unwrap();
        tsunami.track_load(11, 2, true).unwrap();
        tsunami.resume_all_in_sync().unwrap();

        let mut parser = FrameParser::new();
        let commands: heapless::Vec<Command, 4> = parser
            .frames(tsunami.uart().written())
            .map(|frame| Command::from_frame(&frame.unwrap()).unwrap())
            .collect();

        assert_eq!(
            commands.as_slice(),
            &[
                Command::TrackControl {
                    track: 10,
                    action: TrackAction::Load,
                    output: 1,
                    flags: TrackFlags::with_lock(true),
                },
                Command::TrackControl {
                    track: 11,
                    action: TrackAction::Load,
                    output: 2,
                    flags: TrackFlags::with_lock(true),
                },
                Command::ResumeAllInSync,
            ]
        );
    }

    #[test]
    fn test_uart_errors_propagate_unchanged() {
        let mut tsunami = Tsunami::new(BrokenUart);
        assert_eq!(tsunami.start(), Err(LineDown));
        assert_eq!(tsunami.stop_all_tracks(), Err(LineDown));
        assert_eq!(tsunami.track_play_solo(1, 0, false), Err(LineDown));
        assert_eq!(tsunami.track_fade(1, 0, 100, true), Err(LineDown));
    }

    #[test]
    fn test_full_buffer_is_reported() {
        let mut tsunami = Tsunami::new(BufferUart::<8>::new());
        tsunami.stop_all_tracks().unwrap();
        assert_eq!(
            tsunami.track_play_solo(1, 0, false),
            Err(BufferUartError::Overflow)
        );
        // Nothing partial reached the line
        assert_eq!(tsunami.uart().written().len(), 5);
    }

    #[test]
    fn test_works_over_borrowed_uart() {
        let mut uart = BufferUart::<16>::new();
        {
            let mut tsunami = Tsunami::new(&mut uart);
            tsunami.start().unwrap();
            tsunami.stop_all_tracks().unwrap();
        }
        assert_eq!(uart.written(), &[0xF0, 0xAA, 0x05, 0x04, 0x55]);

        let uart = Tsunami::new(uart).release();
        assert_eq!(uart.write_count(), 1);
    }
}
