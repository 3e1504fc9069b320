//! Short Protocol v1 engine
//!
//! Register semantics:
//! - CMD write: argument-taking commands wait for ARG; `Stop` and `Reset`
//!   run immediately; anything else queues `[BAD_REQ, cmd]`
//! - ARG write: completes the pending command, or queues `[BAD_REQ, value]`
//!   if none is pending
//! - STATUS read: see [`Status`]
//! - DATA read: next byte of the record stream

use heapless::Vec;

use shortwire_protocol::{
    acceleration_payload, swipe_payload, Command, ErrorCode, RecordType, Status, SwipeDirection,
    MAX_PAYLOAD_SIZE,
};

use super::state::{Action, EngineState};
use crate::buffer::{PacketQueue, QueueError};
use crate::config::MIN_RING_CAPACITY;
use crate::request::{RequestOutcome, RequestTicket, RequestTracker};
use crate::traits::TextError;

/// Register-level protocol engine
#[derive(Debug, Clone)]
pub struct ProtocolEngine {
    queue: PacketQueue,
    state: EngineState,
    requests: RequestTracker,
    /// Sticky until reset
    error: bool,
}

impl ProtocolEngine {
    /// Create an engine whose DATA stream is backed by a ring of
    /// `ring_capacity` bytes, raised to [`MIN_RING_CAPACITY`] so every
    /// event and error record fits
    pub fn new(ring_capacity: usize) -> Self {
        Self {
            queue: PacketQueue::new(ring_capacity.max(MIN_RING_CAPACITY)),
            state: EngineState::Idle,
            requests: RequestTracker::new(),
            error: false,
        }
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn queue(&self) -> &PacketQueue {
        &self.queue
    }

    pub fn is_busy(&self) -> bool {
        self.requests.is_busy()
    }

    pub fn has_error(&self) -> bool {
        self.error
    }

    /// Current request generation (bumped by every request and reset)
    pub fn generation(&self) -> u32 {
        self.requests.generation()
    }

    /// Handle a write to the CMD register
    pub fn on_command_write(&mut self, value: u8) -> Action {
        match Command::from_byte(value) {
            Some(cmd) if cmd.takes_argument() => {
                self.state = EngineState::AwaitingArg(cmd);
                Action::None
            }
            Some(Command::Reset) => {
                self.reset();
                Action::None
            }
            Some(_) => {
                // Only Stop is left
                self.state = EngineState::Idle;
                Action::Stop
            }
            None => {
                self.state = EngineState::Idle;
                self.push_error(ErrorCode::BadRequest, Some(value));
                Action::None
            }
        }
    }

    /// Handle a write to the ARG register
    pub fn on_arg_write(&mut self, value: u8) -> Action {
        let EngineState::AwaitingArg(cmd) = self.state else {
            self.push_error(ErrorCode::BadRequest, Some(value));
            return Action::None;
        };

        // Back to Idle before the side effect runs
        self.state = EngineState::Idle;

        match cmd {
            Command::Play => Action::Play(value),
            Command::SetVolume => Action::SetVolume(value),
            Command::RequestText => Action::FetchText(self.requests.begin(value)),
            Command::Stop | Command::Reset => {
                // Never stored as pending
                self.push_error(ErrorCode::BadRequest, Some(cmd.to_byte()));
                Action::None
            }
        }
    }

    /// Value of the STATUS register
    pub fn status(&self) -> Status {
        Status::idle()
            .with(Status::RX_READY, !self.queue.is_empty())
            .with(Status::EV_READY, self.queue.has_event())
            .with(Status::BUSY, self.requests.is_busy())
            .with(Status::ERROR, self.error)
    }

    /// Read the DATA register
    pub fn read_data(&mut self) -> u8 {
        self.queue.read_byte()
    }

    /// Drop all queued data, the pending command, both flags and every
    /// in-flight request
    pub fn reset(&mut self) {
        self.queue.clear();
        self.state = EngineState::Idle;
        self.requests.invalidate();
        self.error = false;
    }

    /// Queue an error record and raise the sticky ERROR flag
    pub fn push_error(&mut self, code: ErrorCode, context: Option<u8>) {
        let mut payload = Vec::<u8, 2>::new();
        // Capacity 2 always suffices
        let _ = payload.push(code.to_byte());
        if let Some(context) = context {
            let _ = payload.push(context);
        }
        self.error = true;
        // Always fits: the ring holds at least MIN_RING_CAPACITY bytes
        let _ = self.queue.enqueue(RecordType::Error, &payload);
    }

    /// Queue a swipe event record
    pub fn push_swipe(&mut self, direction: SwipeDirection, strength: f32) -> Result<(), QueueError> {
        self.queue
            .enqueue(RecordType::Swipe, &swipe_payload(direction, strength))
    }

    /// Queue an acceleration event record
    pub fn push_acceleration(&mut self, x: f32, y: f32, z: f32) -> Result<(), QueueError> {
        self.queue
            .enqueue(RecordType::Acceleration, &acceleration_payload(x, y, z))
    }

    /// Apply the result of a text lookup started by [`Action::FetchText`]
    ///
    /// Results for superseded tickets are dropped without touching any flag.
    /// Text is cut at the byte level to 255 bytes, or less when the ring
    /// could not hold the whole record.
    pub fn complete_request(
        &mut self,
        ticket: RequestTicket,
        result: Result<&str, TextError>,
    ) -> RequestOutcome {
        if !self.requests.finish(&ticket) {
            return RequestOutcome::Stale;
        }

        match result {
            Ok(text) => {
                let bytes = text.as_bytes();
                let limit = MAX_PAYLOAD_SIZE.min(self.queue.capacity() - 2);
                let capped = &bytes[..bytes.len().min(limit)];
                match self.queue.enqueue(RecordType::Text, capped) {
                    Ok(()) => RequestOutcome::Delivered,
                    Err(_) => {
                        self.push_error(ErrorCode::Busy, Some(ticket.id));
                        RequestOutcome::Failed
                    }
                }
            }
            Err(_) => {
                self.push_error(ErrorCode::Busy, Some(ticket.id));
                RequestOutcome::Failed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec as StdVec;
    use shortwire_protocol::EMPTY_READ;

    const REQ_TEXT: u8 = 0x30;
    const PLAY: u8 = 0x20;
    const VOLUME: u8 = 0x22;
    const STOP: u8 = 0x21;
    const RESET: u8 = 0x3F;

    fn drain(engine: &mut ProtocolEngine) -> StdVec<u8> {
        let mut out = StdVec::new();
        while engine.status().contains(Status::RX_READY) {
            out.push(engine.read_data());
        }
        out
    }

    #[test]
    fn test_initial_status() {
        let engine = ProtocolEngine::new(2048);
        assert_eq!(engine.status().bits(), 0x82);
        assert_eq!(engine.state(), EngineState::Idle);
    }

    #[test]
    fn test_play_waits_for_argument() {
        let mut engine = ProtocolEngine::new(64);
        assert_eq!(engine.on_command_write(PLAY), Action::None);
        assert_eq!(engine.state(), EngineState::AwaitingArg(Command::Play));

        assert_eq!(engine.on_arg_write(3), Action::Play(3));
        assert_eq!(engine.state(), EngineState::Idle);
        assert!(!engine.status().contains(Status::RX_READY));
    }

    #[test]
    fn test_volume() {
        let mut engine = ProtocolEngine::new(64);
        engine.on_command_write(VOLUME);
        assert_eq!(engine.on_arg_write(200), Action::SetVolume(200));
    }

    #[test]
    fn test_stop_runs_immediately() {
        let mut engine = ProtocolEngine::new(64);
        assert_eq!(engine.on_command_write(STOP), Action::Stop);
        assert_eq!(engine.state(), EngineState::Idle);
    }

    #[test]
    fn test_stop_cancels_pending_argument() {
        let mut engine = ProtocolEngine::new(64);
        engine.on_command_write(PLAY);
        assert_eq!(engine.on_command_write(STOP), Action::Stop);

        // The argument now has no command to attach to
        assert_eq!(engine.on_arg_write(1), Action::None);
        assert_eq!(drain(&mut engine), [0x7E, 2, 5, 1]);
    }

    #[test]
    fn test_command_code_as_argument() {
        let mut engine = ProtocolEngine::new(64);
        engine.on_command_write(PLAY);
        assert_eq!(engine.on_arg_write(RESET), Action::Play(RESET));
        assert_eq!(engine.on_arg_write(STOP), Action::None);
        assert!(engine.has_error());
    }

    #[test]
    fn test_unknown_command() {
        let mut engine = ProtocolEngine::new(64);
        assert_eq!(engine.on_command_write(0x99), Action::None);

        let status = engine.status();
        assert!(status.contains(Status::ERROR));
        assert!(status.contains(Status::RX_READY));
        assert!(!status.contains(Status::EV_READY));
        assert_eq!(drain(&mut engine), [0x7E, 2, 5, 0x99]);
    }

    #[test]
    fn test_error_is_sticky() {
        let mut engine = ProtocolEngine::new(64);
        engine.on_arg_write(42);
        drain(&mut engine);

        for _ in 0..10 {
            assert!(engine.status().contains(Status::ERROR));
        }
        engine.on_command_write(RESET);
        assert!(!engine.status().contains(Status::ERROR));
    }

    #[test]
    fn test_swipe_event_bytes() {
        let mut engine = ProtocolEngine::new(64);
        engine.push_swipe(SwipeDirection::Right, 200.0).unwrap();
        assert!(engine.status().contains(Status::EV_READY));

        assert_eq!(engine.read_data(), 0x01);
        assert_eq!(engine.read_data(), 0x02);
        assert_eq!(engine.read_data(), 0x01);
        assert_eq!(engine.read_data(), 0xC8);
        assert!(!engine.status().contains(Status::EV_READY));
        assert_eq!(engine.read_data(), EMPTY_READ);
    }

    #[test]
    fn test_acceleration_event_bytes() {
        let mut engine = ProtocolEngine::new(64);
        engine.push_acceleration(-1.0, 0.0, 300.0).unwrap();
        assert_eq!(drain(&mut engine), [0x02, 3, 127, 128, 255]);
    }

    #[test]
    fn test_text_request_lifecycle() {
        let mut engine = ProtocolEngine::new(64);
        engine.on_command_write(REQ_TEXT);
        let Action::FetchText(ticket) = engine.on_arg_write(7) else {
            panic!("expected a text request");
        };
        assert_eq!(ticket.id, 7);
        assert!(engine.status().contains(Status::BUSY));

        let outcome = engine.complete_request(ticket, Ok("hi"));
        assert_eq!(outcome, RequestOutcome::Delivered);
        assert!(!engine.status().contains(Status::BUSY));
        assert_eq!(drain(&mut engine), [0x10, 2, b'h', b'i']);
    }

    #[test]
    fn test_text_is_capped() {
        let mut engine = ProtocolEngine::new(2048);
        engine.on_command_write(REQ_TEXT);
        let Action::FetchText(ticket) = engine.on_arg_write(1) else {
            panic!("expected a text request");
        };
        let long = "x".repeat(300);
        engine.complete_request(ticket, Ok(&long));

        let bytes = drain(&mut engine);
        assert_eq!(bytes[0], 0x10);
        assert_eq!(bytes[1], 255);
        assert_eq!(bytes.len(), 257);
    }

    #[test]
    fn test_request_failure_reports_busy_code() {
        let mut engine = ProtocolEngine::new(64);
        engine.on_command_write(REQ_TEXT);
        let Action::FetchText(ticket) = engine.on_arg_write(9) else {
            panic!("expected a text request");
        };

        let outcome = engine
            .complete_request(ticket, Err(TextError::NotFound));
        assert_eq!(outcome, RequestOutcome::Failed);

        let status = engine.status();
        assert!(!status.contains(Status::BUSY));
        assert!(status.contains(Status::ERROR));
        assert_eq!(drain(&mut engine), [0x7E, 2, 4, 9]);
    }

    #[test]
    fn test_reset_discards_in_flight_result() {
        let mut engine = ProtocolEngine::new(64);
        engine.on_command_write(REQ_TEXT);
        let Action::FetchText(ticket) = engine.on_arg_write(7) else {
            panic!("expected a text request");
        };
        engine.on_command_write(RESET);
        assert!(!engine.status().contains(Status::BUSY));

        let outcome = engine.complete_request(ticket, Ok("late"));
        assert_eq!(outcome, RequestOutcome::Stale);
        assert!(drain(&mut engine).is_empty());

        // A stale failure leaves the error flag alone as well
        let outcome = engine
            .complete_request(ticket, Err(TextError::Network));
        assert_eq!(outcome, RequestOutcome::Stale);
        assert!(!engine.has_error());
    }

    #[test]
    fn test_superseded_request() {
        let mut engine = ProtocolEngine::new(64);
        engine.on_command_write(REQ_TEXT);
        let Action::FetchText(first) = engine.on_arg_write(1) else {
            panic!("expected a text request");
        };
        engine.on_command_write(REQ_TEXT);
        let Action::FetchText(second) = engine.on_arg_write(2) else {
            panic!("expected a text request");
        };

        // Old result arrives first and must not clear BUSY
        assert_eq!(
            engine.complete_request(first, Ok("old")),
            RequestOutcome::Stale
        );
        assert!(engine.is_busy());

        engine.complete_request(second, Ok("new"));
        assert!(!engine.is_busy());
        assert_eq!(drain(&mut engine), [0x10, 3, b'n', b'e', b'w']);
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut engine = ProtocolEngine::new(64);
        engine.push_swipe(SwipeDirection::Up, 10.0).unwrap();
        engine.on_command_write(0x00);
        engine.on_command_write(VOLUME);
        let before = engine.generation();

        engine.reset();
        assert_eq!(engine.status(), Status::idle());
        assert_eq!(engine.state(), EngineState::Idle);
        assert!(engine.generation() > before);
        assert_eq!(engine.read_data(), EMPTY_READ);
    }

    #[test]
    fn test_small_ring_still_delivers_text() {
        let mut engine = ProtocolEngine::new(16);
        engine.on_command_write(REQ_TEXT);
        let Action::FetchText(ticket) = engine.on_arg_write(7) else {
            panic!("expected a text request");
        };

        let outcome = engine.complete_request(ticket, Ok("twenty bytes of text"));
        assert_eq!(outcome, RequestOutcome::Delivered);
        assert!(!engine.status().contains(Status::BUSY));
        assert!(!engine.status().contains(Status::ERROR));

        // Cut to the 14 bytes that fit next to the header
        let bytes = drain(&mut engine);
        assert_eq!(bytes.len(), 16);
        assert_eq!(&bytes[..2], [0x10, 14]);
        assert_eq!(&bytes[2..], b"twenty bytes o");
    }

    #[test]
    fn test_tiny_ring_is_raised_to_minimum() {
        let mut engine = ProtocolEngine::new(3);
        assert_eq!(engine.queue().capacity(), MIN_RING_CAPACITY);

        engine.on_command_write(0x99);
        let status = engine.status();
        assert!(status.contains(Status::ERROR));
        assert!(status.contains(Status::RX_READY));
        assert_eq!(drain(&mut engine), [0x7E, 2, 5, 0x99]);

        // Largest event record fits too
        engine.push_acceleration(0.0, 0.0, 0.0).unwrap();
        assert_eq!(drain(&mut engine), [0x02, 3, 128, 128, 128]);
    }
}
