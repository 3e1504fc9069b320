//! Register bridge runtime
//!
//! The [`Bridge`] owns one [`ProtocolEngine`] and everything around it: the
//! deferred write queue, in-flight text lookups and the collaborators that
//! carry out engine actions.
//!
//! Host-facing calls never block. CMD/ARG writes are queued and applied by
//! [`Bridge::process_pending`] or by the [`Bridge::run`] loop; reads and
//! input events act on the engine immediately.

use core::cell::RefCell;
use core::future::poll_fn;
use core::task::{Context, Poll};
use std::rc::Rc;

use embassy_futures::select::{select, Either};
use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::signal::Signal;
use log::{debug, info, trace, warn};

use shortwire_core::config::BridgeConfig;
use shortwire_core::traits::{PlaybackHooks, TextProvider};
use shortwire_core::{Action, ProtocolEngine, RequestOutcome};
use shortwire_protocol::{Command, Status, SwipeDirection};

use crate::hooks::{EchoTextProvider, LogPlayback};
use crate::input::{MotionThrottle, Swipe, SwipeTracker};
use crate::ports::PortBus;
use crate::requests::{Completion, InFlight};
use crate::tasks::{RegisterWrite, TaskQueue};

/// Playback hooks shared between the bridge and a running hook call
type SharedPlayback = Rc<RefCell<dyn PlaybackHooks>>;

/// Short Protocol v1 bridge
///
/// Single-threaded: collaborators are neither `Send` nor `Sync`, so state
/// sits behind [`NoopRawMutex`] cells.
pub struct Bridge {
    config: BridgeConfig,
    engine: Mutex<NoopRawMutex, RefCell<ProtocolEngine>>,
    tasks: Mutex<NoopRawMutex, RefCell<TaskQueue>>,
    /// Raised when there is a queued write or a new lookup to poll
    wake: Signal<NoopRawMutex, ()>,
    in_flight: Mutex<NoopRawMutex, RefCell<InFlight>>,
    playback: Mutex<NoopRawMutex, RefCell<SharedPlayback>>,
    text: Mutex<NoopRawMutex, RefCell<Rc<dyn TextProvider>>>,
    swipes: Mutex<NoopRawMutex, RefCell<SwipeTracker>>,
    motion: Mutex<NoopRawMutex, RefCell<MotionThrottle>>,
}

impl Bridge {
    /// Create a bridge with the logging playback hooks and the echo text
    /// provider
    pub fn new(config: BridgeConfig) -> Self {
        Self::with_collaborators(config, LogPlayback, EchoTextProvider)
    }

    /// Create a bridge with the given collaborators
    ///
    /// A ring capacity below
    /// [`MIN_RING_CAPACITY`](shortwire_core::config::MIN_RING_CAPACITY) is
    /// raised to it.
    pub fn with_collaborators(
        config: BridgeConfig,
        playback: impl PlaybackHooks + 'static,
        text: impl TextProvider + 'static,
    ) -> Self {
        info!(
            "Bridge attached: CMD {:#04x} ARG {:#04x} STATUS {:#04x} DATA {:#04x}, {} byte ring",
            config.ports.cmd,
            config.ports.arg,
            config.ports.status,
            config.ports.data,
            config.ring_capacity
        );

        let playback: SharedPlayback = Rc::new(RefCell::new(playback));
        let text: Rc<dyn TextProvider> = Rc::new(text);
        Self {
            engine: Mutex::new(RefCell::new(ProtocolEngine::new(config.ring_capacity))),
            tasks: Mutex::new(RefCell::new(TaskQueue::default())),
            wake: Signal::new(),
            in_flight: Mutex::new(RefCell::new(InFlight::default())),
            playback: Mutex::new(RefCell::new(playback)),
            text: Mutex::new(RefCell::new(text)),
            swipes: Mutex::new(RefCell::new(SwipeTracker::new(&config.input))),
            motion: Mutex::new(RefCell::new(MotionThrottle::new(&config.input))),
            config,
        }
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    // ========== Registers ==========

    /// Host write to CMD (deferred)
    pub fn write_command(&self, value: u8) {
        self.defer(RegisterWrite::Command(value));
    }

    /// Host write to ARG (deferred)
    pub fn write_argument(&self, value: u8) {
        self.defer(RegisterWrite::Argument(value));
    }

    /// Current STATUS value
    pub fn status(&self) -> Status {
        self.with_engine(|engine| engine.status())
    }

    /// Host read of STATUS
    pub fn read_status(&self) -> u8 {
        self.status().bits()
    }

    /// Host read of DATA
    pub fn read_data(&self) -> u8 {
        self.with_engine(|engine| engine.read_data())
    }

    /// Route a host bus write; returns false if `port` is not a bridge
    /// write register
    pub fn port_write(&self, port: u8, value: u8) -> bool {
        let ports = self.config.ports;
        if port == ports.cmd {
            self.write_command(value);
        } else if port == ports.arg {
            self.write_argument(value);
        } else {
            return false;
        }
        true
    }

    /// Route a host bus read; returns `None` if `port` is not a bridge read
    /// register
    pub fn port_read(&self, port: u8) -> Option<u8> {
        let ports = self.config.ports;
        if port == ports.status {
            Some(self.read_status())
        } else if port == ports.data {
            Some(self.read_data())
        } else {
            None
        }
    }

    /// Report bridge ports another device on `bus` already answers on
    pub fn check_ports(&self, bus: &impl PortBus) -> Vec<u8> {
        let conflicts: Vec<u8> = self
            .config
            .ports
            .ports()
            .into_iter()
            .filter(|&port| bus.is_claimed(port))
            .collect();
        for port in &conflicts {
            warn!("Port {:#04x} is already in use on the host bus", port);
        }
        conflicts
    }

    // ========== Runtime ==========

    /// Writes queued but not yet applied
    pub fn pending_writes(&self) -> usize {
        self.tasks.lock(|tasks| tasks.borrow().len())
    }

    /// Text lookups whose provider future has not resolved, stale ones
    /// included
    pub fn in_flight(&self) -> usize {
        self.in_flight.lock(|requests| requests.borrow().len())
    }

    /// Apply every queued register write in order, returning how many ran
    pub fn process_pending(&self) -> usize {
        let mut handled = 0;
        while let Some(write) = self.tasks.lock(|tasks| tasks.borrow_mut().pop()) {
            self.apply_write(write);
            handled += 1;
        }
        handled
    }

    /// Drive the bridge: apply queued writes and deliver text lookups as
    /// they resolve. Never returns.
    pub async fn run(&self) {
        info!("Bridge runtime started");

        loop {
            self.process_pending();

            match select(self.wake.wait(), poll_fn(|cx| self.poll_requests(cx))).await {
                Either::First(()) => {}
                Either::Second(done) => {
                    for completion in done {
                        self.apply_completion(completion);
                    }
                }
            }
        }
    }

    fn defer(&self, write: RegisterWrite) {
        trace!("Queued {:?}", write);
        self.tasks.lock(|tasks| tasks.borrow_mut().push(write));
        self.wake.signal(());
    }

    fn apply_write(&self, write: RegisterWrite) {
        let action = self.with_engine(|engine| match write {
            RegisterWrite::Command(value) => {
                match Command::from_byte(value) {
                    Some(cmd) => debug!("Command {:?}", cmd),
                    None => warn!("Rejected unknown command {:#04x}", value),
                }
                engine.on_command_write(value)
            }
            RegisterWrite::Argument(value) => {
                if !engine.state().is_awaiting_arg() {
                    warn!("Rejected argument {:#04x}: no command pending", value);
                }
                engine.on_arg_write(value)
            }
        });
        self.dispatch(action);
    }

    /// Carry out an engine action; the engine is not borrowed here
    fn dispatch(&self, action: Action) {
        match action {
            Action::None => {}
            Action::Play(track) => self.playback().borrow_mut().play(track),
            Action::Stop => self.playback().borrow_mut().stop(),
            Action::SetVolume(level) => self.playback().borrow_mut().set_volume(level),
            Action::FetchText(ticket) => {
                debug!("Text request {} started", ticket.id);
                let provider = self.text.lock(|text| text.borrow().clone());
                let future = provider.fetch(ticket.id);
                self.in_flight
                    .lock(|requests| requests.borrow_mut().push(ticket, future));
                // Get the new future polled
                self.wake.signal(());
            }
        }
    }

    /// Current hooks, detached from the bridge's cell so a hook may call
    /// [`Bridge::set_playback`]
    fn playback(&self) -> SharedPlayback {
        self.playback.lock(|hooks| hooks.borrow().clone())
    }

    fn poll_requests(&self, cx: &mut Context<'_>) -> Poll<Vec<Completion>> {
        // Poll outside the lock so providers may call back into the bridge
        let mut batch = self.in_flight.lock(|requests| requests.borrow_mut().take());
        let done = batch.poll_completions(cx);
        self.in_flight
            .lock(|requests| requests.borrow_mut().restore(batch));

        if done.is_empty() {
            Poll::Pending
        } else {
            Poll::Ready(done)
        }
    }

    fn apply_completion(&self, completion: Completion) {
        let Completion { ticket, result } = completion;
        let failure = result.as_ref().err().copied();
        let outcome = self.with_engine(|engine| {
            engine.complete_request(ticket, result.as_deref().map_err(|e| *e))
        });

        match (outcome, failure) {
            (RequestOutcome::Delivered, _) => {
                debug!("Text request {} delivered", ticket.id);
            }
            (RequestOutcome::Failed, Some(e)) => {
                warn!("Text request {} failed: {}", ticket.id, e);
            }
            (RequestOutcome::Failed, None) => {
                warn!("Text for request {} did not fit the ring", ticket.id);
            }
            (RequestOutcome::Stale, _) => {
                trace!("Dropped stale result for text request {}", ticket.id);
            }
        }
    }

    fn with_engine<R>(&self, f: impl FnOnce(&mut ProtocolEngine) -> R) -> R {
        self.engine.lock(|engine| f(&mut engine.borrow_mut()))
    }

    // ========== Application API ==========

    /// Clear all queued data, flags and in-flight requests now
    ///
    /// Writes already queued are still applied afterwards.
    pub fn reset(&self) {
        debug!("Reset");
        self.with_engine(|engine| engine.reset());
    }

    /// Replace the playback hooks
    pub fn set_playback(&self, playback: impl PlaybackHooks + 'static) {
        let playback: SharedPlayback = Rc::new(RefCell::new(playback));
        self.playback.lock(|hooks| *hooks.borrow_mut() = playback);
    }

    /// Replace the text provider
    ///
    /// Lookups already in flight finish with the provider that started them.
    pub fn set_text_provider(&self, provider: impl TextProvider + 'static) {
        let provider: Rc<dyn TextProvider> = Rc::new(provider);
        self.text.lock(|text| *text.borrow_mut() = provider);
    }

    /// Queue a swipe event; only the two low bits of `direction` are used
    pub fn feed_swipe(&self, direction: u8, strength: f32) {
        let direction = SwipeDirection::from_bits(direction);
        if let Err(e) = self.with_engine(|engine| engine.push_swipe(direction, strength)) {
            warn!("Swipe event dropped: {}", e);
        }
    }

    /// Queue an acceleration event
    pub fn feed_acceleration(&self, x: f32, y: f32, z: f32) {
        if let Err(e) = self.with_engine(|engine| engine.push_acceleration(x, y, z)) {
            warn!("Acceleration event dropped: {}", e);
        }
    }

    /// Pointer pressed at `(x, y)`
    pub fn pointer_down(&self, x: f32, y: f32, at_ms: u64) {
        self.swipes.lock(|swipes| swipes.borrow_mut().press(x, y, at_ms));
    }

    /// Pointer released at `(x, y)`; queues and returns the swipe, if any
    pub fn pointer_up(&self, x: f32, y: f32, at_ms: u64) -> Option<Swipe> {
        let swipe = self
            .swipes
            .lock(|swipes| swipes.borrow_mut().release(x, y, at_ms))?;
        self.feed_swipe(swipe.direction.to_byte(), f32::from(swipe.strength));
        Some(swipe)
    }

    /// Accelerometer sample; returns false if throttled away
    pub fn feed_motion(&self, x: f32, y: f32, z: f32, at_ms: u64) -> bool {
        if !self.motion.lock(|motion| motion.borrow_mut().admit(at_ms)) {
            return false;
        }
        self.feed_acceleration(x, y, z);
        true
    }
}
