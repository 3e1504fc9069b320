//! Generation tracking for asynchronous text requests
//!
//! A request captures the generation current when it starts. Any later
//! request or reset bumps the generation, which turns every older ticket
//! stale. Stale completions are discarded without touching flags.

/// Handle for one in-flight request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RequestTicket {
    /// Request id written by the host
    pub id: u8,
    generation: u32,
}

impl RequestTicket {
    /// Generation this request was started in
    pub fn generation(&self) -> u32 {
        self.generation
    }
}

/// How a completion was applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RequestOutcome {
    /// Text record queued
    Delivered,
    /// Error record queued
    Failed,
    /// Superseded by a newer request or a reset; nothing happened
    Stale,
}

/// Tracks the request generation and the busy flag
#[derive(Debug, Clone, Default)]
pub struct RequestTracker {
    generation: u32,
    busy: bool,
}

impl RequestTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new request, superseding any in-flight one
    pub fn begin(&mut self, id: u8) -> RequestTicket {
        self.generation = self.generation.wrapping_add(1);
        self.busy = true;
        RequestTicket {
            id,
            generation: self.generation,
        }
    }

    /// True if no request or reset happened since `ticket` was issued
    pub fn is_current(&self, ticket: &RequestTicket) -> bool {
        ticket.generation == self.generation
    }

    /// Clear the busy flag if `ticket` is still current
    ///
    /// Returns false for stale tickets; the newer operation owns the flag.
    pub fn finish(&mut self, ticket: &RequestTicket) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.busy = false;
        true
    }

    /// Invalidate every outstanding ticket and clear the busy flag
    pub fn invalidate(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.busy = false;
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }
}
