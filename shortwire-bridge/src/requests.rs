//! In-flight text lookups

use std::future::Future;
use std::task::{Context, Poll};

use shortwire_core::traits::{TextError, TextFuture};
use shortwire_core::RequestTicket;

/// A finished lookup, not yet applied to the engine
pub(crate) struct Completion {
    pub ticket: RequestTicket,
    pub result: Result<String, TextError>,
}

struct InFlightRequest {
    ticket: RequestTicket,
    future: TextFuture,
}

/// Provider futures that have not resolved yet
///
/// Superseded lookups stay here until they resolve; the engine drops their
/// result.
#[derive(Default)]
pub(crate) struct InFlight {
    requests: Vec<InFlightRequest>,
}

impl InFlight {
    pub fn push(&mut self, ticket: RequestTicket, future: TextFuture) {
        self.requests.push(InFlightRequest { ticket, future });
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }

    /// Move every request out, leaving this set empty
    pub fn take(&mut self) -> InFlight {
        std::mem::take(self)
    }

    /// Put back requests taken with [`InFlight::take`], ahead of any added since
    pub fn restore(&mut self, mut earlier: InFlight) {
        earlier.requests.append(&mut self.requests);
        self.requests = earlier.requests;
    }

    /// Poll every request once, returning those that resolved in start order
    pub fn poll_completions(&mut self, cx: &mut Context<'_>) -> Vec<Completion> {
        let mut done = Vec::new();
        self.requests
            .retain_mut(|request| match request.future.as_mut().poll(cx) {
                Poll::Ready(result) => {
                    done.push(Completion {
                        ticket: request.ticket,
                        result,
                    });
                    false
                }
                Poll::Pending => true,
            });
        done
    }
}
