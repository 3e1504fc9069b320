//! Asynchronous text lookup

use alloc::boxed::Box;
use alloc::string::String;
use core::future::Future;
use core::pin::Pin;

/// Reasons a text lookup can fail
///
/// The wire protocol reports every failure as `ErrorCode::Busy`; the kind
/// is kept for logging on the bridge side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TextError {
    /// Lookup did not finish in time
    Timeout,
    /// Backend unreachable
    Network,
    /// No text for this id
    NotFound,
    /// Any other failure
    Failed,
}

impl core::fmt::Display for TextError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            TextError::Timeout => write!(f, "text lookup timed out"),
            TextError::Network => write!(f, "text backend unreachable"),
            TextError::NotFound => write!(f, "no text for request id"),
            TextError::Failed => write!(f, "text lookup failed"),
        }
    }
}

/// Future returned by a [`TextProvider`]
///
/// Owns everything it needs, so replacing the provider does not affect
/// lookups already in flight.
pub type TextFuture = Pin<Box<dyn Future<Output = Result<String, TextError>>>>;

/// Trait for the service answering `RequestText` commands
///
/// There is no timeout around the returned future. A provider that may hang
/// should race its own timer and resolve with [`TextError::Timeout`].
pub trait TextProvider {
    /// Start looking up the text for `id`
    fn fetch(&self, id: u8) -> TextFuture;
}

// Blanket implementation for async closures: `|id| async move { ... }`
impl<F, Fut> TextProvider for F
where
    F: Fn(u8) -> Fut,
    Fut: Future<Output = Result<String, TextError>> + 'static,
{
    fn fetch(&self, id: u8) -> TextFuture {
        Box::pin(self(id))
    }
}
