//! Host bus attachment

/// The host machine's I/O port space, as far as the bridge needs to know it
pub trait PortBus {
    /// Returns true if another device already answers on `port`
    fn is_claimed(&self, port: u8) -> bool;
}

impl<F> PortBus for F
where
    F: Fn(u8) -> bool,
{
    fn is_claimed(&self, port: u8) -> bool {
        self(port)
    }
}
