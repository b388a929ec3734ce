use std::net::SocketAddr;

use rosc::OscMessage;

/// A decoded OSC message paired with the address it arrived from.
///
/// Created once by the receive loop, consumed by exactly one dispatch or poll
/// event, then discarded.
#[derive(Debug, Clone, PartialEq)]
pub struct Capsule {
    pub message: OscMessage,
    pub sender: SocketAddr,
}

impl Capsule {
    pub fn new(message: OscMessage, sender: SocketAddr) -> Self {
        Capsule { message, sender }
    }

    /// The slash-delimited OSC path of the contained message.
    pub fn path(&self) -> &str {
        &self.message.addr
    }
}
