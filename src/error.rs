use std::error::Error;
use std::fmt;
use std::io;

use derive_more::From;

/// Error type returned by handler callbacks.
pub type HandlerError = Box<dyn Error + Send + Sync>;

/// Everything that can go wrong inside the port.
///
/// Errors raised on the async receive path (`Decode`, read-side `Transport`,
/// `Handler`) travel through the error queue and surface on the next dispatch
/// tick or poll. Errors from direct calls (`activate`, the send family) are
/// returned to the caller and never queued.
#[derive(Debug, From)]
pub enum PortError {
    /// Malformed inbound bytes. The receive loop records this and continues.
    Decode(rosc::OscError),
    /// Outbound message could not be encoded (unsupported argument layout).
    #[from(ignore)]
    Encode(rosc::OscError),
    /// Socket bind, read, or write failure.
    Transport(io::Error),
    /// The default remote host could not be resolved to an IPv4 address.
    #[from(ignore)]
    HostResolution(String),
    /// A send was attempted while the port is not active.
    #[from(ignore)]
    NotActive,
    /// A registered handler returned an error during dispatch.
    #[from(ignore)]
    Handler(HandlerError),
}

impl fmt::Display for PortError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PortError::Decode(e) => write!(f, "failed to decode OSC datagram: {e:?}"),
            PortError::Encode(e) => write!(f, "failed to encode OSC message: {e:?}"),
            PortError::Transport(e) => write!(f, "transport failure: {e}"),
            PortError::HostResolution(host) => write!(f, "cannot resolve remote host: {host}"),
            PortError::NotActive => write!(f, "port is not active"),
            PortError::Handler(e) => write!(f, "handler failed: {e}"),
        }
    }
}

impl Error for PortError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            PortError::Transport(e) => Some(e),
            PortError::Handler(e) => Some(e.as_ref()),
            _ => None,
        }
    }
}
