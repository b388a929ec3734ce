//! An OSC transport endpoint: receives datagrams, decodes them with `rosc`,
//! buffers them, and delivers them to registered handlers either on an
//! `update()` tick (event mode) or on demand (poll mode). Outbound messages
//! are encoded and sent to a configured or explicit remote.

pub mod buffer;
pub mod capsule;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod parser;
pub mod port;

pub use capsule::Capsule;
pub use config::{PortConfig, ReceiveMode};
pub use dispatch::HandlerResult;
pub use error::PortError;
pub use port::{BUFFER_SIZE, OscPort, Transport, UdpTransport};
