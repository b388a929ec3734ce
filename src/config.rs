use std::net::{SocketAddr, ToSocketAddrs};

use crate::error::PortError;

/// How inbound traffic leaves the buffer.
///
/// This is fixed configuration, not a runtime state: a port is built for one
/// delivery style and keeps it for its whole life.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReceiveMode {
    /// `update()` ticks drain the queues and notify registered handlers.
    Event,
    /// The caller drains the queues via `poll_received()` / `poll_errors()`;
    /// `update()` is inert.
    Poll,
}

/// Static configuration for a port, captured at activation.
#[derive(Debug, Clone)]
pub struct PortConfig {
    pub receive_mode: ReceiveMode,
    /// Local listen port. Use 0 to let the OS pick one.
    pub local_port: u16,
    /// Hostname or IP the no-destination send variant targets.
    pub default_remote_host: String,
    pub default_remote_port: u16,
    /// Maximum number of buffered capsules; new arrivals are dropped beyond
    /// this. Zero or negative means unlimited. Errors are never limited.
    pub limit_receive_buffer: i32,
}

impl Default for PortConfig {
    fn default() -> Self {
        PortConfig {
            receive_mode: ReceiveMode::Event,
            local_port: 10000,
            default_remote_host: "localhost".to_string(),
            default_remote_port: 3000,
            limit_receive_buffer: 10,
        }
    }
}

/// Resolve a hostname to the first IPv4 address it yields.
///
/// Resolution failure is an error, never a silent fallback: a port with an
/// unresolvable default remote must fail to activate.
pub fn find_from_host_name(host: &str, port: u16) -> Result<SocketAddr, PortError> {
    let mut candidates = (host, port)
        .to_socket_addrs()
        .map_err(|e| PortError::HostResolution(format!("{host}: {e}")))?;
    candidates
        .find(|addr| addr.is_ipv4())
        .ok_or_else(|| PortError::HostResolution(format!("{host}: no IPv4 address found")))
}
