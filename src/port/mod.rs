use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{Receiver, Sender, bounded};
use rosc::{OscMessage, OscPacket, encoder};

use crate::buffer::ReceiveBuffer;
use crate::capsule::Capsule;
use crate::config::{PortConfig, ReceiveMode, find_from_host_name};
use crate::dispatch::{self, HandlerResult, Handlers};
use crate::error::PortError;
use crate::parser::parse_datagram;

pub mod udp;

pub use udp::{Transport, UdpTransport};

/// Largest datagram the receive loop will accept.
pub const BUFFER_SIZE: usize = 1 << 16;

/// Read timeout on the socket; bounds how long deactivation can take to join
/// the receive thread.
const STOP_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// An OSC endpoint over a datagram transport.
///
/// Inactive until `activate()`: binding the socket, resolving the default
/// remote, and starting the background receive loop all happen there. Inbound
/// traffic lands in a thread-safe dual-queue buffer and is consumed either by
/// `update()` ticks (event mode) or by the poll methods (poll mode). Handlers
/// must be registered before activation; registering during dispatch is not
/// supported.
pub struct OscPort<T: Transport = UdpTransport> {
    config: PortConfig,
    handlers: Handlers,
    buffer: Arc<ReceiveBuffer>,
    active: Option<Active<T>>,
}

/// Resources that only exist while the port is listening.
struct Active<T> {
    transport: Arc<T>,
    default_remote: SocketAddr,
    stop: Arc<AtomicBool>,
    exit_rx: Receiver<io::Error>,
    loop_failed: bool,
    join: JoinHandle<()>,
}

impl OscPort<UdpTransport> {
    /// A port over a real UDP socket.
    pub fn udp(config: PortConfig) -> Self {
        OscPort::new(config)
    }
}

impl<T: Transport> OscPort<T> {
    pub fn new(config: PortConfig) -> Self {
        OscPort {
            config,
            handlers: Handlers::default(),
            buffer: Arc::new(ReceiveBuffer::new()),
            active: None,
        }
    }

    pub fn config(&self) -> &PortConfig {
        &self.config
    }

    /// Register the general receive handler, called for every capsule before
    /// any path handler. Replaces a previously registered one.
    pub fn on_receive<F>(&mut self, handler: F)
    where
        F: FnMut(&Capsule) -> HandlerResult + Send + 'static,
    {
        self.handlers.on_receive = Some(Box::new(handler));
    }

    /// Register the general error handler. Replaces a previously registered
    /// one. Without it, queued errors are logged to stderr on dispatch.
    pub fn on_error<F>(&mut self, handler: F)
    where
        F: FnMut(&PortError) + Send + 'static,
    {
        self.handlers.on_error = Some(Box::new(handler));
    }

    /// Register a handler for one exact path. Handlers are tried in
    /// registration order and only the first match fires; no pattern matching.
    pub fn on_receive_path<F>(&mut self, path: impl Into<String>, handler: F)
    where
        F: FnMut(&OscMessage) -> HandlerResult + Send + 'static,
    {
        self.handlers.on_path.push((path.into(), Box::new(handler)));
    }

    /// Bind the transport, resolve the default remote, and start listening.
    ///
    /// The queues are created fresh here; anything left over from a previous
    /// activation is discarded. Activating an already-active port is an error,
    /// deactivate first.
    pub fn activate(&mut self) -> Result<(), PortError> {
        let transport = T::bind(self.config.local_port)?;
        self.activate_with(transport)
    }

    /// Start listening on an already-constructed transport.
    pub fn activate_with(&mut self, transport: T) -> Result<(), PortError> {
        if self.active.is_some() {
            return Err(PortError::Transport(io::Error::new(
                io::ErrorKind::AlreadyExists,
                "port is already active",
            )));
        }
        let default_remote = find_from_host_name(
            &self.config.default_remote_host,
            self.config.default_remote_port,
        )?;
        transport.set_read_timeout(Some(STOP_POLL_INTERVAL))?;

        let transport = Arc::new(transport);
        self.buffer = Arc::new(ReceiveBuffer::new());
        let stop = Arc::new(AtomicBool::new(false));
        let (exit_tx, exit_rx) = bounded(1);

        let join = thread::spawn({
            let transport = Arc::clone(&transport);
            let buffer = Arc::clone(&self.buffer);
            let stop = Arc::clone(&stop);
            let limit = self.config.limit_receive_buffer;
            move || receive_loop(transport, buffer, limit, stop, exit_tx)
        });

        self.active = Some(Active {
            transport,
            default_remote,
            stop,
            exit_rx,
            loop_failed: false,
            join,
        });
        Ok(())
    }

    /// Stop the receive loop and release the socket.
    ///
    /// Safe to call on a port that was never activated. Queued items are not
    /// drained; the next activation starts with fresh queues.
    pub fn deactivate(&mut self) {
        let Some(active) = self.active.take() else {
            return;
        };
        active.stop.store(true, Ordering::Relaxed);
        // Bounded by the socket read timeout.
        let _ = active.join.join();
    }

    /// Whether the port is listening and its receive loop is still running.
    ///
    /// Turns false once the loop has terminated on a fatal read error, even
    /// before `deactivate()` is called.
    pub fn is_active(&mut self) -> bool {
        match self.active.as_mut() {
            None => false,
            Some(active) => {
                if active.exit_rx.try_recv().is_ok() {
                    active.loop_failed = true;
                }
                !active.loop_failed
            }
        }
    }

    /// Re-resolve the configured default remote host. Useful after a DNS
    /// change; requires the port to be active.
    pub fn update_default_remote(&mut self) -> Result<(), PortError> {
        let resolved = find_from_host_name(
            &self.config.default_remote_host,
            self.config.default_remote_port,
        )?;
        self.active
            .as_mut()
            .ok_or(PortError::NotActive)?
            .default_remote = resolved;
        Ok(())
    }

    /// The default remote resolved at activation, if active.
    pub fn default_remote(&self) -> Option<SocketAddr> {
        self.active.as_ref().map(|a| a.default_remote)
    }

    /// The locally bound address. Handy when configured with port 0.
    pub fn local_addr(&self) -> Result<SocketAddr, PortError> {
        Ok(self.active()?.transport.local_addr()?)
    }

    /// Encode and send a message to the default remote.
    pub fn send(&self, message: OscMessage) -> Result<(), PortError> {
        let remote = self.active()?.default_remote;
        self.send_to(message, remote)
    }

    /// Encode and send a message to an explicit destination.
    pub fn send_to(&self, message: OscMessage, remote: SocketAddr) -> Result<(), PortError> {
        let data =
            encoder::encode(&OscPacket::Message(message)).map_err(PortError::Encode)?;
        self.send_bytes(&data, remote)
    }

    /// Send pre-encoded bytes to an explicit destination.
    pub fn send_bytes(&self, data: &[u8], remote: SocketAddr) -> Result<(), PortError> {
        self.active()?.transport.send_to(data, remote)?;
        Ok(())
    }

    /// One foreground scheduling tick.
    ///
    /// In event mode this drains both queues and notifies handlers; in poll
    /// mode it does nothing. Call it once per frame or at whatever cadence
    /// the application dispatches events.
    pub fn update(&mut self) {
        if self.config.receive_mode == ReceiveMode::Event {
            dispatch::dispatch_tick(&self.buffer, &mut self.handlers);
        }
    }

    /// Take every capsule queued since the last drain, in arrival order.
    ///
    /// Intended for poll mode; each call is a one-shot snapshot, so calling
    /// again with no new arrivals returns an empty vec.
    pub fn poll_received(&self) -> Vec<Capsule> {
        self.buffer.drain_received()
    }

    /// Take every error queued since the last drain, in arrival order.
    pub fn poll_errors(&self) -> Vec<PortError> {
        self.buffer.drain_errors()
    }

    fn active(&self) -> Result<&Active<T>, PortError> {
        self.active.as_ref().ok_or(PortError::NotActive)
    }
}

impl<T: Transport> Drop for OscPort<T> {
    fn drop(&mut self) {
        self.deactivate();
    }
}

/// The background receive loop: read a datagram, parse, enqueue, repeat.
///
/// Decode failures are queued and never terminate the loop. Read failures are
/// queued too; if the socket itself is unusable the loop reports its exit on
/// `exit_tx` and returns, which `is_active()` observes.
fn receive_loop<T: Transport>(
    transport: Arc<T>,
    buffer: Arc<ReceiveBuffer>,
    limit: i32,
    stop: Arc<AtomicBool>,
    exit_tx: Sender<io::Error>,
) {
    let mut datagram = vec![0u8; BUFFER_SIZE];
    while !stop.load(Ordering::Relaxed) {
        let (len, sender) = match transport.recv_from(&mut datagram) {
            Ok(read) => read,
            Err(e) if matches!(e.kind(), io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut) => {
                // Read timeout; loop around to check the stop flag.
                continue;
            }
            Err(e) if e.kind() == io::ErrorKind::ConnectionReset => {
                // Spurious on some platforms when a previous send hit a closed
                // port; the socket is still usable.
                eprintln!("oscport: receive error: {e}");
                buffer.push_error(PortError::Transport(e));
                continue;
            }
            Err(e) => {
                eprintln!("oscport: receive loop terminating: {e}");
                buffer.push_error(PortError::Transport(io::Error::new(e.kind(), e.to_string())));
                let _ = exit_tx.send(e);
                return;
            }
        };
        match parse_datagram(&datagram[..len]) {
            Ok(messages) => {
                for message in messages {
                    buffer.push_capsule(Capsule::new(message, sender), limit);
                }
            }
            Err(e) => {
                let err = PortError::Decode(e);
                eprintln!("oscport: {err}");
                buffer.push_error(err);
            }
        }
    }
}
