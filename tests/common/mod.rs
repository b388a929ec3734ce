#![allow(dead_code)]

use std::io;
use std::net::SocketAddr;
use std::sync::Mutex;
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, unbounded};
use rosc::{OscMessage, OscPacket, OscType};

use oscport::Transport;

/// In-memory stand-in for a UDP socket, driven from the test thread.
pub struct MockTransport {
    inbound_rx: Receiver<(Vec<u8>, SocketAddr)>,
    outbound_tx: Sender<(Vec<u8>, SocketAddr)>,
    timeout: Mutex<Option<Duration>>,
}

/// The far side of a `MockTransport`: feed datagrams in, observe sends out.
/// Dropping it makes the transport behave like a dead socket.
pub struct MockRemote {
    pub inbound_tx: Sender<(Vec<u8>, SocketAddr)>,
    pub outbound_rx: Receiver<(Vec<u8>, SocketAddr)>,
}

pub fn mock_transport() -> (MockTransport, MockRemote) {
    let (inbound_tx, inbound_rx) = unbounded();
    let (outbound_tx, outbound_rx) = unbounded();
    (
        MockTransport {
            inbound_rx,
            outbound_tx,
            timeout: Mutex::new(None),
        },
        MockRemote {
            inbound_tx,
            outbound_rx,
        },
    )
}

impl Transport for MockTransport {
    fn bind(_local_port: u16) -> io::Result<Self> {
        // Mocks are constructed by the test and handed to activate_with.
        Err(io::Error::other("mock transports cannot be bound"))
    }

    fn recv_from(&self, buf: &mut [u8]) -> io::Result<(usize, SocketAddr)> {
        let timeout = self
            .timeout
            .lock()
            .unwrap()
            .unwrap_or(Duration::from_secs(1));
        match self.inbound_rx.recv_timeout(timeout) {
            Ok((data, sender)) => {
                let len = data.len().min(buf.len());
                buf[..len].copy_from_slice(&data[..len]);
                Ok((len, sender))
            }
            Err(RecvTimeoutError::Timeout) => {
                Err(io::Error::new(io::ErrorKind::TimedOut, "mock read timeout"))
            }
            Err(RecvTimeoutError::Disconnected) => Err(io::Error::new(
                io::ErrorKind::NotConnected,
                "mock transport closed",
            )),
        }
    }

    fn send_to(&self, buf: &[u8], to: SocketAddr) -> io::Result<usize> {
        self.outbound_tx
            .send((buf.to_vec(), to))
            .map_err(|_| io::Error::new(io::ErrorKind::NotConnected, "mock transport closed"))?;
        Ok(buf.len())
    }

    fn set_read_timeout(&self, timeout: Option<Duration>) -> io::Result<()> {
        *self.timeout.lock().unwrap() = timeout;
        Ok(())
    }

    fn local_addr(&self) -> io::Result<SocketAddr> {
        Ok("127.0.0.1:0".parse().unwrap())
    }
}

/// Encode a single OSC message the way a remote peer would.
pub fn encode_message(path: &str, args: Vec<OscType>) -> Vec<u8> {
    rosc::encoder::encode(&OscPacket::Message(OscMessage {
        addr: path.to_string(),
        args,
    }))
    .unwrap()
}
