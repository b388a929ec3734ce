use std::io;
use std::net::{Ipv4Addr, SocketAddr, UdpSocket};
use std::time::Duration;

/// The datagram endpoint underneath a port.
///
/// The port logic only needs bind, timed reads, and writes; anything that can
/// do those can carry OSC traffic. Tests substitute an in-memory transport at
/// this seam.
pub trait Transport: Send + Sync + 'static {
    fn bind(local_port: u16) -> io::Result<Self>
    where
        Self: Sized;

    /// Read one datagram, returning its length and sender. Must honor the
    /// configured read timeout with `WouldBlock` or `TimedOut` so the receive
    /// loop can observe its stop flag between datagrams.
    fn recv_from(&self, buf: &mut [u8]) -> io::Result<(usize, SocketAddr)>;

    fn send_to(&self, buf: &[u8], to: SocketAddr) -> io::Result<usize>;

    fn set_read_timeout(&self, timeout: Option<Duration>) -> io::Result<()>;

    fn local_addr(&self) -> io::Result<SocketAddr>;
}

/// The one concrete transport: a UDP socket listening on all interfaces.
pub struct UdpTransport {
    socket: UdpSocket,
}

impl Transport for UdpTransport {
    fn bind(local_port: u16) -> io::Result<Self> {
        let socket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, local_port))?;
        Ok(UdpTransport { socket })
    }

    fn recv_from(&self, buf: &mut [u8]) -> io::Result<(usize, SocketAddr)> {
        self.socket.recv_from(buf)
    }

    fn send_to(&self, buf: &[u8], to: SocketAddr) -> io::Result<usize> {
        self.socket.send_to(buf, to)
    }

    fn set_read_timeout(&self, timeout: Option<Duration>) -> io::Result<()> {
        self.socket.set_read_timeout(timeout)
    }

    fn local_addr(&self) -> io::Result<SocketAddr> {
        self.socket.local_addr()
    }
}
