use std::io::{self, ErrorKind, Read, Write};
use std::net::{IpAddr, Ipv4Addr, SocketAddr, TcpListener, TcpStream};
use std::thread::sleep;
use std::time::{Duration, Instant};

#[derive(thiserror::Error, Debug)]
pub enum TransferError {
    #[error("no data connection was negotiated")]
    NoDataConnection,
    #[error("could not establish data connection: {0}")]
    Establish(#[source] io::Error),
    #[error("failed reading from data connection: {0}")]
    Receive(#[source] io::Error),
    #[error("failed writing to data connection: {0}")]
    Send(#[source] io::Error),
}

/// Data connection negotiated by the last PASV, EPSV or PORT. It is used
/// up by the next transfer command, successful or not.
pub struct DataChannel {
    mode: Option<Box<dyn Mode + Send>>,
    peer_ip: IpAddr,
    timeout: Duration,
}

impl DataChannel {
    pub fn new(peer_ip: IpAddr, timeout: Duration) -> DataChannel {
        DataChannel {
            mode: None,
            peer_ip,
            timeout,
        }
    }

    pub fn make_passive(&mut self, ip: Ipv4Addr) -> Result<SocketAddr, TransferError> {
        let passive = Passive::new(ip, self.peer_ip, self.timeout).map_err(TransferError::Establish)?;
        let addr = passive.addr().map_err(TransferError::Establish)?;
        self.mode = Some(Box::new(passive));
        log::info!("Data channel listening on {}", addr);
        Ok(addr)
    }

    pub fn make_active(&mut self, addr: SocketAddr) {
        log::info!("Data channel will connect to {}", addr);
        self.mode = Some(Box::new(Active { addr }));
    }

    pub fn is_negotiated(&self) -> bool {
        self.mode.is_some()
    }

    /// Forgets the negotiated connection, closing any passive listener.
    pub fn reset(&mut self) {
        self.mode = None;
    }

    pub fn open(&mut self) -> Result<TcpStream, TransferError> {
        let mode = self.mode.take().ok_or(TransferError::NoDataConnection)?;
        let stream = mode.connect().map_err(TransferError::Establish)?;
        if let Ok(addr) = stream.peer_addr() {
            log::debug!("Data channel connected with {}", addr);
        }
        Ok(stream)
    }
}

/// Streams `size` zero bytes, the contents of every served file.
pub fn send_zeros(mut stream: TcpStream, size: u64) -> Result<u64, TransferError> {
    let mut contents = io::repeat(0).take(size);
    let sent = io::copy(&mut contents, &mut stream).map_err(TransferError::Send)?;
    stream.flush().map_err(TransferError::Send)?;
    Ok(sent)
}

/// Reads the data connection until the client closes it and throws the
/// bytes away.
pub fn receive_all(mut stream: TcpStream) -> Result<u64, TransferError> {
    io::copy(&mut stream, &mut io::sink()).map_err(TransferError::Receive)
}

trait Mode {
    fn connect(&self) -> io::Result<TcpStream>;
}

struct Active {
    addr: SocketAddr,
}

impl Mode for Active {
    fn connect(&self) -> io::Result<TcpStream> {
        TcpStream::connect(self.addr)
    }
}

struct Passive {
    listener: TcpListener,
    peer_ip: IpAddr,
    timeout: Duration,
}

impl Passive {
    fn new(ip: Ipv4Addr, peer_ip: IpAddr, timeout: Duration) -> io::Result<Passive> {
        let listener = TcpListener::bind((ip, 0))?;
        listener.set_nonblocking(true)?;
        Ok(Passive {
            listener,
            peer_ip,
            timeout,
        })
    }

    fn addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }
}

impl Mode for Passive {
    fn connect(&self) -> io::Result<TcpStream> {
        let start = Instant::now();
        while start.elapsed() < self.timeout {
            match self.listener.accept() {
                Ok((stream, in_addr)) => {
                    if in_addr.ip() == self.peer_ip {
                        stream.set_nonblocking(false)?;
                        return Ok(stream);
                    }
                    log::warn!(
                        "Dropping connection from {}. Unexpected ip address.",
                        in_addr
                    );
                }
                Err(e) if e.kind() == ErrorKind::WouldBlock => {
                    sleep(Duration::from_millis(20));
                }
                Err(e) => return Err(e),
            }
        }
        Err(io::Error::from(ErrorKind::TimedOut))
    }
}
