use std::io;
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use crate::protocol_interpreter::ProtocolInterpreter;
use crate::{OracleConfig, VirtualTree};

/// A file that reached the upload directory before being thrown away.
#[derive(Clone, Debug, PartialEq)]
pub struct ReceivedFile {
    pub path: String,
    pub size: u64,
}

/// Shared record of every completed upload, in arrival order.
#[derive(Clone, Default, Debug)]
pub struct ReceivedLog(Arc<Mutex<Vec<ReceivedFile>>>);

impl ReceivedLog {
    pub fn record(&self, path: String, size: u64) {
        match self.0.lock() {
            Ok(mut files) => files.push(ReceivedFile { path, size }),
            Err(_) => log::error!("Upload log is poisoned, dropping record of {}", path),
        }
    }

    pub fn files(&self) -> Vec<ReceivedFile> {
        self.0.lock().map(|files| files.clone()).unwrap_or_default()
    }
}

/// How a control connection ended.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SessionEnd {
    Quit,
    Dropped,
}

/// Shared record of how each finished control connection ended.
#[derive(Clone, Default, Debug)]
pub struct SessionLog(Arc<Mutex<Vec<SessionEnd>>>);

impl SessionLog {
    pub fn record(&self, end: SessionEnd) {
        match self.0.lock() {
            Ok(mut ends) => ends.push(end),
            Err(_) => log::error!("Session log is poisoned, dropping {:?}", end),
        }
    }

    pub fn ends(&self) -> Vec<SessionEnd> {
        self.0.lock().map(|ends| ends.clone()).unwrap_or_default()
    }

    /// Waits until at least `count` connections have ended or `timeout`
    /// passes, whichever comes first.
    pub fn wait_for(&self, count: usize, timeout: Duration) -> Vec<SessionEnd> {
        let start = Instant::now();
        loop {
            let ends = self.ends();
            if ends.len() >= count || start.elapsed() >= timeout {
                return ends;
            }
            thread::sleep(Duration::from_millis(10));
        }
    }
}

pub struct OracleServer {
    listener: TcpListener,
    config: Arc<OracleConfig>,
    tree: Arc<VirtualTree>,
    received: ReceivedLog,
    sessions: SessionLog,
}

/// What callers keep of a server running on its own thread.
#[derive(Clone, Debug)]
pub struct OracleHandle {
    pub addr: SocketAddr,
    pub received: ReceivedLog,
    pub sessions: SessionLog,
}

impl OracleServer {
    pub fn new(config: OracleConfig) -> io::Result<OracleServer> {
        let listener = TcpListener::bind((config.ip, config.control_port))?;
        let tree = Arc::new(VirtualTree::new(&config));
        Ok(OracleServer {
            listener,
            config: Arc::new(config),
            tree,
            received: ReceivedLog::default(),
            sessions: SessionLog::default(),
        })
    }

    /// Binds and serves from a background thread.
    pub fn spawn(config: OracleConfig) -> io::Result<OracleHandle> {
        let server = OracleServer::new(config)?;
        let handle = OracleHandle {
            addr: server.addr()?,
            received: server.received(),
            sessions: server.sessions(),
        };
        thread::spawn(move || server.run());
        Ok(handle)
    }

    pub fn addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    pub fn received(&self) -> ReceivedLog {
        self.received.clone()
    }

    pub fn sessions(&self) -> SessionLog {
        self.sessions.clone()
    }

    pub fn run(&self) {
        for client in self.listener.incoming() {
            match client {
                Ok(client) => {
                    let mut pi = self.interpreter();
                    thread::spawn(move || Self::serve(&mut pi, client));
                }
                Err(e) => log::error!("An error occurred before connection took place: {}", e),
            }
        }
    }

    fn interpreter(&self) -> ProtocolInterpreter {
        ProtocolInterpreter::new(
            self.config.clone(),
            self.tree.clone(),
            self.received.clone(),
            self.sessions.clone(),
        )
    }

    fn serve(pi: &mut ProtocolInterpreter, client: TcpStream) {
        if let Err(e) = pi.handle_client(client) {
            log::error!("An error while handling connection: {:?}", e);
        }
    }
}
