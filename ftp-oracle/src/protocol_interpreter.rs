use std::io::{self, BufRead, BufReader, Read, Write};
use std::net::{IpAddr, TcpStream};
use std::sync::Arc;

use crate::data_channel::{receive_all, send_zeros, DataChannel};
use crate::server::{SessionEnd, SessionLog};
use crate::{Command, CommandError, HostPort, OracleConfig, ReceivedLog, Reply, Session};
use crate::{TransferError, VirtualTree};

use anyhow::{Context, Error, Result};

const CRLF: &str = "\r\n";
const MAX_COMMAND_LEN: u64 = 1024;

pub struct CrlfStream {
    reader: BufReader<TcpStream>,
    writer: TcpStream,
}

impl CrlfStream {
    pub fn new(stream: TcpStream) -> Result<CrlfStream> {
        let writer = stream.try_clone()?;
        Ok(CrlfStream {
            reader: BufReader::new(stream),
            writer,
        })
    }

    pub fn send_message(&mut self, msg: &str) -> Result<()> {
        self.writer.write_all(msg.as_bytes())?;
        self.writer.write_all(CRLF.as_bytes())?;
        Ok(())
    }

    pub fn read_message(&mut self) -> Result<String> {
        let mut buf = Vec::new();
        let n = (&mut self.reader)
            .take(MAX_COMMAND_LEN + 1)
            .read_until(b'\n', &mut buf)?;
        if n == 0 {
            return Err(Error::new(io::Error::new(
                io::ErrorKind::ConnectionAborted,
                "Client quit unexpectedly.",
            )));
        }
        if !buf.ends_with(b"\n") {
            self.skip_line()?;
            return Err(Error::new(CommandError::InvalidCommand))
                .with_context(|| format!("Client's command was way too long ({} bytes)", n));
        }
        let msg = String::from_utf8_lossy(&buf);
        Ok(msg.trim_end_matches(&['\r', '\n'][..]).to_owned())
    }

    /// Throws away the rest of the current line.
    fn skip_line(&mut self) -> io::Result<()> {
        loop {
            let mut rest = Vec::new();
            let n = (&mut self.reader)
                .take(MAX_COMMAND_LEN)
                .read_until(b'\n', &mut rest)?;
            if n == 0 || rest.ends_with(b"\n") {
                return Ok(());
            }
        }
    }
}

pub struct ProtocolInterpreter {
    config: Arc<OracleConfig>,
    tree: Arc<VirtualTree>,
    received: ReceivedLog,
    sessions: SessionLog,
}

impl ProtocolInterpreter {
    pub fn new(
        config: Arc<OracleConfig>,
        tree: Arc<VirtualTree>,
        received: ReceivedLog,
        sessions: SessionLog,
    ) -> ProtocolInterpreter {
        ProtocolInterpreter {
            config,
            tree,
            received,
            sessions,
        }
    }

    pub fn handle_client(&mut self, stream: TcpStream) -> Result<()> {
        let mut session = Session::new(self.tree.clone());
        let result = self.converse(stream, &mut session);
        self.sessions.record(if session.has_quit {
            SessionEnd::Quit
        } else {
            SessionEnd::Dropped
        });
        result
    }

    fn converse(&mut self, stream: TcpStream, session: &mut Session) -> Result<()> {
        let peer = stream.peer_addr()?;
        log::info!("Got a new connection from {}", peer);
        stream.set_read_timeout(Some(self.config.conn_timeout))?;

        let mut stream = CrlfStream::new(stream)?;
        let mut channel = DataChannel::new(peer.ip(), self.config.conn_timeout);
        Self::send_reply(&mut stream, Reply::ServiceReady(self.config.banner.clone()))?;

        while !session.has_quit {
            let command = match Self::read_command(&mut stream) {
                Ok(command) => command,
                Err(err) => {
                    if err.is::<CommandError>() {
                        log::debug!("{:#}", err);
                        Self::send_reply(&mut stream, err.into())?;
                        continue;
                    }
                    log::error!("{:#}", err);
                    break;
                }
            };
            let name = command.name();
            let reply = match self.dispatch_command(command, session, &mut channel, &mut stream, peer.ip()) {
                Ok(reply) => reply,
                Err(err) => {
                    log::warn!("Client's {} request could not be honored: {:#}", name, err);
                    err.into()
                }
            };
            Self::send_reply(&mut stream, reply)?;
        }
        log::info!("Connection with client {} properly closed.", peer);
        Ok(())
    }

    fn send_reply(stream: &mut CrlfStream, reply: Reply) -> Result<()> {
        let msg = reply.to_string();
        log::debug!("----> {}", msg);
        stream.send_message(msg.as_str())?;
        Ok(())
    }

    pub fn read_command(stream: &mut CrlfStream) -> Result<Command> {
        let msg = stream.read_message()?;
        if msg.starts_with("PASS ") {
            log::debug!("<---- PASS ****");
        } else {
            log::debug!("<---- {}", msg);
        }
        let command = Command::parse_line(msg.as_str())?;
        Ok(command)
    }

    fn dispatch_command(
        &self,
        command: Command,
        session: &mut Session,
        channel: &mut DataChannel,
        stream: &mut CrlfStream,
        peer_ip: IpAddr,
    ) -> Result<Reply> {
        if !command.allowed_anonymously() {
            session.require_login()?;
        }
        match command {
            Command::User(username) => session.user(&username),
            Command::Pass(_) => session.pass(),
            Command::Quit => {
                session.quit();
                Ok(Reply::Goodbye)
            }
            Command::Noop => Ok(Reply::NoopOk),
            Command::Syst => Ok(Reply::SystemType),
            Command::Pwd => Ok(Reply::CurrentDirectory(session.pwd()?)),
            Command::Cwd(path) => {
                session.cwd(&path)?;
                Ok(Reply::DirectoryChanged)
            }
            Command::Cdup => {
                session.cdup()?;
                Ok(Reply::DirectoryChanged)
            }
            Command::Mkd(path) | Command::Rmd(path) | Command::Dele(path) | Command::Rnfr(path) => {
                session.modify(&path)
            }
            Command::Type(data_type) => match data_type.to_ascii_uppercase().chars().next() {
                Some('I') | Some('L') => Ok(Reply::BinaryMode),
                Some('A') => Ok(Reply::AsciiMode),
                _ => Ok(Reply::UnrecognisedType),
            },
            Command::Size(path) => Ok(Reply::FileSize(session.size(&path)?)),
            Command::Pasv => {
                let addr = channel.make_passive(self.config.ip)?;
                Ok(Reply::EnteringPassiveMode(HostPort::new(self.config.ip, addr.port())))
            }
            Command::Epsv => {
                let addr = channel.make_passive(self.config.ip)?;
                Ok(Reply::EnteringExtendedPassiveMode(addr.port()))
            }
            Command::Port(host_port) => {
                if IpAddr::V4(host_port.ip) != peer_ip {
                    log::warn!("Refusing PORT towards foreign address {}", host_port.ip);
                    return Ok(Reply::IllegalPort);
                }
                channel.make_active(host_port.socket_addr());
                Ok(Reply::PortOk)
            }
            Command::Retr(path) => {
                let result = self.retr(&path, session, channel, stream);
                channel.reset();
                result
            }
            Command::Stor(path) => {
                let result = self.stor(&path, session, channel, stream);
                channel.reset();
                result
            }
        }
    }

    fn retr(
        &self,
        path: &str,
        session: &Session,
        channel: &mut DataChannel,
        stream: &mut CrlfStream,
    ) -> Result<Reply> {
        let (full_path, size) = session.open(path)?;
        if !channel.is_negotiated() {
            return Err(Error::new(TransferError::NoDataConnection));
        }
        Self::send_reply(stream, Reply::OpeningBinaryConnection(path.to_owned(), size))?;
        let data = channel.open()?;
        let sent = send_zeros(data, size)?;
        log::info!("Sent {} bytes of {}", sent, full_path);
        Ok(Reply::TransferComplete)
    }

    fn stor(
        &self,
        path: &str,
        session: &Session,
        channel: &mut DataChannel,
        stream: &mut CrlfStream,
    ) -> Result<Reply> {
        let full_path = session.create(path)?;
        if !channel.is_negotiated() {
            return Err(Error::new(TransferError::NoDataConnection));
        }
        Self::send_reply(stream, Reply::OkToSend)?;
        let data = channel.open()?;
        let bytes = receive_all(data)?;
        log::info!("Received {} bytes for {}, discarding them", bytes, full_path);
        self.received.record(full_path, bytes);
        Ok(Reply::TransferComplete)
    }
}
