use std::fs::File;
use std::io;
use std::path::Path;
use std::time::Instant;

use crate::transfer::{Direction, TransferReport};
use crate::{Credentials, Endpoint, ServerReply, SessionError};

use suppaftp::types::FileType;
use suppaftp::{FtpError, FtpStream, Status};

type Result<T> = std::result::Result<T, SessionError>;

/// One control connection to the server under test.
///
/// A session that is dropped without [`Session::quit`] still says QUIT on
/// its way out, ignoring whatever the server answers.
pub struct Session {
    stream: Option<FtpStream>,
    welcome: Option<ServerReply>,
}

impl Session {
    pub fn connect(endpoint: &Endpoint) -> Result<Session> {
        let addr = endpoint.socket_addr()?;
        log::info!("Connecting to {} ({})", endpoint, addr);
        let stream = FtpStream::connect_timeout(addr, endpoint.timeout)?;
        stream
            .get_ref()
            .set_read_timeout(Some(endpoint.timeout))
            .map_err(SessionError::Connection)?;
        let welcome = stream
            .get_welcome_msg()
            .and_then(|msg| ServerReply::from_raw(msg.as_bytes()).ok());
        if let Some(welcome) = &welcome {
            log::debug!("Server greeted with {}", welcome);
        }
        Ok(Session {
            stream: Some(stream),
            welcome,
        })
    }

    pub fn welcome(&self) -> Option<&ServerReply> {
        self.welcome.as_ref()
    }

    fn stream(&mut self) -> Result<&mut FtpStream> {
        self.stream.as_mut().ok_or(SessionError::Closed)
    }

    /// USER, then PASS if the server asks for it. Returns the reply that
    /// completed the login.
    pub fn login(&mut self, credentials: &Credentials) -> Result<ServerReply> {
        let (user, password) = credentials.user_and_password();
        log::info!("Logging in as {}", credentials);
        let stream = self.stream()?;
        let response = stream.custom_command(
            format!("USER {}", user),
            &[Status::LoggedIn, Status::NeedPassword],
        )?;
        let response = if response.status == Status::NeedPassword {
            stream.custom_command(format!("PASS {}", password), &[Status::LoggedIn])?
        } else {
            response
        };
        ServerReply::from_raw(&response.body).map_err(|err| {
            log::warn!("{}", err);
            SessionError::BadResponse
        })
    }

    pub fn mkd(&mut self, path: &str) -> Result<()> {
        log::debug!("MKD {}", path);
        self.stream()?.mkdir(path)?;
        Ok(())
    }

    pub fn cwd(&mut self, path: &str) -> Result<()> {
        log::debug!("CWD {}", path);
        self.stream()?.cwd(path)?;
        Ok(())
    }

    pub fn dele(&mut self, path: &str) -> Result<()> {
        log::debug!("DELE {}", path);
        self.stream()?.rm(path)?;
        Ok(())
    }

    pub fn pwd(&mut self) -> Result<String> {
        Ok(self.stream()?.pwd()?)
    }

    pub fn size(&mut self, path: &str) -> Result<u64> {
        Ok(self.stream()?.size(path)? as u64)
    }

    /// Retrieves `remote` into `local_dir`, keeping its file name. The
    /// byte count is the size the server announces for the file.
    pub fn download(&mut self, remote: &str, local_dir: &Path) -> Result<TransferReport> {
        let size = self.size(remote)?;
        let file_name = Path::new(remote)
            .file_name()
            .ok_or_else(|| SessionError::Client(format!("{} does not name a file", remote)))?;
        let local = local_dir.join(file_name);

        let stream = self.stream()?;
        stream.transfer_type(FileType::Binary)?;
        let mut file = File::create(&local).map_err(SessionError::local_file(&local))?;
        let start = Instant::now();
        let written = stream.retr(remote, |reader| {
            io::copy(reader, &mut file).map_err(FtpError::ConnectionError)
        })?;
        let report = TransferReport::new(Direction::Download, size, start.elapsed());
        log::debug!("Wrote {} bytes to {}", written, local.display());
        log::info!("{}", report);
        Ok(report)
    }

    /// Stores the local file as `remote` in the working directory.
    pub fn upload(&mut self, local: &Path, remote: &str) -> Result<TransferReport> {
        let size = local
            .metadata()
            .map_err(SessionError::local_file(local))?
            .len();
        let mut file = File::open(local).map_err(SessionError::local_file(local))?;

        let stream = self.stream()?;
        stream.transfer_type(FileType::Binary)?;
        let start = Instant::now();
        let sent = stream.put_file(remote, &mut file)?;
        let report = TransferReport::new(Direction::Upload, size, start.elapsed());
        log::debug!("Sent {} bytes as {}", sent, remote);
        log::info!("{}", report);
        Ok(report)
    }

    /// Ends the session and hands back the server's goodbye.
    pub fn quit(mut self) -> Result<ServerReply> {
        let mut stream = self.stream.take().ok_or(SessionError::Closed)?;
        let response = stream.custom_command("QUIT", &[Status::Closing])?;
        ServerReply::from_raw(&response.body).map_err(|err| {
            log::warn!("{}", err);
            SessionError::BadResponse
        })
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            if let Err(err) = stream.quit() {
                log::debug!("QUIT on drop failed: {}", err);
            }
        }
    }
}
