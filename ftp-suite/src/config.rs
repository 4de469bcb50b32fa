use std::fmt::{Display, Formatter};
use std::net::{SocketAddr, ToSocketAddrs};
use std::path::PathBuf;
use std::time::Duration;

use crate::SessionError;

/// The server under test.
#[derive(Debug, Clone, PartialEq)]
pub struct Endpoint {
    pub host: String,
    pub port: u16,
    pub timeout: Duration,
}

impl Endpoint {
    pub fn new(host: &str, port: u16) -> Endpoint {
        Endpoint {
            host: host.to_owned(),
            port,
            ..Endpoint::default()
        }
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, SessionError> {
        (self.host.as_str(), self.port)
            .to_socket_addrs()
            .map_err(|err| SessionError::Resolve(format!("{}: {}", self, err)))?
            .next()
            .ok_or_else(|| SessionError::Resolve(self.to_string()))
    }
}

impl From<SocketAddr> for Endpoint {
    fn from(addr: SocketAddr) -> Self {
        Endpoint::new(&addr.ip().to_string(), addr.port())
    }
}

impl Default for Endpoint {
    fn default() -> Self {
        Endpoint {
            host: "speedtest.tele2.net".to_owned(),
            port: 21,
            timeout: Duration::from_secs(30),
        }
    }
}

impl Display for Endpoint {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Credentials {
    Anonymous,
    User { user: String, password: String },
}

impl Credentials {
    pub fn user(user: &str, password: &str) -> Credentials {
        Credentials::User {
            user: user.to_owned(),
            password: password.to_owned(),
        }
    }

    pub fn user_and_password(&self) -> (&str, &str) {
        match self {
            Credentials::Anonymous => ("anonymous", "anonymous@"),
            Credentials::User { user, password } => (user, password),
        }
    }
}

impl Display for Credentials {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Credentials::Anonymous => f.write_str("anonymous"),
            Credentials::User { user, .. } => write!(f, "user {}", user),
        }
    }
}

/// Names of the local and remote files and directories the scenarios touch.
#[derive(Debug, Clone, PartialEq)]
pub struct Fixtures {
    pub download_file: String,
    pub download_dir: PathBuf,
    pub delete_target: String,
    pub new_directory: String,
    pub upload_dir: String,
    pub upload_local: PathBuf,
    pub upload_remote: String,
    pub named_user: Credentials,
}

impl Fixtures {
    /// Absolute remote path the upload lands on inside the upload directory.
    pub fn uploaded_path(&self) -> String {
        format!(
            "/{}/{}",
            self.upload_dir.trim_matches('/'),
            self.upload_remote
        )
    }
}

impl Default for Fixtures {
    fn default() -> Self {
        Fixtures {
            download_file: "100MB.zip".to_owned(),
            download_dir: PathBuf::from("."),
            delete_target: "1GB.zip".to_owned(),
            new_directory: "/pictures".to_owned(),
            upload_dir: "upload".to_owned(),
            upload_local: PathBuf::from("upload_100MB.zi"),
            upload_remote: "upload_100MB.zi".to_owned(),
            named_user: Credentials::user("username", "user_password"),
        }
    }
}
