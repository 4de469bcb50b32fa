use std::io;
use std::path::PathBuf;

use crate::ServerReply;

use suppaftp::FtpError;

/// Every way a session step can fail. Refusals by the server all land in
/// `Rejected`, whose message is the server's status line verbatim.
#[derive(thiserror::Error, Debug)]
pub enum SessionError {
    #[error("{0}")]
    Rejected(ServerReply),
    #[error("could not resolve {0}")]
    Resolve(String),
    #[error("connection error: {0}")]
    Connection(#[source] io::Error),
    #[error("server sent a malformed response")]
    BadResponse,
    #[error("ftp client error: {0}")]
    Client(String),
    #[error("local file {}: {source}", path.display())]
    LocalFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("session was already closed")]
    Closed,
}

impl SessionError {
    /// The server's status line when the server refused the request.
    pub fn reply(&self) -> Option<&ServerReply> {
        match self {
            SessionError::Rejected(reply) => Some(reply),
            _ => None,
        }
    }

    pub(crate) fn local_file(path: impl Into<PathBuf>) -> impl FnOnce(io::Error) -> SessionError {
        let path = path.into();
        move |source| SessionError::LocalFile { path, source }
    }
}

impl From<FtpError> for SessionError {
    fn from(err: FtpError) -> Self {
        match err {
            FtpError::UnexpectedResponse(response) => match ServerReply::from_raw(&response.body) {
                Ok(reply) => SessionError::Rejected(reply),
                Err(err) => {
                    log::warn!("{}", err);
                    SessionError::BadResponse
                }
            },
            FtpError::ConnectionError(err) => SessionError::Connection(err),
            FtpError::BadResponse => SessionError::BadResponse,
            other => SessionError::Client(other.to_string()),
        }
    }
}
