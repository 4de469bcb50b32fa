use std::fmt::{Display, Formatter};
use std::io::ErrorKind;

use crate::AuthError;
use crate::CommandError;
use crate::FsError;
use crate::HostPort;
use crate::TransferError;

use strum::EnumMessage;
use strum_macros::EnumMessage;

use anyhow::Error;

/// Replies worded the way vsftpd words them on an anonymous-only site.
#[derive(EnumMessage, PartialEq, Debug)]
pub enum Reply {
    #[strum(message = "Opening BINARY mode data connection for {} ({} bytes).")]
    OpeningBinaryConnection(String, u64),
    #[strum(message = "Ok to send data.")]
    OkToSend,

    #[strum(message = "Switching to Binary mode.")]
    BinaryMode,
    #[strum(message = "Switching to ASCII mode.")]
    AsciiMode,
    #[strum(message = "NOOP ok.")]
    NoopOk,
    #[strum(message = "PORT command successful. Consider using PASV.")]
    PortOk,
    #[strum(message = "{}")]
    FileSize(u64),
    #[strum(message = "UNIX Type: L8")]
    SystemType,
    #[strum(message = "{}")]
    ServiceReady(String),
    #[strum(message = "Goodbye.")]
    Goodbye,
    #[strum(message = "Transfer complete.")]
    TransferComplete,
    #[strum(message = "Entering Passive Mode ({}).")]
    EnteringPassiveMode(HostPort),
    #[strum(message = "Entering Extended Passive Mode (|||{}|)")]
    EnteringExtendedPassiveMode(u16),
    #[strum(message = "Login successful.")]
    LoginSuccessful,
    #[strum(message = "Directory successfully changed.")]
    DirectoryChanged,
    #[strum(message = "\"{}\" is the current directory")]
    CurrentDirectory(String),

    #[strum(message = "Please specify the password.")]
    SpecifyPassword,

    #[strum(message = "Use PORT or PASV first.")]
    UsePortOrPasv,
    #[strum(message = "Failed to establish connection.")]
    FailedToEstablishConnection,
    #[strum(message = "Failure reading network stream.")]
    FailureReadingNetwork,
    #[strum(message = "Failure writing network stream.")]
    FailureWritingNetwork,
    #[strum(message = "Local error in processing.")]
    LocalProcessingError,

    #[strum(message = "Unknown command.")]
    UnknownCommand,
    #[strum(message = "Unrecognised TYPE command.")]
    UnrecognisedType,
    #[strum(message = "Illegal PORT command.")]
    IllegalPort,
    #[strum(message = "Syntax error in parameters or arguments.")]
    SyntaxErrorArg,
    #[strum(message = "Login with USER first.")]
    LoginWithUserFirst,
    #[strum(message = "This FTP server is anonymous only.")]
    AnonymousOnly,
    #[strum(message = "Can't change to another user.")]
    CannotChangeUser,
    #[strum(message = "Please login with USER and PASS.")]
    PleaseLogin,
    #[strum(message = "Permission denied.")]
    PermissionDenied,
    #[strum(message = "Failed to change directory.")]
    FailedToChangeDirectory,
    #[strum(message = "Failed to open file.")]
    FailedToOpenFile,
    #[strum(message = "Could not get file size.")]
    CouldNotGetFileSize,
    #[strum(message = "Could not create file.")]
    CouldNotCreateFile,
}

impl Reply {
    pub fn status_code(&self) -> u32 {
        use Reply::*;
        match self {
            OpeningBinaryConnection(..) => 150,
            OkToSend => 150,

            BinaryMode | AsciiMode | NoopOk | PortOk => 200,
            FileSize(_) => 213,
            SystemType => 215,
            ServiceReady(_) => 220,
            Goodbye => 221,
            TransferComplete => 226,
            EnteringPassiveMode(_) => 227,
            EnteringExtendedPassiveMode(_) => 229,
            LoginSuccessful => 230,
            DirectoryChanged => 250,
            CurrentDirectory(_) => 257,

            SpecifyPassword => 331,

            UsePortOrPasv | FailedToEstablishConnection => 425,
            FailureReadingNetwork | FailureWritingNetwork => 426,
            LocalProcessingError => 451,

            UnknownCommand | UnrecognisedType | IllegalPort => 500,
            SyntaxErrorArg => 501,
            LoginWithUserFirst => 503,
            AnonymousOnly | CannotChangeUser | PleaseLogin => 530,
            PermissionDenied | FailedToChangeDirectory | FailedToOpenFile
            | CouldNotGetFileSize => 550,
            CouldNotCreateFile => 553,
        }
    }
}

impl Display for Reply {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        use Reply::*;
        let template = self.get_message().unwrap_or_default();
        let text = match self {
            OpeningBinaryConnection(path, size) => template
                .replacen("{}", path, 1)
                .replacen("{}", &size.to_string(), 1),
            FileSize(size) => template.replace("{}", &size.to_string()),
            ServiceReady(banner) => template.replace("{}", banner),
            EnteringPassiveMode(host_port) => template.replace("{}", &host_port.to_string()),
            EnteringExtendedPassiveMode(port) => template.replace("{}", &port.to_string()),
            CurrentDirectory(path) => template.replace("{}", path),
            _ => template.to_owned(),
        };
        write!(f, "{} {}", self.status_code(), text)
    }
}

impl From<Error> for Reply {
    fn from(e: Error) -> Self {
        use Reply::*;

        if let Some(err) = e.downcast_ref::<CommandError>() {
            match err {
                CommandError::ArgMissing => SyntaxErrorArg,
                CommandError::BadArg => SyntaxErrorArg,
                CommandError::InvalidCommand => UnknownCommand,
            }
        } else if let Some(err) = e.downcast_ref::<AuthError>() {
            match err {
                AuthError::NotLoggedIn => PleaseLogin,
                AuthError::AnonymousOnly => AnonymousOnly,
                AuthError::UserFirst => LoginWithUserFirst,
                AuthError::AlreadyLoggedIn => CannotChangeUser,
            }
        } else if let Some(err) = e.downcast_ref::<FsError>() {
            match err {
                FsError::PermissionDenied => PermissionDenied,
                FsError::NoSuchDirectory(_) => FailedToChangeDirectory,
                FsError::CannotOpen(_) => FailedToOpenFile,
                FsError::NoSize(_) => CouldNotGetFileSize,
                FsError::CannotCreate(_) => CouldNotCreateFile,
            }
        } else if let Some(err) = e.downcast_ref::<TransferError>() {
            match err {
                TransferError::NoDataConnection => UsePortOrPasv,
                TransferError::Establish(_) => FailedToEstablishConnection,
                TransferError::Receive(_) => FailureReadingNetwork,
                TransferError::Send(_) => FailureWritingNetwork,
            }
        } else if let Some(err) = e.downcast_ref::<std::io::Error>() {
            match err.kind() {
                ErrorKind::TimedOut => FailedToEstablishConnection,
                ErrorKind::ConnectionReset | ErrorKind::ConnectionAborted => FailureWritingNetwork,
                _ => {
                    log::error!("Encountered unexpected io error {}", err);
                    LocalProcessingError
                }
            }
        } else {
            log::error!("Encountered unexpected error {}", e);
            LocalProcessingError
        }
    }
}
