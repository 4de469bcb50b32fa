//! Reference FTP server answering the way the anonymous-only public
//! speedtest server does, for exercising clients without the network.

mod command;
mod config;
mod data_channel;
mod hostport;
mod protocol_interpreter;
mod reply;
mod server;
mod session;
mod vfs;

use command::{Command, CommandError};
use data_channel::TransferError;
use hostport::HostPort;
use reply::Reply;
use session::{AuthError, Session};
use vfs::{FsError, VirtualTree};

pub use config::{OracleConfig, RemoteFile};
pub use server::{OracleHandle, OracleServer, ReceivedFile, ReceivedLog, SessionEnd, SessionLog};
