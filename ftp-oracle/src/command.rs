use std::str::FromStr;

use crate::HostPort;

use strum_macros::{EnumString, IntoStaticStr};

#[derive(EnumString, IntoStaticStr, Debug, PartialEq)]
#[strum(ascii_case_insensitive)]
pub enum Command {
    User(String),
    Pass(String),
    Quit,
    Noop,
    Syst,
    Pwd,
    Cwd(String),
    Cdup,
    Mkd(String),
    Rmd(String),
    Dele(String),
    Rnfr(String),
    Type(String),
    Pasv,
    Epsv,
    Port(HostPort),
    Retr(String),
    Stor(String),
    Size(String),
}

#[derive(thiserror::Error, Debug)]
pub enum CommandError {
    #[error("missing required argument")]
    ArgMissing,
    #[error("invalid format of provided argument")]
    BadArg,
    #[error("command not found")]
    InvalidCommand,
}

impl Command {
    pub fn parse_line(s: &str) -> Result<Command, CommandError> {
        use Command::*;

        let (command, arg) = match s.trim_end().split_once(' ') {
            Some((command, arg)) => (command, Some(arg)),
            None => (s.trim_end(), None),
        };
        let arg = arg.filter(|arg| !arg.is_empty());
        let required = || arg.map(str::to_owned).ok_or(CommandError::ArgMissing);

        let command = Command::from_str(command).map_err(|_| CommandError::InvalidCommand)?;
        let command = match command {
            User(_) => User(required()?),
            Pass(_) => Pass(arg.unwrap_or_default().to_owned()),
            Cwd(_) => Cwd(required()?),
            Mkd(_) => Mkd(required()?),
            Rmd(_) => Rmd(required()?),
            Dele(_) => Dele(required()?),
            Rnfr(_) => Rnfr(required()?),
            Type(_) => Type(required()?),
            Retr(_) => Retr(required()?),
            Stor(_) => Stor(required()?),
            Size(_) => Size(required()?),
            Port(_) => {
                let host_port = arg
                    .ok_or(CommandError::ArgMissing)?
                    .parse()
                    .map_err(|_| CommandError::BadArg)?;
                Port(host_port)
            }
            _ => command,
        };
        Ok(command)
    }

    /// Commands that are answered before login.
    pub fn allowed_anonymously(&self) -> bool {
        matches!(
            self,
            Command::User(_) | Command::Pass(_) | Command::Quit | Command::Noop
        )
    }

    pub fn name(&self) -> &'static str {
        self.into()
    }
}
