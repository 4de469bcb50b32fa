use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Final status line of a server reply, code included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerReply {
    code: u32,
    line: String,
}

#[derive(thiserror::Error, Debug, PartialEq)]
#[error("not an FTP status line: {0:?}")]
pub struct ParseReplyError(pub String);

impl ServerReply {
    pub fn code(&self) -> u32 {
        self.code
    }

    /// The whole line, e.g. `530 Please login with USER and PASS.`
    pub fn line(&self) -> &str {
        &self.line
    }

    /// The line without its code.
    pub fn text(&self) -> &str {
        self.line.get(4..).unwrap_or("")
    }

    /// Picks the last line of a raw reply, which carries the code for
    /// multi-line replies as well.
    pub fn from_raw(raw: &[u8]) -> Result<ServerReply, ParseReplyError> {
        let raw = String::from_utf8_lossy(raw);
        let last = raw
            .lines()
            .map(|line| line.trim_end_matches('\r'))
            .filter(|line| !line.is_empty())
            .last()
            .unwrap_or("");
        last.parse()
    }
}

impl FromStr for ServerReply {
    type Err = ParseReplyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let line = s.trim_end_matches(&['\r', '\n'][..]);
        let code = line
            .get(0..3)
            .filter(|code| code.bytes().all(|b| b.is_ascii_digit()))
            .and_then(|code| code.parse::<u32>().ok())
            .ok_or_else(|| ParseReplyError(line.to_owned()))?;
        match line.as_bytes().get(3) {
            None | Some(b' ') | Some(b'-') => Ok(ServerReply {
                code,
                line: line.to_owned(),
            }),
            Some(_) => Err(ParseReplyError(line.to_owned())),
        }
    }
}

impl Display for ServerReply {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_status_line() {
        let reply: ServerReply = "550 Permission denied.\r\n".parse().unwrap();
        assert_eq!(reply.code(), 550);
        assert_eq!(reply.line(), "550 Permission denied.");
        assert_eq!(reply.text(), "Permission denied.");
        assert_eq!(reply.to_string(), "550 Permission denied.");
    }

    #[test]
    fn test_bare_code() {
        let reply: ServerReply = "200".parse().unwrap();
        assert_eq!(reply.code(), 200);
        assert_eq!(reply.text(), "");
    }

    #[test]
    fn test_multi_line_reply_keeps_last_line() {
        let raw = b"230-Welcome\r\n230-Be nice\r\n230 Login successful.\r\n";
        let reply = ServerReply::from_raw(raw).unwrap();
        assert_eq!(reply.code(), 230);
        assert_eq!(reply.line(), "230 Login successful.");
    }

    #[test]
    fn test_garbage_is_rejected() {
        assert!("".parse::<ServerReply>().is_err());
        assert!("Hello".parse::<ServerReply>().is_err());
        assert!("2300 nope".parse::<ServerReply>().is_err());
        assert!(ServerReply::from_raw(b"\r\n").is_err());
    }
}
