use std::default::Default;
use std::net::Ipv4Addr;
use std::time::Duration;

/// A read-only file served from the virtual tree. Its contents are
/// `size` zero bytes generated on the fly.
#[derive(Clone, Debug, PartialEq)]
pub struct RemoteFile {
    pub path: String,
    pub size: u64,
}

impl RemoteFile {
    pub fn new(path: &str, size: u64) -> RemoteFile {
        RemoteFile {
            path: path.to_owned(),
            size,
        }
    }
}

#[derive(Clone, Debug)]
pub struct OracleConfig {
    pub ip: Ipv4Addr,
    pub control_port: u16,
    pub banner: String,
    pub files: Vec<RemoteFile>,
    /// Write-only directory; anything stored here is counted and dropped.
    pub upload_dir: String,
    pub conn_timeout: Duration,
}

const KIB: u64 = 1024;
const MIB: u64 = 1024 * KIB;
const GIB: u64 = 1024 * MIB;

impl Default for OracleConfig {
    fn default() -> Self {
        OracleConfig {
            ip: Ipv4Addr::LOCALHOST,
            control_port: 0,
            banner: "(vsFTPd 3.0.3)".to_owned(),
            files: vec![
                RemoteFile::new("/1KB.zip", KIB),
                RemoteFile::new("/100KB.zip", 100 * KIB),
                RemoteFile::new("/1MB.zip", MIB),
                RemoteFile::new("/10MB.zip", 10 * MIB),
                RemoteFile::new("/100MB.zip", 100 * MIB),
                RemoteFile::new("/1GB.zip", GIB),
            ],
            upload_dir: "/upload".to_owned(),
            conn_timeout: Duration::from_secs(30),
        }
    }
}
