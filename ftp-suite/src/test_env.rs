use std::fs::{self, File};
use std::io::Write;
use std::sync::Once;
use std::time::Duration;

use crate::{Catalogue, Endpoint, ExpectedReplies, Fixtures, Runner, Session};

use ftp_oracle::{OracleConfig, OracleHandle, OracleServer, ReceivedFile, RemoteFile};

use simplelog::*;
use tempdir::TempDir;

pub const DOWNLOAD_SIZE: u64 = 256 * 1024;
pub const UPLOAD_SIZE: usize = 64 * 1024;

/// A reference server on an ephemeral port plus a scratch directory
/// holding the file to upload and receiving downloads.
pub struct TestEnvironment {
    pub dir: TempDir,
    pub oracle: OracleHandle,
    pub endpoint: Endpoint,
    pub fixtures: Fixtures,
}

static INIT_LOG: Once = Once::new();

fn initialize_logger() {
    CombinedLogger::init(vec![
        TermLogger::new(
            LevelFilter::Warn,
            Config::default(),
            TerminalMode::Mixed,
            ColorChoice::Auto,
        ),
        WriteLogger::new(
            LevelFilter::Debug,
            Config::default(),
            File::create("test.log").unwrap(),
        ),
    ])
    .unwrap();
}

#[allow(dead_code)]
impl TestEnvironment {
    pub fn new() -> TestEnvironment {
        INIT_LOG.call_once(initialize_logger);
        let dir = TempDir::new("ftp-suite").unwrap();
        let config = OracleConfig {
            files: vec![
                RemoteFile::new("/100MB.zip", DOWNLOAD_SIZE),
                RemoteFile::new("/1GB.zip", 2 * DOWNLOAD_SIZE),
            ],
            conn_timeout: Duration::from_secs(5),
            ..OracleConfig::default()
        };
        let oracle = OracleServer::spawn(config).unwrap();
        let mut endpoint = Endpoint::from(oracle.addr);
        endpoint.timeout = Duration::from_secs(5);

        let download_dir = dir.path().join("downloads");
        fs::create_dir(&download_dir).unwrap();
        let fixtures = Fixtures {
            download_dir,
            upload_local: dir.path().join("upload_100MB.zi"),
            ..Fixtures::default()
        };
        let mut file = File::create(&fixtures.upload_local).unwrap();
        file.write_all(&vec![0x5a; UPLOAD_SIZE]).unwrap();

        TestEnvironment {
            dir,
            oracle,
            endpoint,
            fixtures,
        }
    }

    pub fn connect(&self) -> Session {
        Session::connect(&self.endpoint).unwrap()
    }

    pub fn runner(&self) -> Runner {
        Runner::new(self.endpoint.clone(), self.fixtures.clone())
    }

    pub fn catalogue(&self) -> Catalogue {
        Catalogue::standard(&self.fixtures, &ExpectedReplies::default())
    }

    pub fn received(&self) -> Vec<ReceivedFile> {
        self.oracle.received.files()
    }
}
