use crate::config::{CliConfig, Config, LogOpts, TomlConfig};
use ftp_oracle::{OracleConfig, OracleHandle, OracleServer, RemoteFile};
use ftp_suite::{Catalogue, Endpoint, Runner};

use anyhow::Context;
use clap::Parser;
use simplelog::{ColorChoice, CombinedLogger, SharedLogger, TermLogger, TerminalMode, WriteLogger};
use tempdir::TempDir;
use user_error::UserFacingError;

use std::fs::{read_to_string, File};
use std::io::ErrorKind;
use std::str::FromStr;

/// Size of the files the in-process server makes up for fixtures it does
/// not already serve, and of the generated upload.
const SELF_TEST_FILE_SIZE: u64 = 1024 * 1024;

pub struct App {}

impl App {
    pub fn run() -> Result<(), UserFacingError> {
        let mut config = Config::default();

        let cli_config = CliConfig::parse();

        let toml_config = if let Some(toml_path) = &cli_config.config_file {
            let toml_input = Self::fallible_config_read(toml_path)?;
            Some((toml_path.to_string(), toml_input))
        } else {
            Self::read_default_config()
        };

        if let Some((toml_path, toml_input)) = toml_config {
            let toml_config = Self::decode_toml(&toml_path, &toml_input)?;
            config.merge(&toml_config);
        }

        config.merge(&cli_config);

        Self::init_logger(&config.log)?;

        // Both must outlive the run: the scratch directory holds the upload
        // and the handle keeps the server's upload log.
        let _self_test = if config.oracle {
            Some(Self::start_oracle(&mut config)?)
        } else {
            None
        };

        let catalogue = Catalogue::standard(&config.fixtures, &config.replies);
        let selected = catalogue.select(&config.only);
        if selected.is_empty() {
            return Err(UserFacingError::new("No scenario matches the selection")
                .reason(format!("Nothing matches {}", config.only.join(", ")))
                .help(format!(
                    "Select a group ({}) or a group/name id, --list shows them all",
                    catalogue.groups().join(", ")
                )));
        }
        if config.list {
            for scenario in selected {
                println!("{}", scenario);
            }
            return Ok(());
        }

        log::info!("Checking {} against {} scenarios", config.endpoint, selected.len());
        let runner = Runner::new(config.endpoint.clone(), config.fixtures.clone());
        let report = runner.run_all(selected);
        println!("{}", report);

        if report.is_success() {
            Ok(())
        } else {
            Err(UserFacingError::new(format!(
                "{} of {} scenarios failed against {}",
                report.failed(),
                report.outcomes.len(),
                config.endpoint
            ))
            .help("Run with a console log level of debug to see the whole conversation"))
        }
    }

    fn init_logger(log_opts: &LogOpts) -> Result<(), UserFacingError> {
        let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
            log_opts.console.level,
            simplelog::Config::default(),
            TerminalMode::Mixed,
            ColorChoice::Auto,
        )];
        if let Some(file_opts) = &log_opts.file {
            let file = File::create(&file_opts.file_path).map_err(|err| {
                UserFacingError::new(format!("Could not open log file {}", file_opts.file_path))
                    .reason(err.to_string())
                    .help("Change log.file.path in the config file")
            })?;
            loggers.push(WriteLogger::new(
                file_opts.level,
                simplelog::Config::default(),
                file,
            ));
        }
        CombinedLogger::init(loggers).map_err(|err| {
            UserFacingError::new("Could not set up logging").reason(err.to_string())
        })
    }

    /// Points the run at a reference server on a local ephemeral port,
    /// with a freshly generated file to upload.
    fn start_oracle(config: &mut Config) -> Result<(TempDir, OracleHandle), UserFacingError> {
        Self::fallible_start_oracle(config).map_err(|err| {
            UserFacingError::new("Could not start the reference server")
                .reason(format!("{:#}", err))
                .help("Make sure the temporary directory is writable and loopback is available")
        })
    }

    fn fallible_start_oracle(config: &mut Config) -> anyhow::Result<(TempDir, OracleHandle)> {
        let dir = TempDir::new("ftp-check").context("Creating scratch directory")?;
        let upload_local = dir.path().join(&config.fixtures.upload_remote);
        let file = File::create(&upload_local)
            .with_context(|| format!("Creating {}", upload_local.display()))?;
        file.set_len(SELF_TEST_FILE_SIZE)
            .with_context(|| format!("Filling {}", upload_local.display()))?;

        let mut oracle_config = OracleConfig {
            upload_dir: config.fixtures.upload_dir.clone(),
            ..OracleConfig::default()
        };
        for name in [&config.fixtures.download_file, &config.fixtures.delete_target] {
            let path = format!("/{}", name.trim_start_matches('/'));
            if !oracle_config.files.iter().any(|file| file.path == path) {
                oracle_config.files.push(RemoteFile::new(&path, SELF_TEST_FILE_SIZE));
            }
        }
        let oracle = OracleServer::spawn(oracle_config).context("Binding the control port")?;
        log::info!("Reference server listening on {}", oracle.addr);

        config.endpoint = Endpoint {
            timeout: config.endpoint.timeout,
            ..Endpoint::from(oracle.addr)
        };
        config.fixtures.download_dir = dir.path().to_path_buf();
        config.fixtures.upload_local = upload_local;
        Ok((dir, oracle))
    }

    fn fallible_config_read(path: &str) -> Result<String, UserFacingError> {
        match read_to_string(path) {
            Ok(config) => Ok(config),
            Err(err) => {
                let error = UserFacingError::new(format!("Could not read {} config file", path));
                let error = match err.kind() {
                    ErrorKind::NotFound => error.reason("File not found"),
                    ErrorKind::PermissionDenied => {
                        error.reason("Insufficient permissions to open the file")
                    }
                    ErrorKind::InvalidData => error.reason("Config file is probably invalid UTF-8"),
                    _ => error.reason("It is due to unexpected reasons"),
                };
                Err(error.help(err.to_string()))
            }
        }
    }

    fn read_default_config() -> Option<(String, String)> {
        static TOML_CONFIG_PATHS: &[&str] = &["ftp-check.toml"];

        for path in TOML_CONFIG_PATHS {
            if let Ok(config) = read_to_string(path) {
                return Some((path.to_string(), config));
            }
        }
        None
    }

    fn decode_toml(toml_path: &str, toml_input: &str) -> Result<TomlConfig, UserFacingError> {
        match TomlConfig::from_str(toml_input) {
            Ok(toml_config) => Ok(toml_config),
            Err(err) => {
                let error = UserFacingError::new(format!("Unable to decode {} file", toml_path))
                    .reason("Could not deserialize toml input");
                let error = match err.line_col() {
                    None => error,
                    Some((line, col)) => {
                        error.help(format!("The problem is on line {} column {}", line + 1, col + 1))
                    }
                };
                Err(error.help(err.to_string()))
            }
        }
    }
}
