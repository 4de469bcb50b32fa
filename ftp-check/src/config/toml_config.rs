use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use super::{Config, ConfigChanges};

use ftp_suite::Credentials;
use log::LevelFilter;
use serde::Deserialize;

#[derive(Deserialize, Debug)]
pub struct TomlConfig {
    target: Option<TargetConfig>,
    credentials: Option<CredentialsConfig>,
    fixtures: Option<FixturesConfig>,
    replies: Option<RepliesConfig>,
    only: Option<Vec<String>>,
    #[serde(rename(deserialize = "log"))]
    log_opts: Option<LogOpts>,
}

impl FromStr for TomlConfig {
    type Err = toml::de::Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let config = toml::from_str(s)?;
        Ok(config)
    }
}

fn set<T: Clone>(target: &mut T, value: &Option<T>) {
    if let Some(value) = value {
        *target = value.clone();
    }
}

impl ConfigChanges for TomlConfig {
    fn apply(&self, config: &mut Config) {
        if let Some(target) = &self.target {
            set(&mut config.endpoint.host, &target.host);
            set(&mut config.endpoint.port, &target.port);
            if let Some(timeout) = target.timeout {
                config.endpoint.timeout = Duration::from_secs(timeout);
            }
        }
        if let Some(credentials) = &self.credentials {
            config.fixtures.named_user = Credentials::user(&credentials.user, &credentials.password);
        }
        if let Some(fixtures) = &self.fixtures {
            let target = &mut config.fixtures;
            set(&mut target.download_file, &fixtures.download_file);
            set(&mut target.download_dir, &fixtures.download_dir);
            set(&mut target.delete_target, &fixtures.delete_target);
            set(&mut target.new_directory, &fixtures.new_directory);
            set(&mut target.upload_dir, &fixtures.upload_dir);
            set(&mut target.upload_local, &fixtures.upload_local);
            set(&mut target.upload_remote, &fixtures.upload_remote);
        }
        if let Some(replies) = &self.replies {
            let target = &mut config.replies;
            set(&mut target.login_successful, &replies.login_successful);
            set(&mut target.anonymous_only, &replies.anonymous_only);
            set(&mut target.please_login, &replies.please_login);
            set(&mut target.permission_denied, &replies.permission_denied);
            set(&mut target.could_not_create_file, &replies.could_not_create_file);
            set(&mut target.could_not_get_file_size, &replies.could_not_get_file_size);
            set(&mut target.goodbye, &replies.goodbye);
        }
        set(&mut config.only, &self.only);
        if let Some(log_opts) = &self.log_opts {
            if let Some(file_log_opts) = log_opts.file_log_opts.clone() {
                config.log.file = Some(super::FileLogOpts {
                    file_path: file_log_opts.path,
                    level: file_log_opts.level.into(),
                });
            }
            if let Some(console_log_opts) = log_opts.console_log_opts.clone() {
                config.log.console.level = console_log_opts.level.into();
            }
        }
    }
}

#[derive(Deserialize, Debug)]
struct TargetConfig {
    host: Option<String>,
    port: Option<u16>,
    timeout: Option<u64>,
}

#[derive(Deserialize, Debug)]
struct CredentialsConfig {
    user: String,
    password: String,
}

#[derive(Deserialize, Debug)]
struct FixturesConfig {
    download_file: Option<String>,
    download_dir: Option<PathBuf>,
    delete_target: Option<String>,
    new_directory: Option<String>,
    upload_dir: Option<String>,
    upload_local: Option<PathBuf>,
    upload_remote: Option<String>,
}

#[derive(Deserialize, Debug)]
struct RepliesConfig {
    login_successful: Option<String>,
    anonymous_only: Option<String>,
    please_login: Option<String>,
    permission_denied: Option<String>,
    could_not_create_file: Option<String>,
    could_not_get_file_size: Option<String>,
    goodbye: Option<String>,
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "lowercase")]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

#[derive(Deserialize, Clone, Debug)]
struct FileLogOpts {
    path: String,
    level: LogLevel,
}

#[derive(Deserialize, Clone, Debug)]
struct ConsoleLogOpts {
    level: LogLevel,
}

#[derive(Deserialize, Debug)]
struct LogOpts {
    #[serde(rename(deserialize = "file"))]
    file_log_opts: Option<FileLogOpts>,
    #[serde(rename(deserialize = "console"))]
    console_log_opts: Option<ConsoleLogOpts>,
}
