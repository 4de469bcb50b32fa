use std::time::Duration;

use clap::Parser;

use super::{Config, ConfigChanges};

#[derive(Parser)]
#[clap(version, author, about = "Checks an FTP server against the replies of an anonymous-only site")]
pub struct CliConfig {
    /// Sets the path to toml configuration file
    #[clap(name = "config", short, long)]
    pub config_file: Option<String>,

    /// Host name or address of the server to check
    #[clap(long)]
    pub host: Option<String>,
    /// Control port of the server to check
    #[clap(short, long)]
    pub port: Option<u16>,
    /// Connect and read timeout in seconds
    #[clap(short, long)]
    pub timeout: Option<u64>,

    /// Runs only the given group or group/name scenario, may be repeated
    #[clap(long)]
    pub only: Vec<String>,
    /// Prints the selected scenarios instead of running them
    #[clap(long)]
    pub list: bool,
    /// Checks an in-process reference server instead of the target
    #[clap(long)]
    pub oracle: bool,
}

impl ConfigChanges for CliConfig {
    fn apply(&self, config: &mut Config) {
        if let Some(host) = &self.host {
            config.endpoint.host = host.clone();
        }
        if let Some(port) = self.port {
            config.endpoint.port = port;
        }
        if let Some(timeout) = self.timeout {
            config.endpoint.timeout = Duration::from_secs(timeout);
        }
        if !self.only.is_empty() {
            config.only = self.only.clone();
        }
        config.list |= self.list;
        config.oracle |= self.oracle;
    }
}
