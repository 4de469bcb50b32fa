use std::default::Default;

use ftp_suite::{Endpoint, ExpectedReplies, Fixtures};

use log::LevelFilter;

pub struct Config {
    pub endpoint: Endpoint,
    pub fixtures: Fixtures,
    pub replies: ExpectedReplies,
    /// Groups or `group/name` ids to run; everything when empty.
    pub only: Vec<String>,
    pub list: bool,
    pub oracle: bool,
    pub log: LogOpts,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            endpoint: Endpoint::default(),
            fixtures: Fixtures::default(),
            replies: ExpectedReplies::default(),
            only: Vec::new(),
            list: false,
            oracle: false,
            log: LogOpts::default(),
        }
    }
}

impl Config {
    pub fn merge<C: ?Sized>(&mut self, changes: &C)
    where
        C: ConfigChanges,
    {
        changes.apply(self)
    }
}

pub trait ConfigChanges {
    fn apply(&self, config: &mut Config);
}

#[derive(Default)]
pub struct LogOpts {
    pub file: Option<FileLogOpts>,
    pub console: ConsoleLogOpts,
}

pub struct FileLogOpts {
    pub file_path: String,
    pub level: LevelFilter,
}

pub struct ConsoleLogOpts {
    pub level: LevelFilter,
}

impl Default for ConsoleLogOpts {
    fn default() -> Self {
        ConsoleLogOpts {
            level: LevelFilter::Warn,
        }
    }
}
