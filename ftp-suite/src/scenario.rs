use std::fmt::{Display, Formatter};

use crate::Credentials;

/// One client action. Transfers carry the names they work on so a scenario
/// reads on its own.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    Login(Credentials),
    Cwd(String),
    Mkd(String),
    Dele(String),
    Pwd,
    Size(String),
    Download { remote: String },
    Upload { remote: String },
}

impl Display for Step {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Step::Login(credentials) => write!(f, "LOGIN {}", credentials),
            Step::Cwd(path) => write!(f, "CWD {}", path),
            Step::Mkd(path) => write!(f, "MKD {}", path),
            Step::Dele(path) => write!(f, "DELE {}", path),
            Step::Pwd => f.write_str("PWD"),
            Step::Size(path) => write!(f, "SIZE {}", path),
            Step::Download { remote } => write!(f, "DOWNLOAD {}", remote),
            Step::Upload { remote } => write!(f, "UPLOAD {}", remote),
        }
    }
}

/// What has to be observed for a scenario to pass.
#[derive(Debug, Clone, PartialEq)]
pub enum Expectation {
    /// Every step succeeds.
    Completes,
    /// Every step succeeds and the last one answers with this line.
    Replies(String),
    /// A step is refused with exactly this line. Steps after it are skipped.
    Rejected(String),
    /// Every step succeeds and the last PWD reports this directory.
    WorkingDirectory(String),
}

impl Display for Expectation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Expectation::Completes => f.write_str("completes"),
            Expectation::Replies(line) => write!(f, "replies {:?}", line),
            Expectation::Rejected(line) => write!(f, "rejected with {:?}", line),
            Expectation::WorkingDirectory(path) => write!(f, "working directory {:?}", path),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Scenario {
    pub group: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub steps: Vec<Step>,
    pub expect: Expectation,
    /// Line QUIT must answer with once the steps are over.
    pub goodbye: String,
}

impl Scenario {
    pub fn id(&self) -> String {
        format!("{}/{}", self.group, self.name)
    }

    /// `filter` is either a group or a `group/name` id.
    pub fn matches(&self, filter: &str) -> bool {
        let filter = filter.trim_matches('/');
        match filter.split_once('/') {
            Some((group, name)) => self.group == group && self.name == name,
            None => self.group == filter,
        }
    }
}

impl Display for Scenario {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let steps: Vec<String> = self.steps.iter().map(|step| step.to_string()).collect();
        write!(
            f,
            "{:<48} [{}] {}",
            self.id(),
            steps.join(", "),
            self.expect
        )
    }
}
