use std::fmt::{Display, Formatter};
use std::time::{Duration, Instant};

use crate::scenario::{Expectation, Scenario, Step};
use crate::transfer::TransferReport;
use crate::{Endpoint, Fixtures, ServerReply, Session, SessionError};

/// Why a scenario did not pass.
#[derive(thiserror::Error, Debug)]
pub enum Failure {
    #[error("could not open a session: {0}")]
    Setup(#[source] SessionError),
    #[error("{step} failed: {source}")]
    Step {
        step: String,
        #[source]
        source: SessionError,
    },
    #[error("{step} was answered with {actual:?}, expected {expected:?}")]
    WrongRejection {
        step: String,
        expected: String,
        actual: String,
    },
    #[error("every step succeeded, expected a rejection with {0:?}")]
    UnexpectedSuccess(String),
    #[error("got reply {actual:?}, expected {expected:?}")]
    WrongReply { expected: String, actual: String },
    #[error("working directory is {actual:?}, expected {expected:?}")]
    WrongDirectory { expected: String, actual: String },
    #[error("no step produced a {0} to check")]
    NothingToCheck(&'static str),
    #[error("QUIT failed: {0}")]
    Teardown(#[source] SessionError),
    #[error("QUIT was answered with {actual:?}, expected {expected:?}")]
    WrongGoodbye { expected: String, actual: String },
}

#[derive(Debug)]
pub struct Outcome {
    pub id: String,
    pub failure: Option<Failure>,
    pub transfers: Vec<TransferReport>,
    pub elapsed: Duration,
}

impl Outcome {
    pub fn passed(&self) -> bool {
        self.failure.is_none()
    }
}

impl Display for Outcome {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.failure {
            None => write!(f, "PASS {} ({:.2?})", self.id, self.elapsed)?,
            Some(failure) => write!(f, "FAIL {}: {}", self.id, failure)?,
        }
        for transfer in &self.transfers {
            write!(f, "\n     {}", transfer)?;
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct Report {
    pub outcomes: Vec<Outcome>,
}

impl Report {
    pub fn passed(&self) -> usize {
        self.outcomes.iter().filter(|outcome| outcome.passed()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.passed()
    }

    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }

    pub fn outcome(&self, id: &str) -> Option<&Outcome> {
        self.outcomes.iter().find(|outcome| outcome.id == id)
    }
}

impl Display for Report {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for outcome in &self.outcomes {
            writeln!(f, "{}", outcome)?;
        }
        write!(
            f,
            "{} scenarios, {} passed, {} failed",
            self.outcomes.len(),
            self.passed(),
            self.failed()
        )
    }
}

/// What the steps of a scenario left behind for the verdict.
#[derive(Default)]
struct Observed {
    reply: Option<ServerReply>,
    working_dir: Option<String>,
    transfers: Vec<TransferReport>,
}

pub struct Runner {
    endpoint: Endpoint,
    fixtures: Fixtures,
}

impl Runner {
    pub fn new(endpoint: Endpoint, fixtures: Fixtures) -> Runner {
        Runner { endpoint, fixtures }
    }

    pub fn run_all<'a>(&self, scenarios: impl IntoIterator<Item = &'a Scenario>) -> Report {
        let outcomes = scenarios
            .into_iter()
            .map(|scenario| self.run(scenario))
            .collect();
        Report { outcomes }
    }

    /// Opens a session, plays the steps, judges the result and quits.
    pub fn run(&self, scenario: &Scenario) -> Outcome {
        log::info!("Running {}: {}", scenario.id(), scenario.description);
        let start = Instant::now();
        let mut observed = Observed::default();
        let failure = match Session::connect(&self.endpoint) {
            Ok(mut session) => {
                let verdict = self.play(scenario, &mut session, &mut observed);
                let teardown = Self::teardown(scenario, session);
                verdict.and(teardown).err()
            }
            Err(err) => Some(Failure::Setup(err)),
        };
        match &failure {
            None => log::info!("{} passed", scenario.id()),
            Some(failure) => log::warn!("{} failed: {}", scenario.id(), failure),
        }
        Outcome {
            id: scenario.id(),
            failure,
            transfers: observed.transfers,
            elapsed: start.elapsed(),
        }
    }

    fn play(&self, scenario: &Scenario, session: &mut Session, observed: &mut Observed) -> Result<(), Failure> {
        for step in &scenario.steps {
            log::debug!("{}: {}", scenario.id(), step);
            if let Err(err) = self.perform(step, session, observed) {
                return match &scenario.expect {
                    Expectation::Rejected(expected) => match err.reply() {
                        Some(reply) if reply.line() == expected => {
                            log::debug!("{} was rejected as expected: {}", step, reply);
                            Ok(())
                        }
                        _ => Err(Failure::WrongRejection {
                            step: step.to_string(),
                            expected: expected.clone(),
                            actual: err.to_string(),
                        }),
                    },
                    _ => Err(Failure::Step {
                        step: step.to_string(),
                        source: err,
                    }),
                };
            }
        }
        Self::judge(&scenario.expect, observed)
    }

    fn perform(&self, step: &Step, session: &mut Session, observed: &mut Observed) -> Result<(), SessionError> {
        match step {
            Step::Login(credentials) => observed.reply = Some(session.login(credentials)?),
            Step::Cwd(path) => session.cwd(path)?,
            Step::Mkd(path) => session.mkd(path)?,
            Step::Dele(path) => session.dele(path)?,
            Step::Pwd => observed.working_dir = Some(session.pwd()?),
            Step::Size(path) => {
                let size = session.size(path)?;
                log::debug!("{} is {} bytes", path, size);
            }
            Step::Download { remote } => {
                let report = session.download(remote, &self.fixtures.download_dir)?;
                observed.transfers.push(report);
            }
            Step::Upload { remote } => {
                let report = session.upload(&self.fixtures.upload_local, remote)?;
                observed.transfers.push(report);
            }
        }
        Ok(())
    }

    fn judge(expect: &Expectation, observed: &Observed) -> Result<(), Failure> {
        match expect {
            Expectation::Completes => Ok(()),
            Expectation::Rejected(expected) => Err(Failure::UnexpectedSuccess(expected.clone())),
            Expectation::Replies(expected) => match &observed.reply {
                Some(reply) if reply.line() == expected => Ok(()),
                Some(reply) => Err(Failure::WrongReply {
                    expected: expected.clone(),
                    actual: reply.line().to_owned(),
                }),
                None => Err(Failure::NothingToCheck("reply")),
            },
            Expectation::WorkingDirectory(expected) => match &observed.working_dir {
                Some(dir) if dir == expected => Ok(()),
                Some(dir) => Err(Failure::WrongDirectory {
                    expected: expected.clone(),
                    actual: dir.clone(),
                }),
                None => Err(Failure::NothingToCheck("working directory")),
            },
        }
    }

    fn teardown(scenario: &Scenario, session: Session) -> Result<(), Failure> {
        let goodbye = session.quit().map_err(Failure::Teardown)?;
        if goodbye.line() == scenario.goodbye {
            Ok(())
        } else {
            Err(Failure::WrongGoodbye {
                expected: scenario.goodbye.clone(),
                actual: goodbye.line().to_owned(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Credentials;

    fn reply(line: &str) -> ServerReply {
        line.parse().unwrap()
    }

    #[test]
    fn test_judge() {
        let observed = Observed {
            reply: Some(reply("230 Login successful.")),
            working_dir: Some("/upload".to_owned()),
            transfers: Vec::new(),
        };
        assert!(Runner::judge(&Expectation::Completes, &observed).is_ok());
        assert!(Runner::judge(&Expectation::Replies("230 Login successful.".to_owned()), &observed).is_ok());
        assert!(Runner::judge(&Expectation::WorkingDirectory("/upload".to_owned()), &observed).is_ok());
        assert!(matches!(
            Runner::judge(&Expectation::WorkingDirectory("/".to_owned()), &observed),
            Err(Failure::WrongDirectory { .. })
        ));
        assert!(matches!(
            Runner::judge(&Expectation::Rejected("550 Permission denied.".to_owned()), &observed),
            Err(Failure::UnexpectedSuccess(_))
        ));
        assert!(matches!(
            Runner::judge(&Expectation::Replies("230 x".to_owned()), &Observed::default()),
            Err(Failure::NothingToCheck("reply"))
        ));
    }

    #[test]
    fn test_report_summary() {
        let report = Report {
            outcomes: vec![
                Outcome {
                    id: "login/login_anonymous".to_owned(),
                    failure: None,
                    transfers: Vec::new(),
                    elapsed: Duration::from_millis(3),
                },
                Outcome {
                    id: "login/login_user".to_owned(),
                    failure: Some(Failure::UnexpectedSuccess(
                        "530 This FTP server is anonymous only.".to_owned(),
                    )),
                    transfers: Vec::new(),
                    elapsed: Duration::from_millis(3),
                },
            ],
        };
        assert_eq!(report.passed(), 1);
        assert_eq!(report.failed(), 1);
        assert!(!report.is_success());
        let text = report.to_string();
        assert!(text.contains("FAIL login/login_user: every step succeeded"));
        assert!(text.ends_with("2 scenarios, 1 passed, 1 failed"));
        assert!(report.outcome("login/login_anonymous").unwrap().passed());
    }

    #[test]
    fn test_setup_failure_is_reported() {
        let runner = Runner::new(Endpoint::new("host.invalid", 21), Fixtures::default());
        let scenario = Scenario {
            group: "login",
            name: "login_anonymous",
            description: "",
            steps: vec![Step::Login(Credentials::Anonymous)],
            expect: Expectation::Completes,
            goodbye: "221 Goodbye.".to_owned(),
        };
        let outcome = runner.run(&scenario);
        assert!(matches!(outcome.failure, Some(Failure::Setup(_))));
    }
}
