mod catalogue;
mod config;
mod error;
mod reply;
mod runner;
mod scenario;
mod session;
mod transfer;

#[cfg(test)]
mod test_env;
#[cfg(test)]
mod test_content;
#[cfg(test)]
mod test_live;
#[cfg(test)]
mod test_login;
#[cfg(test)]
mod test_navigation;
#[cfg(test)]
mod test_runner;
#[cfg(test)]
mod test_transfer;

pub use catalogue::{Catalogue, ExpectedReplies};
pub use config::{Credentials, Endpoint, Fixtures};
pub use error::SessionError;
pub use reply::{ParseReplyError, ServerReply};
pub use runner::{Failure, Outcome, Report, Runner};
pub use scenario::{Expectation, Scenario, Step};
pub use session::Session;
pub use transfer::{Direction, TransferReport};
