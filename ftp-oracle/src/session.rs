use std::sync::Arc;

use crate::{FsError, Reply, VirtualTree};

use anyhow::{Error, Result};

/// User names vsftpd treats as the anonymous account.
const ANONYMOUS_USERS: &[&str] = &["anonymous", "ftp"];

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("client is not logged in")]
    NotLoggedIn,
    #[error("only anonymous logins are accepted")]
    AnonymousOnly,
    #[error("PASS received before USER")]
    UserFirst,
    #[error("client is already logged in")]
    AlreadyLoggedIn,
}

/// Control connection state of one client.
pub struct Session {
    pub has_quit: bool,
    pending_user: Option<String>,
    tree: Arc<VirtualTree>,
    commands_impl: Box<dyn CommandsImpl + Send>,
}

impl Session {
    pub fn new(tree: Arc<VirtualTree>) -> Session {
        Session {
            has_quit: false,
            pending_user: None,
            tree,
            commands_impl: Box::new(NotLoggedIn {}),
        }
    }

    pub fn quit(&mut self) {
        self.has_quit = true;
    }

    pub fn is_logged_in(&self) -> bool {
        self.commands_impl.require_login().is_ok()
    }

    pub fn require_login(&self) -> Result<()> {
        self.commands_impl.require_login()
    }

    pub fn user(&mut self, username: &str) -> Result<Reply> {
        if self.is_logged_in() {
            return Err(Error::new(AuthError::AlreadyLoggedIn));
        }
        if !ANONYMOUS_USERS.contains(&username.to_ascii_lowercase().as_str()) {
            self.pending_user = None;
            return Err(Error::new(AuthError::AnonymousOnly));
        }
        self.pending_user = Some(username.to_owned());
        Ok(Reply::SpecifyPassword)
    }

    pub fn pass(&mut self) -> Result<Reply> {
        if self.is_logged_in() {
            return Ok(Reply::LoginSuccessful);
        }
        let username = self
            .pending_user
            .take()
            .ok_or(AuthError::UserFirst)?;
        log::info!("Anonymous login as {}", username);
        self.commands_impl = Box::new(Anonymous::new(self.tree.clone()));
        Ok(Reply::LoginSuccessful)
    }

    pub fn pwd(&self) -> Result<String> {
        self.commands_impl.pwd()
    }

    pub fn cwd(&mut self, path: &str) -> Result<()> {
        self.commands_impl.cwd(path)
    }

    pub fn cdup(&mut self) -> Result<()> {
        self.commands_impl.cwd("..")
    }

    /// MKD, RMD, DELE and RNFR all modify the tree.
    pub fn modify(&self, path: &str) -> Result<Reply> {
        self.commands_impl.modify(path)
    }

    pub fn size(&self, path: &str) -> Result<u64> {
        self.commands_impl.size(path)
    }

    pub fn open(&self, path: &str) -> Result<(String, u64)> {
        self.commands_impl.open(path)
    }

    pub fn create(&self, path: &str) -> Result<String> {
        self.commands_impl.create(path)
    }
}

trait CommandsImpl {
    fn require_login(&self) -> Result<()>;
    fn pwd(&self) -> Result<String>;
    fn cwd(&mut self, path: &str) -> Result<()>;
    fn modify(&self, path: &str) -> Result<Reply>;
    fn size(&self, path: &str) -> Result<u64>;
    fn open(&self, path: &str) -> Result<(String, u64)>;
    fn create(&self, path: &str) -> Result<String>;
}

struct Anonymous {
    tree: Arc<VirtualTree>,
    working_dir: String,
}

impl Anonymous {
    fn new(tree: Arc<VirtualTree>) -> Anonymous {
        Anonymous {
            tree,
            working_dir: "/".to_owned(),
        }
    }
}

impl CommandsImpl for Anonymous {
    fn require_login(&self) -> Result<()> {
        Ok(())
    }

    fn pwd(&self) -> Result<String> {
        Ok(self.working_dir.clone())
    }

    fn cwd(&mut self, path: &str) -> Result<()> {
        self.working_dir = self.tree.change_dir(&self.working_dir, path)?;
        Ok(())
    }

    fn modify(&self, path: &str) -> Result<Reply> {
        log::debug!("Refusing to modify {} for an anonymous user", path);
        Err(Error::new(FsError::PermissionDenied))
    }

    fn size(&self, path: &str) -> Result<u64> {
        Ok(self.tree.size(&self.working_dir, path)?)
    }

    fn open(&self, path: &str) -> Result<(String, u64)> {
        Ok(self.tree.open(&self.working_dir, path)?)
    }

    fn create(&self, path: &str) -> Result<String> {
        Ok(self.tree.create(&self.working_dir, path)?)
    }
}

struct NotLoggedIn {}

impl CommandsImpl for NotLoggedIn {
    fn require_login(&self) -> Result<()> {
        Err(Error::new(AuthError::NotLoggedIn))
    }

    fn pwd(&self) -> Result<String> {
        Err(Error::new(AuthError::NotLoggedIn))
    }

    fn cwd(&mut self, _path: &str) -> Result<()> {
        Err(Error::new(AuthError::NotLoggedIn))
    }

    fn modify(&self, _path: &str) -> Result<Reply> {
        Err(Error::new(AuthError::NotLoggedIn))
    }

    fn size(&self, _path: &str) -> Result<u64> {
        Err(Error::new(AuthError::NotLoggedIn))
    }

    fn open(&self, _path: &str) -> Result<(String, u64)> {
        Err(Error::new(AuthError::NotLoggedIn))
    }

    fn create(&self, _path: &str) -> Result<String> {
        Err(Error::new(AuthError::NotLoggedIn))
    }
}
