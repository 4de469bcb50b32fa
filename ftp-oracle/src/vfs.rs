use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use crate::OracleConfig;

use path_dedot::ParseDot;

#[derive(thiserror::Error, Debug)]
pub enum FsError {
    #[error("anonymous users may not modify the tree")]
    PermissionDenied,
    #[error("no such directory {0}")]
    NoSuchDirectory(String),
    #[error("cannot open {0}")]
    CannotOpen(String),
    #[error("no size for {0}")]
    NoSize(String),
    #[error("cannot create {0}")]
    CannotCreate(String),
}

/// Read-only listing of the served tree. Only the upload directory accepts
/// writes and it never keeps what it receives.
#[derive(Debug, Clone)]
pub struct VirtualTree {
    dirs: BTreeSet<String>,
    files: BTreeMap<String, u64>,
    upload_dir: String,
}

impl VirtualTree {
    pub fn new(config: &OracleConfig) -> VirtualTree {
        let upload_dir = Self::normalize("/", &config.upload_dir);
        let mut dirs = BTreeSet::new();
        dirs.insert("/".to_owned());
        Self::insert_with_parents(&mut dirs, &upload_dir);

        let mut files = BTreeMap::new();
        for file in &config.files {
            let path = Self::normalize("/", &file.path);
            Self::insert_with_parents(&mut dirs, &Self::parent(&path));
            files.insert(path, file.size);
        }
        VirtualTree {
            dirs,
            files,
            upload_dir,
        }
    }

    /// Joins `path` onto `cwd` and folds `.` and `..` away.
    pub fn normalize(cwd: &str, path: &str) -> String {
        let joined = Path::new("/").join(cwd).join(path);
        let folded = match joined.parse_dot() {
            Ok(folded) => folded.to_string_lossy().into_owned(),
            Err(_) => joined.to_string_lossy().into_owned(),
        };
        match folded.trim_end_matches('/') {
            "" => "/".to_owned(),
            trimmed => trimmed.to_owned(),
        }
    }

    pub fn parent(path: &str) -> String {
        match path.rsplit_once('/') {
            Some(("", _)) | None => "/".to_owned(),
            Some((parent, _)) => parent.to_owned(),
        }
    }

    fn insert_with_parents(dirs: &mut BTreeSet<String>, dir: &str) {
        let mut dir = dir.to_owned();
        while dir != "/" {
            let parent = Self::parent(&dir);
            dirs.insert(dir);
            dir = parent;
        }
    }

    pub fn change_dir(&self, cwd: &str, path: &str) -> Result<String, FsError> {
        let target = Self::normalize(cwd, path);
        if self.dirs.contains(&target) {
            Ok(target)
        } else {
            Err(FsError::NoSuchDirectory(target))
        }
    }

    pub fn size(&self, cwd: &str, path: &str) -> Result<u64, FsError> {
        let target = Self::normalize(cwd, path);
        self.files
            .get(&target)
            .copied()
            .ok_or(FsError::NoSize(target))
    }

    pub fn open(&self, cwd: &str, path: &str) -> Result<(String, u64), FsError> {
        let target = Self::normalize(cwd, path);
        match self.files.get(&target) {
            Some(size) => Ok((target, *size)),
            None => Err(FsError::CannotOpen(target)),
        }
    }

    /// Resolves the destination of a STOR. Only direct children of the
    /// upload directory are accepted.
    pub fn create(&self, cwd: &str, path: &str) -> Result<String, FsError> {
        let target = Self::normalize(cwd, path);
        if Self::parent(&target) == self.upload_dir && !self.dirs.contains(&target) {
            Ok(target)
        } else {
            Err(FsError::CannotCreate(target))
        }
    }
}
