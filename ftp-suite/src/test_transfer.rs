use std::fs;

use crate::test_env::{TestEnvironment, DOWNLOAD_SIZE, UPLOAD_SIZE};
use crate::{Credentials, Direction, SessionError};

use ftp_oracle::ReceivedFile;

mod tests {
    use super::*;

    #[test]
    fn test_download_file_without_login() {
        let env = TestEnvironment::new();
        let mut session = env.connect();
        let err = session
            .download("100MB.zip", &env.fixtures.download_dir)
            .unwrap_err();
        assert_eq!(err.to_string(), "530 Please login with USER and PASS.");
        assert_eq!(session.quit().unwrap().line(), "221 Goodbye.");
    }

    #[test]
    fn test_download_file() {
        let env = TestEnvironment::new();
        let mut session = env.connect();
        session.login(&Credentials::Anonymous).unwrap();
        let report = session
            .download("100MB.zip", &env.fixtures.download_dir)
            .unwrap();
        assert_eq!(report.direction, Direction::Download);
        assert_eq!(report.bytes, DOWNLOAD_SIZE);
        let written = fs::read(env.fixtures.download_dir.join("100MB.zip")).unwrap();
        assert_eq!(written.len() as u64, DOWNLOAD_SIZE);
        assert!(written.iter().all(|b| *b == 0));
        assert_eq!(session.quit().unwrap().line(), "221 Goodbye.");
    }

    #[test]
    fn test_download_missing_file() {
        let env = TestEnvironment::new();
        let mut session = env.connect();
        session.login(&Credentials::Anonymous).unwrap();
        let err = session
            .download("5GB.zip", &env.fixtures.download_dir)
            .unwrap_err();
        assert_eq!(err.to_string(), "550 Could not get file size.");
    }

    #[test]
    fn test_upload_without_login() {
        let env = TestEnvironment::new();
        let mut session = env.connect();
        let err = session
            .upload(&env.fixtures.upload_local, "upload_100MB.zi")
            .unwrap_err();
        assert_eq!(err.to_string(), "530 Please login with USER and PASS.");
        assert!(session.cwd("upload").is_err());
        assert!(env.received().is_empty());
    }

    #[test]
    fn test_upload_root_folder() {
        let env = TestEnvironment::new();
        let mut session = env.connect();
        session.login(&Credentials::Anonymous).unwrap();
        let err = session
            .upload(&env.fixtures.upload_local, "upload_100MB.zi")
            .unwrap_err();
        assert_eq!(err.to_string(), "553 Could not create file.");
        assert_eq!(session.quit().unwrap().line(), "221 Goodbye.");
        assert!(env.received().is_empty());
    }

    #[test]
    fn test_upload_folder() {
        let env = TestEnvironment::new();
        let mut session = env.connect();
        session.login(&Credentials::Anonymous).unwrap();
        session.cwd("upload").unwrap();
        let report = session
            .upload(&env.fixtures.upload_local, "upload_100MB.zi")
            .unwrap();
        assert_eq!(report.direction, Direction::Upload);
        assert_eq!(report.bytes, UPLOAD_SIZE as u64);
        assert_eq!(session.quit().unwrap().line(), "221 Goodbye.");
        assert_eq!(
            env.received(),
            vec![ReceivedFile {
                path: "/upload/upload_100MB.zi".to_owned(),
                size: UPLOAD_SIZE as u64,
            }]
        );
    }

    #[test]
    fn test_uploaded_file_not_retained() {
        let env = TestEnvironment::new();
        let mut session = env.connect();
        session.login(&Credentials::Anonymous).unwrap();
        session.cwd("upload").unwrap();
        session
            .upload(&env.fixtures.upload_local, "upload_100MB.zi")
            .unwrap();
        let err = session.size("/upload/upload_100MB.zi").unwrap_err();
        assert_eq!(err.to_string(), "550 Could not get file size.");
    }

    #[test]
    fn test_upload_missing_local_file() {
        let env = TestEnvironment::new();
        let mut session = env.connect();
        session.login(&Credentials::Anonymous).unwrap();
        let missing = env.dir.path().join("nothing.zi");
        let err = session.upload(&missing, "nothing.zi").unwrap_err();
        assert!(matches!(err, SessionError::LocalFile { .. }));
        assert_eq!(session.quit().unwrap().line(), "221 Goodbye.");
    }
}
