use crate::test_env::TestEnvironment;
use crate::Credentials;

mod tests {
    use super::*;

    const PLEASE_LOGIN: &str = "530 Please login with USER and PASS.";
    const PERMISSION_DENIED: &str = "550 Permission denied.";

    #[test]
    fn test_create_root_folder_without_login() {
        let env = TestEnvironment::new();
        let mut session = env.connect();
        let err = session.mkd("/pictures").unwrap_err();
        assert_eq!(err.to_string(), PLEASE_LOGIN);
        assert_eq!(session.quit().unwrap().line(), "221 Goodbye.");
    }

    #[test]
    fn test_create_root_folder() {
        let env = TestEnvironment::new();
        let mut session = env.connect();
        session.login(&Credentials::Anonymous).unwrap();
        let err = session.mkd("/pictures").unwrap_err();
        assert_eq!(err.reply().unwrap().code(), 550);
        assert_eq!(err.to_string(), PERMISSION_DENIED);
        assert_eq!(session.quit().unwrap().line(), "221 Goodbye.");
    }

    #[test]
    fn test_create_upload_folder() {
        let env = TestEnvironment::new();
        let mut session = env.connect();
        assert_eq!(session.cwd("upload").unwrap_err().to_string(), PLEASE_LOGIN);
        assert_eq!(session.mkd("/pictures").unwrap_err().to_string(), PLEASE_LOGIN);
        session.login(&Credentials::Anonymous).unwrap();
        session.cwd("upload").unwrap();
        assert_eq!(session.mkd("/pictures").unwrap_err().to_string(), PERMISSION_DENIED);
        assert_eq!(session.mkd("pictures").unwrap_err().to_string(), PERMISSION_DENIED);
    }

    #[test]
    fn test_delete_file() {
        let env = TestEnvironment::new();
        let mut session = env.connect();
        assert_eq!(session.dele("1GB.zip").unwrap_err().to_string(), PLEASE_LOGIN);
        session.login(&Credentials::Anonymous).unwrap();
        assert_eq!(session.dele("1GB.zip").unwrap_err().to_string(), PERMISSION_DENIED);
        assert_eq!(session.size("1GB.zip").unwrap(), 2 * crate::test_env::DOWNLOAD_SIZE);
        assert_eq!(session.quit().unwrap().line(), "221 Goodbye.");
    }
}
