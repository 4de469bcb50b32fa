use crate::test_env::TestEnvironment;
use crate::Credentials;

mod tests {
    use super::*;

    #[test]
    fn test_transition_into_folder_without_login() {
        let env = TestEnvironment::new();
        let mut session = env.connect();
        let err = session.cwd("/upload").unwrap_err();
        assert_eq!(err.to_string(), "530 Please login with USER and PASS.");
        assert_eq!(
            session.pwd().unwrap_err().to_string(),
            "530 Please login with USER and PASS."
        );
    }

    #[test]
    fn test_transition_into_folder() {
        let env = TestEnvironment::new();
        let mut session = env.connect();
        session.login(&Credentials::Anonymous).unwrap();
        assert_eq!(session.pwd().unwrap(), "/");
        session.cwd("/upload").unwrap();
        assert_eq!(session.pwd().unwrap(), "/upload");
        assert_eq!(session.quit().unwrap().line(), "221 Goodbye.");
    }

    #[test]
    fn test_transition_from_folder() {
        let env = TestEnvironment::new();
        let mut session = env.connect();
        session.login(&Credentials::Anonymous).unwrap();
        session.cwd("/upload").unwrap();
        session.cwd("/").unwrap();
        assert_eq!(session.pwd().unwrap(), "/");
    }

    #[test]
    fn test_missing_folder() {
        let env = TestEnvironment::new();
        let mut session = env.connect();
        session.login(&Credentials::Anonymous).unwrap();
        let err = session.cwd("/pictures").unwrap_err();
        assert_eq!(err.to_string(), "550 Failed to change directory.");
        assert_eq!(session.pwd().unwrap(), "/");
    }
}
