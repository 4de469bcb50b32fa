use std::time::Duration;

use crate::test_env::TestEnvironment;
use crate::{Credentials, SessionError};

use ftp_oracle::SessionEnd;

mod tests {
    use super::*;

    #[test]
    fn test_welcome_and_goodbye() {
        let env = TestEnvironment::new();
        let session = env.connect();
        assert_eq!(session.welcome().unwrap().line(), "220 (vsFTPd 3.0.3)");
        assert_eq!(session.quit().unwrap().line(), "221 Goodbye.");
    }

    #[test]
    fn test_login_anonymous() {
        let env = TestEnvironment::new();
        let mut session = env.connect();
        let reply = session.login(&Credentials::Anonymous).unwrap();
        assert_eq!(reply.line(), "230 Login successful.");
        assert_eq!(session.quit().unwrap().line(), "221 Goodbye.");
    }

    #[test]
    fn test_login_user() {
        let env = TestEnvironment::new();
        let mut session = env.connect();
        let err = session
            .login(&Credentials::user("username", "user_password"))
            .unwrap_err();
        assert!(matches!(err, SessionError::Rejected(_)));
        assert_eq!(err.to_string(), "530 This FTP server is anonymous only.");
        assert_eq!(session.quit().unwrap().line(), "221 Goodbye.");
    }

    #[test]
    fn test_dropped_session_quits() {
        let env = TestEnvironment::new();
        {
            let mut session = env.connect();
            session.login(&Credentials::Anonymous).unwrap();
        }
        assert_eq!(
            env.oracle.sessions.wait_for(1, Duration::from_secs(5)),
            vec![SessionEnd::Quit]
        );
    }
}
