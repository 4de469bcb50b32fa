use crate::test_env::TestEnvironment;
use crate::{Catalogue, Credentials, Expectation, ExpectedReplies, Failure, Scenario, Step};

mod tests {
    use super::*;

    fn single(steps: Vec<Step>, expect: Expectation) -> Scenario {
        Scenario {
            group: "adhoc",
            name: "scenario",
            description: "",
            steps,
            expect,
            goodbye: "221 Goodbye.".to_owned(),
        }
    }

    #[test]
    fn test_standard_catalogue_passes() {
        let env = TestEnvironment::new();
        let catalogue = env.catalogue();
        let report = env.runner().run_all(catalogue.select(&[]));
        assert_eq!(report.outcomes.len(), 18);
        for outcome in &report.outcomes {
            assert!(outcome.passed(), "{}", outcome);
        }
        assert!(report.is_success());

        let download = report.outcome("download/download_file").unwrap();
        assert_eq!(download.transfers.len(), 1);
        let upload = report.outcome("upload/upload_folder").unwrap();
        assert_eq!(upload.transfers.len(), 1);
        assert_eq!(env.received().len(), 1);
    }

    #[test]
    fn test_selected_group_only() {
        let env = TestEnvironment::new();
        let catalogue = env.catalogue();
        let report = env.runner().run_all(catalogue.select(&["navigation".to_owned()]));
        let ids: Vec<&str> = report.outcomes.iter().map(|o| o.id.as_str()).collect();
        assert_eq!(
            ids,
            vec![
                "navigation/transition_into_folder_without_login",
                "navigation/transition_into_folder",
                "navigation/transition_from_folder",
            ]
        );
        assert!(report.is_success());
    }

    #[test]
    fn test_different_wording_fails() {
        let env = TestEnvironment::new();
        let replies = ExpectedReplies {
            login_successful: "230 Welcome aboard.".to_owned(),
            permission_denied: "550 Nope.".to_owned(),
            ..ExpectedReplies::default()
        };
        let catalogue = Catalogue::standard(&env.fixtures, &replies);
        let report = env.runner().run_all(catalogue.select(&[
            "login/login_anonymous".to_owned(),
            "content/delete_file".to_owned(),
        ]));
        assert_eq!(report.failed(), 2);
        assert!(matches!(
            report.outcomes[0].failure,
            Some(Failure::WrongReply { .. })
        ));
        match &report.outcomes[1].failure {
            Some(Failure::WrongRejection { step, actual, .. }) => {
                assert_eq!(step, "DELE 1GB.zip");
                assert_eq!(actual, "550 Permission denied.");
            }
            other => panic!("unexpected outcome {:?}", other),
        }
    }

    #[test]
    fn test_unexpected_success_fails() {
        let env = TestEnvironment::new();
        let scenario = single(
            vec![Step::Login(Credentials::Anonymous)],
            Expectation::Rejected("530 This FTP server is anonymous only.".to_owned()),
        );
        let outcome = env.runner().run(&scenario);
        assert!(matches!(outcome.failure, Some(Failure::UnexpectedSuccess(_))));
    }

    #[test]
    fn test_unexpected_rejection_fails() {
        let env = TestEnvironment::new();
        let scenario = single(
            vec![Step::Cwd("/upload".to_owned())],
            Expectation::Completes,
        );
        let outcome = env.runner().run(&scenario);
        match outcome.failure {
            Some(Failure::Step { step, source }) => {
                assert_eq!(step, "CWD /upload");
                assert_eq!(source.to_string(), "530 Please login with USER and PASS.");
            }
            other => panic!("unexpected outcome {:?}", other),
        }
    }

    #[test]
    fn test_wrong_goodbye_fails() {
        let env = TestEnvironment::new();
        let mut scenario = single(vec![Step::Login(Credentials::Anonymous)], Expectation::Completes);
        scenario.goodbye = "221 See you.".to_owned();
        let outcome = env.runner().run(&scenario);
        assert!(matches!(outcome.failure, Some(Failure::WrongGoodbye { .. })));
    }
}
