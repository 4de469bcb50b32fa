//! Runs against the public speedtest server. These need network access
//! and move real data, so they only run when asked for with `--ignored`.
use std::time::Duration;

use crate::{Catalogue, Endpoint, ExpectedReplies, Fixtures, Runner, Session};

use tempdir::TempDir;

mod tests {
    use super::*;

    #[test]
    #[ignore]
    fn test_live_login_and_navigation() {
        let endpoint = Endpoint {
            timeout: Duration::from_secs(60),
            ..Endpoint::default()
        };
        let session = Session::connect(&endpoint).unwrap();
        assert_eq!(session.welcome().map(|w| w.code()), Some(220));
        assert_eq!(session.quit().unwrap().line(), "221 Goodbye.");

        let catalogue = Catalogue::standard(&Fixtures::default(), &ExpectedReplies::default());
        let report = Runner::new(endpoint, Fixtures::default())
            .run_all(catalogue.select(&["login".to_owned(), "navigation".to_owned(), "content".to_owned()]));
        assert!(report.is_success(), "{}", report);
    }

    #[test]
    #[ignore]
    fn test_live_transfers() {
        let dir = TempDir::new("ftp-suite-live").unwrap();
        let upload_local = dir.path().join("upload_100MB.zi");
        std::fs::write(&upload_local, vec![0u8; 1024 * 1024]).unwrap();
        let fixtures = Fixtures {
            download_file: "1MB.zip".to_owned(),
            download_dir: dir.path().to_path_buf(),
            upload_local,
            ..Fixtures::default()
        };
        let catalogue = Catalogue::standard(&fixtures, &ExpectedReplies::default());
        let report = Runner::new(Endpoint::default(), fixtures)
            .run_all(catalogue.select(&["download".to_owned(), "upload".to_owned()]));
        assert!(report.is_success(), "{}", report);
    }
}
