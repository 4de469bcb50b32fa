use crate::scenario::{Expectation, Scenario, Step};
use crate::{Credentials, Fixtures};

/// Status lines the scenarios compare against, worded the way vsftpd
/// words them.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpectedReplies {
    pub login_successful: String,
    pub anonymous_only: String,
    pub please_login: String,
    pub permission_denied: String,
    pub could_not_create_file: String,
    pub could_not_get_file_size: String,
    pub goodbye: String,
}

impl Default for ExpectedReplies {
    fn default() -> Self {
        ExpectedReplies {
            login_successful: "230 Login successful.".to_owned(),
            anonymous_only: "530 This FTP server is anonymous only.".to_owned(),
            please_login: "530 Please login with USER and PASS.".to_owned(),
            permission_denied: "550 Permission denied.".to_owned(),
            could_not_create_file: "553 Could not create file.".to_owned(),
            could_not_get_file_size: "550 Could not get file size.".to_owned(),
            goodbye: "221 Goodbye.".to_owned(),
        }
    }
}

pub struct Catalogue {
    scenarios: Vec<Scenario>,
}

impl Catalogue {
    pub fn new(scenarios: Vec<Scenario>) -> Catalogue {
        Catalogue { scenarios }
    }

    /// The full set of checks against an anonymous-only server.
    pub fn standard(fixtures: &Fixtures, replies: &ExpectedReplies) -> Catalogue {
        let login = || Step::Login(Credentials::Anonymous);
        let cwd = |path: &str| Step::Cwd(path.to_owned());
        let mkd = || Step::Mkd(fixtures.new_directory.clone());
        let dele = || Step::Dele(fixtures.delete_target.clone());
        let download = || Step::Download {
            remote: fixtures.download_file.clone(),
        };
        let upload = || Step::Upload {
            remote: fixtures.upload_remote.clone(),
        };
        let upload_dir = fixtures.upload_dir.as_str();
        let upload_abs = format!("/{}", upload_dir.trim_matches('/'));
        let rejected = |line: &String| Expectation::Rejected(line.clone());

        let scenario = |group: &'static str,
                        name: &'static str,
                        description: &'static str,
                        steps: Vec<Step>,
                        expect: Expectation| Scenario {
            group,
            name,
            description,
            steps,
            expect,
            goodbye: replies.goodbye.clone(),
        };

        Catalogue::new(vec![
            scenario(
                "login",
                "login_anonymous",
                "Anonymous login is accepted",
                vec![login()],
                Expectation::Replies(replies.login_successful.clone()),
            ),
            scenario(
                "login",
                "login_user",
                "Login with a user name and password is refused",
                vec![Step::Login(fixtures.named_user.clone())],
                rejected(&replies.anonymous_only),
            ),
            scenario(
                "content",
                "create_root_folder_without_login",
                "Creating a folder in the root without logging in",
                vec![mkd()],
                rejected(&replies.please_login),
            ),
            scenario(
                "content",
                "create_root_folder",
                "Creating a folder in the root after logging in",
                vec![login(), mkd()],
                rejected(&replies.permission_denied),
            ),
            scenario(
                "content",
                "create_upload_folder_without_login",
                "Creating a folder from the upload folder without logging in",
                vec![cwd(upload_dir), mkd()],
                rejected(&replies.please_login),
            ),
            scenario(
                "content",
                "create_upload_folder",
                "Creating a folder from the upload folder after logging in",
                vec![login(), cwd(upload_dir), mkd()],
                rejected(&replies.permission_denied),
            ),
            scenario(
                "content",
                "delete_file_without_login",
                "Deleting a file without logging in",
                vec![dele()],
                rejected(&replies.please_login),
            ),
            scenario(
                "content",
                "delete_file",
                "Deleting a file after logging in",
                vec![login(), dele()],
                rejected(&replies.permission_denied),
            ),
            scenario(
                "download",
                "download_file_without_login",
                "Downloading a file without logging in",
                vec![download()],
                rejected(&replies.please_login),
            ),
            scenario(
                "download",
                "download_file",
                "Downloading a file after logging in",
                vec![login(), download()],
                Expectation::Completes,
            ),
            scenario(
                "navigation",
                "transition_into_folder_without_login",
                "Moving into the upload folder without logging in",
                vec![cwd(&upload_abs)],
                rejected(&replies.please_login),
            ),
            scenario(
                "navigation",
                "transition_into_folder",
                "Moving into the upload folder after logging in",
                vec![login(), cwd(&upload_abs), Step::Pwd],
                Expectation::WorkingDirectory(upload_abs.clone()),
            ),
            scenario(
                "navigation",
                "transition_from_folder",
                "Moving into the upload folder and back to the root",
                vec![login(), cwd(&upload_abs), cwd("/"), Step::Pwd],
                Expectation::WorkingDirectory("/".to_owned()),
            ),
            scenario(
                "upload",
                "root_folder_without_login",
                "Uploading into the root without logging in",
                vec![upload()],
                rejected(&replies.please_login),
            ),
            scenario(
                "upload",
                "upload_folder_without_login",
                "Uploading into the upload folder without logging in",
                vec![cwd(upload_dir), upload()],
                rejected(&replies.please_login),
            ),
            scenario(
                "upload",
                "upload_root_folder",
                "Uploading into the root after logging in",
                vec![login(), upload()],
                rejected(&replies.could_not_create_file),
            ),
            scenario(
                "upload",
                "upload_folder",
                "Uploading into the upload folder after logging in",
                vec![login(), cwd(upload_dir), upload()],
                Expectation::Completes,
            ),
            scenario(
                "upload",
                "uploaded_file_not_retained",
                "The server does not keep uploaded files",
                vec![login(), cwd(upload_dir), Step::Size(fixtures.uploaded_path())],
                rejected(&replies.could_not_get_file_size),
            ),
        ])
    }

    pub fn scenarios(&self) -> &[Scenario] {
        &self.scenarios
    }

    pub fn get(&self, id: &str) -> Option<&Scenario> {
        self.scenarios.iter().find(|scenario| scenario.id() == id)
    }

    /// Scenarios matching any of `filters`, all of them when there are none.
    pub fn select(&self, filters: &[String]) -> Vec<&Scenario> {
        self.scenarios
            .iter()
            .filter(|scenario| filters.is_empty() || filters.iter().any(|f| scenario.matches(f)))
            .collect()
    }

    pub fn groups(&self) -> Vec<&'static str> {
        let mut groups: Vec<&'static str> = Vec::new();
        for scenario in &self.scenarios {
            if !groups.contains(&scenario.group) {
                groups.push(scenario.group);
            }
        }
        groups
    }
}
