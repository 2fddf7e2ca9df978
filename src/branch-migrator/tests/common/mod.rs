//! In-memory git and GitHub doubles shared by the integration tests.
#![allow(dead_code)]

use async_trait::async_trait;
use branch_migrator::{
    Cancellation, CommandDetails, CommandOutput, GitError, GitExecutor, GitHubError,
    GitHubOperations, PagesBuildType, PagesConfiguration, PagesStatus, PullRequest,
    PullRequestQuery, RepositoryId,
};
use std::path::Path;
use std::sync::Mutex;

/// Git double that records every command and answers by argument prefix.
#[derive(Default)]
pub struct FakeGit {
    responses: Mutex<Vec<(Vec<String>, CommandOutput)>>,
    commands: Mutex<Vec<Vec<String>>>,
}

impl FakeGit {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answers commands starting with `prefix` with `stdout` and exit code 0.
    pub fn respond(&self, prefix: &[&str], stdout: &str) {
        self.respond_with(
            prefix,
            CommandOutput {
                stdout: stdout.to_string(),
                stderr: String::new(),
                exit_code: 0,
            },
        );
    }

    /// Makes commands starting with `prefix` exit with code 1.
    pub fn fail(&self, prefix: &[&str], stderr: &str) {
        self.respond_with(
            prefix,
            CommandOutput {
                stdout: String::new(),
                stderr: stderr.to_string(),
                exit_code: 1,
            },
        );
    }

    fn respond_with(&self, prefix: &[&str], output: CommandOutput) {
        let prefix = prefix.iter().map(|s| s.to_string()).collect();
        self.responses.lock().unwrap().push((prefix, output));
    }

    pub fn commands(&self) -> Vec<Vec<String>> {
        self.commands.lock().unwrap().clone()
    }

    /// Commands joined with spaces, for readable assertions.
    pub fn command_lines(&self) -> Vec<String> {
        self.commands().iter().map(|args| args.join(" ")).collect()
    }
}

#[async_trait]
impl GitExecutor for FakeGit {
    async fn execute_git(
        &self,
        cancellation: &Cancellation,
        details: &CommandDetails,
    ) -> Result<CommandOutput, GitError> {
        if cancellation.is_cancelled() {
            return Err(GitError::Cancelled {
                command: details.display_command(),
            });
        }
        self.commands
            .lock()
            .unwrap()
            .push(details.arguments.clone());

        let responses = self.responses.lock().unwrap();
        let output = responses
            .iter()
            .find(|(prefix, _)| details.arguments.starts_with(prefix))
            .map(|(_, output)| output.clone())
            .unwrap_or_default();
        Ok(output)
    }
}

/// Mutable GitHub state behind [`FakeGitHub`].
pub struct GitHubState {
    pub pages: PagesStatus,
    pub pages_updates: Vec<PagesConfiguration>,
    pub default_branch: String,
    pub pull_requests: Vec<PullRequest>,
    pub protected_branches: Vec<String>,
    pub failing_pull_requests: Vec<u64>,
    pub vanishing_pull_requests: Vec<PullRequest>,
    pub fail_listing: bool,
    pub fail_protection_check: bool,
    pub cancel_on_pages: Option<Cancellation>,
    pub calls: Vec<String>,
}

/// GitHub double keeping repository state in memory.
pub struct FakeGitHub {
    pub state: Mutex<GitHubState>,
}

impl FakeGitHub {
    /// A repository whose default branch is `default_branch`, without Pages,
    /// pull requests or protection.
    pub fn new(default_branch: &str) -> Self {
        Self {
            state: Mutex::new(GitHubState {
                pages: PagesStatus::disabled(),
                pages_updates: Vec::new(),
                default_branch: default_branch.to_string(),
                pull_requests: Vec::new(),
                protected_branches: Vec::new(),
                failing_pull_requests: Vec::new(),
                vanishing_pull_requests: Vec::new(),
                fail_listing: false,
                fail_protection_check: false,
                cancel_on_pages: None,
                calls: Vec::new(),
            }),
        }
    }

    pub fn with_legacy_pages(self, branch: &str, path: Option<&str>) -> Self {
        self.state.lock().unwrap().pages = PagesStatus {
            enabled: true,
            build_type: PagesBuildType::Legacy,
            source_branch: Some(branch.to_string()),
            source_path: path.map(str::to_string),
        };
        self
    }

    pub fn with_pages(self, pages: PagesStatus) -> Self {
        self.state.lock().unwrap().pages = pages;
        self
    }

    pub fn with_pull_request(self, number: u64, base: &str) -> Self {
        self.state.lock().unwrap().pull_requests.push(PullRequest {
            number,
            base: base.to_string(),
            head: format!("feature-{number}"),
        });
        self
    }

    pub fn with_protected_branch(self, branch: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .protected_branches
            .push(branch.to_string());
        self
    }

    pub fn failing_pull_request(self, number: u64) -> Self {
        self.state
            .lock()
            .unwrap()
            .failing_pull_requests
            .push(number);
        self
    }

    /// Lists the pull request but answers 404 when it is retargeted.
    pub fn vanishing_pull_request(self, number: u64, base: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .vanishing_pull_requests
            .push(PullRequest {
                number,
                base: base.to_string(),
                head: format!("feature-{number}"),
            });
        self
    }

    pub fn failing_listing(self) -> Self {
        self.state.lock().unwrap().fail_listing = true;
        self
    }

    pub fn failing_protection_check(self) -> Self {
        self.state.lock().unwrap().fail_protection_check = true;
        self
    }

    /// Cancels `cancellation` when the Pages configuration is read.
    pub fn cancelling_on_pages(self, cancellation: Cancellation) -> Self {
        self.state.lock().unwrap().cancel_on_pages = Some(cancellation);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    /// Calls that change repository state.
    pub fn mutations(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|call| {
                call.starts_with("update_pages_config")
                    || call.starts_with("update_pull_request_base")
                    || call.starts_with("set_default_branch")
            })
            .collect()
    }

    pub fn default_branch(&self) -> String {
        self.state.lock().unwrap().default_branch.clone()
    }

    pub fn pages(&self) -> PagesStatus {
        self.state.lock().unwrap().pages.clone()
    }

    pub fn pages_updates(&self) -> Vec<PagesConfiguration> {
        self.state.lock().unwrap().pages_updates.clone()
    }

    pub fn base_of(&self, number: u64) -> Option<String> {
        self.state
            .lock()
            .unwrap()
            .pull_requests
            .iter()
            .find(|pr| pr.number == number)
            .map(|pr| pr.base.clone())
    }

    fn record(&self, call: String) {
        self.state.lock().unwrap().calls.push(call);
    }
}

fn unexpected(resource: &str) -> GitHubError {
    GitHubError::UnexpectedResponse {
        resource: resource.to_string(),
        message: "HTTP 502".to_string(),
    }
}

#[async_trait]
impl GitHubOperations for FakeGitHub {
    async fn get_pages_config(
        &self,
        repository: &RepositoryId,
    ) -> Result<PagesStatus, GitHubError> {
        self.record(format!("get_pages_config {repository}"));
        let state = self.state.lock().unwrap();
        if let Some(cancellation) = &state.cancel_on_pages {
            cancellation.cancel();
        }
        Ok(state.pages.clone())
    }

    async fn update_pages_config(
        &self,
        repository: &RepositoryId,
        configuration: &PagesConfiguration,
    ) -> Result<(), GitHubError> {
        self.record(format!("update_pages_config {repository}"));
        let mut state = self.state.lock().unwrap();
        state.pages.source_branch = Some(configuration.source_branch.clone());
        state.pages.source_path = Some(configuration.source_path.clone());
        state.pages_updates.push(configuration.clone());
        Ok(())
    }

    async fn list_pull_requests(
        &self,
        repository: &RepositoryId,
        query: &PullRequestQuery,
    ) -> Result<Vec<PullRequest>, GitHubError> {
        self.record(format!("list_pull_requests {repository}"));
        let state = self.state.lock().unwrap();
        if state.fail_listing {
            return Err(unexpected("pulls"));
        }
        Ok(state
            .pull_requests
            .iter()
            .chain(&state.vanishing_pull_requests)
            .filter(|pr| query.base.as_deref().map_or(true, |base| pr.base == base))
            .take(query.limit.unwrap_or(usize::MAX))
            .cloned()
            .collect())
    }

    async fn update_pull_request_base(
        &self,
        repository: &RepositoryId,
        number: u64,
        base: &str,
    ) -> Result<(), GitHubError> {
        self.record(format!("update_pull_request_base {repository} #{number}"));
        let mut state = self.state.lock().unwrap();
        if state.failing_pull_requests.contains(&number) {
            return Err(unexpected(&format!("pulls/{number}")));
        }
        match state.pull_requests.iter_mut().find(|pr| pr.number == number) {
            Some(pr) => {
                pr.base = base.to_string();
                Ok(())
            }
            None => Err(GitHubError::NotFound {
                resource: format!("{repository}/pulls/{number}"),
            }),
        }
    }

    async fn get_default_branch(&self, repository: &RepositoryId) -> Result<String, GitHubError> {
        self.record(format!("get_default_branch {repository}"));
        Ok(self.state.lock().unwrap().default_branch.clone())
    }

    async fn set_default_branch(
        &self,
        repository: &RepositoryId,
        branch: &str,
    ) -> Result<(), GitHubError> {
        self.record(format!("set_default_branch {repository} {branch}"));
        self.state.lock().unwrap().default_branch = branch.to_string();
        Ok(())
    }

    async fn check_branch_protection(
        &self,
        repository: &RepositoryId,
        branch: &str,
    ) -> Result<bool, GitHubError> {
        self.record(format!("check_branch_protection {repository} {branch}"));
        let state = self.state.lock().unwrap();
        if state.fail_protection_check {
            return Err(unexpected(&format!("branches/{branch}")));
        }
        Ok(state
            .protected_branches
            .iter()
            .any(|protected| protected == branch))
    }
}

/// Writes a workflow file into `<repository>/.github/workflows`.
pub fn write_workflow(repository: &Path, name: &str, content: &str) {
    let directory = repository.join(".github/workflows");
    std::fs::create_dir_all(&directory).unwrap();
    std::fs::write(directory.join(name), content).unwrap();
}

pub const PUSH_ON_MAIN: &str = "\
name: CI
on:
  push:
    branches: [main]
  pull_request:
    branches:
      - main
      - 'release/**'
jobs:
  build:
    runs-on: ubuntu-latest
    steps:
      - run: echo main
";
