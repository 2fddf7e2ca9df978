//! Per-repository default branch migration.
//!
//! [`Migrator::execute`] runs the steps of a migration strictly in order:
//!
//! 1. resolve the `owner/name` identifier (from the remote when not given)
//! 2. rewrite workflow branch filters and commit them
//! 3. push the commit (optional)
//! 4. move a legacy Pages site to the new branch
//! 5. retarget open pull requests (best effort)
//! 6. switch the default branch
//! 7. evaluate whether the old branch can be deleted
//!
//! Every step except 5 is fatal. Pull request failures are collected and
//! reported after the remaining steps, including the safety evaluation, ran.

mod error;
mod result;

pub use error::{
    LocalFailure, MigrationError, MigrationFailure, MigrationStep, RetargetFailure,
    RetargetFailures,
};
pub use result::MigrationResult;

use crate::cancel::Cancellation;
use crate::git::{parse_remote_url, CommandDetails, CommandOutput, GitError, GitExecutor};
use crate::github::{GitHubError, GitHubOperations, PagesConfiguration, PullRequestQuery};
use crate::options::{MigrationOptions, ValidatedOptions, ValidationError};
use crate::repository::RepositoryId;
use crate::safety::{SafetyEvaluator, SafetyStatus};
use crate::workflows::rewrite_workflows;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, info_span, warn, Instrument};

/// Message of the commit containing rewritten workflow files.
pub const COMMIT_MESSAGE: &str = "chore: update workflow branch references";

/// Pages path used when GitHub does not report one.
const DEFAULT_PAGES_PATH: &str = "/";

/// Runs default branch migrations against injected git and GitHub clients.
///
/// Holds no state between calls. Migrating two different repositories
/// concurrently is fine; the same working tree must not be migrated twice at
/// once.
#[derive(Clone)]
pub struct Migrator {
    git: Arc<dyn GitExecutor>,
    github: Arc<dyn GitHubOperations>,
    safety: SafetyEvaluator,
}

impl Migrator {
    /// Creates a migrator.
    pub fn new(git: Arc<dyn GitExecutor>, github: Arc<dyn GitHubOperations>) -> Self {
        let safety = SafetyEvaluator::new(Arc::clone(&github));
        Self { git, github, safety }
    }

    /// Returns the evaluator used for the final step.
    pub fn safety_evaluator(&self) -> &SafetyEvaluator {
        &self.safety
    }

    /// Migrates one repository.
    ///
    /// # Errors
    ///
    /// Returns a [`MigrationFailure`] holding the error and the partial
    /// result. Invalid options fail before any git command or API call.
    pub async fn execute(
        &self,
        cancellation: &Cancellation,
        options: &MigrationOptions,
    ) -> Result<MigrationResult, MigrationFailure> {
        let validated = options
            .validate()
            .map_err(|e| MigrationFailure::new(MigrationResult::default(), e.into()))?;

        let span = info_span!(
            "migrate",
            path = %validated.repository_path.display(),
            source = %validated.source,
            target = %validated.target
        );

        self.start(cancellation, &validated)
            .finish()
            .instrument(span)
            .await
    }

    /// Evaluates only whether the source branch can be deleted, without
    /// changing anything.
    ///
    /// # Errors
    ///
    /// Returns [`MigrationError`] if the options are invalid, the identifier
    /// cannot be resolved or a GitHub lookup fails.
    pub async fn check(
        &self,
        cancellation: &Cancellation,
        options: &MigrationOptions,
    ) -> Result<SafetyStatus, MigrationError> {
        let validated = options.validate()?;
        let span = info_span!(
            "check",
            path = %validated.repository_path.display(),
            source = %validated.source
        );

        let mut run = self.start(cancellation, &validated);
        async {
            run.checkpoint(MigrationStep::ResolveIdentifier)?;
            let repository = run.resolve_identifier().await?;
            run.identifier = Some(repository.clone());

            run.checkpoint(MigrationStep::SafetyEvaluation)?;
            self.safety
                .evaluate(&repository, validated.source.as_str())
                .await
                .map_err(|e| run.platform_error(MigrationStep::SafetyEvaluation, e))
        }
        .instrument(span)
        .await
    }

    fn start<'a>(
        &'a self,
        cancellation: &'a Cancellation,
        options: &'a ValidatedOptions,
    ) -> MigrationRun<'a> {
        MigrationRun {
            git: self.git.as_ref(),
            github: self.github.as_ref(),
            safety: &self.safety,
            cancellation,
            options,
            identifier: None,
            result: MigrationResult::default(),
        }
    }
}

/// State of a single [`Migrator::execute`] call.
struct MigrationRun<'a> {
    git: &'a dyn GitExecutor,
    github: &'a dyn GitHubOperations,
    safety: &'a SafetyEvaluator,
    cancellation: &'a Cancellation,
    options: &'a ValidatedOptions,
    identifier: Option<RepositoryId>,
    result: MigrationResult,
}

impl MigrationRun<'_> {
    async fn finish(mut self) -> Result<MigrationResult, MigrationFailure> {
        match self.run_steps().await {
            Ok(None) => {
                info!("Migration complete");
                Ok(self.result)
            }
            Ok(Some(error)) | Err(error) => {
                warn!(error = %error, "Migration finished with errors");
                Err(MigrationFailure::new(self.result, error))
            }
        }
    }

    /// Runs all steps. `Ok(Some(_))` carries the deferred pull request error.
    async fn run_steps(&mut self) -> Result<Option<MigrationError>, MigrationError> {
        self.checkpoint(MigrationStep::ResolveIdentifier)?;
        let repository = self.resolve_identifier().await?;
        self.identifier = Some(repository.clone());
        self.result.repository = Some(repository.clone());

        self.checkpoint(MigrationStep::WorkflowRewrite)?;
        self.rewrite_workflows()?;

        if !self.result.workflow_outcome.is_empty() {
            self.checkpoint(MigrationStep::Commit)?;
            self.commit().await?;
            self.result.committed = true;
        }

        if self.options.push_updates && self.result.committed {
            self.checkpoint(MigrationStep::Push)?;
            self.push().await?;
            self.result.pushed = true;
        }

        self.checkpoint(MigrationStep::PagesReconciliation)?;
        self.result.pages_configuration_updated = self.reconcile_pages(&repository).await?;

        self.checkpoint(MigrationStep::PullRequestRetargeting)?;
        let pending = self.retarget_pull_requests(&repository).await?;

        let default_branch = match self.checkpoint(MigrationStep::DefaultBranchUpdate) {
            Ok(()) => self.update_default_branch(&repository).await,
            Err(e) => Err(e),
        };
        match default_branch {
            Ok(updated) => self.result.default_branch_updated = updated,
            Err(error) => {
                if let Some(pending) = &pending {
                    warn!(error = %pending, "Discarding pull request errors after fatal failure");
                }
                return Err(error);
            }
        }

        self.checkpoint(MigrationStep::SafetyEvaluation)?;
        match self
            .safety
            .evaluate(&repository, self.options.source.as_str())
            .await
        {
            Ok(status) => self.result.safety_status = status,
            Err(e) if pending.is_some() => {
                warn!(error = %e, "Safety evaluation failed");
                let mut status = SafetyStatus::safe();
                status.block(format!("safety evaluation failed: {e}"));
                self.result.safety_status = status;
            }
            Err(e) => return Err(self.platform_error(MigrationStep::SafetyEvaluation, e)),
        }

        Ok(pending)
    }

    fn checkpoint(&self, step: MigrationStep) -> Result<(), MigrationError> {
        if self.cancellation.is_cancelled() {
            info!(%step, "Cancellation requested");
            return Err(self.cancelled(step));
        }
        Ok(())
    }

    async fn resolve_identifier(&self) -> Result<RepositoryId, MigrationError> {
        if let Some(identifier) = &self.options.identifier {
            return Ok(identifier.clone());
        }

        let remote = self.options.remote_name.as_str();
        let output = self
            .run_git(
                MigrationStep::ResolveIdentifier,
                &["remote", "get-url", remote],
            )
            .await?;
        let url = output.stdout.trim();

        let identifier = parse_remote_url(url).ok_or_else(|| {
            MigrationError::Validation(ValidationError::UnrecognizedRemote {
                remote: remote.to_string(),
                url: url.to_string(),
            })
        })?;
        debug!(%identifier, "Resolved repository identifier from remote");
        Ok(identifier)
    }

    fn rewrite_workflows(&mut self) -> Result<(), MigrationError> {
        let outcome = rewrite_workflows(
            &self.options.workflows_directory,
            self.options.source.as_str(),
            self.options.target.as_str(),
        )
        .map_err(|e| self.local_error(MigrationStep::WorkflowRewrite, e.into()))?;

        if self.options.debug_logging {
            for path in &outcome.updated_files {
                info!(path = %path.display(), "Updated workflow file");
            }
        }
        info!(
            files = outcome.updated_files.len(),
            "Workflow rewrite complete"
        );
        self.result.workflow_outcome = outcome;
        Ok(())
    }

    async fn commit(&self) -> Result<(), MigrationError> {
        let pathspecs: Vec<String> = self
            .result
            .workflow_outcome
            .updated_files
            .iter()
            .map(|path| self.pathspec(path))
            .collect();

        let mut add = vec!["add", "--"];
        add.extend(pathspecs.iter().map(String::as_str));
        self.run_git(MigrationStep::Commit, &add).await?;

        // Limited to the rewritten files; anything else already staged stays staged.
        let mut commit = vec!["commit", "-m", COMMIT_MESSAGE, "--"];
        commit.extend(pathspecs.iter().map(String::as_str));
        self.run_git(MigrationStep::Commit, &commit).await?;
        info!("Committed workflow changes");
        Ok(())
    }

    async fn push(&self) -> Result<(), MigrationError> {
        let head = self
            .run_git(MigrationStep::Push, &["rev-parse", "--abbrev-ref", "HEAD"])
            .await?;
        let branch = head.stdout.trim();
        let remote = self.options.remote_name.as_str();

        self.run_git(MigrationStep::Push, &["push", remote, branch])
            .await?;
        info!(remote, branch, "Pushed workflow changes");
        Ok(())
    }

    async fn reconcile_pages(&self, repository: &RepositoryId) -> Result<bool, MigrationError> {
        let step = MigrationStep::PagesReconciliation;
        let source = self.options.source.as_str();
        let status = self
            .github
            .get_pages_config(repository)
            .await
            .map_err(|e| self.platform_error(step, e))?;

        if !status.publishes_from_branch(source) {
            debug!(
                enabled = status.enabled,
                build_type = status.build_type.as_api_str(),
                source_branch = ?status.source_branch,
                "Pages does not publish from source branch, skipping"
            );
            return Ok(false);
        }

        let configuration = PagesConfiguration {
            build_type: status.build_type,
            source_branch: self.options.target.to_string(),
            source_path: status
                .source_path
                .unwrap_or_else(|| DEFAULT_PAGES_PATH.to_string()),
        };
        self.github
            .update_pages_config(repository, &configuration)
            .await
            .map_err(|e| self.platform_error(step, e))?;

        info!(
            path = %configuration.source_path,
            branch = %configuration.source_branch,
            "Updated Pages source branch"
        );
        Ok(true)
    }

    /// Retargets every open pull request based on the source branch.
    ///
    /// Listing failures are fatal; individual update failures are returned as
    /// `Ok(Some(_))` after every pull request was attempted.
    async fn retarget_pull_requests(
        &mut self,
        repository: &RepositoryId,
    ) -> Result<Option<MigrationError>, MigrationError> {
        let step = MigrationStep::PullRequestRetargeting;
        let source = self.options.source.as_str();
        let target = self.options.target.as_str();

        let pull_requests = self
            .github
            .list_pull_requests(repository, &PullRequestQuery::open_targeting(source))
            .await
            .map_err(|e| self.platform_error(step, e))?;

        let mut failures = RetargetFailures::default();
        for pr in pull_requests.iter().filter(|pr| pr.base == source) {
            self.checkpoint(step)?;
            match self
                .github
                .update_pull_request_base(repository, pr.number, target)
                .await
            {
                Ok(()) => {
                    info!(pr = pr.number, head = %pr.head, "Retargeted pull request");
                    self.result.retargeted_pull_requests.push(pr.number);
                }
                Err(e) => {
                    warn!(pr = pr.number, error = %e, "Failed to retarget pull request");
                    failures.0.push(RetargetFailure {
                        number: pr.number,
                        source: e,
                    });
                }
            }
        }

        if failures.0.is_empty() {
            return Ok(None);
        }
        Ok(Some(MigrationError::PullRequestRetarget {
            repository: self.options.repository_path.clone(),
            identifier: repository.full_name(),
            failures,
        }))
    }

    async fn update_default_branch(&self, repository: &RepositoryId) -> Result<bool, MigrationError> {
        let step = MigrationStep::DefaultBranchUpdate;
        let target = self.options.target.as_str();

        let current = self
            .github
            .get_default_branch(repository)
            .await
            .map_err(|e| self.platform_error(step, e))?;
        if current == target {
            debug!(branch = target, "Default branch already set");
            return Ok(false);
        }

        self.github
            .set_default_branch(repository, target)
            .await
            .map_err(|e| self.platform_error(step, e))?;
        info!(from = %current, to = target, "Updated default branch");
        Ok(true)
    }

    /// Runs git in the repository and requires a zero exit status.
    async fn run_git(
        &self,
        step: MigrationStep,
        arguments: &[&str],
    ) -> Result<CommandOutput, MigrationError> {
        let details = CommandDetails::new(&self.options.repository_path, arguments.iter().copied());
        let output = self
            .git
            .execute_git(self.cancellation, &details)
            .await
            .and_then(|output| {
                if self.options.debug_logging {
                    info!(
                        command = %details.display_command(),
                        exit_code = output.exit_code,
                        stdout = %output.stdout.trim(),
                        stderr = %output.stderr.trim(),
                        "git"
                    );
                }
                output.into_success(&details)
            });

        match output {
            Ok(output) => Ok(output),
            Err(GitError::Cancelled { .. }) => Err(self.cancelled(step)),
            Err(e) => Err(self.local_error(step, e.into())),
        }
    }

    /// Path of a changed file as git should see it from the repository root.
    fn pathspec(&self, path: &Path) -> String {
        path.strip_prefix(&self.options.repository_path)
            .unwrap_or(path)
            .to_string_lossy()
            .into_owned()
    }

    fn local_error(&self, step: MigrationStep, source: LocalFailure) -> MigrationError {
        MigrationError::LocalGit {
            repository: self.options.repository_path.clone(),
            identifier: self.identifier.as_ref().map(RepositoryId::full_name),
            step,
            source,
        }
    }

    fn platform_error(&self, step: MigrationStep, source: GitHubError) -> MigrationError {
        MigrationError::Platform {
            repository: self.options.repository_path.clone(),
            identifier: self
                .identifier
                .as_ref()
                .map(RepositoryId::full_name)
                .unwrap_or_default(),
            step,
            source,
        }
    }

    fn cancelled(&self, step: MigrationStep) -> MigrationError {
        MigrationError::Cancelled {
            repository: self.options.repository_path.clone(),
            step,
        }
    }
}
