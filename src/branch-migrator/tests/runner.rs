mod common;

use branch_migrator::{
    Cancellation, ConfigError, ProcessingResult, Runner, RunnerConfig, RunnerError,
};
use common::{write_workflow, FakeGit, FakeGitHub, PUSH_ON_MAIN};
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

const BATCH: &str = r#"
source-branch = "main"
target-branch = "master"

[[repositories]]
path = "app"
identifier = "octo/app"

[[repositories]]
path = "broken"
identifier = "not-a-repository"
"#;

fn write_batch(root: &TempDir, content: &str) -> PathBuf {
    let path = root.path().join("batch.toml");
    std::fs::write(&path, content).unwrap();
    path
}

fn runner(config: RunnerConfig, git: &Arc<FakeGit>, github: &Arc<FakeGitHub>) -> Runner {
    Runner::with_clients(config, git.clone(), github.clone())
}

#[tokio::test]
async fn failures_do_not_stop_the_batch() {
    let root = TempDir::new().unwrap();
    write_workflow(&root.path().join("app"), "ci.yml", PUSH_ON_MAIN);
    let config = RunnerConfig::new(write_batch(&root, BATCH), "token".to_string());
    let git = Arc::new(FakeGit::new());
    let github = Arc::new(FakeGitHub::new("main").with_pull_request(1, "main"));

    let summary = runner(config, &git, &github)
        .run(&Cancellation::new())
        .await
        .unwrap();

    assert_eq!(summary.repositories_processed, 2);
    assert_eq!(summary.repositories_migrated, 1);
    assert_eq!(summary.repositories_failed, 1);
    assert_eq!(summary.workflow_files_updated, 1);
    assert_eq!(summary.pull_requests_retargeted, 1);
    assert_eq!(summary.branches_safe_to_delete, 1);
    assert!(summary.has_failures());

    assert!(matches!(
        &summary.results[0],
        ProcessingResult::Migrated { repository, .. } if repository == "octo/app"
    ));
    assert!(matches!(
        &summary.results[1],
        ProcessingResult::Failed { partial: Some(_), .. }
    ));

    // Relative paths resolve against the batch file.
    assert_eq!(git.command_lines()[0], "add -- .github/workflows/ci.yml");
    assert_eq!(github.default_branch(), "master");
}

#[tokio::test]
async fn push_override_applies_to_every_repository() {
    let root = TempDir::new().unwrap();
    write_workflow(&root.path().join("app"), "ci.yml", PUSH_ON_MAIN);
    let batch = "source-branch = \"main\"\ntarget-branch = \"master\"\npush = true\n\n[[repositories]]\npath = \"app\"\nidentifier = \"octo/app\"\n";
    let config = RunnerConfig::new(write_batch(&root, batch), "token".to_string())
        .with_push_override(Some(false));
    let git = Arc::new(FakeGit::new());
    let github = Arc::new(FakeGitHub::new("main"));

    let summary = runner(config, &git, &github)
        .run(&Cancellation::new())
        .await
        .unwrap();

    assert!(!summary.has_failures());
    assert!(!git.command_lines().iter().any(|line| line.starts_with("push")));
}

#[tokio::test]
async fn check_only_changes_nothing() {
    let root = TempDir::new().unwrap();
    write_workflow(&root.path().join("app"), "ci.yml", PUSH_ON_MAIN);
    let config = RunnerConfig::new(write_batch(&root, BATCH), "token".to_string())
        .with_check_only(true);
    let git = Arc::new(FakeGit::new());
    let github = Arc::new(FakeGitHub::new("master"));

    let summary = runner(config, &git, &github)
        .run(&Cancellation::new())
        .await
        .unwrap();

    assert!(summary.check_only);
    assert_eq!(summary.repositories_processed, 2);
    assert_eq!(summary.repositories_failed, 1);
    assert_eq!(summary.branches_safe_to_delete, 1);
    assert!(matches!(
        &summary.results[0],
        ProcessingResult::Checked { status, .. } if status.safe_to_delete
    ));
    assert!(git.commands().is_empty());
    assert!(github.mutations().is_empty());

    let workflow =
        std::fs::read_to_string(root.path().join("app/.github/workflows/ci.yml")).unwrap();
    assert_eq!(workflow, PUSH_ON_MAIN);
}

#[tokio::test]
async fn cancelled_run_skips_repositories() {
    let root = TempDir::new().unwrap();
    let config = RunnerConfig::new(write_batch(&root, BATCH), "token".to_string());
    let git = Arc::new(FakeGit::new());
    let github = Arc::new(FakeGitHub::new("main"));
    let cancellation = Cancellation::new();
    cancellation.cancel();

    let summary = runner(config, &git, &github)
        .run(&cancellation)
        .await
        .unwrap();

    assert_eq!(summary.repositories_processed, 0);
    assert!(github.calls().is_empty());
}

#[tokio::test]
async fn missing_batch_file_is_an_error() {
    let root = TempDir::new().unwrap();
    let config = RunnerConfig::new(root.path().join("missing.toml"), "token".to_string());
    let git = Arc::new(FakeGit::new());
    let github = Arc::new(FakeGitHub::new("main"));

    let result = runner(config, &git, &github)
        .run(&Cancellation::new())
        .await;

    assert!(matches!(
        result,
        Err(RunnerError::Config(ConfigError::Missing { .. }))
    ));
}
