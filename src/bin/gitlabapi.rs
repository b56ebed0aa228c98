//! GitLab API CLI binary.
//!
//! A command-line interface for interacting with the GitLab API.

use std::process::ExitCode;

use clap::Parser;
use gitlabapi::cli::{Cli, Command};
use gitlabapi::output::PrettyPrint;
use gitlabapi::{CancellationToken, GitlabClient, GitlabError, Issue, Project, TaskHandle};
use serde::Serialize;
use tabled::{Table, Tabled};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let Some(token) = cli.token.as_deref() else {
        eprintln!("Error: no access token given");
        eprintln!("Hint: Set GITLAB_TOKEN environment variable or pass --token");
        return ExitCode::FAILURE;
    };

    let client = match GitlabClient::new(token, &cli.url) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    match run(&client, cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(GitlabError::Cancelled) => {
            eprintln!("Cancelled");
            ExitCode::from(130)
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(client: &GitlabClient, cli: Cli) -> gitlabapi::Result<()> {
    let cancel = CancellationToken::new();

    match cli.command {
        Command::Version => {
            let info = wait_or_cancel(client.spawn_version(cancel)).await?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                println!("{}", info.pretty_print());
            }
        }
        Command::Projects { group } => {
            let handle = match group.as_deref() {
                Some(group) => client.spawn_group_projects(group, cancel),
                None => client.spawn_projects(cancel),
            };
            let projects = wait_or_cancel(handle).await?;
            output_list(&projects, cli.json, |p| ProjectRow::from(p))?;
        }
        Command::Issues { project_id } => {
            let issues = wait_or_cancel(client.spawn_project_issues(project_id, cancel)).await?;
            output_list(&issues, cli.json, |i| IssueRow::from(i))?;
        }
    }
    Ok(())
}

/// Wait for a background task, cancelling it on Ctrl+C.
///
/// A page request already in flight still completes; the task stops before
/// the next one.
async fn wait_or_cancel<T>(handle: TaskHandle<T>) -> gitlabapi::Result<T> {
    let token = handle.cancellation_token().clone();
    let wait = handle.wait();
    tokio::pin!(wait);

    tokio::select! {
        outcome = &mut wait => outcome,
        _ = tokio::signal::ctrl_c() => {
            eprintln!("\nCancelling, waiting for the current request to finish...");
            token.cancel();
            wait.await
        }
    }
}

fn output_list<T, R, F>(items: &[T], json: bool, to_row: F) -> gitlabapi::Result<()>
where
    T: Serialize,
    R: Tabled,
    F: Fn(&T) -> R,
{
    if json {
        println!("{}", serde_json::to_string_pretty(items)?);
    } else {
        let rows: Vec<R> = items.iter().map(to_row).collect();
        println!("{}", Table::new(rows));
        println!("\n{} total", items.len());
    }
    Ok(())
}

// Table row types for non-JSON output

#[derive(Tabled)]
struct ProjectRow {
    id: u64,
    name: String,
    repository: String,
}

impl From<&Project> for ProjectRow {
    fn from(p: &Project) -> Self {
        Self {
            id: p.id(),
            name: p.name().to_string(),
            repository: p.repository_url().to_string(),
        }
    }
}

#[derive(Tabled)]
struct IssueRow {
    #[tabled(rename = "#")]
    iid: u64,
    state: String,
    title: String,
}

impl From<&Issue> for IssueRow {
    fn from(i: &Issue) -> Self {
        Self {
            iid: i.iid(),
            state: i.state().to_string(),
            title: i.title().to_string(),
        }
    }
}
