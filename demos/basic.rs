//! Basic example demonstrating the GitLab API client.
//!
//! Lists the projects of a GitLab instance on a background task while the
//! main task keeps reading stdin. Typing `q` and Enter cancels the fetch.
//!
//! Run with:
//! ```
//! GITLAB_TOKEN=your-token GITLAB_API_URL=https://gitlab.gnome.org/api/v4 cargo run --example basic
//! ```

use gitlabapi::{CancellationToken, GitlabClient, GitlabError};
use tokio::io::{AsyncBufReadExt, BufReader};

#[tokio::main]
async fn main() -> gitlabapi::Result<()> {
    // Initialize tracing for debugging (optional)
    tracing_subscriber::fmt::init();

    println!("Creating GitLab client...");
    let client = GitlabClient::from_env()?;
    println!("Connected to: {}", client.base_url());

    let version = gitlabapi::get_version(&client).await?;
    println!("GitLab {} (revision {})", version.version, version.revision);

    println!("\n--- Listing Projects (type 'q' + Enter to cancel) ---");
    let cancel = CancellationToken::new();
    let handle = client.spawn_projects(cancel.clone());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let watcher = tokio::spawn(async move {
        while let Ok(Some(line)) = lines.next_line().await {
            if line.trim() == "q" {
                cancel.cancel();
                break;
            }
        }
    });

    println!("Task state: {:?}", handle.state());
    let outcome = handle.wait().await;
    watcher.abort();

    let projects = match outcome {
        Ok(projects) => projects,
        Err(GitlabError::Cancelled) => {
            println!("Cancelled");
            return Ok(());
        }
        Err(e) => return Err(e),
    };

    println!("Found {} projects", projects.len());
    for project in projects.iter().take(20) {
        println!("  - {} ({})", project.name(), project.id());
    }

    // Issues of the first project
    if let Some(first) = projects.first() {
        println!("\n--- Issues of {} ---", first.name());
        let issues = first.issues(&client, &CancellationToken::new()).await?;
        println!("Found {} issues", issues.len());
        for issue in issues.iter().filter(|i| i.is_open()).take(5) {
            println!("  #{} {}", issue.iid(), issue.title());
        }
    }

    println!("\nDone!");
    Ok(())
}
