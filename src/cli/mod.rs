//! CLI argument parsing types.
//!
//! This module provides the command-line interface structure for the gitlabapi binary.

use clap::{Parser, Subcommand};

/// GitLab API command-line interface.
#[derive(Parser, Debug)]
#[command(name = "gitlabapi", about = "GitLab API CLI", version)]
pub struct Cli {
    /// Output results as JSON instead of a table.
    #[arg(long, global = true, default_value = "false")]
    pub json: bool,

    /// Base URL of the GitLab API.
    #[arg(
        long,
        global = true,
        env = "GITLAB_API_URL",
        default_value = "https://gitlab.com/api/v4"
    )]
    pub url: String,

    /// Private access token.
    #[arg(long, global = true, env = "GITLAB_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show the version of the GitLab instance.
    Version,

    /// List all projects that are not forks.
    #[command(alias = "project")]
    Projects {
        /// Only list projects of this group (ID or full path).
        #[arg(long)]
        group: Option<String>,
    },

    /// List the issues of a project.
    #[command(alias = "issue")]
    Issues {
        /// Numeric project ID.
        project_id: u64,
    },
}
