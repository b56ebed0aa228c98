//! GitLab API client library.
//!
//! A Rust library for listing projects and issues of a GitLab instance
//! through its REST API. Collections are fetched page by page and
//! aggregated in server order; long-running fetches can be moved onto a
//! background task and cancelled cooperatively.
//!
//! # Quick Start
//!
//! ```no_run
//! use gitlabapi::{CancellationToken, GitlabClient};
//!
//! #[tokio::main]
//! async fn main() -> gitlabapi::Result<()> {
//!     // Create client from environment variables
//!     let client = GitlabClient::from_env()?;
//!
//!     // Single request
//!     let version = gitlabapi::get_version(&client).await?;
//!     println!("GitLab {} ({})", version.version, version.revision);
//!
//!     // All pages, on a background task
//!     let cancel = CancellationToken::new();
//!     let handle = client.spawn_projects(cancel.clone());
//!     let projects = handle.wait().await?;
//!     println!("Found {} projects", projects.len());
//!
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - [`GitlabClient`] sends authenticated requests over one shared session.
//! - Model types ([`Project`], [`Issue`], [`VersionInfo`]) decode response
//!   bodies. Forked projects are dropped while decoding.
//! - [`List`] walks `X-Page` / `X-Total-Pages` pagination for a collection.
//! - [`task::spawn`] runs an operation on a tokio task and hands back a
//!   [`TaskHandle`] that yields exactly one outcome.
//!
//! # Configuration
//!
//! The client reads configuration from environment variables:
//!
//! - `GITLAB_TOKEN` (required) - A private access token
//! - `GITLAB_API_URL` (optional) - Base URL (defaults to `https://gitlab.com/api/v4`)

mod cancel;
mod client;
mod error;
mod models;
mod pagination;
mod traits;

pub mod cli;
pub mod output;
pub mod task;

// Re-export core types
pub use cancel::CancellationToken;
pub use client::GitlabClient;
pub use error::{ErrorKind, GitlabError, Result};
pub use pagination::{fetch_all_pages, fetch_page, Page, PageInfo};
pub use task::{TaskHandle, TaskState};

// Re-export traits
pub use traits::List;

// Re-export models
pub use models::{Issue, Project, ProjectScope, VersionInfo};

// Re-export decoders and convenience functions
pub use models::{decode_issue_list, decode_project_list, decode_version};
pub use models::{get_group_projects, get_project_issues, get_projects, get_version};
