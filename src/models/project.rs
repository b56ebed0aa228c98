//! Project model and trait implementations.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{array_of_objects, from_value};
use crate::cancel::CancellationToken;
use crate::client::GitlabClient;
use crate::error::Result;
use crate::models::issue::{get_project_issues, Issue};
use crate::traits::List;

/// Member present on project records that are forks of another project.
const FORK_MARKER: &str = "forked_from_project";

/// A GitLab project.
///
/// Only built by decoding an API response; fields are read through
/// accessors. Optional text fields are empty when the server omits them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Project {
    id: u64,
    name: String,
    description: String,
    avatar_url: String,
    repository_url: String,
}

/// Wire shape of one element of a project listing.
#[derive(Debug, Deserialize)]
struct ProjectRecord {
    id: u64,
    name_with_namespace: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    avatar_url: Option<String>,
    #[serde(default)]
    http_url_to_repo: Option<String>,
}

impl From<ProjectRecord> for Project {
    fn from(r: ProjectRecord) -> Self {
        Self {
            id: r.id,
            name: r.name_with_namespace,
            description: r.description.unwrap_or_default(),
            avatar_url: r.avatar_url.unwrap_or_default(),
            repository_url: r.http_url_to_repo.unwrap_or_default(),
        }
    }
}

impl Project {
    /// Numeric project ID.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Display name including the namespace (e.g. "GNOME / gtk").
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn avatar_url(&self) -> &str {
        &self.avatar_url
    }

    /// HTTP clone URL of the repository.
    pub fn repository_url(&self) -> &str {
        &self.repository_url
    }

    /// Get all issues of this project.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let projects = get_projects(&client, &CancellationToken::new()).await?;
    /// for issue in projects[0].issues(&client, &CancellationToken::new()).await? {
    ///     println!("#{} {}", issue.iid(), issue.title());
    /// }
    /// ```
    pub async fn issues(
        &self,
        client: &GitlabClient,
        cancel: &CancellationToken,
    ) -> Result<Vec<Issue>> {
        get_project_issues(client, self.id, cancel).await
    }
}

/// Decode one page of a project listing.
///
/// Forks are skipped. A non-object element, or an element missing `id` or
/// `name_with_namespace`, fails the whole page.
pub fn decode_project_list(body: &[u8]) -> Result<Vec<Project>> {
    let mut projects = Vec::new();

    for object in array_of_objects(body, "project list")? {
        if object.contains_key(FORK_MARKER) {
            continue;
        }
        let record: ProjectRecord = from_value(object.into(), "project")?;
        projects.push(record.into());
    }

    Ok(projects)
}

/// Which projects to list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ProjectScope {
    /// Every project visible to the token.
    #[default]
    All,
    /// Projects of a group, by ID or full path (e.g. "GNOME").
    Group(String),
}

#[async_trait]
impl List for Project {
    type Query = ProjectScope;

    fn path(query: &Self::Query) -> String {
        match query {
            ProjectScope::All => "projects".to_string(),
            ProjectScope::Group(group) => {
                format!("groups/{}/projects", urlencoding::encode(group))
            }
        }
    }

    fn decode_page(body: &[u8]) -> Result<Vec<Self>> {
        decode_project_list(body)
    }
}

/// Convenience function to list every non-fork project.
#[tracing::instrument(skip(client, cancel))]
pub async fn get_projects(client: &GitlabClient, cancel: &CancellationToken) -> Result<Vec<Project>> {
    Project::list_all(client, &ProjectScope::All, cancel).await
}

/// Convenience function to list every non-fork project of a group.
#[tracing::instrument(skip(client, cancel))]
pub async fn get_group_projects(
    client: &GitlabClient,
    group: &str,
    cancel: &CancellationToken,
) -> Result<Vec<Project>> {
    Project::list_all(client, &ProjectScope::Group(group.to_string()), cancel).await
}
