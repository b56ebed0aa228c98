//! Issue model and trait implementations.
//!
//! Issues belong to exactly one project and are listed per project.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{array_of_objects, from_value};
use crate::cancel::CancellationToken;
use crate::client::GitlabClient;
use crate::error::Result;
use crate::traits::List;

/// A GitLab issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Issue {
    id: u64,
    iid: u64,
    project_id: u64,
    title: String,
    description: String,
    state: String,
    web_url: String,
    created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct IssueRecord {
    id: u64,
    iid: u64,
    project_id: u64,
    title: String,
    state: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    web_url: Option<String>,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
}

impl From<IssueRecord> for Issue {
    fn from(r: IssueRecord) -> Self {
        Self {
            id: r.id,
            iid: r.iid,
            project_id: r.project_id,
            title: r.title,
            description: r.description.unwrap_or_default(),
            state: r.state,
            web_url: r.web_url.unwrap_or_default(),
            created_at: r.created_at,
        }
    }
}

impl Issue {
    /// Instance-wide issue ID.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Issue number within its project (the `#123` users see).
    pub fn iid(&self) -> u64 {
        self.iid
    }

    /// ID of the project the issue belongs to.
    pub fn project_id(&self) -> u64 {
        self.project_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Raw state, "opened" or "closed".
    pub fn state(&self) -> &str {
        &self.state
    }

    pub fn is_open(&self) -> bool {
        self.state == "opened"
    }

    pub fn web_url(&self) -> &str {
        &self.web_url
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }
}

/// Decode one page of an issue listing.
///
/// An element missing `id`, `iid`, `project_id`, `title` or `state` fails the
/// whole page.
pub fn decode_issue_list(body: &[u8]) -> Result<Vec<Issue>> {
    array_of_objects(body, "issue list")?
        .into_iter()
        .map(|object| from_value::<IssueRecord>(object.into(), "issue").map(Issue::from))
        .collect()
}

#[async_trait]
impl List for Issue {
    /// Project ID.
    type Query = u64;

    fn path(project_id: &u64) -> String {
        format!("projects/{project_id}/issues")
    }

    fn decode_page(body: &[u8]) -> Result<Vec<Self>> {
        decode_issue_list(body)
    }
}

/// Convenience function to list every issue of a project.
#[tracing::instrument(skip(client, cancel))]
pub async fn get_project_issues(
    client: &GitlabClient,
    project_id: u64,
    cancel: &CancellationToken,
) -> Result<Vec<Issue>> {
    Issue::list_all(client, &project_id, cancel).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_decode_issue() {
        let body = br#"[{
            "id": 76,
            "iid": 6,
            "project_id": 8,
            "title": "Consequatur vero maxime deserunt laboriosam est voluptas dolorem.",
            "description": "Ratione dolores corrupti mollitia soluta quia.",
            "state": "opened",
            "created_at": "2016-01-04T15:31:51.081Z",
            "labels": ["foo"],
            "web_url": "http://gitlab.example.com/my-group/my-project/issues/6"
        }]"#;

        let issues = decode_issue_list(body).expect("Failed to decode issue list");
        assert_eq!(issues.len(), 1);
        let issue = &issues[0];
        assert_eq!(issue.id(), 76);
        assert_eq!(issue.iid(), 6);
        assert_eq!(issue.project_id(), 8);
        assert!(issue.is_open());
        assert_eq!(
            issue.web_url(),
            "http://gitlab.example.com/my-group/my-project/issues/6"
        );
        assert_eq!(
            issue.created_at().unwrap().to_rfc3339(),
            "2016-01-04T15:31:51.081+00:00"
        );
    }

    #[test]
    fn test_decode_issue_optional_fields() {
        let body = br#"[{"id": 1, "iid": 1, "project_id": 3, "title": "t", "state": "closed", "description": null}]"#;

        let issue = &decode_issue_list(body).unwrap()[0];
        assert_eq!(issue.description(), "");
        assert_eq!(issue.web_url(), "");
        assert!(issue.created_at().is_none());
        assert!(!issue.is_open());
    }

    #[test]
    fn test_decode_issue_missing_title_fails() {
        let body = br#"[{"id": 1, "iid": 1, "project_id": 3, "state": "opened"}]"#;
        let err = decode_issue_list(body).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Decode);
        assert!(err.to_string().contains("title"));
    }

    #[test]
    fn test_issue_path() {
        assert_eq!(Issue::path(&42), "projects/42/issues");
    }
}
