//! Server version information.

use serde::{Deserialize, Serialize};

use super::from_slice;
use crate::client::GitlabClient;
use crate::error::Result;

/// Version of the GitLab instance, as reported by `GET /version`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionInfo {
    /// Release version (e.g. "16.11.1-ee").
    pub version: String,
    /// Git revision the release was built from.
    pub revision: String,
}

/// Decode a `/version` response body.
///
/// Both `version` and `revision` are required.
pub fn decode_version(body: &[u8]) -> Result<VersionInfo> {
    from_slice(body, "version")
}

/// Fetch the version of the GitLab instance.
///
/// # Errors
///
/// Returns a transport error if the request fails and a decode error if the
/// response lacks either field.
#[tracing::instrument(skip(client))]
pub async fn get_version(client: &GitlabClient) -> Result<VersionInfo> {
    let response = client.get("version").await?;
    let body = response.bytes().await?;
    decode_version(&body)
}
