//! GitLab API client.
//!
//! Low-level HTTP client that handles authentication and raw requests.
//! Collection walking lives in [`crate::pagination`] and decoding on the
//! model types.

use std::env;
use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, Method, Response};
use serde::Serialize;
use url::Url;

use crate::cancel::CancellationToken;
use crate::error::{GitlabError, Result};
use crate::models::{Issue, Project, ProjectScope, VersionInfo};
use crate::task::{self, TaskHandle};
use crate::traits::List;

const DEFAULT_API_URL: &str = "https://gitlab.com/api/v4";
const USER_AGENT: &str = concat!("gitlabapi/", env!("CARGO_PKG_VERSION"));
const TOKEN_HEADER: &str = "PRIVATE-TOKEN";

/// Low-level GitLab API client.
///
/// Handles authentication and HTTP requests. Every request carries the
/// `PRIVATE-TOKEN` header.
///
/// This struct is cheaply cloneable; clones reference the same underlying
/// connection pool, so concurrently running operations share one session.
///
/// # Example
///
/// ```no_run
/// use gitlabapi::GitlabClient;
///
/// # fn example() -> gitlabapi::Result<()> {
/// // Create from environment variables
/// let client = GitlabClient::from_env()?;
///
/// // Or configure manually
/// let client = GitlabClient::new("your-token", "https://gitlab.gnome.org/api/v4")?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct GitlabClient {
    http: Client,
    base_url: Arc<Url>,
    token: Arc<str>,
}

impl std::fmt::Debug for GitlabClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitlabClient")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl GitlabClient {
    /// Create a client from environment variables.
    ///
    /// Uses `GITLAB_TOKEN` for authentication and optionally `GITLAB_API_URL`
    /// for the base URL (defaults to `https://gitlab.com/api/v4`).
    ///
    /// # Errors
    ///
    /// Returns an error if `GITLAB_TOKEN` is not set.
    pub fn from_env() -> Result<Self> {
        let token = env::var("GITLAB_TOKEN").map_err(|_| {
            GitlabError::ConfigMissing("GITLAB_TOKEN environment variable not set".to_string())
        })?;

        let base_url =
            env::var("GITLAB_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());

        Self::new(&token, &base_url)
    }

    /// Create a new client with the provided token and base URL.
    ///
    /// # Arguments
    ///
    /// * `token` - GitLab private access token
    /// * `base_url` - Base URL of the API (e.g., `https://gitlab.com/api/v4`)
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid.
    pub fn new(token: &str, base_url: &str) -> Result<Self> {
        // Resource paths are joined beneath the base URL
        let base_url_str = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{base_url}/")
        };

        let base_url = Url::parse(&base_url_str)?;

        let http = Client::builder()
            .user_agent(USER_AGENT)
            .brotli(true)
            .gzip(true)
            .deflate(true)
            .timeout(Duration::from_secs(300))
            .build()
            .map_err(GitlabError::HttpError)?;

        Ok(Self {
            http,
            base_url: Arc::new(base_url),
            token: Arc::from(token),
        })
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Make a GET request.
    #[tracing::instrument(skip(self))]
    pub async fn get(&self, path: &str) -> Result<Response> {
        self.send::<()>(Method::GET, path, None).await
    }

    /// Make a GET request with query parameters.
    #[tracing::instrument(skip(self, query))]
    pub async fn get_with_query<Q: Serialize + ?Sized>(
        &self,
        path: &str,
        query: &Q,
    ) -> Result<Response> {
        self.send(Method::GET, path, Some(query)).await
    }

    /// Send a request for `path` relative to the base URL.
    ///
    /// Non-success statuses are turned into [`GitlabError::ApiError`].
    pub async fn send<Q: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        query: Option<&Q>,
    ) -> Result<Response> {
        let url = self.base_url.join(path)?;

        let mut request = self
            .http
            .request(method, url)
            .header(TOKEN_HEADER, self.token.as_ref());
        if let Some(query) = query {
            request = request.query(query);
        }

        let response = request.send().await.map_err(GitlabError::HttpError)?;

        Self::check_response(response).await
    }

    /// Check response status and convert errors.
    async fn check_response(response: Response) -> Result<Response> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        tracing::debug!(%status, url = %response.url(), "request failed");

        let message = Self::extract_error_message(response, status).await;
        Err(GitlabError::ApiError {
            message,
            status_code: Some(status.as_u16()),
        })
    }

    /// Extract error message from a failed response.
    async fn extract_error_message(response: Response, status: reqwest::StatusCode) -> String {
        let body = match response.text().await {
            Ok(b) => b,
            Err(_) => return format!("HTTP {status}"),
        };

        // GitLab reports errors as {"message": ...} or {"error": ...}
        if let Ok(json) = serde_json::from_str::<serde_json::Value>(&body) {
            if let Some(msg) = json.get("message").and_then(|m| m.as_str()) {
                return msg.to_string();
            }
            if let Some(err) = json.get("error").and_then(|m| m.as_str()) {
                return err.to_string();
            }
        }

        if body.is_empty() {
            format!("HTTP {status}")
        } else {
            body
        }
    }

    /// Fetch the server version on a background task.
    pub fn spawn_version(&self, cancel: CancellationToken) -> TaskHandle<VersionInfo> {
        let client = self.clone();
        task::spawn(cancel, move |_| async move {
            crate::models::get_version(&client).await
        })
    }

    /// List every non-fork project visible to the token on a background task.
    pub fn spawn_projects(&self, cancel: CancellationToken) -> TaskHandle<Vec<Project>> {
        self.spawn_list(ProjectScope::All, cancel)
    }

    /// List every non-fork project of `group` on a background task.
    pub fn spawn_group_projects(
        &self,
        group: &str,
        cancel: CancellationToken,
    ) -> TaskHandle<Vec<Project>> {
        self.spawn_list(ProjectScope::Group(group.to_string()), cancel)
    }

    /// List the issues of the project with ID `project_id` on a background
    /// task.
    pub fn spawn_project_issues(
        &self,
        project_id: u64,
        cancel: CancellationToken,
    ) -> TaskHandle<Vec<Issue>> {
        self.spawn_list(project_id, cancel)
    }

    fn spawn_list<T: List>(&self, query: T::Query, cancel: CancellationToken) -> TaskHandle<Vec<T>>
    where
        T::Query: 'static,
    {
        let client = self.clone();
        task::spawn(cancel, move |cancel| async move {
            T::list_all(&client, &query, &cancel).await
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_debug() {
        let client = GitlabClient::new("test-token", "https://gitlab.com/api/v4").unwrap();
        let debug = format!("{:?}", client);
        assert!(debug.contains("GitlabClient"));
        assert!(debug.contains("base_url"));
        // Token should not be in debug output
        assert!(!debug.contains("test-token"));
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let client1 = GitlabClient::new("token", "https://gitlab.com/api/v4").unwrap();
        let client2 = GitlabClient::new("token", "https://gitlab.com/api/v4/").unwrap();
        assert_eq!(client1.base_url().as_str(), client2.base_url().as_str());
        assert_eq!(
            client1.base_url().join("projects").unwrap().as_str(),
            "https://gitlab.com/api/v4/projects"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        let err = GitlabClient::new("token", "not a url").unwrap_err();
        assert!(matches!(err, GitlabError::UrlError(_)));
    }
}
