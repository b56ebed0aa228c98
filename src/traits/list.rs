//! List trait for fetching collections of entities.

use async_trait::async_trait;

use crate::cancel::CancellationToken;
use crate::client::GitlabClient;
use crate::error::Result;
use crate::pagination::{self, Page};

/// List entities with pagination support.
///
/// Implementors name the collection endpoint for a query and decode one
/// response body; paging is shared.
///
/// # Example
///
/// ```ignore
/// use gitlabapi::{CancellationToken, GitlabClient, List, Project, ProjectScope};
///
/// let client = GitlabClient::from_env()?;
///
/// // Fetch a single page
/// let page = Project::list_page(&client, &ProjectScope::All, 2).await?;
///
/// // Fetch all pages
/// let all = Project::list_all(&client, &ProjectScope::All, &CancellationToken::new()).await?;
/// ```
#[async_trait]
pub trait List: Sized + Send + 'static {
    /// Selects which collection to list.
    type Query: Send + Sync;

    /// Resource path of the collection, relative to the API base URL.
    fn path(query: &Self::Query) -> String;

    /// Decode one response body into entities.
    ///
    /// # Errors
    ///
    /// Returns a decode error if the body is malformed or an entity is
    /// missing a required field.
    fn decode_page(body: &[u8]) -> Result<Vec<Self>>;

    /// List a single page.
    ///
    /// # Errors
    ///
    /// Returns an error if the request or decoding fails.
    async fn list_page(client: &GitlabClient, query: &Self::Query, page: u32) -> Result<Page<Self>> {
        pagination::fetch_page(client, &Self::path(query), Some(page), Self::decode_page).await
    }

    /// List all entities matching the query (fetches all pages).
    ///
    /// # Errors
    ///
    /// Returns the first failure of any page, or
    /// [`GitlabError::Cancelled`](crate::GitlabError::Cancelled) if `cancel`
    /// fires before a request is issued.
    async fn list_all(
        client: &GitlabClient,
        query: &Self::Query,
        cancel: &CancellationToken,
    ) -> Result<Vec<Self>> {
        let path = Self::path(query);
        pagination::fetch_all_pages(client, &path, Self::decode_page, cancel).await
    }
}
