//! Pagination utilities for GitLab API responses.
//!
//! GitLab uses offset-based pagination and reports the position of a page in
//! the `X-Page` and `X-Total-Pages` response headers.

use reqwest::header::HeaderMap;
use serde::Serialize;
use tracing::{debug, instrument, warn};

use crate::cancel::CancellationToken;
use crate::client::GitlabClient;
use crate::error::Result;

/// Header carrying the total number of pages.
pub const TOTAL_PAGES_HEADER: &str = "x-total-pages";

/// Header carrying the number of the returned page.
pub const PAGE_HEADER: &str = "x-page";

/// A page of results from the GitLab API.
#[derive(Debug, Clone, Serialize)]
#[serde(bound = "T: Serialize")]
pub struct Page<T> {
    /// The items on this page.
    pub items: Vec<T>,
    /// Current page number (1-indexed).
    pub page: u32,
    /// Total number of pages, if the server reported it.
    pub total_pages: Option<u32>,
    /// Whether there are more pages.
    pub has_more: bool,
}

impl<T> Page<T> {
    /// Create a new page from items and pagination info.
    #[must_use]
    pub fn new(items: Vec<T>, info: PageInfo) -> Self {
        Self {
            items,
            page: info.current_page,
            total_pages: info.total_pages,
            has_more: info.has_more(),
        }
    }

    /// Map the items to a different type.
    #[must_use]
    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            total_pages: self.total_pages,
            has_more: self.has_more,
        }
    }

    /// Returns true if this page has no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the number of items on this page.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns an iterator over the items in this page.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }
}

impl<T> IntoIterator for Page<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a Page<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Position of one response within a paginated collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageInfo {
    /// Page number of the response (1-indexed).
    pub current_page: u32,
    /// Total number of pages; `None` when the endpoint is not paginated or
    /// the header is unparsable.
    pub total_pages: Option<u32>,
}

impl PageInfo {
    /// Read pagination headers.
    ///
    /// `requested` is used when `X-Page` is missing or unparsable.
    pub fn from_headers(headers: &HeaderMap, requested: u32) -> Self {
        Self {
            current_page: header_u32(headers, PAGE_HEADER).unwrap_or(requested),
            total_pages: header_u32(headers, TOTAL_PAGES_HEADER),
        }
    }

    /// Page numbers that still have to be fetched after this one, in order.
    ///
    /// Empty when the total is unknown.
    pub fn remaining(&self) -> std::ops::RangeInclusive<u32> {
        let last = self.total_pages.unwrap_or(0);
        self.current_page.saturating_add(1)..=last
    }

    /// Returns true if pages after this one exist.
    pub fn has_more(&self) -> bool {
        !self.remaining().is_empty()
    }
}

fn header_u32(headers: &HeaderMap, name: &str) -> Option<u32> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse().ok())
}

/// Query parameters for a specific page.
#[derive(Debug, Clone, Copy, Serialize)]
struct PageQuery {
    page: u32,
}

/// Fetch and decode a single page of `path`.
///
/// With `page == None` no page parameter is sent and the server returns its
/// first page.
#[instrument(skip(client, decode))]
pub async fn fetch_page<T, D>(
    client: &GitlabClient,
    path: &str,
    page: Option<u32>,
    decode: D,
) -> Result<Page<T>>
where
    D: Fn(&[u8]) -> Result<Vec<T>>,
{
    let response = match page {
        Some(page) => client.get_with_query(path, &PageQuery { page }).await?,
        None => client.get(path).await?,
    };

    let info = PageInfo::from_headers(response.headers(), page.unwrap_or(1));
    let body = response.bytes().await?;
    let items = decode(&body)?;

    debug!(
        page = info.current_page,
        total_pages = ?info.total_pages,
        items = items.len(),
        "fetched page"
    );

    Ok(Page::new(items, info))
}

/// Fetch every page of `path` and concatenate the decoded items.
///
/// The first request carries no page parameter; the remaining pages are
/// requested one at a time in ascending order, so the result keeps the
/// server's ordering. Any failed page fails the whole walk and no partial
/// result is returned. `cancel` is checked before every request.
///
/// A first response without a usable `X-Total-Pages` header is treated as the
/// only page.
#[instrument(skip(client, decode, cancel))]
pub async fn fetch_all_pages<T, D>(
    client: &GitlabClient,
    path: &str,
    decode: D,
    cancel: &CancellationToken,
) -> Result<Vec<T>>
where
    D: Fn(&[u8]) -> Result<Vec<T>>,
{
    cancel.check()?;
    let first = fetch_page(client, path, None, &decode).await?;

    let Some(total_pages) = first.total_pages else {
        warn!(path, "no pagination headers, treating response as a single page");
        return Ok(first.items);
    };

    let info = PageInfo {
        current_page: first.page,
        total_pages: Some(total_pages),
    };
    let mut items = first.items;

    for page in info.remaining() {
        cancel.check()?;
        let next = fetch_page(client, path, Some(page), &decode).await?;
        items.extend(next.items);
    }

    debug!(path, total_pages, items = items.len(), "fetched all pages");
    Ok(items)
}
