//! GitLab API model types.

mod issue;
mod project;
mod version;

pub use issue::*;
pub use project::*;
pub use version::*;

use serde::de::DeserializeOwned;
use serde_json::error::Category;

use crate::error::{GitlabError, Result};

/// Deserialize `value`, reporting shape mismatches as decode errors.
fn from_value<T: DeserializeOwned>(value: serde_json::Value, what: &str) -> Result<T> {
    serde_json::from_value(value).map_err(|e| GitlabError::decode(format!("{what}: {e}")))
}

/// Deserialize `body`; syntax errors stay parse errors, shape mismatches
/// become decode errors.
fn from_slice<T: DeserializeOwned>(body: &[u8], what: &str) -> Result<T> {
    serde_json::from_slice(body).map_err(|e| match e.classify() {
        Category::Data => GitlabError::decode(format!("{what}: {e}")),
        _ => GitlabError::ParseError(e),
    })
}

/// Split a JSON array body into its object elements.
///
/// Fails if the body is not an array or any element is not an object.
fn array_of_objects(
    body: &[u8],
    what: &str,
) -> Result<Vec<serde_json::Map<String, serde_json::Value>>> {
    let elements: Vec<serde_json::Value> = from_slice(body, what)?;
    elements
        .into_iter()
        .enumerate()
        .map(|(index, element)| match element {
            serde_json::Value::Object(object) => Ok(object),
            other => Err(GitlabError::decode(format!(
                "{what}: element {index} is not an object (got {other})"
            ))),
        })
        .collect()
}
