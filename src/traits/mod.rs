//! Trait definitions for GitLab operations.

mod list;

pub use list::List;
