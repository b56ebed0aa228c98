//! Output formatting for CLI display.
//!
//! Provides the [`PrettyPrint`] trait for human-readable output
//! as an alternative to JSON serialization.

use crate::{Issue, Project, VersionInfo};

/// Trait for human-readable key-value output.
///
/// Implemented by entity types to provide formatted output
/// suitable for terminal display when `--json` is not specified.
pub trait PrettyPrint {
    /// Returns a formatted string for terminal display.
    fn pretty_print(&self) -> String;
}

impl PrettyPrint for Project {
    fn pretty_print(&self) -> String {
        let header = format!("Project: {}", self.name());
        let divider = "─".repeat(header.chars().count().max(30));

        let mut lines = vec![header, divider, format!("ID:             {}", self.id())];

        if !self.description().is_empty() {
            lines.push(format!("Description:    {}", self.description()));
        }

        if !self.repository_url().is_empty() {
            lines.push(format!("Repository:     {}", self.repository_url()));
        }

        if !self.avatar_url().is_empty() {
            lines.push(format!("Avatar:         {}", self.avatar_url()));
        }

        lines.join("\n")
    }
}

impl PrettyPrint for Issue {
    fn pretty_print(&self) -> String {
        let header = format!("Issue #{}", self.iid());
        let divider = "─".repeat(header.len().max(30));

        let mut lines = vec![
            header,
            divider,
            format!("Title:          {}", self.title()),
            format!("State:          {}", self.state()),
            format!("Project:        {}", self.project_id()),
        ];

        if let Some(created) = self.created_at() {
            lines.push(format!("Created:        {}", created.format("%Y-%m-%d %H:%M:%S UTC")));
        }

        if !self.web_url().is_empty() {
            lines.push(format!("URL:            {}", self.web_url()));
        }

        lines.join("\n")
    }
}

impl PrettyPrint for VersionInfo {
    fn pretty_print(&self) -> String {
        format!(
            "Version:        {}\nRevision:       {}",
            self.version, self.revision
        )
    }
}
