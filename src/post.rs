//! Post snapshot types and create/update boundary validation.
//!
//! Board and post persistence live outside this crate; the distribution
//! core only reads a snapshot of the fields it needs. The boundary
//! validation here runs at post create/update time, before anything is
//! handed to the store: option keys are checked against the allowed set and
//! content must pass the sanitizer in full.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::sanitize::ContentSanitizer;
use crate::{BoardError, Result};

/// Option keys a post may carry. Anything else is rejected at the boundary.
pub const ALLOWED_OPTION_KEYS: &[&str] = &["is_pinned", "is_popup"];

/// Visibility scope of a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PostScope {
    /// Visible to every domain; notifications go to all enabled domains.
    System,
    /// Visible to the post's owning domain only.
    Domain,
    /// Visible to a subset of workspaces within the owning domain.
    Workspace,
}

/// Read-only snapshot of a post as supplied by the post store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    /// Post identifier.
    pub post_id: String,
    /// Board the post belongs to.
    pub board_id: String,
    /// Visibility scope.
    pub scope: PostScope,
    /// Owning domain identifier.
    pub domain_id: String,
    /// Workspace identifiers; only meaningful for `Workspace` scope.
    #[serde(default)]
    pub workspaces: Vec<String>,
    /// Post title.
    pub title: String,
    /// Sanitized post contents.
    pub contents: String,
    /// Post options (already validated at the boundary).
    #[serde(default)]
    pub options: BTreeMap<String, Value>,
}

/// Incoming post fields at create/update time, before validation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PostDraft {
    /// Post title.
    pub title: String,
    /// Raw, untrusted contents.
    pub contents: String,
    /// Requested options.
    #[serde(default)]
    pub options: BTreeMap<String, Value>,
}

impl PostDraft {
    /// Validate the draft and return the sanitized contents.
    ///
    /// Option keys are checked first, then the contents go through the
    /// sanitizer. Nothing from a rejected draft may reach the store.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::InvalidOptionKey`] for an unrecognized option
    /// key, or [`BoardError::InvalidContent`] if the contents are rejected.
    pub fn validate(&self, sanitizer: &ContentSanitizer) -> Result<String> {
        validate_options(&self.options)?;
        sanitizer.sanitize(&self.contents)
    }
}

/// Check that every option key belongs to the allowed set.
pub fn validate_options(options: &BTreeMap<String, Value>) -> Result<()> {
    for key in options.keys() {
        if !ALLOWED_OPTION_KEYS.contains(&key.as_str()) {
            return Err(BoardError::InvalidOptionKey(key.clone()));
        }
    }
    Ok(())
}
