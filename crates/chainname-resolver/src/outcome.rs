//! Results handed back to the HTTP layer and the CLI.

use chainname_core::{build_link, ContentHash, LinkTarget};
use serde::Serialize;

/// Outcome of a single field lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "value", rename_all = "snake_case")]
pub enum Resolution {
    /// A navigable link; the HTTP layer answers with a redirect.
    LinkFound(String),
    /// A text record with no link form, served as-is.
    RawValue(String),
    NotFound,
}

impl Resolution {
    pub fn link(&self) -> Option<&str> {
        match self {
            Resolution::LinkFound(link) => Some(link),
            _ => None,
        }
    }
}

/// Content hash and `url` record of a name, read together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Links {
    pub content_hash: ContentHash,
    pub content_hash_link: LinkTarget,
    /// The `url` text record; `None` when unset.
    pub url: Option<String>,
}

impl Links {
    /// The content-hash gateway link, else the `url` record as a link.
    pub fn best_link(&self) -> Option<String> {
        self.content_hash_link
            .external_link
            .clone()
            .or_else(|| self.url.as_deref().map(|url| build_link("url", url)))
    }
}
