//! Block categories and classification
//!
//! Every block declares one of a fixed set of categories. Editors group the
//! palette by category and `BlockRegistry::by_category` filters on it.
//!
//! The submodules hold the built-in blocks of each category;
//! `register_default_blocks` installs all of them.

pub mod advanced;
pub mod content;
pub mod layout;
pub mod media;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::str::FromStr;

use crate::core::registry::BlockRegistry;
use crate::core::Props;

/// Block category enumeration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockCategory {
    /// Structural blocks (sections, columns)
    Layout,
    /// Text-bearing blocks (headings, cards, buttons)
    #[default]
    Content,
    /// Images, galleries, embeds
    Media,
    /// Anything with custom behaviour (forms, donations)
    Advanced,
}

impl BlockCategory {
    /// All categories in palette order
    pub const ALL: [BlockCategory; 4] = [
        BlockCategory::Layout,
        BlockCategory::Content,
        BlockCategory::Media,
        BlockCategory::Advanced,
    ];

    /// Get the wire name of the category
    pub fn as_str(&self) -> &'static str {
        match self {
            BlockCategory::Layout => "layout",
            BlockCategory::Content => "content",
            BlockCategory::Media => "media",
            BlockCategory::Advanced => "advanced",
        }
    }

    /// Get a human-readable name for the category
    pub fn display_name(&self) -> &'static str {
        match self {
            BlockCategory::Layout => "Layout",
            BlockCategory::Content => "Content",
            BlockCategory::Media => "Media",
            BlockCategory::Advanced => "Advanced",
        }
    }
}

impl std::fmt::Display for BlockCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Error returned when parsing an unknown category name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown block category: {0}")]
pub struct UnknownCategory(pub String);

impl FromStr for BlockCategory {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BlockCategory::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

/// Register the built-in block set.
///
/// Existing entries with the same names are overwritten. Returns the number of
/// blocks registered.
pub fn register_default_blocks(registry: &BlockRegistry) -> usize {
    let blocks = [
        layout::section(),
        layout::two_column(),
        content::heading(),
        content::text(),
        content::hero(),
        content::button(),
        content::card(),
        media::image(),
        media::gallery(),
        advanced::donation(),
    ];
    let count = blocks.len();
    for block in blocks {
        registry.register_block(block);
    }
    tracing::debug!(count, "registered default blocks");
    count
}

/// A string prop, treating `""` as absent
pub(crate) fn str_prop<'a>(props: &'a Props, name: &str) -> Option<&'a str> {
    props.get(name).and_then(Value::as_str).filter(|s| !s.is_empty())
}

/// A string prop restricted to `allowed`, falling back to the first entry
pub(crate) fn choice<'a>(props: &'a Props, name: &str, allowed: &[&'a str]) -> &'a str {
    str_prop(props, name)
        .and_then(|v| allowed.iter().copied().find(|a| *a == v))
        .unwrap_or(allowed[0])
}
