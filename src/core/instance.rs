//! Block instances and persisted page documents
//!
//! A `BlockInstance` is one node of an authored block tree. Trees are usually
//! loaded from a page document (`{ "path": ..., "blocks": [...] }`) and handed
//! to the renderer once per request.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::Props;

/// A node in an authoring-time block tree
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BlockInstance {
    /// Opaque identifier assigned by the editor
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Registry key of the block to render
    #[serde(rename = "type")]
    pub block_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant: Option<String>,
    #[serde(default)]
    pub props: Props,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<BlockInstance>,
}

impl BlockInstance {
    pub fn new(block_type: impl Into<String>) -> Self {
        Self {
            block_type: block_type.into(),
            ..Default::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Assign a fresh random identifier
    pub fn with_generated_id(self) -> Self {
        self.with_id(Uuid::new_v4().to_string())
    }

    pub fn with_variant(mut self, variant: impl Into<String>) -> Self {
        self.variant = Some(variant.into());
        self
    }

    pub fn with_prop(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.props.insert(name.into(), value.into());
        self
    }

    pub fn with_props(mut self, props: Props) -> Self {
        self.props = props;
        self
    }

    pub fn with_child(mut self, child: BlockInstance) -> Self {
        self.children.push(child);
        self
    }

    /// Number of instances in this subtree, including `self`
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(BlockInstance::node_count).sum::<usize>()
    }
}

/// Persisted block tree for one page
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageDocument {
    pub path: String,
    #[serde(default)]
    pub blocks: Vec<BlockInstance>,
}

impl PageDocument {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            blocks: Vec::new(),
        }
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
