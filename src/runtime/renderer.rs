//! Block composition engine
//!
//! Resolves each block instance against the registry, merges instance props
//! with server data, and renders the tree into a `Node`. Children are rendered
//! as flat siblings after their parent's own output.

use crate::core::block::{BlockError, BlockServerContext};
use crate::core::instance::{BlockInstance, PageDocument};
use crate::core::node::Node;
use crate::core::registry::BlockRegistry;
use crate::core::schema::ValidationResult;
use crate::core::Props;
use serde_json::Value;

/// Renders block instance trees against a registry
#[derive(Debug, Clone)]
pub struct BlockRenderer {
    registry: BlockRegistry,
}

impl BlockRenderer {
    pub fn new(registry: BlockRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &BlockRegistry {
        &self.registry
    }

    /// Build the prop set handed to a block's render function.
    ///
    /// Later sources win: instance props, then server data, then `variant`
    /// (which is `null` when the instance has none).
    pub fn merge_props(instance: &BlockInstance, server_data: Option<&Props>) -> Props {
        let mut props = instance.props.clone();
        if let Some(data) = server_data {
            props.extend(data.iter().map(|(k, v)| (k.clone(), v.clone())));
        }
        let variant = instance.variant.clone().map(Value::String).unwrap_or(Value::Null);
        props.insert("variant".to_string(), variant);
        props
    }

    /// Render one instance and its children.
    ///
    /// An unregistered type renders to `Node::UnknownBlock`. `server_data` only
    /// applies to `instance` itself, never to its children. Errors come only
    /// from a block's own render function.
    pub fn render_block(&self, instance: &BlockInstance, server_data: Option<&Props>) -> Result<Node, BlockError> {
        let Some(block) = self.registry.get(&instance.block_type) else {
            tracing::debug!(block = %instance.block_type, "unknown block type, rendering placeholder");
            return Ok(Node::unknown_block(instance.block_type.clone()));
        };

        let report = block.meta().validate(&instance.props, instance.variant.as_deref());
        for problem in report.messages() {
            tracing::warn!(block = %instance.block_type, "{}", problem);
        }

        let props = Self::merge_props(instance, server_data);
        let own = block.render(&props)?;

        if instance.children.is_empty() {
            return Ok(own);
        }

        let mut group = Vec::with_capacity(instance.children.len() + 1);
        group.push(own);
        for child in &instance.children {
            group.push(self.render_block(child, None)?);
        }
        Ok(Node::Fragment(group))
    }

    /// Check an instance's authored props and variant against its block.
    ///
    /// `None` for unregistered types. Problems never stop rendering; the
    /// renderer logs them and renders anyway.
    pub fn validate_instance(&self, instance: &BlockInstance) -> Option<ValidationResult> {
        let block = self.registry.get(&instance.block_type)?;
        Some(block.meta().validate(&instance.props, instance.variant.as_deref()))
    }

    /// Render a list of top-level instances into one fragment
    pub fn render_blocks(&self, instances: &[BlockInstance]) -> Result<Node, BlockError> {
        instances
            .iter()
            .map(|instance| self.render_block(instance, None))
            .collect::<Result<Vec<_>, _>>()
            .map(Node::Fragment)
    }

    /// Render every block of a persisted page document
    pub fn render_document(&self, document: &PageDocument) -> Result<Node, BlockError> {
        tracing::debug!(path = %document.path, blocks = document.blocks.len(), "rendering page document");
        self.render_blocks(&document.blocks)
    }

    /// Fetch the block's server data, then render with it as the overlay.
    ///
    /// Blocks without a server-data hook, and unknown types, render exactly
    /// as `render_block(instance, None)` would.
    pub async fn hydrate(&self, instance: &BlockInstance, ctx: &BlockServerContext) -> Result<Node, BlockError> {
        let data = match self.registry.get(&instance.block_type) {
            Some(block) if block.has_server_data() => block.server_data(ctx).await?,
            _ => None,
        };
        self.render_block(instance, data.as_ref())
    }
}
