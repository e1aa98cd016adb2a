//! Block trait and related types
//!
//! This module defines the core Block trait that every renderable block
//! implements, along with block metadata, the server-data context, and the
//! error type shared by render and hydration.

use async_trait::async_trait;
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

use super::node::Node;
use super::schema::{BlockSchema, PropType, ValidationResult};
use super::Props;
use crate::categories::BlockCategory;

/// Core block trait that all blocks must implement
#[async_trait]
pub trait Block: Send + Sync {
    /// Get block metadata
    fn meta(&self) -> &BlockMeta;

    /// Render merged props into an output node.
    ///
    /// Must not depend on anything but `props`.
    fn render(&self, props: &Props) -> Result<Node, BlockError>;

    /// Whether `server_data` produces anything
    fn has_server_data(&self) -> bool {
        false
    }

    /// Fetch data to overlay onto props before rendering
    async fn server_data(&self, _ctx: &BlockServerContext) -> Result<Option<Props>, BlockError> {
        Ok(None)
    }
}

/// Block metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockMeta {
    /// Registry key, unique per registry
    pub name: String,
    /// Display name in the editor palette
    pub label: String,
    /// Symbolic icon key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default)]
    pub category: BlockCategory,
    /// Allowed variant identifiers, if the block declares any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variants: Option<Vec<String>>,
    #[serde(default)]
    pub schema: BlockSchema,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai: Option<AiCapabilities>,
}

impl BlockMeta {
    pub fn new(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            icon: None,
            category: BlockCategory::default(),
            variants: None,
            schema: BlockSchema::new(),
            ai: None,
        }
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn with_category(mut self, category: BlockCategory) -> Self {
        self.category = category;
        self
    }

    pub fn with_variants<I, S>(mut self, variants: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.variants = Some(variants.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_schema(mut self, schema: BlockSchema) -> Self {
        self.schema = schema;
        self
    }

    /// Declare a single prop
    pub fn with_prop(mut self, name: impl Into<String>, prop_type: PropType) -> Self {
        self.schema = self.schema.with(name, prop_type);
        self
    }

    pub fn with_ai(mut self, ai: AiCapabilities) -> Self {
        self.ai = Some(ai);
        self
    }

    /// Whether `variant` is allowed. Blocks without declared variants accept any.
    pub fn allows_variant(&self, variant: &str) -> bool {
        match &self.variants {
            Some(variants) => variants.iter().any(|v| v == variant),
            None => true,
        }
    }

    /// Check authored props and an optional variant against this metadata
    pub fn validate(&self, props: &Props, variant: Option<&str>) -> ValidationResult {
        let mut result = self.schema.validate_props(props);
        if let Some(v) = variant.filter(|v| !self.allows_variant(v)) {
            result
                .warnings
                .push(format!("Variant '{}' is not declared by block '{}'", v, self.name));
        }
        result
    }
}

/// AI capability flags advertised to the editor
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AiCapabilities {
    #[serde(default)]
    pub enhance: bool,
    #[serde(default)]
    pub translate: bool,
}

/// Request-scoped context handed to `Block::server_data`
#[derive(Debug, Clone, Default)]
pub struct BlockServerContext {
    /// Request path
    pub path: String,
    /// Parameters bound by the route matcher
    pub params: HashMap<String, String>,
    /// Authenticated user, if any
    pub user: Option<Value>,
}

impl BlockServerContext {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Default::default()
        }
    }

    pub fn with_params(mut self, params: HashMap<String, String>) -> Self {
        self.params = params;
        self
    }
}

type RenderFn = Arc<dyn Fn(&Props) -> Result<Node, BlockError> + Send + Sync>;
type ServerDataFn =
    Arc<dyn Fn(BlockServerContext) -> BoxFuture<'static, Result<Props, BlockError>> + Send + Sync>;

/// A block assembled from metadata and closures
#[derive(Clone)]
pub struct FnBlock {
    meta: BlockMeta,
    render: RenderFn,
    server_data: Option<ServerDataFn>,
}

impl FnBlock {
    /// Attach a server-data hook
    pub fn with_server_data<F>(mut self, fetch: F) -> Self
    where
        F: Fn(BlockServerContext) -> BoxFuture<'static, Result<Props, BlockError>> + Send + Sync + 'static,
    {
        self.server_data = Some(Arc::new(fetch));
        self
    }
}

impl std::fmt::Debug for FnBlock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnBlock")
            .field("meta", &self.meta)
            .field("server_data", &self.server_data.is_some())
            .finish()
    }
}

#[async_trait]
impl Block for FnBlock {
    fn meta(&self) -> &BlockMeta {
        &self.meta
    }

    fn render(&self, props: &Props) -> Result<Node, BlockError> {
        (self.render)(props)
    }

    fn has_server_data(&self) -> bool {
        self.server_data.is_some()
    }

    async fn server_data(&self, ctx: &BlockServerContext) -> Result<Option<Props>, BlockError> {
        match &self.server_data {
            Some(fetch) => fetch(ctx.clone()).await.map(Some),
            None => Ok(None),
        }
    }
}

/// Build a block from its metadata and a render function
///
/// # Example
/// ```
/// use pagekit::core::block::{define_block, BlockMeta};
/// use pagekit::core::node::Node;
///
/// let heading = define_block(BlockMeta::new("Heading", "Heading"), |props| {
///     let text = props.get("text").and_then(|v| v.as_str()).unwrap_or_default();
///     Ok(Node::element("h2").text(text).into())
/// });
/// ```
pub fn define_block<F>(meta: BlockMeta, render: F) -> FnBlock
where
    F: Fn(&Props) -> Result<Node, BlockError> + Send + Sync + 'static,
{
    FnBlock {
        meta,
        render: Arc::new(render),
        server_data: None,
    }
}

/// Block errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum BlockError {
    /// Render function failed
    #[error("Render failed: {0}")]
    RenderError(String),

    /// Server data hook failed
    #[error("Server data failed: {0}")]
    ServerDataError(String),

    /// Props could not be used
    #[error("Invalid props: {0}")]
    InvalidProps(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::FutureExt;
    use serde_json::json;

    fn hero() -> FnBlock {
        define_block(
            BlockMeta::new("Hero", "Hero")
                .with_icon("target")
                .with_prop("title", PropType::String)
                .with_variants(["dark", "light"]),
            |props| {
                let title = props
                    .get("title")
                    .and_then(Value::as_str)
                    .ok_or_else(|| BlockError::InvalidProps("title is required".into()))?;
                Ok(Node::element("h1").text(title).into())
            },
        )
    }

    #[test]
    fn test_meta_deserializes_with_defaults() {
        let meta: BlockMeta = serde_json::from_value(json!({
            "name": "Text",
            "label": "Text",
            "schema": {"text": "text"}
        }))
        .unwrap();
        assert_eq!(meta.category, BlockCategory::Content);
        assert!(meta.variants.is_none());
        assert_eq!(meta.schema.get("text"), Some(PropType::Text));
    }

    #[test]
    fn test_allows_variant() {
        let block = hero();
        assert!(block.meta().allows_variant("dark"));
        assert!(!block.meta().allows_variant("neon"));
        assert!(BlockMeta::new("Any", "Any").allows_variant("neon"));
    }

    #[test]
    fn test_validate_reports_unknown_variant_as_warning() {
        let block = hero();
        let props = json!({"title": "Hi"}).as_object().cloned().unwrap();
        let result = block.meta().validate(&props, Some("neon"));
        assert!(result.is_valid());
        assert!(result.warnings[0].contains("neon"));
    }

    #[test]
    fn test_render_error_is_returned() {
        let block = hero();
        let err = block.render(&Props::new()).unwrap_err();
        assert!(matches!(err, BlockError::InvalidProps(_)));
    }

    #[tokio::test]
    async fn test_server_data_hook() {
        let block = hero().with_server_data(|ctx| {
            async move {
                let mut data = Props::new();
                data.insert("title".into(), json!(format!("Page {}", ctx.path)));
                Ok(data)
            }
            .boxed()
        });
        assert!(block.has_server_data());

        let data = block
            .server_data(&BlockServerContext::new("/about"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(data["title"], json!("Page /about"));
    }

    #[tokio::test]
    async fn test_server_data_defaults_to_none() {
        let data = hero().server_data(&BlockServerContext::default()).await.unwrap();
        assert!(data.is_none());
    }
}
