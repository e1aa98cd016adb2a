//! Page module loading
//!
//! The router never imports page files itself. It asks a `PageLoader` for the
//! page's module, which exposes an optional layout override and an optional
//! factory that renders the page body.

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::core::block::BlockError;
use crate::core::instance::PageDocument;
use crate::core::node::Node;
use crate::runtime::BlockRenderer;

/// What a page factory gets to see when rendering
pub struct PageContext<'a> {
    /// Request path
    pub path: &'a str,
    /// Parameters bound by the route matcher
    pub params: &'a HashMap<String, String>,
    /// Renderer for block trees
    pub renderer: &'a BlockRenderer,
}

/// Renders the body of a page
pub type PageFactory = Arc<dyn Fn(&PageContext<'_>) -> Result<Node, BlockError> + Send + Sync>;

/// A loaded page module
#[derive(Clone, Default)]
pub struct PageModule {
    /// Layout override exported by the page
    pub layout: Option<String>,
    pub factory: Option<PageFactory>,
}

impl PageModule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_layout(mut self, layout: impl Into<String>) -> Self {
        self.layout = Some(layout.into());
        self
    }

    pub fn with_factory<F>(mut self, factory: F) -> Self
    where
        F: Fn(&PageContext<'_>) -> Result<Node, BlockError> + Send + Sync + 'static,
    {
        self.factory = Some(Arc::new(factory));
        self
    }
}

impl std::fmt::Debug for PageModule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageModule")
            .field("layout", &self.layout)
            .field("factory", &self.factory.is_some())
            .finish()
    }
}

/// Loads page modules by file path
#[async_trait]
pub trait PageLoader: Send + Sync {
    async fn load_page(&self, file: &Path) -> Result<PageModule, LoadError>;

    /// Read only the page's layout export.
    ///
    /// Route building needs nothing else, so loaders that can read the layout
    /// without loading the page body should override this.
    async fn load_layout(&self, file: &Path) -> Result<Option<String>, LoadError> {
        Ok(self.load_page(file).await?.layout)
    }
}

/// Page modules registered in memory, keyed by file path
#[derive(Debug, Clone, Default)]
pub struct InMemoryPageLoader {
    pages: HashMap<PathBuf, PageModule>,
}

impl InMemoryPageLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, file: impl Into<PathBuf>, module: PageModule) {
        self.pages.insert(file.into(), module);
    }

    pub fn with_page(mut self, file: impl Into<PathBuf>, module: PageModule) -> Self {
        self.insert(file, module);
        self
    }
}

#[async_trait]
impl PageLoader for InMemoryPageLoader {
    async fn load_page(&self, file: &Path) -> Result<PageModule, LoadError> {
        self.pages
            .get(file)
            .cloned()
            .ok_or_else(|| LoadError::NotFound(file.to_path_buf()))
    }
}

/// Loads pages from source files on disk.
///
/// The layout comes from an `export const layout = "..."` declaration in the
/// page source. The body comes from a sibling `<name>.page.json` document, if
/// one exists; pages without one have no factory.
#[derive(Debug, Clone, Copy, Default)]
pub struct SourcePageLoader;

impl SourcePageLoader {
    pub fn new() -> Self {
        Self
    }

    /// Path of the block document stored next to a page file
    pub fn document_path(file: &Path) -> PathBuf {
        file.with_extension("page.json")
    }
}

#[async_trait]
impl PageLoader for SourcePageLoader {
    async fn load_page(&self, file: &Path) -> Result<PageModule, LoadError> {
        let mut module = PageModule::new();
        module.layout = self.load_layout(file).await?;

        let doc_path = Self::document_path(file);
        match tokio::fs::read_to_string(&doc_path).await {
            Ok(json) => {
                let document = PageDocument::from_json(&json).map_err(|source| LoadError::InvalidDocument {
                    path: doc_path.clone(),
                    source,
                })?;
                let document = Arc::new(document);
                module = module.with_factory(move |ctx| ctx.renderer.render_document(&document));
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
            Err(source) => return Err(LoadError::Io { path: doc_path, source }),
        }

        Ok(module)
    }

    async fn load_layout(&self, file: &Path) -> Result<Option<String>, LoadError> {
        let source = tokio::fs::read_to_string(file).await.map_err(|source| LoadError::Io {
            path: file.to_path_buf(),
            source,
        })?;
        Ok(find_layout_export(&source))
    }
}

/// Find `export const layout = "name"` (optionally typed) in page source
pub fn find_layout_export(source: &str) -> Option<String> {
    const DECL: &str = "export const layout";

    let mut rest = source;
    while let Some(pos) = rest.find(DECL) {
        rest = &rest[pos + DECL.len()..];
        if let Some(value) = parse_assignment(rest) {
            return Some(value);
        }
    }
    None
}

fn parse_assignment(rest: &str) -> Option<String> {
    let rest = rest.trim_start();
    // optional `: string` annotation
    let rest = match rest.strip_prefix(':') {
        Some(annotated) => annotated.trim_start().trim_start_matches(|c: char| c.is_alphanumeric()),
        None => rest,
    };
    let rest = rest.trim_start().strip_prefix('=')?.trim_start();
    let quote = rest.chars().next().filter(|c| matches!(c, '"' | '\'' | '`'))?;
    let body = &rest[quote.len_utf8()..];
    let end = body.find(quote)?;
    Some(body[..end].to_string())
}

/// Page loading errors
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("No page module for {}", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid page document {}: {source}", .path.display())]
    InvalidDocument {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
