//! Request-time page rendering
//!
//! `Site` owns a built route table, the page loader, and the block renderer.
//! `render_path` turns a request path into a `PageOutcome`: a rendered page,
//! a client-side shell for non-SSR routes, or a not-found page.

use crate::core::block::BlockError;
use crate::core::node::Node;
use crate::runtime::BlockRenderer;
use crate::routing::loader::{LoadError, PageContext, PageLoader};
use crate::routing::{RouteParams, RouteRecord, RouteTable};
use std::path::PathBuf;

/// Result of rendering one request path
#[derive(Debug, Clone, PartialEq)]
pub enum PageOutcome {
    /// Server-rendered page body
    Rendered {
        route: RouteRecord,
        params: RouteParams,
        body: Node,
    },
    /// Route renders on the client; only the mount point is sent
    Shell { route: RouteRecord },
    /// No route matched
    NotFound { path: String },
}

impl PageOutcome {
    /// HTTP status to send with this outcome
    pub fn status(&self) -> u16 {
        match self {
            PageOutcome::Rendered { .. } | PageOutcome::Shell { .. } => 200,
            PageOutcome::NotFound { .. } => 404,
        }
    }

    /// Full HTML document for this outcome
    pub fn to_html(&self) -> String {
        let (title, layout, body): (String, &str, Node) = match self {
            PageOutcome::Rendered { route, body, .. } => (route.name.clone(), route.layout.as_str(), body.clone()),
            PageOutcome::Shell { route } => (
                route.name.clone(),
                route.layout.as_str(),
                Node::element("div").attr("id", "root").into(),
            ),
            PageOutcome::NotFound { path } => (
                "Not Found".to_string(),
                "default",
                Node::element("main")
                    .child(Node::element("h1").text("404 Not Found"))
                    .child(Node::element("p").text(format!("No page matches {}", path)))
                    .into(),
            ),
        };

        let html = Node::element("html")
            .attr("lang", "en")
            .child(
                Node::element("head")
                    .child(Node::element("meta").attr("charset", "UTF-8"))
                    .child(Node::element("title").text(title)),
            )
            .child(Node::element("body").attr("data-layout", layout).child(body));

        format!("<!DOCTYPE html>\n{}", Node::from(html).to_html())
    }
}

/// A routed site ready to serve requests
pub struct Site<L: PageLoader> {
    routes: RouteTable,
    loader: L,
    renderer: BlockRenderer,
}

impl<L: PageLoader> Site<L> {
    pub fn new(routes: RouteTable, loader: L, renderer: BlockRenderer) -> Self {
        Self {
            routes,
            loader,
            renderer,
        }
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    pub fn renderer(&self) -> &BlockRenderer {
        &self.renderer
    }

    /// Match `path` and render the page behind it.
    ///
    /// A missing route is `PageOutcome::NotFound`, never an error. Errors are
    /// page load failures and failures raised while rendering the page.
    pub async fn render_path(&self, path: &str) -> Result<PageOutcome, SiteError> {
        let Some(found) = self.routes.resolve(path) else {
            tracing::debug!(%path, "no route matched");
            return Ok(PageOutcome::NotFound { path: path.to_string() });
        };
        let route = found.route.clone();

        if !route.ssr {
            return Ok(PageOutcome::Shell { route });
        }

        let module = self.loader.load_page(&route.file).await?;
        let factory = module
            .factory
            .ok_or_else(|| SiteError::NoFactory(route.file.clone()))?;

        let body = factory(&PageContext {
            path,
            params: &found.params,
            renderer: &self.renderer,
        })
        .map_err(|source| SiteError::Render {
            route: route.path.clone(),
            source,
        })?;

        tracing::debug!(%path, route = %route.path, "rendered page");
        Ok(PageOutcome::Rendered {
            route,
            params: found.params,
            body,
        })
    }
}

/// Request-time errors; callers answer these with a 500
#[derive(Debug, thiserror::Error)]
pub enum SiteError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error("Page {} has nothing to render", .0.display())]
    NoFactory(PathBuf),

    #[error("Failed to render {route}: {source}")]
    Render {
        route: String,
        #[source]
        source: BlockError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::block::{define_block, BlockMeta};
    use crate::core::instance::BlockInstance;
    use crate::core::registry::BlockRegistry;
    use crate::core::schema::PropType;
    use crate::routing::loader::{InMemoryPageLoader, PageModule};
    use serde_json::Value;

    fn record(path: &str, file: &str, ssr: bool) -> RouteRecord {
        RouteRecord {
            path: path.to_string(),
            file: PathBuf::from(file),
            name: crate::routing::route_name(path),
            layout: "default".to_string(),
            ssr,
            middleware: None,
        }
    }

    fn site() -> Site<InMemoryPageLoader> {
        let routes = RouteTable::new(vec![
            record("/", "/p/index.tsx", true),
            record("/app", "/p/app.tsx", false),
            record("/broken", "/p/broken.tsx", true),
            record("/users/:id", "/p/users/[id].tsx", true),
        ])
        .unwrap();

        let loader = InMemoryPageLoader::new()
            .with_page(
                "/p/index.tsx",
                PageModule::new().with_factory(|ctx| {
                    ctx.renderer
                        .render_block(&BlockInstance::new("Heading").with_prop("text", "Welcome"), None)
                }),
            )
            .with_page(
                "/p/users/[id].tsx",
                PageModule::new().with_factory(|ctx| {
                    let id = ctx.params.get("id").cloned().unwrap_or_default();
                    ctx.renderer
                        .render_block(&BlockInstance::new("Heading").with_prop("text", format!("User {}", id)), None)
                }),
            )
            .with_page(
                "/p/broken.tsx",
                PageModule::new().with_factory(|_| Err(BlockError::RenderError("boom".into()))),
            );

        let registry = BlockRegistry::new();
        registry.register_block(define_block(
            BlockMeta::new("Heading", "Heading").with_prop("text", PropType::String),
            |props| {
                let text = props.get("text").and_then(Value::as_str).unwrap_or_default();
                Ok(Node::element("h1").text(text).into())
            },
        ));

        Site::new(routes, loader, BlockRenderer::new(registry))
    }

    #[tokio::test]
    async fn test_render_static_page() {
        let outcome = site().render_path("/").await.unwrap();
        assert_eq!(outcome.status(), 200);
        let html = outcome.to_html();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<h1>Welcome</h1>"));
        assert!(html.contains("data-layout=\"default\""));
    }

    #[tokio::test]
    async fn test_render_dynamic_page_with_params() {
        match site().render_path("/users/7").await.unwrap() {
            PageOutcome::Rendered { params, body, .. } => {
                assert_eq!(params["id"], "7");
                assert_eq!(body.to_html(), "<h1>User 7</h1>");
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_not_found_renders_page() {
        let outcome = site().render_path("/nope").await.unwrap();
        assert_eq!(outcome.status(), 404);
        assert!(outcome.to_html().contains("404 Not Found"));
    }

    #[tokio::test]
    async fn test_non_ssr_route_renders_shell() {
        let outcome = site().render_path("/app").await.unwrap();
        assert!(matches!(outcome, PageOutcome::Shell { .. }));
        assert!(outcome.to_html().contains("<div id=\"root\"></div>"));
    }

    #[tokio::test]
    async fn test_render_errors_propagate() {
        let err = site().render_path("/broken").await.unwrap_err();
        assert!(matches!(err, SiteError::Render { .. }));
    }

    #[tokio::test]
    async fn test_missing_module_is_an_error() {
        let routes = RouteTable::new(vec![record("/", "/p/index.tsx", true)]).unwrap();
        let site = Site::new(routes, InMemoryPageLoader::new(), BlockRenderer::new(BlockRegistry::new()));
        let err = site.render_path("/").await.unwrap_err();
        assert!(matches!(err, SiteError::Load(LoadError::NotFound(_))));
    }
}
