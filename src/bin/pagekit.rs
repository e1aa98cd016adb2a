//! pagekit command line
//!
//! ```text
//! pagekit routes src/pages
//! pagekit match src/pages /blog/hello
//! pagekit render src/pages/about.page.json
//! ```

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use pagekit::routing::SourcePageLoader;
use pagekit::{build_routes, register_default_blocks, BlockRegistry, BlockRenderer, PageDocument, RouteTable, SiteConfig};

#[derive(Parser, Debug)]
#[command(name = "pagekit", version, about = "Inspect page routes and render block documents")]
struct Cli {
    /// Site config file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the route table as JSON
    Routes {
        /// Pages directory (defaults to `pages_dir` from the config)
        pages_dir: Option<PathBuf>,
    },
    /// Print the route matching a request path
    Match {
        pages_dir: PathBuf,
        /// Request path, e.g. /blog/hello
        path: String,
    },
    /// Render a page document to HTML with the built-in blocks
    Render { document: PathBuf },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => SiteConfig::load(path).with_context(|| format!("loading {}", path.display()))?,
        None => SiteConfig::default(),
    };

    match cli.command {
        Command::Routes { pages_dir } => {
            let pages_dir = pages_dir.unwrap_or_else(|| config.pages_dir.clone());
            let table = load_routes(&pages_dir, &config).await?;
            println!("{}", serde_json::to_string_pretty(&table)?);
        }
        Command::Match { pages_dir, path } => {
            let table = load_routes(&pages_dir, &config).await?;
            match table.resolve(&path) {
                Some(found) => {
                    let output = serde_json::json!({
                        "route": found.route,
                        "params": found.params,
                    });
                    println!("{}", serde_json::to_string_pretty(&output)?);
                }
                None => {
                    println!("404 Not Found: {}", path);
                    return Ok(ExitCode::FAILURE);
                }
            }
        }
        Command::Render { document } => {
            let json = std::fs::read_to_string(&document)
                .with_context(|| format!("reading {}", document.display()))?;
            println!("{}", render_document_json(&json)?);
        }
    }

    Ok(ExitCode::SUCCESS)
}

async fn load_routes(pages_dir: &Path, config: &SiteConfig) -> Result<RouteTable> {
    info!("Building routes from {}", pages_dir.display());
    build_routes(pages_dir, config, &SourcePageLoader::new())
        .await
        .with_context(|| format!("building routes from {}", pages_dir.display()))
}

/// Render a JSON page document with the built-in blocks
fn render_document_json(json: &str) -> Result<String> {
    let document = PageDocument::from_json(json).context("parsing page document")?;
    let registry = BlockRegistry::new();
    register_default_blocks(&registry);
    let node = BlockRenderer::new(registry).render_document(&document)?;
    Ok(node.to_html())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_uses_builtin_blocks() {
        let html = render_document_json(
            r#"{"path": "/", "blocks": [
                {"type": "HeadingBlock", "props": {"text": "Hello", "level": 2}},
                {"type": "Carousel"}
            ]}"#,
        )
        .unwrap();
        assert_eq!(
            html,
            "<h2 class=\"block-heading\">Hello</h2>\
             <div data-unknown-block=\"Carousel\">Unknown block: Carousel</div>"
        );
    }

    #[test]
    fn test_render_reports_bad_document() {
        let err = render_document_json("{").unwrap_err();
        assert!(err.to_string().contains("parsing page document"));
    }
}
