//! Route table construction
//!
//! Scans a pages directory and converts every page file into a `RouteRecord`:
//!
//! | file                   | path          | name          |
//! |------------------------|---------------|---------------|
//! | `index.tsx`            | `/`           | `index`       |
//! | `about.tsx`            | `/about`      | `about`       |
//! | `blog/index.tsx`       | `/blog`       | `blog`        |
//! | `blog/[slug].tsx`      | `/blog/:slug` | `blog-slug`   |
//! | `docs/[...rest].tsx`   | `/docs/*`     | `docs-*`      |
//!
//! Static routes sort before dynamic ones; within each group paths sort
//! lexicographically.

use futures::future::join_all;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::loader::PageLoader;
use super::matcher::is_dynamic;
use super::{RouteError, RouteRecord, RouteTable};
use crate::config::SiteConfig;

/// Build the route table for `pages_dir`.
///
/// Fails only if the directory cannot be enumerated. A page whose layout
/// cannot be read keeps the default layout.
pub async fn build_routes(
    pages_dir: impl AsRef<Path>,
    config: &SiteConfig,
    loader: &dyn PageLoader,
) -> Result<RouteTable, RouteError> {
    let pages_dir = pages_dir.as_ref();
    let root = std::fs::canonicalize(pages_dir).map_err(|source| RouteError::NotADirectory {
        path: pages_dir.to_path_buf(),
        source: Some(source),
    })?;
    if !root.is_dir() {
        return Err(RouteError::NotADirectory { path: root, source: None });
    }

    let files = find_page_files(&root, config)?;
    tracing::debug!(dir = %root.display(), count = files.len(), "found page files");

    let records = join_all(
        files
            .into_iter()
            .map(|(relative, file)| file_to_route(relative, file, config, loader)),
    )
    .await;

    let records = sort_routes(records);
    warn_duplicates(&records);
    tracing::info!(dir = %root.display(), routes = records.len(), "route table built");

    RouteTable::new(records)
}

/// Page files under `root` as (`/`-separated relative path, absolute path)
fn find_page_files(root: &Path, config: &SiteConfig) -> Result<Vec<(String, PathBuf)>, RouteError> {
    let mut files = Vec::new();

    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        let is_page = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| config.is_page_extension(ext));
        if !is_page {
            continue;
        }

        let Ok(relative) = path.strip_prefix(root) else {
            continue;
        };
        let relative = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        files.push((relative, path.to_path_buf()));
    }

    Ok(files)
}

async fn file_to_route(relative: String, file: PathBuf, config: &SiteConfig, loader: &dyn PageLoader) -> RouteRecord {
    let path = route_path(&relative, &config.page_extensions);
    let name = route_name(&path);

    let layout = match loader.load_layout(&file).await {
        Ok(layout) => layout.unwrap_or_else(|| config.default_layout.clone()),
        Err(err) => {
            tracing::warn!(file = %file.display(), error = %err, "failed to read page layout, using default layout");
            config.default_layout.clone()
        }
    };

    tracing::debug!(%path, %name, %layout, "resolved route");

    RouteRecord {
        path,
        file,
        name,
        layout,
        ssr: config.ssr,
        middleware: None,
    }
}

/// Convert a page file's relative path into a canonical route path
///
/// # Examples
/// ```
/// use pagekit::routing::route_path;
///
/// let exts = vec!["tsx".to_string()];
/// assert_eq!(route_path("blog/[slug].tsx", &exts), "/blog/:slug");
/// assert_eq!(route_path("docs/[...rest].tsx", &exts), "/docs/*");
/// assert_eq!(route_path("index.tsx", &exts), "/");
/// ```
pub fn route_path(relative: &str, extensions: &[String]) -> String {
    let relative = relative.trim_matches('/');
    let stem = strip_page_extension(relative, extensions);

    let path = match stem.rsplit_once('/') {
        Some((dir, "index")) => format!("/{}", dir),
        None if stem == "index" => "/".to_string(),
        _ => format!("/{}", stem),
    };

    let path = convert_brackets(&path);

    if path == "/index" {
        return "/".to_string();
    }
    match path.strip_suffix("/index") {
        Some("") => "/".to_string(),
        Some(trimmed) => trimmed.to_string(),
        None => path,
    }
}

fn strip_page_extension<'a>(relative: &'a str, extensions: &[String]) -> &'a str {
    match relative.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.contains('/') && extensions.iter().any(|e| e == ext) => stem,
        _ => relative,
    }
}

/// Rewrite `[...name]` to `*` and then `[name]` to `:name`.
///
/// Catch-all brackets are handled first so they never become `:...name`.
fn convert_brackets(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    let mut rest = path;

    while let Some(open) = rest.find('[') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        match after.find(']') {
            Some(close) if close > 0 => {
                let inner = &after[..close];
                match inner.strip_prefix("...") {
                    Some(name) if !name.is_empty() => out.push('*'),
                    _ => {
                        out.push(':');
                        out.push_str(inner);
                    }
                }
                rest = &after[close + 1..];
            }
            _ => {
                out.push('[');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

/// Derive a route name: `/` is `index`, otherwise `/a/:b` becomes `a-b`
pub fn route_name(path: &str) -> String {
    if path == "/" {
        return "index".to_string();
    }
    path.trim_start_matches('/').replace('/', "-").replace(':', "")
}

/// Static routes first, then dynamic and catch-all; lexicographic within each
pub fn sort_routes(mut records: Vec<RouteRecord>) -> Vec<RouteRecord> {
    records.sort_by(|a, b| (is_dynamic(&a.path), &a.path).cmp(&(is_dynamic(&b.path), &b.path)));
    records
}

fn warn_duplicates(records: &[RouteRecord]) {
    let mut seen = HashSet::new();
    for record in records {
        if !seen.insert(record.path.as_str()) {
            tracing::warn!(
                path = %record.path,
                file = %record.file.display(),
                "duplicate route path, only the first in match order is reachable"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::loader::{InMemoryPageLoader, PageModule, SourcePageLoader};
    use std::fs;

    fn exts() -> Vec<String> {
        vec!["tsx".to_string(), "jsx".to_string()]
    }

    #[test]
    fn test_route_path_static() {
        assert_eq!(route_path("index.tsx", &exts()), "/");
        assert_eq!(route_path("about.tsx", &exts()), "/about");
        assert_eq!(route_path("docs.jsx", &exts()), "/docs");
        assert_eq!(route_path("blog/index.tsx", &exts()), "/blog");
        assert_eq!(route_path("a/b/c.tsx", &exts()), "/a/b/c");
        assert_eq!(route_path("index/index.tsx", &exts()), "/");
    }

    #[test]
    fn test_route_path_brackets() {
        assert_eq!(route_path("blog/[slug].tsx", &exts()), "/blog/:slug");
        assert_eq!(route_path("[org]/[repo]/index.tsx", &exts()), "/:org/:repo");
        assert_eq!(route_path("docs/[...rest].tsx", &exts()), "/docs/*");
        assert_eq!(route_path("[...all].tsx", &exts()), "/*");
        assert_eq!(route_path("shop/item-[id].tsx", &exts()), "/shop/item-:id");
    }

    #[test]
    fn test_route_path_keeps_unmatched_brackets() {
        assert_eq!(route_path("odd/[.tsx", &exts()), "/odd/[");
        assert_eq!(route_path("odd/[].tsx", &exts()), "/odd/[]");
    }

    #[test]
    fn test_route_path_unknown_extension_kept() {
        assert_eq!(route_path("notes.md", &exts()), "/notes.md");
        assert_eq!(route_path("about.page.tsx", &exts()), "/about.page");
    }

    #[test]
    fn test_route_name() {
        assert_eq!(route_name("/"), "index");
        assert_eq!(route_name("/about"), "about");
        assert_eq!(route_name("/blog/:slug"), "blog-slug");
        assert_eq!(route_name("/docs/*"), "docs-*");
    }

    #[test]
    fn test_sort_routes() {
        let records = ["/users/:id", "/docs/*", "/", "/users/list", "/about"]
            .into_iter()
            .map(|p| RouteRecord {
                path: p.to_string(),
                file: PathBuf::new(),
                name: route_name(p),
                layout: "default".into(),
                ssr: true,
                middleware: None,
            })
            .collect();
        let paths: Vec<_> = sort_routes(records).into_iter().map(|r| r.path).collect();
        assert_eq!(paths, vec!["/", "/about", "/users/list", "/docs/*", "/users/:id"]);
    }

    fn write_pages(root: &Path, files: &[&str]) {
        for file in files {
            let path = root.join(file);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(&path, "export default () => null\n").unwrap();
        }
    }

    #[tokio::test]
    async fn test_build_routes_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        write_pages(
            dir.path(),
            &[
                "index.tsx",
                "about.jsx",
                "blog/index.tsx",
                "blog/[slug].tsx",
                "docs/[...rest].tsx",
                "users/list.tsx",
                "users/[id].tsx",
                "README.md",
                "api/hello.ts",
            ],
        );
        fs::write(dir.path().join("about.jsx"), "export const layout = \"marketing\"").unwrap();

        let config = SiteConfig::default().with_ssr(false);
        let table = build_routes(dir.path(), &config, &SourcePageLoader::new()).await.unwrap();

        let paths: Vec<_> = table.iter().map(|r| r.path.as_str()).collect();
        assert_eq!(
            paths,
            vec!["/", "/about", "/blog", "/users/list", "/blog/:slug", "/docs/*", "/users/:id"]
        );

        let about = table.by_name("about").unwrap();
        assert_eq!(about.layout, "marketing");
        assert!(about.file.is_absolute());
        assert!(about.file.ends_with("about.jsx"));
        assert!(table.iter().all(|r| !r.ssr));
        assert_eq!(table.by_name("blog-slug").unwrap().layout, "default");
    }

    #[tokio::test]
    async fn test_load_failure_falls_back_to_default_layout() {
        let dir = tempfile::tempdir().unwrap();
        write_pages(dir.path(), &["index.tsx", "pricing.tsx"]);
        let root = fs::canonicalize(dir.path()).unwrap();

        // only pricing is known to the loader; index fails to load
        let loader = InMemoryPageLoader::new().with_page(root.join("pricing.tsx"), PageModule::new().with_layout("wide"));
        let config = SiteConfig {
            default_layout: "base".into(),
            ..SiteConfig::default()
        };
        let table = build_routes(dir.path(), &config, &loader).await.unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table.by_name("index").unwrap().layout, "base");
        assert_eq!(table.by_name("pricing").unwrap().layout, "wide");
    }

    #[tokio::test]
    async fn test_bad_page_document_keeps_layout() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("about.tsx"), "export const layout = \"marketing\"\n").unwrap();
        fs::write(dir.path().join("about.page.json"), "{not json").unwrap();

        let table = build_routes(dir.path(), &SiteConfig::default(), &SourcePageLoader::new())
            .await
            .unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.by_name("about").unwrap().layout, "marketing");
    }

    #[tokio::test]
    async fn test_duplicate_paths_are_kept() {
        let dir = tempfile::tempdir().unwrap();
        write_pages(dir.path(), &["a.tsx", "a/index.tsx"]);

        let table = build_routes(dir.path(), &SiteConfig::default(), &SourcePageLoader::new())
            .await
            .unwrap();
        assert_eq!(table.len(), 2);
        assert!(table.iter().all(|r| r.path == "/a"));
    }

    #[tokio::test]
    async fn test_missing_directory_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let err = build_routes(dir.path().join("nope"), &SiteConfig::default(), &SourcePageLoader::new())
            .await
            .unwrap_err();
        assert!(matches!(err, RouteError::NotADirectory { .. }));
    }

    #[tokio::test]
    async fn test_file_instead_of_directory_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("index.tsx");
        fs::write(&file, "").unwrap();
        let err = build_routes(&file, &SiteConfig::default(), &SourcePageLoader::new())
            .await
            .unwrap_err();
        assert!(matches!(err, RouteError::NotADirectory { source: None, .. }));
    }

    #[tokio::test]
    async fn test_empty_directory() {
        let dir = tempfile::tempdir().unwrap();
        let table = build_routes(dir.path(), &SiteConfig::default(), &SourcePageLoader::new())
            .await
            .unwrap();
        assert!(table.is_empty());
    }
}
