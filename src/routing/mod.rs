//! File-system page routing
//!
//! `builder` turns a page directory into a sorted `RouteTable`, `matcher`
//! selects the route for a request path, and `loader` is the capability the
//! builder uses to read page modules.

pub mod builder;
pub mod loader;
pub mod matcher;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

pub use builder::{build_routes, route_name, route_path};
pub use loader::{InMemoryPageLoader, PageContext, PageFactory, PageLoader, PageModule, SourcePageLoader};
pub use matcher::{match_route, PathPattern, RouteMatch};

/// One resolved page file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteRecord {
    /// Canonical URL pattern, e.g. `/blog/:slug` or `/docs/*`
    pub path: String,
    /// Absolute location of the page module
    pub file: PathBuf,
    /// Kebab-case identifier derived from the path
    pub name: String,
    pub layout: String,
    pub ssr: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub middleware: Option<Vec<String>>,
}

impl RouteRecord {
    pub fn is_dynamic(&self) -> bool {
        matcher::is_dynamic(&self.path)
    }
}

#[derive(Debug, Clone)]
struct CompiledRoute {
    record: RouteRecord,
    pattern: PathPattern,
}

/// Ordered, immutable route table
///
/// Matching walks the routes in stored order and the first match wins, so
/// the order produced by `build_routes` (static before dynamic) is the match
/// priority. Patterns are compiled once, when the table is built.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: Vec<CompiledRoute>,
}

impl RouteTable {
    /// Build a table from records, keeping their order
    pub fn new(records: Vec<RouteRecord>) -> Result<Self, RouteError> {
        let routes = records
            .into_iter()
            .map(|record| {
                let pattern = PathPattern::compile(&record.path).map_err(|source| RouteError::Pattern {
                    path: record.path.clone(),
                    source,
                })?;
                Ok(CompiledRoute { record, pattern })
            })
            .collect::<Result<Vec<_>, RouteError>>()?;
        Ok(Self { routes })
    }

    /// Routes in match order
    pub fn iter(&self) -> impl Iterator<Item = &RouteRecord> {
        self.routes.iter().map(|r| &r.record)
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Find a route by its derived name
    pub fn by_name(&self, name: &str) -> Option<&RouteRecord> {
        self.iter().find(|r| r.name == name)
    }

    /// First route matching `request_path`
    pub fn match_path(&self, request_path: &str) -> Option<&RouteRecord> {
        self.routes
            .iter()
            .find(|r| r.pattern.matches(&r.record.path, request_path))
            .map(|r| &r.record)
    }

    /// First route matching `request_path`, with its bound parameters
    pub fn resolve(&self, request_path: &str) -> Option<RouteMatch<'_>> {
        self.routes.iter().find_map(|r| {
            r.pattern
                .captures(&r.record.path, request_path)
                .map(|params| RouteMatch { route: &r.record, params })
        })
    }

    pub fn into_records(self) -> Vec<RouteRecord> {
        self.routes.into_iter().map(|r| r.record).collect()
    }
}

impl Serialize for RouteTable {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

/// Routing errors
#[derive(Debug, thiserror::Error)]
pub enum RouteError {
    /// The pages directory does not exist or is not a directory
    #[error("Pages directory not found: {}", .path.display())]
    NotADirectory {
        path: PathBuf,
        #[source]
        source: Option<std::io::Error>,
    },

    /// Walking the pages directory failed
    #[error("Failed to enumerate pages: {0}")]
    Enumerate(#[from] walkdir::Error),

    /// A route path could not be compiled
    #[error("Invalid route pattern {path}: {source}")]
    Pattern {
        path: String,
        #[source]
        source: regex::Error,
    },
}

/// Parameters bound by a match
pub type RouteParams = HashMap<String, String>;
