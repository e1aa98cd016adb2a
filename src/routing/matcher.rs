//! Route matching
//!
//! Supports two markers in route paths:
//! - `:name` - matches exactly one non-empty path segment (e.g., `/users/:id`)
//! - `*` - matches any remaining suffix, including `/` (e.g., `/docs/*`)
//!
//! Everything else must match literally.

use regex::Regex;
use std::collections::HashMap;

use super::{RouteRecord, RouteTable};

/// Key under which a catch-all capture is reported
pub const CATCH_ALL_PARAM: &str = "*";

/// Whether a route path contains a dynamic or catch-all marker
pub fn is_dynamic(path: &str) -> bool {
    path.contains(':') || path.contains('*')
}

/// A compiled route path
#[derive(Debug, Clone)]
pub enum PathPattern {
    /// Matches by string equality
    Static,
    /// Anchored regex with one capture group per parameter
    Dynamic { regex: Regex, params: Vec<String> },
}

impl PathPattern {
    /// Compile a canonical route path
    ///
    /// # Examples
    /// ```
    /// use pagekit::routing::matcher::PathPattern;
    ///
    /// let pattern = PathPattern::compile("/users/:id").unwrap();
    /// assert!(pattern.matches("/users/:id", "/users/42"));
    /// assert!(!pattern.matches("/users/:id", "/users/42/extra"));
    /// ```
    pub fn compile(path: &str) -> Result<Self, regex::Error> {
        if !is_dynamic(path) {
            return Ok(PathPattern::Static);
        }

        let mut source = String::from("^");
        let mut params = Vec::new();
        let mut literal = String::new();
        let mut chars = path.char_indices().peekable();

        while let Some((i, ch)) = chars.next() {
            match ch {
                ':' => {
                    let name_len = path[i + 1..].find('/').unwrap_or(path.len() - i - 1);
                    if name_len == 0 {
                        literal.push(ch);
                        continue;
                    }
                    source.push_str(&regex::escape(&literal));
                    literal.clear();
                    source.push_str("([^/]+)");
                    params.push(path[i + 1..i + 1 + name_len].to_string());
                    while chars.peek().is_some_and(|&(j, _)| j <= i + name_len) {
                        chars.next();
                    }
                }
                '*' => {
                    source.push_str(&regex::escape(&literal));
                    literal.clear();
                    source.push_str("(.*)");
                    params.push(CATCH_ALL_PARAM.to_string());
                }
                _ => literal.push(ch),
            }
        }
        source.push_str(&regex::escape(&literal));
        source.push('$');

        Ok(PathPattern::Dynamic {
            regex: Regex::new(&source)?,
            params,
        })
    }

    /// Whether `request_path` matches the route whose canonical path is `route_path`
    pub fn matches(&self, route_path: &str, request_path: &str) -> bool {
        match self {
            PathPattern::Static => route_path == request_path,
            PathPattern::Dynamic { regex, .. } => regex.is_match(request_path),
        }
    }

    /// Match and bind parameters
    pub fn captures(&self, route_path: &str, request_path: &str) -> Option<HashMap<String, String>> {
        match self {
            PathPattern::Static => (route_path == request_path).then(HashMap::new),
            PathPattern::Dynamic { regex, params } => {
                let caps = regex.captures(request_path)?;
                Some(
                    params
                        .iter()
                        .zip(caps.iter().skip(1))
                        .map(|(name, m)| (name.clone(), m.map_or_else(String::new, |m| m.as_str().to_string())))
                        .collect(),
                )
            }
        }
    }
}

/// A matched route with its bound parameters
#[derive(Debug, Clone, PartialEq)]
pub struct RouteMatch<'a> {
    pub route: &'a RouteRecord,
    pub params: HashMap<String, String>,
}

/// Find the first route in table order that matches `request_path`.
///
/// `None` means no page exists for the path; callers render it as a 404.
pub fn match_route<'a>(table: &'a RouteTable, request_path: &str) -> Option<&'a RouteRecord> {
    table.match_path(request_path)
}
