use std::fmt;
use std::path::PathBuf;

use http::Method;
use tracing::info;

use crate::scanner::{RouteNode, SegmentKind};

/// One component of a URL pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Matched verbatim
    Literal(String),
    /// Named placeholder bound from a `[param]` directory
    Param(String),
}

/// An ordered list of URL segments. The empty pattern renders as `/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlPattern {
    segments: Vec<Segment>,
}

impl UrlPattern {
    pub fn new(segments: Vec<Segment>) -> Self {
        Self { segments }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Names of the dynamic parameters, in path order.
    pub fn params(&self) -> Vec<&str> {
        self.segments
            .iter()
            .filter_map(|s| match s {
                Segment::Param(p) => Some(p.as_str()),
                Segment::Literal(_) => None,
            })
            .collect()
    }

    /// Pattern with parameter names erased to a positional marker.
    ///
    /// Two patterns with the same shape are indistinguishable by URL: no
    /// incoming request can tell `/users/:id` from `/users/:uid`. The shape
    /// string is the grouping key for conflict detection.
    pub fn shape(&self) -> String {
        if self.segments.is_empty() {
            return "/".to_string();
        }
        let mut out = String::new();
        for seg in &self.segments {
            out.push('/');
            match seg {
                Segment::Literal(s) => out.push_str(s),
                Segment::Param(_) => out.push('*'),
            }
        }
        out
    }
}

impl fmt::Display for UrlPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return write!(f, "/");
        }
        for seg in &self.segments {
            match seg {
                Segment::Literal(s) => write!(f, "/{s}")?,
                Segment::Param(p) => write!(f, "/:{p}")?,
            }
        }
        Ok(())
    }
}

/// A handler location resolved to its URL pattern; the skeleton of a route
/// record before middleware chains and the handler callable are attached.
#[derive(Debug, Clone)]
pub struct ResolvedRoute {
    pub method: Method,
    pub pattern: UrlPattern,
    /// The handler source file this route came from
    pub source: PathBuf,
}

/// Flatten a route tree into an ordered list of [`ResolvedRoute`]s.
///
/// `prefix` is prepended to every pattern as literal segments (`"/api/v1"`
/// contributes `api` and `v1`); an empty prefix contributes nothing. A
/// handler on the root node with no prefix resolves to `/`.
pub fn resolve_routes(root: &RouteNode, prefix: &str) -> Vec<ResolvedRoute> {
    let mut stack: Vec<Segment> = prefix
        .split('/')
        .filter(|s| !s.is_empty())
        .map(|s| Segment::Literal(s.to_string()))
        .collect();

    let mut out = Vec::new();
    visit(root, &mut stack, &mut out);

    let summary: Vec<String> = out
        .iter()
        .take(10)
        .map(|r| format!("{} {}", r.method, r.pattern))
        .collect();
    info!(
        routes_count = out.len(),
        prefix = %prefix,
        routes_summary = ?summary,
        "route tree resolved"
    );

    out
}

fn visit(node: &RouteNode, stack: &mut Vec<Segment>, out: &mut Vec<ResolvedRoute>) {
    // Handlers at this node first (parents before children); the BTreeMap
    // key is the canonical method token, so method order is fixed.
    for handler in node.handlers.values() {
        out.push(ResolvedRoute {
            method: handler.method.clone(),
            pattern: UrlPattern::new(stack.clone()),
            source: handler.path.clone(),
        });
    }

    // Static siblings before dynamic ones, alphabetical within each class.
    // Hosts that match in registration order must see /users/profile before
    // /users/:id.
    let mut children: Vec<&RouteNode> = node.children.values().collect();
    children.sort_by_key(|c| (c.kind == SegmentKind::Dynamic, c.segment.clone()));

    for child in children {
        let segment = match (&child.kind, &child.param) {
            (SegmentKind::Dynamic, Some(param)) => Segment::Param(param.clone()),
            _ => Segment::Literal(child.segment.clone()),
        };
        stack.push(segment);
        visit(child, stack, out);
        stack.pop();
    }
}
