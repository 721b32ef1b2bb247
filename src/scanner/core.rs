use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use http::Method;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, trace};

use crate::error::RegistrationError;

/// HTTP method tokens recognized as handler file stems.
pub const METHOD_TOKENS: [&str; 5] = ["GET", "POST", "PUT", "PATCH", "DELETE"];

/// Parameter names become URL placeholders and handler-visible keys, so they
/// must be plain identifiers.
static PARAM_NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("param name regex is valid"));

/// How a tree node maps onto a URL segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind {
    /// Literal segment, matched verbatim
    Static,
    /// Bracketed directory, matched as a named parameter
    Dynamic,
}

/// Recognized handler source kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceExt {
    Js,
    Ts,
}

impl SourceExt {
    fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "js" => Some(SourceExt::Js),
            "ts" => Some(SourceExt::Ts),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SourceExt::Js => "js",
            SourceExt::Ts => "ts",
        }
    }
}

/// A handler source file discovered at a tree node.
#[derive(Debug, Clone)]
pub struct HandlerFile {
    pub method: Method,
    pub path: PathBuf,
    pub ext: SourceExt,
}

/// One node of the route tree, mirroring one directory under the routes root.
#[derive(Debug, Clone)]
pub struct RouteNode {
    /// Raw directory name (brackets included for dynamic nodes); empty for
    /// the root
    pub segment: String,
    pub kind: SegmentKind,
    /// Bound parameter name, set iff the node is dynamic
    pub param: Option<String>,
    /// Children keyed by raw directory name; iteration order is irrelevant
    /// here, the resolver imposes its own sibling order
    pub children: BTreeMap<String, RouteNode>,
    /// Handlers keyed by canonical method token, at most one per method
    pub handlers: BTreeMap<String, HandlerFile>,
}

impl RouteNode {
    fn new(segment: String, kind: SegmentKind, param: Option<String>) -> Self {
        Self {
            segment,
            kind,
            param,
            children: BTreeMap::new(),
            handlers: BTreeMap::new(),
        }
    }
}

/// Scan a routes root directory into a [`RouteNode`] tree.
///
/// The returned root node carries an empty segment; its children mirror the
/// immediate subdirectories of `root`.
///
/// # Errors
///
/// Fails with [`RegistrationError::Io`] on an unreadable directory,
/// [`RegistrationError::InvalidParamName`] on a malformed `[param]` segment,
/// and [`RegistrationError::DuplicateHandlerExtension`] when two handler
/// files claim the same method at the same node. Any failure aborts the
/// whole pass.
pub fn scan_routes(root: &Path) -> Result<RouteNode, RegistrationError> {
    let mut node = RouteNode::new(String::new(), SegmentKind::Static, None);
    scan_dir(root, &mut node)?;
    debug!(root = %root.display(), "route tree scanned");
    Ok(node)
}

fn scan_dir(dir: &Path, node: &mut RouteNode) -> Result<(), RegistrationError> {
    let entries = fs::read_dir(dir).map_err(|source| RegistrationError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut names: Vec<(PathBuf, bool)> = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| RegistrationError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        let file_type = entry.file_type().map_err(|source| RegistrationError::Io {
            path: entry.path(),
            source,
        })?;
        names.push((entry.path(), file_type.is_dir()));
    }
    // Deterministic visit order so duplicate-handler errors always name the
    // same pair of files regardless of readdir order.
    names.sort();

    for (path, is_dir) in names {
        let name = match path.file_name().and_then(|n| n.to_str()) {
            Some(n) => n.to_string(),
            None => {
                trace!(path = %path.display(), "skipping non-UTF-8 entry");
                continue;
            }
        };

        if is_dir {
            let mut child = node_for_segment(&name, dir)?;
            scan_dir(&path, &mut child)?;
            node.children.insert(name, child);
        } else if let Some((token, method, ext)) = parse_handler_name(&name) {
            if let Some(existing) = node.handlers.get(token) {
                return Err(RegistrationError::DuplicateHandlerExtension {
                    method,
                    first: existing.path.clone(),
                    second: path,
                });
            }
            trace!(method = %method, file = %path.display(), "handler file found");
            node.handlers
                .insert(token.to_string(), HandlerFile { method, path, ext });
        } else {
            trace!(file = %path.display(), "ignoring non-handler file");
        }
    }

    Ok(())
}

fn node_for_segment(name: &str, dir: &Path) -> Result<RouteNode, RegistrationError> {
    if let Some(param) = name.strip_prefix('[').and_then(|n| n.strip_suffix(']')) {
        if !PARAM_NAME_RE.is_match(param) {
            return Err(RegistrationError::InvalidParamName {
                segment: param.to_string(),
                dir: dir.to_path_buf(),
            });
        }
        Ok(RouteNode::new(
            name.to_string(),
            SegmentKind::Dynamic,
            Some(param.to_string()),
        ))
    } else {
        Ok(RouteNode::new(name.to_string(), SegmentKind::Static, None))
    }
}

/// Parse a file name of the form `<METHOD>.<ext>` into its canonical method
/// token, [`Method`], and source kind. Returns `None` for anything that does
/// not follow the handler convention.
fn parse_handler_name(name: &str) -> Option<(&'static str, Method, SourceExt)> {
    let (stem, ext) = name.rsplit_once('.')?;
    let ext = SourceExt::from_extension(ext)?;
    let upper = stem.to_ascii_uppercase();
    let token = METHOD_TOKENS.iter().find(|t| **t == upper)?;
    let method = match *token {
        "GET" => Method::GET,
        "POST" => Method::POST,
        "PUT" => Method::PUT,
        "PATCH" => Method::PATCH,
        "DELETE" => Method::DELETE,
        _ => return None,
    };
    Some((token, method, ext))
}
