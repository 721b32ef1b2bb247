use std::path::PathBuf;

/// Reserved middleware-list entry that suppresses global-middleware
/// inclusion for a single route.
pub const SKIP_GLOBAL: &str = "!_global";

/// How a discovered middleware participates in chains.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MiddlewareKind {
    /// Applied to every route unless the route declares [`SKIP_GLOBAL`]
    Global,
    /// Applied only when a route declares it by name
    Named,
}

impl MiddlewareKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MiddlewareKind::Global => "global",
            MiddlewareKind::Named => "named",
        }
    }
}

/// A middleware source file discovered in the middleware directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MiddlewareDescriptor {
    pub name: String,
    pub kind: MiddlewareKind,
    pub source: PathBuf,
    /// The bare filename; global ordering sorts on this and nothing else
    pub sort_key: String,
}
