//! # Registrar
//!
//! Runs the whole registration pipeline and binds the result onto the
//! hosting server abstraction, exactly once per process start.
//!
//! Order of operations: scan, resolve, detect conflicts, discover
//! middleware, resolve every handler and compose every chain - and only
//! then, with nothing left that can fail, mount each record on the host in
//! resolver traversal order. That order puts static paths before sibling
//! dynamic paths, which matters on hosts that give first-registered exact
//! paths priority over pattern-bearing ones.
//!
//! There is no re-registration API. Route changes require a fresh process;
//! that is the dev watcher's job.

use std::fmt;
use std::path::{Path, PathBuf};

use http::Method;
use tracing::info;

use crate::conflict::{resolve_conflicts, Conflict, ConflictPolicy};
use crate::error::RegistrationError;
use crate::loader::{Handler, ModuleLoader};
use crate::middleware::{MiddlewareDescriptor, MiddlewareSet};
use crate::resolver::{resolve_routes, UrlPattern};
use crate::scanner::scan_routes;

/// The hosting HTTP server, seen from the registration side.
///
/// The transport is an external collaborator: request parsing, sockets and
/// per-request timeouts all live behind this trait. `mount` is called once
/// per committed route, in registration-priority order.
pub trait HostServer {
    fn mount(&mut self, record: RouteRecord);
}

/// Options for one registration pass.
#[derive(Debug, Clone, Default)]
pub struct RegisterOptions {
    /// Prefix prepended to every URL pattern (e.g. `/api/v1`)
    pub prefix: String,
    /// Strict conflict policy: abort instead of dropping the later route
    pub strict: bool,
    /// Middleware directory; defaults to `middleware/` next to the routes
    /// root
    pub middleware_dir: Option<PathBuf>,
}

/// A fully resolved route: pattern, handler, middleware chain, provenance.
///
/// The chain lists middlewares in invocation order; the handler runs after
/// the last of them.
#[derive(Clone)]
pub struct RouteRecord {
    pub method: Method,
    pub pattern: UrlPattern,
    pub handler: Handler,
    pub chain: Vec<MiddlewareDescriptor>,
    pub source: PathBuf,
}

impl fmt::Debug for RouteRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteRecord")
            .field("method", &self.method)
            .field("pattern", &self.pattern.to_string())
            .field(
                "chain",
                &self.chain.iter().map(|m| m.name.as_str()).collect::<Vec<_>>(),
            )
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}

/// The committed route table: an immutable snapshot of one registration
/// pass. Built once, never mutated; the inspector reads it, nothing writes
/// it.
#[derive(Debug)]
pub struct RouteTable {
    records: Vec<RouteRecord>,
    middlewares: MiddlewareSet,
    dropped: Vec<Conflict>,
}

impl RouteTable {
    /// Committed records in registration order.
    pub fn records(&self) -> &[RouteRecord] {
        &self.records
    }

    /// The middleware set the chains were composed from.
    pub fn middlewares(&self) -> &MiddlewareSet {
        &self.middlewares
    }

    /// Conflicts resolved by dropping the later route (non-strict mode
    /// only; strict mode never commits a table with conflicts).
    pub fn dropped_conflicts(&self) -> &[Conflict] {
        &self.dropped
    }
}

/// Run the full pipeline against `routes_dir` and mount every surviving
/// route on `server`.
///
/// Commitment is all-or-nothing: every error this can return is raised
/// before the first `mount` call, so the host never observes a partial
/// table.
pub fn register_routes<S: HostServer>(
    server: &mut S,
    routes_dir: &Path,
    options: &RegisterOptions,
    loader: &dyn ModuleLoader,
) -> Result<RouteTable, RegistrationError> {
    let tree = scan_routes(routes_dir)?;
    let resolved = resolve_routes(&tree, &options.prefix);

    let policy = if options.strict {
        ConflictPolicy::Strict
    } else {
        ConflictPolicy::NonStrict
    };
    let (resolved, dropped) = resolve_conflicts(resolved, policy)?;

    let middleware_dir = options
        .middleware_dir
        .clone()
        .unwrap_or_else(|| default_middleware_dir(routes_dir));
    let middlewares = MiddlewareSet::discover(&middleware_dir)?;

    let mut records = Vec::with_capacity(resolved.len());
    for route in resolved {
        let module = loader.load_route(&route.source)?;
        let chain = middlewares.chain(&module.middleware, &route.source)?;
        records.push(RouteRecord {
            method: route.method,
            pattern: route.pattern,
            handler: module.handler,
            chain,
            source: route.source,
        });
    }

    // Nothing past this point can fail.
    for record in &records {
        server.mount(record.clone());
    }

    info!(
        routes_count = records.len(),
        dropped_count = dropped.len(),
        strict = options.strict,
        prefix = %options.prefix,
        "route table committed"
    );

    Ok(RouteTable {
        records,
        middlewares,
        dropped,
    })
}

fn default_middleware_dir(routes_dir: &Path) -> PathBuf {
    routes_dir
        .parent()
        .map(|p| p.join("middleware"))
        .unwrap_or_else(|| PathBuf::from("middleware"))
}
