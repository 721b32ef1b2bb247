//! # Module Loader
//!
//! The seam between the filesystem convention and actual handler code.
//!
//! The registration pipeline discovers *files*; something still has to turn a
//! route source file into a callable and into the middleware-name list the
//! route declares. That resolution happens exactly once, at registration
//! time, through the [`ModuleLoader`] trait - the committed
//! [`crate::registrar::RouteRecord`] stores the resolved callable, so no
//! further lookup or dispatch-by-name happens per request.
//!
//! [`EchoLoader`] is the batteries-included implementation used by the CLI
//! inspector and tests: every route file resolves to a handler that echoes
//! the request back, with no declared middleware.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use http::Method;
use serde_json::{json, Value};

use crate::error::RegistrationError;

/// Request data passed to a resolved handler.
///
/// Deliberately minimal: the hosting server owns real request parsing; this
/// is the value it hands across the registration boundary.
#[derive(Debug, Clone)]
pub struct HandlerRequest {
    pub method: Method,
    /// Request path as received
    pub path: String,
    /// Path parameters extracted by the host (e.g. `{"id": "123"}`)
    pub path_params: HashMap<String, String>,
    /// Request body parsed as JSON, if present
    pub body: Option<Value>,
}

/// Response produced by a resolved handler.
#[derive(Debug, Clone, PartialEq)]
pub struct HandlerResponse {
    pub status: u16,
    pub body: Value,
}

impl HandlerResponse {
    pub fn ok_json(body: Value) -> Self {
        Self { status: 200, body }
    }
}

/// An opaque resolved handler callable.
pub type Handler = Arc<dyn Fn(HandlerRequest) -> HandlerResponse + Send + Sync>;

/// What a route source file resolves to: its handler plus the
/// middleware-name list the module declares (empty by default).
pub struct RouteModule {
    pub handler: Handler,
    pub middleware: Vec<String>,
}

/// Resolves route source files into [`RouteModule`]s.
///
/// Implementations decide what a `GET.js` actually *means* - an embedded
/// interpreter, a lookup into a compiled-in handler registry, a stub. The
/// pipeline only requires that resolution is total over the files it
/// discovered and fails loudly otherwise.
pub trait ModuleLoader {
    fn load_route(&self, source: &Path) -> Result<RouteModule, RegistrationError>;
}

/// Echo every request back to the caller.
pub fn echo_handler(req: HandlerRequest) -> HandlerResponse {
    HandlerResponse::ok_json(json!({
        "method": req.method.to_string(),
        "path": req.path,
        "params": req.path_params,
        "body": req.body,
    }))
}

/// Loader that resolves every route file to [`echo_handler`] with no
/// declared middleware. Useful for inspecting a route tree before any real
/// handlers exist.
pub struct EchoLoader;

impl ModuleLoader for EchoLoader {
    fn load_route(&self, _source: &Path) -> Result<RouteModule, RegistrationError> {
        Ok(RouteModule {
            handler: Arc::new(echo_handler),
            middleware: Vec::new(),
        })
    }
}
