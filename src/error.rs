//! Registration-time error types.
//!
//! Every error here is raised before the first route is mounted on the host
//! server, so a failed registration never leaves a partially committed table.

use std::fmt;
use std::path::PathBuf;

use http::Method;

use crate::conflict::Conflict;

/// Fatal error raised by the registration pipeline.
#[derive(Debug)]
pub enum RegistrationError {
    /// A directory could not be read during the scan.
    Io {
        /// Directory (or entry) that failed
        path: PathBuf,
        /// Underlying filesystem error
        source: std::io::Error,
    },
    /// Two handler files claim the same method at the same node.
    ///
    /// The convention allows exactly one source file per method per
    /// directory; `GET.js` next to `GET.ts` is unresolvable.
    DuplicateHandlerExtension {
        method: Method,
        first: PathBuf,
        second: PathBuf,
    },
    /// A `[param]` directory name is not a valid identifier.
    InvalidParamName { segment: String, dir: PathBuf },
    /// Ambiguous dynamic-segment collisions found in strict mode.
    ///
    /// Carries every pairwise conflict detected in the pass, not just the
    /// first one, so a single failed run reports the full repair list.
    Conflict { conflicts: Vec<Conflict> },
    /// A route declared a middleware name that was never discovered.
    MiddlewareNotFound {
        name: String,
        route: PathBuf,
        /// All discovered named middlewares, alphabetical
        available: Vec<String>,
    },
    /// Two global middleware files share the same name.
    DuplicateGlobalMiddleware {
        name: String,
        first: PathBuf,
        second: PathBuf,
    },
}

impl fmt::Display for RegistrationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistrationError::Io { path, source } => {
                write!(f, "failed to read {}: {}", path.display(), source)
            }
            RegistrationError::DuplicateHandlerExtension {
                method,
                first,
                second,
            } => {
                write!(
                    f,
                    "duplicate handler for {method}: both {} and {} are present; \
                     keep exactly one source file per method per directory",
                    first.display(),
                    second.display()
                )
            }
            RegistrationError::InvalidParamName { segment, dir } => {
                write!(
                    f,
                    "invalid parameter segment '[{segment}]' in {}: parameter names \
                     must be valid identifiers",
                    dir.display()
                )
            }
            RegistrationError::Conflict { conflicts } => {
                writeln!(
                    f,
                    "ambiguous route registration: {} conflicting pair(s)",
                    conflicts.len()
                )?;
                for c in conflicts {
                    writeln!(f, "  {c}")?;
                }
                Ok(())
            }
            RegistrationError::MiddlewareNotFound {
                name,
                route,
                available,
            } => {
                write!(
                    f,
                    "middleware '{name}' declared by {} was not found; available: [{}]",
                    route.display(),
                    available.join(", ")
                )
            }
            RegistrationError::DuplicateGlobalMiddleware {
                name,
                first,
                second,
            } => {
                write!(
                    f,
                    "duplicate global middleware '{name}': defined by both {} and {}",
                    first.display(),
                    second.display()
                )
            }
        }
    }
}

impl std::error::Error for RegistrationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RegistrationError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}
