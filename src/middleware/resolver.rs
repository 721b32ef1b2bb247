use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, trace, warn};

use super::{MiddlewareDescriptor, MiddlewareKind, SKIP_GLOBAL};
use crate::error::RegistrationError;

const GLOBAL_INFIX: &str = "._global";
const RECOGNIZED_EXTS: [&str; 2] = ["js", "ts"];

/// All middleware discovered for one registration pass.
///
/// Globals are held pre-sorted by filename; named middlewares are keyed by
/// name. The set is built once, before any route is processed, so duplicate
/// global names fail the pass up front.
#[derive(Debug, Clone, Default)]
pub struct MiddlewareSet {
    globals: Vec<MiddlewareDescriptor>,
    named: BTreeMap<String, MiddlewareDescriptor>,
}

impl MiddlewareSet {
    /// An empty set: every chain is just the handler, and any declared name
    /// fails with [`RegistrationError::MiddlewareNotFound`].
    pub fn empty() -> Self {
        Self::default()
    }

    /// Scan a flat middleware directory.
    ///
    /// The scan is non-recursive; subdirectories and unrecognized extensions
    /// are ignored. A missing directory yields an empty set - only an
    /// existing-but-unreadable directory is an error.
    pub fn discover(dir: &Path) -> Result<Self, RegistrationError> {
        if !dir.exists() {
            debug!(dir = %dir.display(), "no middleware directory, using empty set");
            return Ok(Self::empty());
        }

        let entries = fs::read_dir(dir).map_err(|source| RegistrationError::Io {
            path: dir.to_path_buf(),
            source,
        })?;

        let mut files: Vec<PathBuf> = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| RegistrationError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
            if entry
                .file_type()
                .map_err(|source| RegistrationError::Io {
                    path: entry.path(),
                    source,
                })?
                .is_file()
            {
                files.push(entry.path());
            }
        }
        files.sort();

        let mut set = Self::empty();
        for path in files {
            let file_name = match path.file_name().and_then(|n| n.to_str()) {
                Some(n) => n.to_string(),
                None => continue,
            };
            let Some((stem, ext)) = file_name.rsplit_once('.') else {
                continue;
            };
            if !RECOGNIZED_EXTS.contains(&ext) {
                trace!(file = %file_name, "ignoring non-middleware file");
                continue;
            }

            if let Some(name) = stem.strip_suffix(GLOBAL_INFIX) {
                if let Some(existing) = set.globals.iter().find(|g| g.name == name) {
                    return Err(RegistrationError::DuplicateGlobalMiddleware {
                        name: name.to_string(),
                        first: existing.source.clone(),
                        second: path,
                    });
                }
                set.globals.push(MiddlewareDescriptor {
                    name: name.to_string(),
                    kind: MiddlewareKind::Global,
                    source: path,
                    sort_key: file_name,
                });
            } else {
                let descriptor = MiddlewareDescriptor {
                    name: stem.to_string(),
                    kind: MiddlewareKind::Named,
                    source: path.clone(),
                    sort_key: file_name.clone(),
                };
                if let Some(existing) = set.named.get(stem) {
                    warn!(
                        name = %stem,
                        kept = %existing.source.display(),
                        ignored = %path.display(),
                        "duplicate named middleware, keeping first"
                    );
                } else {
                    set.named.insert(stem.to_string(), descriptor);
                }
            }
        }

        // Files were visited in sorted order, but the ordering invariant is
        // on filenames, not discovery order; make it explicit.
        set.globals.sort_by(|a, b| a.sort_key.cmp(&b.sort_key));

        debug!(
            globals = set.globals.len(),
            named = set.named.len(),
            dir = %dir.display(),
            "middleware discovered"
        );
        Ok(set)
    }

    /// Global middlewares in lexicographic filename order.
    pub fn globals(&self) -> &[MiddlewareDescriptor] {
        &self.globals
    }

    /// All discovered named middleware names, alphabetical.
    pub fn available(&self) -> Vec<String> {
        self.named.keys().cloned().collect()
    }

    /// Every descriptor in the set, globals first.
    pub fn descriptors(&self) -> Vec<&MiddlewareDescriptor> {
        self.globals.iter().chain(self.named.values()).collect()
    }

    /// Compose the middleware chain for one route.
    ///
    /// `declared` is the route module's middleware-name list (empty by
    /// default). If it contains [`SKIP_GLOBAL`] the sentinel is stripped and
    /// the global prefix is omitted; otherwise all globals lead the chain.
    /// Declared names follow in declared order. The handler itself is
    /// appended by the registrar, not here.
    pub fn chain(
        &self,
        declared: &[String],
        route: &Path,
    ) -> Result<Vec<MiddlewareDescriptor>, RegistrationError> {
        let skip_globals = declared.iter().any(|n| n == SKIP_GLOBAL);
        let mut chain: Vec<MiddlewareDescriptor> = if skip_globals {
            Vec::with_capacity(declared.len())
        } else {
            self.globals.clone()
        };

        for name in declared.iter().filter(|n| n.as_str() != SKIP_GLOBAL) {
            let descriptor =
                self.named
                    .get(name)
                    .ok_or_else(|| RegistrationError::MiddlewareNotFound {
                        name: name.clone(),
                        route: route.to_path_buf(),
                        available: self.available(),
                    })?;
            chain.push(descriptor.clone());
        }

        Ok(chain)
    }
}
