#![allow(dead_code)]

pub mod fixtures {
    use std::fs;
    use std::path::{Path, PathBuf};

    use tempfile::TempDir;

    /// A scratch project directory with the conventional `routes/` and
    /// `middleware/` layout. Dropped with the test.
    pub struct Project {
        dir: TempDir,
    }

    impl Project {
        pub fn new() -> Self {
            let dir = tempfile::tempdir().expect("failed to create temp project");
            fs::create_dir_all(dir.path().join("routes")).expect("failed to create routes dir");
            Self { dir }
        }

        pub fn root(&self) -> &Path {
            self.dir.path()
        }

        pub fn routes_dir(&self) -> PathBuf {
            self.dir.path().join("routes")
        }

        pub fn middleware_dir(&self) -> PathBuf {
            self.dir.path().join("middleware")
        }

        /// Write a route source file under `routes/`, creating parents.
        /// `rel` is e.g. `users/[id]/GET.js`.
        pub fn route_file(&self, rel: &str) -> PathBuf {
            let path = self.routes_dir().join(rel);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).expect("failed to create route dirs");
            }
            fs::write(&path, "// route handler\n").expect("failed to write route file");
            path
        }

        /// Write a middleware source file, e.g. `auth._global.js` or `m1.js`.
        pub fn middleware_file(&self, name: &str) -> PathBuf {
            let dir = self.middleware_dir();
            fs::create_dir_all(&dir).expect("failed to create middleware dir");
            let path = dir.join(name);
            fs::write(&path, "// middleware\n").expect("failed to write middleware file");
            path
        }

        /// Create an empty directory under `routes/` without any handlers.
        pub fn route_dir(&self, rel: &str) -> PathBuf {
            let path = self.routes_dir().join(rel);
            fs::create_dir_all(&path).expect("failed to create route dir");
            path
        }
    }
}
