use std::fs;
use std::ops::Deref;
use std::path::{Path, PathBuf};

/// Scratch directory tree, removed on drop.
pub struct TempTree(tempfile::TempDir);

impl TempTree {
    pub fn new(prefix: &str) -> Self {
        let dir = tempfile::Builder::new()
            .prefix(&format!("walkup-test-{}-", prefix))
            .tempdir()
            .unwrap();
        Self(dir)
    }

    pub fn mkdir(&self, rel: &str) -> PathBuf {
        let path = self.join(rel);
        fs::create_dir_all(&path).unwrap();
        path
    }

    pub fn touch(&self, rel: &str) -> PathBuf {
        self.write(rel, "")
    }

    pub fn write(&self, rel: &str, content: &str) -> PathBuf {
        let path = self.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }
}

impl Deref for TempTree {
    type Target = Path;

    fn deref(&self) -> &Path {
        self.0.path()
    }
}
