/*
 * store.rs
 * Copyright (c) 2025 zk contributors
 *
 * Find the notebook a document belongs to.
 */

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tracing::info;
use zk_lsp_core::{Notebook, NotebookError, NotebookStore};

use crate::NOTEBOOK_DIR;
use crate::notebook::FsNotebook;

/// Opens notebooks on demand and keeps them for the life of the server.
#[derive(Debug, Default)]
pub struct FsNotebookStore {
    notebooks: Mutex<HashMap<PathBuf, Arc<FsNotebook>>>,
}

impl FsNotebookStore {
    pub fn new() -> Self {
        Self::default()
    }
}

/// The nearest ancestor of `path` (itself included) holding a `.zk` directory.
pub fn find_notebook_root(path: &Path) -> Option<&Path> {
    path.ancestors()
        .find(|dir| dir.join(NOTEBOOK_DIR).is_dir())
}

impl NotebookStore for FsNotebookStore {
    fn open(&self, path: &Path) -> Result<Arc<dyn Notebook>, NotebookError> {
        let root =
            find_notebook_root(path).ok_or_else(|| NotebookError::NotFound(path.to_path_buf()))?;

        let mut notebooks = self
            .notebooks
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(notebook) = notebooks.get(root) {
            return Ok(Arc::clone(notebook) as Arc<dyn Notebook>);
        }

        let notebook = Arc::new(FsNotebook::load(root)?);
        info!(root = %root.display(), "opened notebook");
        notebooks.insert(root.to_path_buf(), Arc::clone(&notebook));
        Ok(notebook)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_open_finds_nearest_notebook() {
        let temp = TempDir::new().unwrap();
        let outer = temp.path();
        let inner = outer.join("nested");
        fs::create_dir_all(outer.join(".zk")).unwrap();
        fs::create_dir_all(inner.join(".zk")).unwrap();
        fs::create_dir_all(inner.join("journal")).unwrap();

        let store = FsNotebookStore::new();
        let notebook = store.open(&inner.join("journal/today.md")).unwrap();
        assert_eq!(notebook.root(), inner.as_path());

        let notebook = store.open(&outer.join("top.md")).unwrap();
        assert_eq!(notebook.root(), outer);
    }

    #[test]
    fn test_open_caches_per_root() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join(".zk")).unwrap();

        let store = FsNotebookStore::new();
        let first = store.open(&temp.path().join("a.md")).unwrap();
        let second = store.open(&temp.path().join("b.md")).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_open_outside_notebook_is_not_found() {
        let temp = TempDir::new().unwrap();
        let Err(err) = FsNotebookStore::new().open(&temp.path().join("a.md")) else {
            panic!("a path without a .zk ancestor should not open a notebook");
        };
        assert!(matches!(err, NotebookError::NotFound(_)));
    }
}
