/*
 * workspace.rs
 * Copyright (c) 2025 zk contributors
 *
 * The set of workspace folders the editor has announced.
 */

use std::collections::HashSet;

#[derive(Debug, Default, Clone)]
pub struct WorkspaceRegistry {
    folders: HashSet<String>,
}

impl WorkspaceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the registry from the roots given at initialization.
    ///
    /// Workspace folders win when present; otherwise the root URI is used,
    /// then the deprecated root path.
    pub fn from_initial_roots(
        folders: Vec<String>,
        root_uri: Option<String>,
        root_path: Option<String>,
    ) -> Self {
        let mut registry = Self::new();
        if !folders.is_empty() {
            for folder in folders {
                registry.add_folder(folder);
            }
        } else if let Some(root) = root_uri.or(root_path) {
            registry.add_folder(root);
        }
        registry
    }

    /// Returns `false` if the folder was already registered.
    pub fn add_folder(&mut self, folder: impl Into<String>) -> bool {
        self.folders.insert(folder.into())
    }

    /// Returns `false` if the folder was not registered.
    pub fn remove_folder(&mut self, folder: &str) -> bool {
        self.folders.remove(folder)
    }

    pub fn contains(&self, folder: &str) -> bool {
        self.folders.contains(folder)
    }

    pub fn folders(&self) -> impl Iterator<Item = &str> {
        self.folders.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.folders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.folders.is_empty()
    }
}
