/*
 * storage.rs
 * Copyright (c) 2025 zk contributors
 *
 * Filesystem access for the editor integration.
 */

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use zk_lsp_core::FileStorage;
use zk_util::clean_path;

#[derive(Debug, Default, Clone, Copy)]
pub struct FsStorage;

impl FileStorage for FsStorage {
    /// Resolves symlinks when the file exists, otherwise cleans the path
    /// lexically.
    fn canonical(&self, path: &Path) -> PathBuf {
        fs::canonicalize(path).unwrap_or_else(|_| clean_path(path))
    }

    fn read(&self, path: &Path) -> io::Result<String> {
        fs::read_to_string(path)
    }
}
