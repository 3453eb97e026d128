//! Note discovery.
//!
//! Walks a notebook directory to find its Markdown notes.

use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

/// Notebook-relative paths of every `.md` file under `root`, sorted.
///
/// Dot directories (`.zk`, `.git`, ...) are skipped.
pub fn discover_notes(root: &Path) -> Vec<PathBuf> {
    let walker = WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_entry(|e| !is_hidden_dir(e));

    let mut notes: Vec<PathBuf> = walker
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| e.path().extension().is_some_and(|ext| ext == "md"))
        .filter_map(|e| {
            let relative = e.path().strip_prefix(root).ok()?.to_path_buf();
            debug!(?relative, "discovered note");
            Some(relative)
        })
        .collect();

    notes.sort();
    notes
}

fn is_hidden_dir(entry: &walkdir::DirEntry) -> bool {
    entry.depth() > 0
        && entry.file_type().is_dir()
        && entry.file_name().to_string_lossy().starts_with('.')
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_discover_notes() {
        let temp = TempDir::new().unwrap();

        fs::write(temp.path().join("index.md"), "# Hello").unwrap();
        fs::create_dir(temp.path().join("journal")).unwrap();
        fs::write(temp.path().join("journal/today.md"), "# Today").unwrap();
        fs::write(temp.path().join("image.png"), "not a note").unwrap();

        fs::create_dir(temp.path().join(".zk")).unwrap();
        fs::write(temp.path().join(".zk/template.md"), "hidden").unwrap();

        let notes = discover_notes(temp.path());

        assert_eq!(
            notes,
            vec![PathBuf::from("index.md"), PathBuf::from("journal/today.md")]
        );
    }
}
