//! Lexical path manipulation.

use std::path::{Component, Path, PathBuf};

/// Collapse `.` and `..` components without touching the filesystem.
///
/// `..` at the start of a relative path is kept; `..` directly under the
/// root of an absolute path is dropped. An empty result becomes `.`.
pub fn clean_path(path: &Path) -> PathBuf {
    let mut out: Vec<Component> = Vec::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.last() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(component),
            },
            other => out.push(other),
        }
    }

    if out.is_empty() {
        return PathBuf::from(".");
    }
    out.iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapses_dot_components() {
        assert_eq!(
            clean_path(Path::new("notebook/sub/../notes/./idea")),
            PathBuf::from("notebook/notes/idea")
        );
    }

    #[test]
    fn keeps_leading_parent_in_relative_paths() {
        assert_eq!(clean_path(Path::new("../a/../../b")), PathBuf::from("../../b"));
    }

    #[test]
    fn drops_parent_of_root() {
        assert_eq!(clean_path(Path::new("/../a")), PathBuf::from("/a"));
    }

    #[test]
    fn empty_result_is_current_dir() {
        assert_eq!(clean_path(Path::new("a/..")), PathBuf::from("."));
    }
}
