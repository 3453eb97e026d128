/*
 * notebook.rs
 * Copyright (c) 2025 zk contributors
 *
 * A notebook read straight from disk.
 *
 * Nothing is indexed ahead of time: every query walks the notebook so the
 * answers follow the files as they change. Batched lookups walk it once.
 */

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use tracing::warn;
use zk_lsp_core::{
    Collection, CollectionKind, LinkFormatter, MarkdownSettings, Note, Notebook, NotebookError,
};
use zk_markdown::{BlockKind, MarkdownParser, TagExtension, TagOptions, split_blocks};

use crate::config::NotebookConfig;
use crate::discovery::discover_notes;
use crate::format::ConfiguredLinkFormatter;

#[derive(Debug)]
pub struct FsNotebook {
    root: PathBuf,
    config: NotebookConfig,
}

impl FsNotebook {
    pub fn new(root: impl Into<PathBuf>, config: NotebookConfig) -> Self {
        Self {
            root: root.into(),
            config,
        }
    }

    /// Open the notebook rooted at `root`, reading its configuration.
    pub fn load(root: impl Into<PathBuf>) -> Result<Self, NotebookError> {
        let root = root.into();
        let config = NotebookConfig::load(&root)?;
        Ok(Self::new(root, config))
    }

    pub fn config(&self) -> &NotebookConfig {
        &self.config
    }

    fn read_note(&self, relative: &Path) -> Result<Note, NotebookError> {
        let raw_content = fs::read_to_string(self.root.join(relative))?;
        Ok(Note {
            path: relative.to_path_buf(),
            title: note_title(&raw_content),
            raw_content,
        })
    }

    /// Notes that could be read; unreadable files are logged and skipped.
    fn read_notes(&self) -> Vec<Note> {
        discover_notes(&self.root)
            .into_iter()
            .filter_map(|path| {
                self.read_note(&path)
                    .inspect_err(|err| warn!(path = %path.display(), error = %err, "skipping note"))
                    .ok()
            })
            .collect()
    }

    fn tag_options(&self) -> TagOptions {
        let settings = self.markdown_settings();
        TagOptions {
            hashtags: settings.hashtags,
            multiword_tags: settings.multiword_tags,
            colon_tags: settings.colon_tags,
        }
    }
}

impl Notebook for FsNotebook {
    fn root(&self) -> &Path {
        &self.root
    }

    fn markdown_settings(&self) -> MarkdownSettings {
        self.config.format.markdown.settings()
    }

    fn find_by_href(&self, href: &str) -> Result<Option<Note>, NotebookError> {
        Ok(self.find_by_hrefs(&[href.to_string()])?.pop().flatten())
    }

    /// The notebook is walked once for the whole batch. An href matches the
    /// note at that exact path, else the note at that path plus `.md`.
    fn find_by_hrefs(&self, hrefs: &[String]) -> Result<Vec<Option<Note>>, NotebookError> {
        let by_path: HashMap<String, PathBuf> = discover_notes(&self.root)
            .into_iter()
            .map(|path| (slash_path(&path), path))
            .collect();

        hrefs
            .iter()
            .map(|href| {
                by_path
                    .get(href)
                    .or_else(|| by_path.get(&format!("{}.md", href)))
                    .map(|path| self.read_note(path))
                    .transpose()
            })
            .collect()
    }

    fn find_notes(&self) -> Result<Vec<Note>, NotebookError> {
        Ok(self.read_notes())
    }

    fn find_collections(&self, kind: CollectionKind) -> Result<Vec<Collection>, NotebookError> {
        match kind {
            CollectionKind::Tag => Ok(self.collect_tags()),
        }
    }

    fn link_formatter(&self) -> Result<Box<dyn LinkFormatter>, NotebookError> {
        Ok(Box::new(ConfiguredLinkFormatter::new(
            &self.config.format.markdown,
        )?))
    }
}

impl FsNotebook {
    fn collect_tags(&self) -> Vec<Collection> {
        let parser = MarkdownParser::new().with_extension(TagExtension::new(self.tag_options()));

        let mut counts: BTreeMap<String, usize> = BTreeMap::new();
        for note in self.read_notes() {
            let names: HashSet<String> = parser
                .parse(&note.raw_content)
                .tags()
                .map(str::to_string)
                .collect();
            for name in names {
                *counts.entry(name).or_default() += 1;
            }
        }

        counts
            .into_iter()
            .map(|(name, note_count)| Collection {
                kind: CollectionKind::Tag,
                name,
                note_count,
            })
            .collect()
    }
}

/// The text of the first level-one heading, or an empty string.
fn note_title(content: &str) -> String {
    split_blocks(content)
        .into_iter()
        .find(|block| block.kind == BlockKind::Heading { level: 1 })
        .and_then(|block| block.lines.first().map(|line| line.text(content)))
        .map(|text| text.trim_end().trim_end_matches('#').trim_end().to_string())
        .unwrap_or_default()
}

fn slash_path(path: &Path) -> String {
    path.components()
        .map(|component| component.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LinkFormat;
    use tempfile::TempDir;

    fn write(root: &Path, path: &str, content: &str) {
        let path = root.join(path);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn fixture() -> (TempDir, FsNotebook) {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::create_dir(root.join(".zk")).unwrap();
        write(root, "index.md", "# Index\n\nSee #idea and #reading.\n");
        write(root, "notes/idea.md", "# Idea ##\n\nAn #idea, twice #idea.\n");
        write(root, "notes/idea.md.md", "# Odd\n");
        write(root, "draft.md", "no heading #draft\n");
        let notebook = FsNotebook::load(root).unwrap();
        (temp, notebook)
    }

    #[test]
    fn test_titles_come_from_first_heading() {
        assert_eq!(note_title("intro\n\n## Sub\n# Main #\n"), "Main");
        assert_eq!(note_title("no heading"), "");
    }

    #[test]
    fn test_find_notes() {
        let (_temp, notebook) = fixture();
        let notes = notebook.find_notes().unwrap();
        let paths: Vec<_> = notes.iter().map(|n| slash_path(&n.path)).collect();
        assert_eq!(
            paths,
            vec!["draft.md", "index.md", "notes/idea.md", "notes/idea.md.md"]
        );
        assert_eq!(notes[1].title, "Index");
        assert_eq!(notes[0].title, "");
    }

    #[test]
    fn test_find_by_href() {
        let (_temp, notebook) = fixture();

        let note = notebook.find_by_href("notes/idea").unwrap().unwrap();
        assert_eq!(note.path, PathBuf::from("notes/idea.md"));
        assert_eq!(note.title, "Idea");

        // Both `notes/idea.md` and `notes/idea.md.md` match; the shorter wins.
        let note = notebook.find_by_href("notes/idea.md").unwrap().unwrap();
        assert_eq!(note.path, PathBuf::from("notes/idea.md"));

        assert!(notebook.find_by_href("idea").unwrap().is_none());
    }

    #[test]
    fn test_find_by_hrefs_answers_in_order() {
        let (_temp, notebook) = fixture();
        let hrefs = ["index", "missing", "notes/idea.md.md", "notes/idea"].map(String::from);
        let paths: Vec<_> = notebook
            .find_by_hrefs(&hrefs)
            .unwrap()
            .into_iter()
            .map(|note| note.map(|note| slash_path(&note.path)))
            .collect();
        assert_eq!(
            paths,
            vec![
                Some("index.md".to_string()),
                None,
                Some("notes/idea.md.md".to_string()),
                Some("notes/idea.md".to_string()),
            ]
        );
    }

    #[test]
    fn test_tag_collections_count_notes() {
        let (_temp, notebook) = fixture();
        let tags = notebook.find_collections(CollectionKind::Tag).unwrap();
        let summary: Vec<_> = tags
            .iter()
            .map(|t| (t.name.as_str(), t.note_count))
            .collect();
        assert_eq!(summary, vec![("draft", 1), ("idea", 2), ("reading", 1)]);
    }

    #[test]
    fn test_colon_tags_follow_config() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        write(
            root,
            ".zk/config.toml",
            "[format.markdown]\nhashtags = false\ncolon-tags = true\n",
        );
        write(root, "a.md", "text :alpha:beta: and #ignored\n");

        let notebook = FsNotebook::load(root).unwrap();
        let names: Vec<_> = notebook
            .find_collections(CollectionKind::Tag)
            .unwrap()
            .into_iter()
            .map(|t| t.name)
            .collect();
        assert_eq!(names, vec!["alpha", "beta"]);
    }

    #[test]
    fn test_link_formatter_follows_config() {
        let mut config = NotebookConfig::default();
        config.format.markdown.link_format = LinkFormat::Wiki;
        let notebook = FsNotebook::new("/nb", config);

        let link = notebook
            .link_formatter()
            .unwrap()
            .format("idea.md", "Idea")
            .unwrap();
        assert_eq!(link, "[[idea]]");
    }
}
