/*
 * config.rs
 * Copyright (c) 2025 zk contributors
 *
 * Notebook configuration read from `.zk/config.toml`.
 *
 * Only the `[format.markdown]` table matters to the editor integration:
 *
 * ```toml
 * [format.markdown]
 * hashtags = true
 * colon-tags = false
 * multiword-tags = false
 * link-format = "markdown"      # or "wiki", or a template like "[[{{path}}|{{title}}]]"
 * link-drop-extension = true
 * ```
 */

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use zk_lsp_core::{MarkdownSettings, NotebookError};

#[derive(Debug, Error)]
pub enum MarkdownConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

impl From<MarkdownConfigError> for NotebookError {
    fn from(err: MarkdownConfigError) -> Self {
        let path = match &err {
            MarkdownConfigError::Read { path, .. } | MarkdownConfigError::Parse { path, .. } => {
                path.clone()
            }
        };
        NotebookError::Config {
            path,
            message: err.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct NotebookConfig {
    pub format: FormatConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FormatConfig {
    pub markdown: MarkdownConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct MarkdownConfig {
    pub hashtags: bool,
    pub colon_tags: bool,
    pub multiword_tags: bool,
    pub link_format: LinkFormat,
    pub link_drop_extension: bool,
}

impl Default for MarkdownConfig {
    fn default() -> Self {
        Self {
            hashtags: true,
            colon_tags: false,
            multiword_tags: false,
            link_format: LinkFormat::Markdown,
            link_drop_extension: true,
        }
    }
}

impl MarkdownConfig {
    pub fn settings(&self) -> MarkdownSettings {
        MarkdownSettings {
            hashtags: self.hashtags,
            colon_tags: self.colon_tags,
            multiword_tags: self.multiword_tags,
        }
    }
}

/// How inserted links are written.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum LinkFormat {
    /// `[title](path)`
    #[default]
    Markdown,
    /// `[[path]]`
    Wiki,
    /// A template using `{{path}}` and `{{title}}`.
    Custom(String),
}

impl From<String> for LinkFormat {
    fn from(value: String) -> Self {
        match value.as_str() {
            "markdown" | "" => Self::Markdown,
            "wiki" => Self::Wiki,
            _ => Self::Custom(value),
        }
    }
}

impl NotebookConfig {
    pub fn parse(content: &str, path: &Path) -> Result<Self, MarkdownConfigError> {
        toml::from_str(content).map_err(|source| MarkdownConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load `<root>/.zk/config.toml`. A missing file yields the defaults.
    pub fn load(root: &Path) -> Result<Self, MarkdownConfigError> {
        let path = root.join(crate::NOTEBOOK_DIR).join("config.toml");
        match fs::read_to_string(&path) {
            Ok(content) => Self::parse(&content, &path),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            Err(source) => Err(MarkdownConfigError::Read { path, source }),
        }
    }
}
