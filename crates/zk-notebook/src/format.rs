/*
 * format.rs
 * Copyright (c) 2025 zk contributors
 *
 * Write links to notes in the notebook's configured style.
 */

use zk_lsp_core::{LinkFormatter, NotebookError};

use crate::config::{LinkFormat, MarkdownConfig};

#[derive(Debug, Clone)]
pub struct ConfiguredLinkFormatter {
    format: LinkFormat,
    drop_extension: bool,
}

impl ConfiguredLinkFormatter {
    pub fn new(config: &MarkdownConfig) -> Result<Self, NotebookError> {
        if let LinkFormat::Custom(template) = &config.link_format
            && !template.contains("{{path}}")
        {
            return Err(NotebookError::LinkFormat(format!(
                "template `{}` does not use {{{{path}}}}",
                template
            )));
        }
        Ok(Self {
            format: config.link_format.clone(),
            drop_extension: config.link_drop_extension,
        })
    }
}

impl LinkFormatter for ConfiguredLinkFormatter {
    fn format(&self, path: &str, title: &str) -> Result<String, NotebookError> {
        let path = if self.drop_extension {
            path.strip_suffix(".md").unwrap_or(path)
        } else {
            path
        };

        Ok(match &self.format {
            LinkFormat::Markdown => format!("[{}]({})", title, encode_path(path)),
            LinkFormat::Wiki => format!("[[{}]]", path),
            LinkFormat::Custom(template) => template
                .replace("{{path}}", path)
                .replace("{{title}}", title),
        })
    }
}

/// Percent-encode each segment of a `/`-separated path for use as a
/// Markdown link destination.
fn encode_path(path: &str) -> String {
    path.split('/')
        .map(urlencoding::encode)
        .collect::<Vec<_>>()
        .join("/")
}
