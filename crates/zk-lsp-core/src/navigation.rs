/*
 * navigation.rs
 * Copyright (c) 2025 zk contributors
 *
 * Link-following queries: document links, hover and definition.
 */

use std::path::Path;

use tracing::debug;

use crate::document::DocumentSession;
use crate::error::{LspCoreError, Result};
use crate::notebook::{FileStorage, Notebook};
use crate::resolver::{resolve_href, resolve_hrefs};
use crate::types::{Location, Position, Range, ResolvedLink};

/// Every link in the document whose target resolves.
///
/// Links that do not resolve, or fail to, are left out. The notebook is
/// searched once for all of them.
pub fn document_links(session: &DocumentSession, notebook: &dyn Notebook) -> Vec<ResolvedLink> {
    let links = session.links();
    let hrefs: Vec<&str> = links.iter().map(|link| link.href.as_str()).collect();
    let targets = match resolve_hrefs(notebook, session.path(), &hrefs) {
        Ok(targets) => targets,
        Err(err) => {
            debug!(error = %err, "dropping document links");
            return Vec::new();
        }
    };

    links
        .iter()
        .zip(targets)
        .filter_map(|(link, target)| {
            target.map(|target| ResolvedLink {
                range: link.range,
                target,
            })
        })
        .collect()
}

/// The content of the note linked under the cursor.
pub fn hover(
    session: &DocumentSession,
    notebook: &dyn Notebook,
    fs: &dyn FileStorage,
    pos: Position,
) -> Result<Option<String>> {
    let Some(target) = link_target_at(session, notebook, pos)? else {
        return Ok(None);
    };
    let Some(path) = target.strip_prefix("file://") else {
        return Ok(None);
    };

    let path = Path::new(path);
    let content = fs.read(path).map_err(|source| LspCoreError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Some(content))
}

/// Where the link under the cursor points.
pub fn definition(
    session: &DocumentSession,
    notebook: &dyn Notebook,
    pos: Position,
) -> Result<Option<Location>> {
    Ok(link_target_at(session, notebook, pos)?.map(|uri| Location {
        uri,
        range: Range::default(),
    }))
}

fn link_target_at(
    session: &DocumentSession,
    notebook: &dyn Notebook,
    pos: Position,
) -> Result<Option<String>> {
    match session.link_at(pos) {
        Some(link) => resolve_href(notebook, session.path(), &link.href),
        None => Ok(None),
    }
}
