// SPDX-FileCopyrightText: 2026 Quire Authors
// SPDX-License-Identifier: MIT

//! Worksheet snapshots.
//!
//! A [`WorksheetDocument`] is the serde-friendly persistence form of a
//! worksheet: the entries in chain order, stripped of transient state
//! (placeholders, mid-removal entries, evaluation status, error
//! annotations). The archive/container format around it is a host concern;
//! this module only offers the document mapping plus plain JSON save/load.

use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::model::{EntryBody, EntryKind, TextContent, TextSpan, Worksheet};
use crate::ops;

pub const WORKSHEET_DOC_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SpanDoc {
    Plain { text: String },
    Math { source: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EntryDoc {
    Command {
        source: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        result: Option<String>,
    },
    Text {
        spans: Vec<SpanDoc>,
    },
    Latex {
        source: String,
    },
    Image {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        path: Option<String>,
    },
    PageBreak,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorksheetDocument {
    version: u32,
    entries: Vec<EntryDoc>,
}

impl WorksheetDocument {
    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn entries(&self) -> &[EntryDoc] {
        &self.entries
    }
}

/// Snapshots the live chain. Placeholder entries and entries mid-removal
/// are transient and not persisted.
pub fn to_document(ws: &Worksheet) -> WorksheetDocument {
    let mut entries = Vec::new();
    for id in ws.iter() {
        let Some(entry) = ws.entry(id) else {
            continue;
        };
        if entry.about_to_be_removed() {
            continue;
        }
        let doc = match entry.body() {
            EntryBody::Command { source, result, .. } => {
                EntryDoc::Command { source: source.clone(), result: result.clone() }
            }
            EntryBody::Text { content } => EntryDoc::Text {
                spans: content
                    .spans()
                    .iter()
                    .map(|span| match span {
                        TextSpan::Plain(text) => SpanDoc::Plain { text: text.clone() },
                        TextSpan::Math { source } => SpanDoc::Math { source: source.clone() },
                    })
                    .collect(),
            },
            EntryBody::Latex { source, .. } => EntryDoc::Latex { source: source.clone() },
            EntryBody::Image { path } => EntryDoc::Image { path: path.clone() },
            EntryBody::PageBreak => EntryDoc::PageBreak,
            EntryBody::Placeholder => continue,
        };
        entries.push(doc);
    }
    WorksheetDocument { version: WORKSHEET_DOC_VERSION, entries }
}

/// Rebuilds a worksheet from a snapshot. Focus lands on the first focusable
/// entry, matching what a freshly opened worksheet shows.
pub fn from_document(doc: &WorksheetDocument) -> Result<Worksheet, LoadError> {
    if doc.version > WORKSHEET_DOC_VERSION {
        return Err(LoadError::UnsupportedVersion { found: doc.version });
    }

    let mut ws = Worksheet::new();
    for entry_doc in &doc.entries {
        let (kind, body) = match entry_doc {
            EntryDoc::Command { source, result } => (
                EntryKind::Command,
                EntryBody::Command {
                    source: source.clone(),
                    result: result.clone(),
                    error: None,
                },
            ),
            EntryDoc::Text { spans } => {
                let mut content = TextContent::new();
                for span in spans {
                    match span {
                        SpanDoc::Plain { text } => content.push_plain(text.clone()),
                        SpanDoc::Math { source } => content.push_math(source.clone()),
                    }
                }
                (EntryKind::Text, EntryBody::Text { content })
            }
            EntryDoc::Latex { source } => {
                (EntryKind::Latex, EntryBody::Latex { source: source.clone(), rendered: false })
            }
            EntryDoc::Image { path } => (EntryKind::Image, EntryBody::Image { path: path.clone() }),
            EntryDoc::PageBreak => (EntryKind::PageBreak, EntryBody::PageBreak),
        };
        let id = ops::append(&mut ws, kind);
        if let Some(entry) = ws.entry_mut(id) {
            *entry.body_mut() = body;
        }
    }

    let first = ws.iter().find(|id| ws.entry(*id).is_some_and(|e| e.want_focus()));
    match first {
        Some(id) => {
            ws.focus(id);
        }
        None => ws.clear_focus(),
    }
    Ok(ws)
}

pub fn save_worksheet(ws: &Worksheet, path: &Path) -> Result<(), SaveError> {
    let doc = to_document(ws);
    let json = serde_json::to_string_pretty(&doc).map_err(SaveError::Serialize)?;
    fs::write(path, json).map_err(SaveError::Io)
}

pub fn load_worksheet(path: &Path) -> Result<Worksheet, LoadError> {
    let text = fs::read_to_string(path).map_err(LoadError::Io)?;
    let doc: WorksheetDocument = serde_json::from_str(&text).map_err(LoadError::Parse)?;
    from_document(&doc)
}

#[derive(Debug)]
pub enum SaveError {
    Io(io::Error),
    Serialize(serde_json::Error),
}

impl fmt::Display for SaveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "failed to write worksheet: {err}"),
            Self::Serialize(err) => write!(f, "failed to serialize worksheet: {err}"),
        }
    }
}

impl std::error::Error for SaveError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Serialize(err) => Some(err),
        }
    }
}

#[derive(Debug)]
pub enum LoadError {
    Io(io::Error),
    Parse(serde_json::Error),
    UnsupportedVersion { found: u32 },
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "failed to read worksheet: {err}"),
            Self::Parse(err) => write!(f, "failed to parse worksheet: {err}"),
            Self::UnsupportedVersion { found } => {
                write!(f, "unsupported worksheet document version {found}")
            }
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Parse(err) => Some(err),
            Self::UnsupportedVersion { .. } => None,
        }
    }
}
