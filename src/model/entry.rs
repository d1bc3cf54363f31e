// SPDX-FileCopyrightText: 2026 Quire Authors
// SPDX-License-Identifier: MIT

use smallvec::SmallVec;

use super::ids::EntryId;

/// The closed set of entry variants a worksheet can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    Command,
    Text,
    Latex,
    Image,
    PageBreak,
    Placeholder,
}

/// One region of a rich-text body: plain text or an embedded math fragment.
///
/// The rendered form of a math fragment is opaque to this crate; only the
/// un-rendered `source` is kept, because search offsets must resolve against
/// it (see [`TextContent::expanded`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextSpan {
    Plain(String),
    Math { source: String },
}

impl TextSpan {
    pub fn source_text(&self) -> &str {
        match self {
            Self::Plain(text) => text,
            Self::Math { source } => source,
        }
    }
}

/// Span-based rich text for [`EntryBody::Text`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TextContent {
    spans: SmallVec<[TextSpan; 4]>,
}

impl TextContent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_plain(text: impl Into<String>) -> Self {
        let mut content = Self::new();
        content.push_plain(text);
        content
    }

    pub fn spans(&self) -> &[TextSpan] {
        &self.spans
    }

    pub fn push_plain(&mut self, text: impl Into<String>) {
        self.spans.push(TextSpan::Plain(text.into()));
    }

    pub fn push_math(&mut self, source: impl Into<String>) {
        self.spans.push(TextSpan::Math { source: source.into() });
    }

    pub fn is_empty(&self) -> bool {
        self.spans.iter().all(|span| span.source_text().is_empty())
    }

    /// The content with every math fragment replaced by its source text.
    ///
    /// Offsets in search cursors refer to this form, not to any rendered
    /// representation with placeholder characters.
    pub fn expanded(&self) -> String {
        let mut out = String::new();
        for span in &self.spans {
            out.push_str(span.source_text());
        }
        out
    }
}

/// Variant payloads for an [`Entry`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryBody {
    Command {
        source: String,
        result: Option<String>,
        error: Option<String>,
    },
    Text {
        content: TextContent,
    },
    Latex {
        source: String,
        rendered: bool,
    },
    Image {
        path: Option<String>,
    },
    PageBreak,
    Placeholder,
}

impl EntryBody {
    /// A fresh, empty body of the given kind.
    pub fn empty(kind: EntryKind) -> Self {
        match kind {
            EntryKind::Command => Self::Command { source: String::new(), result: None, error: None },
            EntryKind::Text => Self::Text { content: TextContent::new() },
            EntryKind::Latex => Self::Latex { source: String::new(), rendered: false },
            EntryKind::Image => Self::Image { path: None },
            EntryKind::PageBreak => Self::PageBreak,
            EntryKind::Placeholder => Self::Placeholder,
        }
    }

    pub fn kind(&self) -> EntryKind {
        match self {
            Self::Command { .. } => EntryKind::Command,
            Self::Text { .. } => EntryKind::Text,
            Self::Latex { .. } => EntryKind::Latex,
            Self::Image { .. } => EntryKind::Image,
            Self::PageBreak => EntryKind::PageBreak,
            Self::Placeholder => EntryKind::Placeholder,
        }
    }
}

/// Width/height of an entry in worksheet units; layout is a pure function of
/// the heights recorded here.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntrySize {
    pub width: f64,
    pub height: f64,
}

impl EntrySize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

pub(crate) const DEFAULT_ENTRY_HEIGHT: f64 = 30.0;

/// Terminal and transient states of one evaluation of an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvalStatus {
    Idle,
    Evaluating,
    Done,
    Error,
    Interrupted,
}

/// One unit of notebook content, doubly linked to its neighbors.
///
/// Link fields hold ids, not references; the owning [`Worksheet`] arena is
/// the single source of truth for liveness. `previous`/`next` stay mutually
/// consistent except while a removal transition is in flight.
///
/// [`Worksheet`]: super::Worksheet
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    body: EntryBody,
    previous: Option<EntryId>,
    next: Option<EntryId>,
    size: EntrySize,
    about_to_be_removed: bool,
    status: EvalStatus,
}

impl Entry {
    pub fn new(body: EntryBody) -> Self {
        Self {
            body,
            previous: None,
            next: None,
            size: EntrySize::new(0.0, DEFAULT_ENTRY_HEIGHT),
            about_to_be_removed: false,
            status: EvalStatus::Idle,
        }
    }

    pub fn kind(&self) -> EntryKind {
        self.body.kind()
    }

    pub fn body(&self) -> &EntryBody {
        &self.body
    }

    pub fn body_mut(&mut self) -> &mut EntryBody {
        &mut self.body
    }

    pub fn previous(&self) -> Option<EntryId> {
        self.previous
    }

    pub(crate) fn set_previous(&mut self, previous: Option<EntryId>) {
        self.previous = previous;
    }

    pub fn next(&self) -> Option<EntryId> {
        self.next
    }

    pub(crate) fn set_next(&mut self, next: Option<EntryId>) {
        self.next = next;
    }

    pub fn size(&self) -> EntrySize {
        self.size
    }

    pub fn set_size(&mut self, size: EntrySize) {
        self.size = size;
    }

    pub fn about_to_be_removed(&self) -> bool {
        self.about_to_be_removed
    }

    pub(crate) fn set_about_to_be_removed(&mut self, flag: bool) {
        self.about_to_be_removed = flag;
    }

    pub fn status(&self) -> EvalStatus {
        self.status
    }

    pub fn set_status(&mut self, status: EvalStatus) {
        self.status = status;
    }

    /// An entry with no user content. Insert-next-to may reuse empty entries
    /// and the sequencer treats an empty tail command entry as re-focusable.
    pub fn is_empty(&self) -> bool {
        match &self.body {
            EntryBody::Command { source, result, .. } => {
                source.trim().is_empty() && result.is_none()
            }
            EntryBody::Text { content } => content.is_empty(),
            EntryBody::Latex { source, .. } => source.trim().is_empty(),
            EntryBody::Image { path } => path.is_none(),
            EntryBody::PageBreak | EntryBody::Placeholder => true,
        }
    }

    /// Whether the entry accepts input focus. Page breaks and placeholders
    /// decline, and the continuation walk skips them; a mid-removal entry
    /// declines regardless of kind.
    pub fn want_focus(&self) -> bool {
        if self.about_to_be_removed {
            return false;
        }
        !matches!(self.body, EntryBody::PageBreak | EntryBody::Placeholder)
    }
}
