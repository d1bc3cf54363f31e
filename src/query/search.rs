// SPDX-FileCopyrightText: 2026 Quire Authors
// SPDX-License-Identifier: MIT

use memchr::memmem;
use regex::RegexBuilder;

use crate::model::{Entry, EntryBody, EntryField, EntryId, Worksheet, WorksheetCursor};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchDirection {
    Forward,
    Backward,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMode {
    Substring,
    Regex,
}

/// Which entry regions participate in a search.
///
/// Region order within an entry is fixed: command text, then result, then
/// error annotation; text entries expose their expanded text; latex entries
/// their un-rendered source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchScope {
    pub command: bool,
    pub results: bool,
    pub errors: bool,
    pub text: bool,
    pub latex_source: bool,
}

impl SearchScope {
    pub fn all() -> Self {
        Self { command: true, results: true, errors: true, text: true, latex_source: true }
    }
}

impl Default for SearchScope {
    fn default() -> Self {
        Self::all()
    }
}

/// Finds the next (or previous) match of `pattern` across the whole chain.
///
/// Starts from `from` when given (continuing strictly past that position so
/// repeated calls walk through successive matches), otherwise from the head
/// (forward) or tail (backward). A stale `from` falls back to the chain
/// edge. Entries mid-removal are skipped. Returns `Ok(None)` when the chain
/// is exhausted; wraparound is the caller's concern.
///
/// Substring matching is byte-oriented with ASCII case folding when
/// `case_insensitive` is set; regex mode compiles `pattern` with the same
/// case option and reports invalid patterns as an error.
pub fn search(
    ws: &Worksheet,
    pattern: &str,
    direction: SearchDirection,
    scope: SearchScope,
    mode: SearchMode,
    case_insensitive: bool,
    from: Option<WorksheetCursor>,
) -> Result<Option<WorksheetCursor>, regex::Error> {
    let matcher = Matcher::build(pattern, mode, case_insensitive)?;

    let from = from.filter(|cursor| ws.contains(cursor.entry()));
    let (mut current, mut local_start) = match (&direction, from) {
        (SearchDirection::Forward, Some(cursor)) => {
            (Some(cursor.entry()), Some((cursor.field(), cursor.offset().saturating_add(1))))
        }
        (SearchDirection::Forward, None) => (ws.head(), None),
        (SearchDirection::Backward, Some(cursor)) => {
            (Some(cursor.entry()), Some((cursor.field(), cursor.offset())))
        }
        (SearchDirection::Backward, None) => (ws.tail(), None),
    };

    while let Some(id) = current {
        let hit = match direction {
            SearchDirection::Forward => search_entry_forward(ws, id, &matcher, &scope, local_start),
            SearchDirection::Backward => {
                search_entry_backward(ws, id, &matcher, &scope, local_start)
            }
        };
        if hit.is_some() {
            return Ok(hit);
        }
        local_start = None;
        current = match direction {
            SearchDirection::Forward => ws.next_of(id),
            SearchDirection::Backward => ws.prev_of(id),
        };
    }

    Ok(None)
}

enum Matcher {
    Substring { needle: String, case_insensitive: bool },
    Regex(regex::Regex),
}

impl Matcher {
    fn build(pattern: &str, mode: SearchMode, case_insensitive: bool) -> Result<Self, regex::Error> {
        match mode {
            SearchMode::Substring => {
                let needle =
                    if case_insensitive { pattern.to_ascii_lowercase() } else { pattern.to_owned() };
                Ok(Self::Substring { needle, case_insensitive })
            }
            SearchMode::Regex => Ok(Self::Regex(
                RegexBuilder::new(pattern).case_insensitive(case_insensitive).build()?,
            )),
        }
    }

    /// First match starting at or after `start` (byte offset, rounded up to
    /// a char boundary).
    fn find_from(&self, haystack: &str, mut start: usize) -> Option<usize> {
        if start > haystack.len() {
            return None;
        }
        while start < haystack.len() && !haystack.is_char_boundary(start) {
            start += 1;
        }
        match self {
            Self::Substring { needle, case_insensitive } => {
                if needle.is_empty() {
                    return None;
                }
                if *case_insensitive {
                    let lowered = haystack.to_ascii_lowercase();
                    memmem::find(lowered[start..].as_bytes(), needle.as_bytes())
                        .map(|pos| pos + start)
                } else {
                    memmem::find(haystack[start..].as_bytes(), needle.as_bytes())
                        .map(|pos| pos + start)
                }
            }
            Self::Regex(regex) => regex.find_at(haystack, start).map(|m| m.start()),
        }
    }

    /// Last match starting strictly before `end` (byte offset, rounded down
    /// to a char boundary). The match itself may extend past `end`.
    fn rfind_before(&self, haystack: &str, end: usize) -> Option<usize> {
        let mut end = end.min(haystack.len());
        while end > 0 && !haystack.is_char_boundary(end) {
            end -= 1;
        }
        if end == 0 {
            return None;
        }
        match self {
            Self::Substring { needle, case_insensitive } => {
                if needle.is_empty() {
                    return None;
                }
                let mut window_end = end.saturating_add(needle.len() - 1).min(haystack.len());
                while window_end < haystack.len() && !haystack.is_char_boundary(window_end) {
                    window_end += 1;
                }
                let window = &haystack[..window_end];
                let found = if *case_insensitive {
                    let lowered = window.to_ascii_lowercase();
                    memmem::rfind(lowered.as_bytes(), needle.as_bytes())
                } else {
                    memmem::rfind(window.as_bytes(), needle.as_bytes())
                };
                found.filter(|&pos| pos < end)
            }
            Self::Regex(regex) => regex
                .find_iter(haystack)
                .take_while(|m| m.start() < end)
                .last()
                .map(|m| m.start()),
        }
    }
}

/// The searchable regions of an entry, in display order. Math fragments in
/// text entries are expanded to their source form here, so offsets resolve
/// against what the user typed rather than a rendered placeholder.
fn entry_regions(entry: &Entry, scope: &SearchScope) -> Vec<(EntryField, String)> {
    match entry.body() {
        EntryBody::Command { source, result, error } => {
            let mut regions = Vec::new();
            if scope.command {
                regions.push((EntryField::Command, source.clone()));
            }
            if scope.results {
                if let Some(result) = result {
                    regions.push((EntryField::Result, result.clone()));
                }
            }
            if scope.errors {
                if let Some(error) = error {
                    regions.push((EntryField::Error, error.clone()));
                }
            }
            regions
        }
        EntryBody::Text { content } if scope.text => {
            vec![(EntryField::Text, content.expanded())]
        }
        EntryBody::Latex { source, .. } if scope.latex_source => {
            vec![(EntryField::LatexSource, source.clone())]
        }
        _ => Vec::new(),
    }
}

fn search_entry_forward(
    ws: &Worksheet,
    id: EntryId,
    matcher: &Matcher,
    scope: &SearchScope,
    start: Option<(EntryField, usize)>,
) -> Option<WorksheetCursor> {
    let entry = ws.entry(id)?;
    if entry.about_to_be_removed() {
        return None;
    }

    for (field, text) in entry_regions(entry, scope) {
        let from = match start {
            Some((start_field, offset)) => {
                if field < start_field {
                    continue;
                } else if field == start_field {
                    offset
                } else {
                    0
                }
            }
            None => 0,
        };
        if let Some(pos) = matcher.find_from(&text, from) {
            return Some(WorksheetCursor::new(id, field, pos));
        }
    }
    None
}

fn search_entry_backward(
    ws: &Worksheet,
    id: EntryId,
    matcher: &Matcher,
    scope: &SearchScope,
    start: Option<(EntryField, usize)>,
) -> Option<WorksheetCursor> {
    let entry = ws.entry(id)?;
    if entry.about_to_be_removed() {
        return None;
    }

    for (field, text) in entry_regions(entry, scope).into_iter().rev() {
        let end = match start {
            Some((start_field, offset)) => {
                if field > start_field {
                    continue;
                } else if field == start_field {
                    offset
                } else {
                    text.len()
                }
            }
            None => text.len(),
        };
        if let Some(pos) = matcher.rfind_before(&text, end) {
            return Some(WorksheetCursor::new(id, field, pos));
        }
    }
    None
}
