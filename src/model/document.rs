// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Tessera-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tessera and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

use schemars::JsonSchema;
use serde::Serialize;
use thiserror::Error;

/// Half-open byte range `[start, end)` into a document's text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, JsonSchema)]
pub struct SourceRange {
    pub start: usize,
    pub end: usize,
}

impl SourceRange {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    pub fn contains_offset(&self, offset: usize) -> bool {
        self.start <= offset && offset < self.end
    }

    pub fn contains(&self, other: &SourceRange) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    pub fn overlaps(&self, other: &SourceRange) -> bool {
        self.start < other.end && other.start < self.end
    }

    pub fn slice<'a>(&self, text: &'a str) -> Option<&'a str> {
        text.get(self.start..self.end)
    }
}

impl fmt::Display for SourceRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocumentError {
    #[error("invalid edit range {range} for document of {len} bytes")]
    InvalidRange { range: SourceRange, len: usize },
}

/// One retained `(revision, text)` pair. The text is shared so snapshots stay cheap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Revision {
    revision: u64,
    text: Arc<str>,
}

impl Revision {
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// The single mutable source of truth for generated component source.
///
/// Every mutation assigns a strictly larger revision and records the new text in the history,
/// so text-at-revision never changes once assigned. The history is bounded; the current revision
/// is always retained.
#[derive(Debug, Clone)]
pub struct SourceDocument {
    current: Revision,
    history: VecDeque<Revision>,
    history_limit: usize,
}

pub const INITIAL_REVISION: u64 = 1;

impl SourceDocument {
    pub fn new(history_limit: usize) -> Self {
        let current = Revision {
            revision: INITIAL_REVISION,
            text: Arc::from(""),
        };
        let mut history = VecDeque::new();
        history.push_back(current.clone());
        Self {
            current,
            history,
            history_limit: history_limit.max(1),
        }
    }

    pub fn current_text(&self) -> (&str, u64) {
        (&self.current.text, self.current.revision)
    }

    pub fn text(&self) -> &str {
        &self.current.text
    }

    pub fn revision(&self) -> u64 {
        self.current.revision
    }

    pub fn replace(&mut self, text: impl Into<String>) -> u64 {
        let text: String = text.into();
        self.commit(Arc::from(text))
    }

    /// Splices `text` into `range` and commits the result as one revision.
    pub fn edit(&mut self, range: SourceRange, text: &str) -> Result<u64, DocumentError> {
        let current = self.text();
        let valid = range.start <= range.end
            && range.end <= current.len()
            && current.is_char_boundary(range.start)
            && current.is_char_boundary(range.end);
        if !valid {
            return Err(DocumentError::InvalidRange {
                range,
                len: current.len(),
            });
        }

        let mut next = String::with_capacity(current.len() - range.len() + text.len());
        next.push_str(&current[..range.start]);
        next.push_str(text);
        next.push_str(&current[range.end..]);
        Ok(self.commit(Arc::from(next)))
    }

    pub fn reset(&mut self) -> u64 {
        self.commit(Arc::from(""))
    }

    pub fn text_at(&self, revision: u64) -> Option<&str> {
        self.history
            .iter()
            .find(|entry| entry.revision == revision)
            .map(Revision::text)
    }

    pub fn history(&self) -> impl Iterator<Item = &Revision> {
        self.history.iter()
    }

    fn commit(&mut self, text: Arc<str>) -> u64 {
        let revision = self.current.revision.saturating_add(1);
        let next = Revision { revision, text };
        self.current = next.clone();
        self.history.push_back(next);
        while self.history.len() > self.history_limit {
            self.history.pop_front();
        }
        revision
    }
}

impl Default for SourceDocument {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LIMIT)
    }
}

pub const DEFAULT_HISTORY_LIMIT: usize = 64;
