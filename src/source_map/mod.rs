// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Tessera-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tessera and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Bidirectional index between rendered node ids and the source ranges that produced them.
//!
//! The map is always rebuilt from scratch for a text revision; it is never patched. Rebuilding
//! re-parses the text and walks the parse and the render tree in lockstep, so a tree that does not
//! structurally match its text is rejected instead of producing a partial mapping.

use std::collections::BTreeMap;

use tracing::debug;

use crate::format::markup::{parse_markup, MarkupNode};
use crate::model::{RenderedNodeId, SourceRange};
use crate::render::{corresponds, RenderError, RenderNode, RenderTree};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SourceMap {
    by_node: BTreeMap<RenderedNodeId, SourceRange>,
    by_range: BTreeMap<SourceRange, RenderedNodeId>,
}

impl SourceMap {
    pub fn rebuild(text: &str, tree: &RenderTree) -> Result<Self, RenderError> {
        let document = parse_markup(text)?;
        let mut map = Self::default();

        match (tree.root(), document.root.as_ref()) {
            (None, None) => {}
            (Some(render), Some(markup)) => map.correlate(render, markup)?,
            (Some(render), None) => {
                return Err(RenderError::StructureMismatch {
                    node_id: render.id().clone(),
                });
            }
            (None, Some(_)) => {
                return Err(RenderError::StructureMismatch {
                    node_id: RenderedNodeId::root(),
                });
            }
        }

        debug!(entries = map.len(), "rebuilt source map");
        Ok(map)
    }

    fn correlate(&mut self, render: &RenderNode, markup: &MarkupNode) -> Result<(), RenderError> {
        if !corresponds(render, markup) {
            return Err(RenderError::StructureMismatch {
                node_id: render.id().clone(),
            });
        }

        self.by_node.insert(render.id().clone(), markup.span);
        self.by_range.insert(markup.span, render.id().clone());

        for (child, source_child) in render.children().iter().zip(&markup.children) {
            self.correlate(child, source_child)?;
        }
        Ok(())
    }

    pub fn lookup_by_rendered_node(&self, id: &RenderedNodeId) -> Option<SourceRange> {
        self.by_node.get(id).copied()
    }

    /// The innermost node whose source range contains `offset`.
    pub fn lookup_by_source_offset(&self, offset: usize) -> Option<&RenderedNodeId> {
        // Ranges nest or are disjoint, so the last range starting at or before `offset` that still
        // contains it is the innermost one.
        self.by_range
            .range(..=SourceRange::new(offset, usize::MAX))
            .rev()
            .find(|(range, _)| range.contains_offset(offset))
            .map(|(_, id)| id)
    }

    pub fn lookup_by_range(&self, range: &SourceRange) -> Option<&RenderedNodeId> {
        self.by_range.get(range)
    }

    pub fn len(&self) -> usize {
        self.by_node.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_node.is_empty()
    }

    /// Entries in document order.
    pub fn iter(&self) -> impl Iterator<Item = (&RenderedNodeId, SourceRange)> {
        self.by_range.iter().map(|(range, id)| (id, *range))
    }
}
