// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Tessera-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tessera and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Textual outline of a render tree plus the highlight index used for preview clicks.

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::Serialize;

use super::text::{fit_row, single_line};
use super::{RenderNode, RenderNodeKind, RenderOptions, RenderTree};
use crate::model::RenderedNodeId;

/// A contiguous span of highlighted cells within a single preview line.
///
/// Coordinates are `(y, x0, x1)` in character-cell indices, inclusive, relative to the preview
/// text lines.
pub type LineSpan = (usize, usize, usize);

/// Mapping from rendered node ids to the cells covered by the node and its descendants.
pub type HighlightIndex = BTreeMap<RenderedNodeId, Vec<LineSpan>>;

#[derive(Debug, Clone, PartialEq, Eq)]
struct PreviewRow {
    node_id: RenderedNodeId,
    label: Option<(usize, usize)>,
}

/// Render output plus an index suitable for cell-accurate selection.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, JsonSchema)]
pub struct AnnotatedPreview {
    pub text: String,
    pub highlight_index: HighlightIndex,
    #[serde(skip)]
    rows: Vec<PreviewRow>,
}

impl AnnotatedPreview {
    /// The node drawn at a preview cell, if the cell lies on a node's label.
    ///
    /// Every line belongs to exactly one node, so the hit is always the deepest node at that cell.
    pub fn node_at(&self, line: usize, column: usize) -> Option<&RenderedNodeId> {
        let row = self.rows.get(line)?;
        let (x0, x1) = row.label?;
        (x0..=x1).contains(&column).then_some(&row.node_id)
    }

    pub fn line_count(&self) -> usize {
        self.rows.len()
    }
}

pub(crate) fn annotate(tree: &RenderTree, options: &RenderOptions) -> AnnotatedPreview {
    let mut builder = PreviewBuilder {
        options,
        lines: Vec::new(),
        rows: Vec::new(),
        highlight_index: HighlightIndex::new(),
    };
    if let Some(root) = tree.root() {
        builder.push_node(root, 0);
    }

    AnnotatedPreview {
        text: builder.lines.join("\n"),
        highlight_index: builder.highlight_index,
        rows: builder.rows,
    }
}

struct PreviewBuilder<'a> {
    options: &'a RenderOptions,
    lines: Vec<String>,
    rows: Vec<PreviewRow>,
    highlight_index: HighlightIndex,
}

impl PreviewBuilder<'_> {
    fn push_node(&mut self, node: &RenderNode, depth: usize) -> Vec<LineSpan> {
        let row = fit_row(depth * 2, &node_label(node, self.options), self.options.max_width);
        let (line, label) = (row.line, row.label_cells);

        let y = self.lines.len();
        let mut spans = label.map(|(x0, x1)| (y, x0, x1)).into_iter().collect::<Vec<_>>();

        self.lines.push(line);
        self.rows.push(PreviewRow {
            node_id: node.id().clone(),
            label,
        });

        for child in node.children() {
            spans.extend(self.push_node(child, depth + 1));
        }

        self.highlight_index.insert(node.id().clone(), spans.clone());
        spans
    }
}

fn node_label(node: &RenderNode, options: &RenderOptions) -> String {
    match node.kind() {
        RenderNodeKind::Element { tag, classes, .. } => {
            let mut label = tag.clone();
            if options.show_classes {
                for class in classes {
                    label.push('.');
                    label.push_str(class);
                }
            }
            label
        }
        RenderNodeKind::Fragment => "<>".to_owned(),
        RenderNodeKind::Text { content } => content.clone(),
        RenderNodeKind::Expression { source } => format!("{{{}}}", single_line(source)),
    }
}
