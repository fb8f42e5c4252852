// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Tessera-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tessera and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Preview rendering.
//!
//! Rendering is a pure function of the source text: the same text always yields the same tree
//! with the same [`RenderedNodeId`]s, because ids are the structural child-index path of each
//! node. Alongside the tree the renderer produces a textual outline with a stable highlight index
//! that integrations use to resolve preview clicks to node ids.

use thiserror::Error;
use tracing::debug;

use crate::format::markup::{
    parse_markup, AttributeValue, MarkupNode, MarkupNodeKind, MarkupParseError,
};
use crate::model::RenderedNodeId;

pub mod preview;
mod text;

pub use preview::{AnnotatedPreview, HighlightIndex, LineSpan};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Preview lines longer than this many cells are truncated with an ellipsis.
    pub max_width: Option<usize>,
    pub show_classes: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            max_width: Some(80),
            show_classes: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    #[error(transparent)]
    Parse(#[from] MarkupParseError),
    #[error("source structure does not match rendered node {node_id}")]
    StructureMismatch { node_id: RenderedNodeId },
}

impl RenderError {
    pub fn reason(&self) -> String {
        self.to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderNodeKind {
    Element {
        tag: String,
        classes: Vec<String>,
        attributes: Vec<(String, String)>,
    },
    Fragment,
    Text {
        content: String,
    },
    Expression {
        source: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderNode {
    id: RenderedNodeId,
    kind: RenderNodeKind,
    children: Vec<RenderNode>,
}

impl RenderNode {
    pub fn id(&self) -> &RenderedNodeId {
        &self.id
    }

    pub fn kind(&self) -> &RenderNodeKind {
        &self.kind
    }

    pub fn children(&self) -> &[RenderNode] {
        &self.children
    }
}

/// The rendered representation of one source text. Empty when the text holds no markup.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RenderTree {
    root: Option<RenderNode>,
}

impl RenderTree {
    pub fn root(&self) -> Option<&RenderNode> {
        self.root.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Nodes in document (pre-)order.
    pub fn nodes(&self) -> Nodes<'_> {
        Nodes {
            stack: self.root.iter().collect(),
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes().count()
    }

    pub fn find(&self, id: &RenderedNodeId) -> Option<&RenderNode> {
        self.nodes().find(|node| node.id() == id)
    }
}

pub struct Nodes<'a> {
    stack: Vec<&'a RenderNode>,
}

impl<'a> Iterator for Nodes<'a> {
    type Item = &'a RenderNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderResult {
    pub tree: RenderTree,
    pub preview: AnnotatedPreview,
}

/// Derives the preview from source text. Holds configuration only; no state survives a call.
#[derive(Debug, Clone, Copy, Default)]
pub struct PreviewRenderer {
    options: RenderOptions,
}

impl PreviewRenderer {
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    pub fn render(&self, text: &str) -> Result<RenderResult, RenderError> {
        let tree = render_tree(text)?;
        let preview = preview::annotate(&tree, &self.options);
        debug!(nodes = tree.node_count(), bytes = text.len(), "rendered preview");
        Ok(RenderResult { tree, preview })
    }
}

/// Parses `text` and builds its render tree without producing the textual preview.
pub fn render_tree(text: &str) -> Result<RenderTree, RenderError> {
    let document = parse_markup(text)?;
    Ok(RenderTree {
        root: document
            .root
            .as_ref()
            .map(|root| build_node(root, RenderedNodeId::root())),
    })
}

fn build_node(node: &MarkupNode, id: RenderedNodeId) -> RenderNode {
    let kind = match &node.kind {
        MarkupNodeKind::Element { tag, attributes } => {
            let mut classes = Vec::new();
            let mut rendered_attributes = Vec::new();
            for attribute in attributes {
                match (&attribute.value, attribute.name.as_str()) {
                    (AttributeValue::Literal(value), "className" | "class") => {
                        classes.extend(value.split_whitespace().map(str::to_owned));
                    }
                    (AttributeValue::Literal(value), _) => {
                        rendered_attributes.push((attribute.name.clone(), value.clone()));
                    }
                    (AttributeValue::Expression(source), _) => {
                        rendered_attributes.push((attribute.name.clone(), format!("{{{source}}}")));
                    }
                    (AttributeValue::Flag, _) => {
                        rendered_attributes.push((attribute.name.clone(), "true".to_owned()));
                    }
                }
            }
            RenderNodeKind::Element {
                tag: tag.clone(),
                classes,
                attributes: rendered_attributes,
            }
        }
        MarkupNodeKind::Fragment => RenderNodeKind::Fragment,
        MarkupNodeKind::Text { content } => RenderNodeKind::Text {
            content: content.clone(),
        },
        MarkupNodeKind::Expression { source } => RenderNodeKind::Expression {
            source: source.clone(),
        },
    };

    let children = node
        .children
        .iter()
        .enumerate()
        .map(|(index, child)| build_node(child, id.child(index)))
        .collect();

    RenderNode { id, kind, children }
}

/// Whether a render node is the one a markup node produced. Used to correlate a tree with a
/// fresh parse of its source.
pub(crate) fn corresponds(render: &RenderNode, markup: &MarkupNode) -> bool {
    if render.children.len() != markup.children.len() {
        return false;
    }
    match (&render.kind, &markup.kind) {
        (RenderNodeKind::Element { tag, .. }, MarkupNodeKind::Element { tag: source_tag, .. }) => {
            tag == source_tag
        }
        (RenderNodeKind::Fragment, MarkupNodeKind::Fragment) => true,
        (RenderNodeKind::Text { content }, MarkupNodeKind::Text { content: source }) => {
            content == source
        }
        (RenderNodeKind::Expression { source }, MarkupNodeKind::Expression { source: parsed }) => {
            source == parsed
        }
        _ => false,
    }
}
