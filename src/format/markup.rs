// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Tessera-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tessera and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Parser for React-style component source.
//!
//! Component source is an arbitrary script preamble (comments, `export function X() {`,
//! `return (`), exactly one root markup element, and a script trailer. Only the markup is parsed
//! structurally; every node carries the byte span it was parsed from so the source map can be
//! rebuilt from the same parse.
//!
//! Supported markup:
//! - elements `<tag a="v" b='v' c={expr} flag {...spread}>…</tag>` and `<tag … />`
//! - fragments `<>…</>`
//! - text runs (whitespace-only runs are dropped, other runs are trimmed)
//! - `{expression}` children (comment-only expressions such as `{/* note */}` are dropped)

use thiserror::Error;

use crate::model::SourceRange;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MarkupParseError {
    #[error("unexpected end of input: <{tag}> opened at byte {offset} is never closed")]
    UnclosedElement { tag: String, offset: usize },
    #[error("mismatched closing tag at byte {offset}: expected </{expected}>, found </{found}>")]
    MismatchedClosingTag {
        expected: String,
        found: String,
        offset: usize,
    },
    #[error("closing tag </{tag}> at byte {offset} has no matching opening tag")]
    StrayClosingTag { tag: String, offset: usize },
    #[error("unterminated tag starting at byte {offset}")]
    UnterminatedTag { offset: usize },
    #[error("unterminated string literal starting at byte {offset}")]
    UnterminatedString { offset: usize },
    #[error("unterminated expression starting at byte {offset}")]
    UnterminatedExpression { offset: usize },
    #[error("invalid tag name at byte {offset}")]
    InvalidTagName { offset: usize },
    #[error("invalid attribute syntax at byte {offset}")]
    InvalidAttribute { offset: usize },
    #[error("unexpected markup after the root element at byte {offset}")]
    MultipleRoots { offset: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeValue {
    Literal(String),
    Expression(String),
    /// A bare attribute such as `disabled`.
    Flag,
}

/// One attribute of an element. Spread attributes (`{...props}`) use the name `...`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: AttributeValue,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkupNodeKind {
    Element {
        tag: String,
        attributes: Vec<Attribute>,
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
pub struct MarkupNode {
    pub kind: MarkupNodeKind,
    pub span: SourceRange,
    pub children: Vec<MarkupNode>,
}

impl MarkupNode {
    pub fn tag(&self) -> Option<&str> {
        match &self.kind {
            MarkupNodeKind::Element { tag, .. } => Some(tag),
            _ => None,
        }
    }
}

/// Result of parsing component source. `root` is `None` when the text contains no markup.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MarkupDocument {
    pub root: Option<MarkupNode>,
}

pub fn parse_markup(text: &str) -> Result<MarkupDocument, MarkupParseError> {
    let mut parser = Parser::new(text);
    let Some(start) = parser.find_markup_start(0)? else {
        return Ok(MarkupDocument::default());
    };

    parser.pos = start;
    let root = parser.parse_element()?;

    if let Some(offset) = parser.find_markup_start(parser.pos)? {
        return Err(MarkupParseError::MultipleRoots { offset });
    }

    Ok(MarkupDocument { root: Some(root) })
}

struct Parser<'a> {
    text: &'a str,
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            text,
            bytes: text.as_bytes(),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn peek_at(&self, ahead: usize) -> Option<u8> {
        self.bytes.get(self.pos + ahead).copied()
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(b) if b.is_ascii_whitespace()) {
            self.pos += 1;
        }
    }

    /// Scans script text from `from` for the `<` that opens markup.
    ///
    /// A `<` only opens markup where an expression may begin (start of input, after an operator or
    /// opening bracket, or after `return`), which keeps comparisons and generic arguments such as
    /// `useState<string>` out of the way. Comments and string literals are skipped.
    fn find_markup_start(&mut self, from: usize) -> Result<Option<usize>, MarkupParseError> {
        self.pos = from;
        let mut expression_position = true;

        while let Some(b) = self.peek() {
            match b {
                b if b.is_ascii_whitespace() => self.pos += 1,
                b'/' if self.peek_at(1) == Some(b'/') => self.skip_line_comment(),
                b'/' if self.peek_at(1) == Some(b'*') => self.skip_block_comment(),
                b'"' | b'\'' | b'`' => {
                    self.skip_string()?;
                    expression_position = false;
                }
                b'<' if expression_position => match self.peek_at(1) {
                    _ if self.opens_markup() => return Ok(Some(self.pos)),
                    Some(b'/') => {
                        let offset = self.pos;
                        self.pos += 2;
                        let tag = self.read_name().unwrap_or_default().to_owned();
                        return Err(MarkupParseError::StrayClosingTag { tag, offset });
                    }
                    _ => self.pos += 1,
                },
                b if is_word_byte(b) => {
                    let start = self.pos;
                    while matches!(self.peek(), Some(b) if is_word_byte(b)) {
                        self.pos += 1;
                    }
                    expression_position = &self.text[start..self.pos] == "return";
                }
                b')' | b']' | b'.' => {
                    self.pos += 1;
                    expression_position = false;
                }
                _ => {
                    self.pos += 1;
                    expression_position = true;
                }
            }
        }

        Ok(None)
    }

    /// Whether the `<` under the cursor starts an element or fragment, given expression position.
    fn opens_markup(&self) -> bool {
        matches!(self.peek_at(1), Some(next) if next.is_ascii_alphabetic() || next == b'>')
    }

    fn skip_line_comment(&mut self) {
        while let Some(b) = self.peek() {
            self.pos += 1;
            if b == b'\n' {
                break;
            }
        }
    }

    fn skip_block_comment(&mut self) {
        self.pos += 2;
        while self.pos < self.bytes.len() {
            if self.peek() == Some(b'*') && self.peek_at(1) == Some(b'/') {
                self.pos += 2;
                return;
            }
            self.pos += 1;
        }
    }

    /// Skips a script string literal starting at the current quote byte.
    fn skip_string(&mut self) -> Result<(), MarkupParseError> {
        let offset = self.pos;
        let Some(quote) = self.peek() else {
            return Ok(());
        };
        self.pos += 1;

        while let Some(b) = self.peek() {
            match b {
                b'\\' => self.pos += 2,
                b'\n' if quote != b'`' => break,
                b if b == quote => {
                    self.pos += 1;
                    return Ok(());
                }
                _ => self.pos += 1,
            }
        }

        Err(MarkupParseError::UnterminatedString { offset })
    }

    fn read_name(&mut self) -> Option<&'a str> {
        let start = self.pos;
        match self.peek() {
            Some(b) if b.is_ascii_alphabetic() || b == b'_' => self.pos += 1,
            _ => return None,
        }
        while matches!(self.peek(), Some(b) if is_name_byte(b)) {
            self.pos += 1;
        }
        Some(&self.text[start..self.pos])
    }

    /// Parses an element or fragment; the cursor must be on its opening `<`.
    fn parse_element(&mut self) -> Result<MarkupNode, MarkupParseError> {
        let start = self.pos;
        self.pos += 1;

        if self.peek() == Some(b'>') {
            self.pos += 1;
            let children = self.parse_children(start, "")?;
            return Ok(MarkupNode {
                kind: MarkupNodeKind::Fragment,
                span: SourceRange::new(start, self.pos),
                children,
            });
        }

        let tag = self
            .read_name()
            .ok_or(MarkupParseError::InvalidTagName { offset: self.pos })?;

        let mut attributes = Vec::new();
        let self_closing = loop {
            self.skip_whitespace();
            match self.peek() {
                None => return Err(MarkupParseError::UnterminatedTag { offset: start }),
                Some(b'/') if self.peek_at(1) == Some(b'>') => {
                    self.pos += 2;
                    break true;
                }
                Some(b'>') => {
                    self.pos += 1;
                    break false;
                }
                Some(b'{') => {
                    let source = self.read_braced()?;
                    let Some(spread) = source.strip_prefix("...") else {
                        return Err(MarkupParseError::InvalidAttribute { offset: self.pos });
                    };
                    attributes.push(Attribute {
                        name: "...".to_owned(),
                        value: AttributeValue::Expression(spread.trim().to_owned()),
                    });
                }
                Some(_) => attributes.push(self.parse_attribute()?),
            }
        };

        let children = if self_closing {
            Vec::new()
        } else {
            self.parse_children(start, tag)?
        };

        Ok(MarkupNode {
            kind: MarkupNodeKind::Element {
                tag: tag.to_owned(),
                attributes,
            },
            span: SourceRange::new(start, self.pos),
            children,
        })
    }

    fn parse_attribute(&mut self) -> Result<Attribute, MarkupParseError> {
        let offset = self.pos;
        let name = self
            .read_name()
            .ok_or(MarkupParseError::InvalidAttribute { offset })?
            .to_owned();

        self.skip_whitespace();
        if self.peek() != Some(b'=') {
            return Ok(Attribute {
                name,
                value: AttributeValue::Flag,
            });
        }
        self.pos += 1;
        self.skip_whitespace();

        let value = match self.peek() {
            Some(quote @ (b'"' | b'\'')) => {
                let value_start = self.pos;
                self.pos += 1;
                let content_start = self.pos;
                while matches!(self.peek(), Some(b) if b != quote) {
                    self.pos += 1;
                }
                if self.peek().is_none() {
                    return Err(MarkupParseError::UnterminatedString {
                        offset: value_start,
                    });
                }
                let literal = &self.text[content_start..self.pos];
                self.pos += 1;
                AttributeValue::Literal(literal.to_owned())
            }
            Some(b'{') => AttributeValue::Expression(self.read_braced()?.to_owned()),
            _ => return Err(MarkupParseError::InvalidAttribute { offset: self.pos }),
        };

        Ok(Attribute { name, value })
    }

    /// Parses children up to and including the closing tag of the element opened at `open_start`.
    /// Fragments pass an empty `tag` and close with `</>`.
    fn parse_children(
        &mut self,
        open_start: usize,
        tag: &str,
    ) -> Result<Vec<MarkupNode>, MarkupParseError> {
        let mut children = Vec::new();

        loop {
            match self.peek() {
                None => {
                    return Err(MarkupParseError::UnclosedElement {
                        tag: tag.to_owned(),
                        offset: open_start,
                    });
                }
                Some(b'<') if self.peek_at(1) == Some(b'/') => {
                    let close_start = self.pos;
                    self.pos += 2;
                    self.skip_whitespace();
                    let found = if self.peek() == Some(b'>') {
                        ""
                    } else {
                        self.read_name()
                            .ok_or(MarkupParseError::InvalidTagName { offset: self.pos })?
                    };
                    self.skip_whitespace();
                    if self.peek() != Some(b'>') {
                        return Err(MarkupParseError::UnterminatedTag {
                            offset: close_start,
                        });
                    }
                    self.pos += 1;
                    if found != tag {
                        return Err(MarkupParseError::MismatchedClosingTag {
                            expected: tag.to_owned(),
                            found: found.to_owned(),
                            offset: close_start,
                        });
                    }
                    return Ok(children);
                }
                Some(b'<') => children.push(self.parse_element()?),
                Some(b'{') => {
                    let start = self.pos;
                    let source = self.read_braced()?;
                    if !is_comment_only(source) {
                        children.push(MarkupNode {
                            kind: MarkupNodeKind::Expression {
                                source: source.to_owned(),
                            },
                            span: SourceRange::new(start, self.pos),
                            children: Vec::new(),
                        });
                    }
                }
                Some(_) => {
                    if let Some(text) = self.parse_text() {
                        children.push(text);
                    }
                }
            }
        }
    }

    fn parse_text(&mut self) -> Option<MarkupNode> {
        let start = self.pos;
        while matches!(self.peek(), Some(b) if b != b'<' && b != b'{') {
            self.pos += 1;
        }

        let raw = &self.text[start..self.pos];
        let leading = raw.len() - raw.trim_start().len();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }

        let content = trimmed.split_whitespace().collect::<Vec<_>>().join(" ");
        let span_start = start + leading;
        Some(MarkupNode {
            kind: MarkupNodeKind::Text { content },
            span: SourceRange::new(span_start, span_start + trimmed.len()),
            children: Vec::new(),
        })
    }

    /// Consumes a brace-balanced `{…}` block and returns its trimmed inner source.
    ///
    /// Markup nested in the expression (`{open && <p>Don't</p>}`) is parsed as markup so its text
    /// is never mistaken for script strings or comments; it stays part of the expression source.
    fn read_braced(&mut self) -> Result<&'a str, MarkupParseError> {
        let offset = self.pos;
        self.pos += 1;
        let inner_start = self.pos;
        let mut depth = 1usize;
        let mut expression_position = true;

        while let Some(b) = self.peek() {
            match b {
                b if b.is_ascii_whitespace() => self.pos += 1,
                b'/' if self.peek_at(1) == Some(b'/') => self.skip_line_comment(),
                b'/' if self.peek_at(1) == Some(b'*') => self.skip_block_comment(),
                b'"' | b'\'' | b'`' => {
                    self.skip_string()?;
                    expression_position = false;
                }
                b'<' if expression_position && self.opens_markup() => {
                    self.parse_element()?;
                    expression_position = false;
                }
                b if is_word_byte(b) => {
                    let start = self.pos;
                    while matches!(self.peek(), Some(b) if is_word_byte(b)) {
                        self.pos += 1;
                    }
                    expression_position = &self.text[start..self.pos] == "return";
                }
                b'}' => {
                    depth -= 1;
                    if depth == 0 {
                        let inner = &self.text[inner_start..self.pos];
                        self.pos += 1;
                        return Ok(inner.trim());
                    }
                    self.pos += 1;
                    expression_position = false;
                }
                b')' | b']' | b'.' => {
                    self.pos += 1;
                    expression_position = false;
                }
                b'{' => {
                    depth += 1;
                    self.pos += 1;
                    expression_position = true;
                }
                _ => {
                    self.pos += 1;
                    expression_position = true;
                }
            }
        }

        Err(MarkupParseError::UnterminatedExpression { offset })
    }
}

fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'$'
}

fn is_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'_' | b'-' | b'.' | b':')
}

fn is_comment_only(source: &str) -> bool {
    source.is_empty() || (source.starts_with("/*") && source.ends_with("*/"))
}
