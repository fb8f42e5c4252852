// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Tessera-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tessera and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::borrow::Borrow;
use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Serialize, Serializer};
use thiserror::Error;

/// A string identifier handed to us by an external collaborator.
///
/// Only non-emptiness and the absence of whitespace are enforced; the format is otherwise owned by
/// whoever minted the id (for imported components, the design tool).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Id<T> {
    value: String,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Id<T> {
    pub fn new(value: impl Into<String>) -> Result<Self, IdError> {
        let value = value.into();
        validate_id(&value)?;
        Ok(Self {
            value,
            _marker: PhantomData,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn into_string(self) -> String {
        self.value
    }
}

impl<T> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl<T> AsRef<str> for Id<T> {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl<T> Borrow<str> for Id<T> {
    fn borrow(&self) -> &str {
        self.as_str()
    }
}

impl<T> FromStr for Id<T> {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.to_owned())
    }
}

impl<T> Serialize for Id<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.value)
    }
}

impl<T> JsonSchema for Id<T> {
    fn schema_name() -> std::borrow::Cow<'static, str> {
        "Id".into()
    }

    fn json_schema(generator: &mut schemars::SchemaGenerator) -> schemars::Schema {
        String::json_schema(generator)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdError {
    #[error("id must not be empty")]
    Empty,
    #[error("id must not contain whitespace")]
    ContainsWhitespace,
    #[error("rendered node id must be a dotted path of child indices, got '{0}'")]
    InvalidNodePath(String),
}

fn validate_id(value: &str) -> Result<(), IdError> {
    if value.is_empty() {
        return Err(IdError::Empty);
    }
    if value.chars().any(char::is_whitespace) {
        return Err(IdError::ContainsWhitespace);
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ComponentIdTag {}
pub type ComponentId = Id<ComponentIdTag>;

/// Identity of one node in a rendered preview tree.
///
/// The id is the dotted child-index path from the root (`0`, `0.1`, `0.1.3`), so it is a pure
/// function of the node's structural position and identical text always yields identical ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RenderedNodeId {
    path: String,
}

impl RenderedNodeId {
    pub fn root() -> Self {
        Self { path: "0".to_owned() }
    }

    pub fn child(&self, index: usize) -> Self {
        Self {
            path: format!("{}.{index}", self.path),
        }
    }

    pub fn parent(&self) -> Option<Self> {
        self.path
            .rsplit_once('.')
            .map(|(parent, _)| Self { path: parent.to_owned() })
    }

    pub fn depth(&self) -> usize {
        self.path.bytes().filter(|b| *b == b'.').count()
    }

    pub fn as_str(&self) -> &str {
        &self.path
    }
}

impl fmt::Display for RenderedNodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)
    }
}

impl FromStr for RenderedNodeId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(IdError::Empty);
        }
        let mut segments = s.split('.');
        if segments.next() != Some("0") {
            return Err(IdError::InvalidNodePath(s.to_owned()));
        }
        for segment in segments {
            let digits_only = !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit());
            let canonical = segment == "0" || !segment.starts_with('0');
            if !digits_only || !canonical {
                return Err(IdError::InvalidNodePath(s.to_owned()));
            }
        }
        Ok(Self { path: s.to_owned() })
    }
}

impl Serialize for RenderedNodeId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.path)
    }
}

impl JsonSchema for RenderedNodeId {
    fn schema_name() -> std::borrow::Cow<'static, str> {
        "RenderedNodeId".into()
    }

    fn json_schema(generator: &mut schemars::SchemaGenerator) -> schemars::Schema {
        String::json_schema(generator)
    }
}

/// Stamp minted per generation request; later requests always carry a larger token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, JsonSchema)]
#[serde(transparent)]
pub struct GenerationToken(u64);

impl GenerationToken {
    pub(crate) fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for GenerationToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}
