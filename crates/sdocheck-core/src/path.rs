//! Annotation paths
//!
//! A path locates a node inside the normalized annotation tree:
//!
//! ```text
//! path := "$" | path "." key | path "/" index
//! ```
//!
//! `$.schema:address/0.schema:addressRegion/2` is the third value of
//! `addressRegion` of the first `address` of the root entity. A value that is
//! not an array is addressed with index `0`.

use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Errors raised when reading a path back
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PathError {
    #[error("Malformed annotation path: {0}")]
    Malformed(String),
}

/// One step of a path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AnnotationPath(String);

impl AnnotationPath {
    pub const ROOT: &'static str = "$";

    pub fn root() -> Self {
        Self(Self::ROOT.to_string())
    }

    pub fn key(&self, key: &str) -> Self {
        Self(format!("{}.{}", self.0, key))
    }

    pub fn index(&self, index: usize) -> Self {
        Self(format!("{}/{}", self.0, index))
    }

    /// Shorthand for `.key(key).index(index)`, the step taken into a property value
    pub fn child(&self, key: &str, index: usize) -> Self {
        Self(format!("{}.{}/{}", self.0, key, index))
    }

    pub fn is_root(&self) -> bool {
        self.0 == Self::ROOT
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Split the path into its steps.
    ///
    /// A key runs up to the first `/<digits>` that is followed by `.` or the
    /// end of the path, so keys holding IRIs (`http://example.org/term`) are
    /// read back whole.
    pub fn segments(&self) -> Result<Vec<PathSegment>, PathError> {
        let rest = self
            .0
            .strip_prefix(Self::ROOT)
            .ok_or_else(|| PathError::Malformed(self.0.clone()))?;

        let mut segments = Vec::new();
        let mut rest = rest;

        while !rest.is_empty() {
            if let Some(after_dot) = rest.strip_prefix('.') {
                let (key, tail) = split_key(after_dot);
                if key.is_empty() {
                    return Err(PathError::Malformed(self.0.clone()));
                }
                segments.push(PathSegment::Key(key.to_string()));
                rest = tail;
            } else if let Some(after_slash) = rest.strip_prefix('/') {
                let digits = after_slash.len() - after_slash.trim_start_matches(|c: char| c.is_ascii_digit()).len();
                let index = after_slash[..digits]
                    .parse::<usize>()
                    .map_err(|_| PathError::Malformed(self.0.clone()))?;
                segments.push(PathSegment::Index(index));
                rest = &after_slash[digits..];
            } else {
                return Err(PathError::Malformed(self.0.clone()));
            }
        }

        Ok(segments)
    }

    /// Look up the node this path points at.
    ///
    /// A tree with a top-level `@graph` is entered through its first element,
    /// the same root the checkers walk.
    pub fn resolve<'a>(&self, tree: &'a Value) -> Option<&'a Value> {
        let segments = self.segments().ok()?;
        let mut current = match tree.get("@graph") {
            Some(Value::Array(nodes)) => nodes.first()?,
            Some(node @ Value::Object(_)) => node,
            _ => tree,
        };

        for segment in &segments {
            current = match (segment, current) {
                (PathSegment::Key(key), Value::Object(map)) => map.get(key)?,
                (PathSegment::Index(i), Value::Array(items)) => items.get(*i)?,
                (PathSegment::Index(0), value) => value,
                _ => return None,
            };
        }

        Some(current)
    }
}

fn split_key(s: &str) -> (&str, &str) {
    let bytes = s.as_bytes();
    for (pos, _) in s.match_indices('/') {
        let digits = bytes[pos + 1..].iter().take_while(|b| b.is_ascii_digit()).count();
        if digits == 0 {
            continue;
        }
        let end = pos + 1 + digits;
        if end == bytes.len() || bytes[end] == b'.' {
            return (&s[..pos], &s[pos..]);
        }
    }
    match s.find('.') {
        Some(pos) => (&s[..pos], &s[pos..]),
        None => (s, ""),
    }
}

impl Default for AnnotationPath {
    fn default() -> Self {
        Self::root()
    }
}

impl fmt::Display for AnnotationPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for AnnotationPath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let path = Self(s.to_string());
        path.segments()?;
        Ok(path)
    }
}

impl AsRef<str> for AnnotationPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
