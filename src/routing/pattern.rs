//! Path patterns with named parameter placeholders.
//!
//! # Syntax
//! - Static segments match literally (case-sensitive)
//! - `{name}` matches exactly one non-empty segment
//! - `{name?}` is optional and only allowed as the last segment
//!
//! # Design Decisions
//! - Trailing slashes are insignificant when matching, except for the root
//! - Parameter values are percent-decoded on match and percent-encoded on expansion
//! - No regex: a pattern is a flat list of segments compared in one pass

use std::collections::HashMap;
use std::fmt;

use serde::{Serialize, Serializer};

/// One parsed segment of a pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Static(String),
    Param { name: String, optional: bool },
}

/// Reasons a pattern fails to parse.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PatternError {
    #[error("malformed placeholder in segment `{0}`")]
    MalformedPlaceholder(String),

    #[error("placeholder `{0}` is not a valid parameter name")]
    InvalidParamName(String),

    #[error("parameter `{0}` appears more than once")]
    DuplicateParam(String),

    #[error("optional parameter `{0}` must be the last segment")]
    OptionalNotLast(String),
}

/// A parsed route path such as `/admin/days/{day}/edit`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    raw: String,
    segments: Vec<Segment>,
}

impl PathPattern {
    /// Parse a pattern. Empty segments (`//`) are ignored.
    pub fn parse(raw: &str) -> Result<Self, PatternError> {
        let mut segments: Vec<Segment> = Vec::new();
        let mut seen: Vec<String> = Vec::new();

        for part in raw.split('/').filter(|s| !s.is_empty()) {
            if let Some(Segment::Param { name, optional: true }) = segments.last() {
                return Err(PatternError::OptionalNotLast(name.clone()));
            }

            let segment = parse_segment(part)?;
            if let Segment::Param { name, .. } = &segment {
                if seen.contains(name) {
                    return Err(PatternError::DuplicateParam(name.clone()));
                }
                seen.push(name.clone());
            }
            segments.push(segment);
        }

        Ok(Self {
            raw: raw.to_string(),
            segments,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Names of the parameters, in path order.
    pub fn params(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Param { name, .. } => Some(name.as_str()),
            Segment::Static(_) => None,
        })
    }

    /// Match a request path, returning decoded parameters on success.
    pub fn matches(&self, path: &str) -> Option<Vec<(String, String)>> {
        let trimmed = path.trim_matches('/');
        let parts: Vec<&str> = if trimmed.is_empty() {
            Vec::new()
        } else {
            trimmed.split('/').collect()
        };

        let required = self
            .segments
            .iter()
            .filter(|s| !matches!(s, Segment::Param { optional: true, .. }))
            .count();
        if parts.len() < required || parts.len() > self.segments.len() {
            return None;
        }

        let mut params = Vec::new();
        for (segment, part) in self.segments.iter().zip(parts.iter()) {
            match segment {
                Segment::Static(expected) => {
                    if expected != part {
                        return None;
                    }
                }
                Segment::Param { name, .. } => {
                    if part.is_empty() {
                        return None;
                    }
                    let value = urlencoding::decode(part).ok()?;
                    params.push((name.clone(), value.into_owned()));
                }
            }
        }
        Some(params)
    }

    /// Substitute parameters into the pattern.
    ///
    /// Returns the name of the first required parameter that is missing.
    pub fn expand(&self, params: &HashMap<String, String>) -> Result<String, String> {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Static(s) => {
                    out.push('/');
                    out.push_str(s);
                }
                Segment::Param { name, optional } => match params.get(name) {
                    Some(value) => {
                        out.push('/');
                        out.push_str(&urlencoding::encode(value));
                    }
                    None if *optional => {}
                    None => return Err(name.clone()),
                },
            }
        }
        if out.is_empty() || (self.raw.ends_with('/') && self.raw.len() > 1) {
            out.push('/');
        }
        Ok(out)
    }
}

impl fmt::Display for PathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl Serialize for PathPattern {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

fn parse_segment(part: &str) -> Result<Segment, PatternError> {
    let has_braces = part.contains('{') || part.contains('}');
    if !has_braces {
        return Ok(Segment::Static(part.to_string()));
    }

    let inner = part
        .strip_prefix('{')
        .and_then(|s| s.strip_suffix('}'))
        .filter(|s| !s.contains('{') && !s.contains('}'))
        .ok_or_else(|| PatternError::MalformedPlaceholder(part.to_string()))?;

    let (name, optional) = match inner.strip_suffix('?') {
        Some(name) => (name, true),
        None => (inner, false),
    };

    let valid = !name.is_empty()
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
        && !name.starts_with(|c: char| c.is_ascii_digit());
    if !valid {
        return Err(PatternError::InvalidParamName(inner.to_string()));
    }

    Ok(Segment::Param {
        name: name.to_string(),
        optional,
    })
}

/// Join a group prefix and a local path.
///
/// The result is exactly `prefix + path` with a single leading slash and no
/// repeated slashes; a trailing slash on `path` is preserved.
pub fn join_path(prefix: &str, path: &str) -> String {
    let joined = format!("/{}/{}", prefix, path);
    let mut out = collapse_slashes(&joined);
    if path.is_empty() && out.len() > 1 {
        out.pop();
    }
    out
}

/// Join two group prefixes into a normalized prefix without a trailing slash.
///
/// The empty string stands for the root.
pub fn join_prefix(outer: &str, inner: &str) -> String {
    let joined = collapse_slashes(&format!("/{}/{}", outer, inner));
    joined.trim_end_matches('/').to_string()
}

fn collapse_slashes(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if c == '/' && out.ends_with('/') {
            continue;
        }
        out.push(c);
    }
    out
}
