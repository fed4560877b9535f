//! Content address type.
//!
//! A `ContentUri` is `scheme://authority/segment/...`. Parsing is total: any
//! string yields a value, and routing decides later whether it means anything.

use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContentUri {
    scheme: String,
    authority: String,
    segments: Vec<String>,
}

impl ContentUri {
    /// Builds an address from parts.
    ///
    /// A segment containing `/` is split at each slash, so the value matches
    /// what `parse` returns for its `Display` output.
    pub fn new<I, S>(scheme: &str, authority: &str, segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let segments = segments
            .into_iter()
            .flat_map(|segment| {
                let segment: String = segment.into();
                segment.split('/').map(str::to_string).collect::<Vec<_>>()
            })
            .collect();
        Self {
            scheme: scheme.to_ascii_lowercase(),
            authority: authority.to_string(),
            segments,
        }
    }

    /// Splits a raw address into scheme, authority and path segments.
    ///
    /// A single trailing slash is dropped; every other empty segment is kept so
    /// that `pets//1` does not silently become `pets/1`.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        let (scheme, rest) = match trimmed.split_once("://") {
            Some((scheme, rest)) => (scheme, rest),
            None => ("", trimmed),
        };

        let mut parts = rest.split('/');
        let authority = parts.next().unwrap_or_default();
        let mut segments: Vec<String> = parts.map(str::to_string).collect();
        if segments.last().is_some_and(String::is_empty) {
            segments.pop();
        }

        Self {
            scheme: scheme.to_ascii_lowercase(),
            authority: authority.to_string(),
            segments,
        }
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    pub fn authority(&self) -> &str {
        &self.authority
    }

    pub fn path_segments(&self) -> &[String] {
        &self.segments
    }

    /// Returns a copy with `id` appended as a new last segment.
    pub fn with_appended_id(&self, id: i64) -> Self {
        let mut next = self.clone();
        next.segments.push(id.to_string());
        next
    }

    /// Parses the last segment as a non-negative id.
    ///
    /// Only plain ASCII digits are accepted; signs, whitespace and values
    /// beyond `i64::MAX` yield `None`.
    pub fn last_segment_id(&self) -> Option<i64> {
        self.segments.last().and_then(|segment| parse_id(segment))
    }
}

pub(crate) fn parse_id(segment: &str) -> Option<i64> {
    if segment.is_empty() || !segment.bytes().all(|byte| byte.is_ascii_digit()) {
        return None;
    }
    segment.parse::<i64>().ok()
}

impl Display for ContentUri {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if !self.scheme.is_empty() {
            write!(f, "{}://", self.scheme)?;
        }
        f.write_str(&self.authority)?;
        for segment in &self.segments {
            write!(f, "/{segment}")?;
        }
        Ok(())
    }
}

impl From<&str> for ContentUri {
    fn from(value: &str) -> Self {
        Self::parse(value)
    }
}
