//! Stable, path-like identifiers for hardware and sensors.
//!
//! Identifiers render as `/segment/segment/...`, e.g. `/lpc/nct6775/temperature/0`.
//! Ordering is plain string ordering of the rendered form.

use std::fmt;

const SEPARATOR: char = '/';

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Identifier(String);

impl Identifier {
    /// Build an identifier from path segments. Separators inside a segment are dropped.
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut path = String::new();
        for segment in segments {
            path.push(SEPARATOR);
            path.extend(segment.as_ref().chars().filter(|c| *c != SEPARATOR));
        }
        Self(path)
    }

    /// Identifier of a child node, `self` + `/segment`
    pub fn child(&self, segment: &str) -> Self {
        let mut path = self.0.clone();
        path.push(SEPARATOR);
        path.extend(segment.chars().filter(|c| *c != SEPARATOR));
        Self(path)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Non-empty path segments, in order
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split(SEPARATOR).filter(|s| !s.is_empty())
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_rendering() {
        let id = Identifier::new(["lpc", "nct6775"]);
        assert_eq!(id.as_str(), "/lpc/nct6775");
        assert_eq!(id.child("temperature").child("0").to_string(), "/lpc/nct6775/temperature/0");
    }

    #[test]
    fn test_separators_inside_segments_are_dropped() {
        let id = Identifier::new(["a/b"]);
        assert_eq!(id.as_str(), "/ab");
        assert_eq!(id.segments().collect::<Vec<_>>(), vec!["ab"]);
    }

    #[test]
    fn test_ordering_is_string_ordering() {
        let a = Identifier::new(["nic", "0"]);
        let b = Identifier::new(["nic", "1"]);
        assert!(a < b);
    }
}
