//! Abstract document paths
//!
//! A path is a sequence of mapping keys and sequence indices leading from the
//! document root to a node, e.g. `/diagrams/0/content/3/id`.

use std::fmt;

/// One step of a [`DocumentPath`]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// Field name in a mapping
    Key(String),
    /// Position in a sequence
    Index(usize),
}

impl PathSegment {
    /// Interpret a raw pointer token; all-digit tokens become indices
    pub fn parse(token: &str) -> Self {
        if !token.is_empty() && token.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(index) = token.parse() {
                return Self::Index(index);
            }
        }
        Self::Key(token.to_string())
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Key(key) => f.write_str(&key.replace('~', "~0").replace('/', "~1")),
            PathSegment::Index(index) => write!(f, "{index}"),
        }
    }
}

/// Path from the document root to a node
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct DocumentPath {
    segments: Vec<PathSegment>,
}

impl DocumentPath {
    /// The empty path, addressing the document root
    #[must_use]
    pub fn root() -> Self {
        Self::default()
    }

    /// Parse a slash-separated pointer such as `/diagrams/0/content`.
    ///
    /// The leading empty segment is discarded and `~1`/`~0` escapes are
    /// decoded.
    #[must_use]
    pub fn from_pointer(pointer: &str) -> Self {
        let segments = pointer
            .strip_prefix('/')
            .unwrap_or(pointer)
            .split('/')
            .filter(|_| !pointer.is_empty())
            .map(|token| PathSegment::parse(&token.replace("~1", "/").replace("~0", "~")))
            .collect();
        Self { segments }
    }

    /// Extend with a mapping key
    #[must_use]
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.segments.push(PathSegment::Key(key.into()));
        self
    }

    /// Extend with a sequence index
    #[must_use]
    pub fn index(mut self, index: usize) -> Self {
        self.segments.push(PathSegment::Index(index));
        self
    }

    /// Append a mapping key in place
    pub fn push_key(&mut self, key: impl Into<String>) {
        self.segments.push(PathSegment::Key(key.into()));
    }

    /// Concatenate `self` and `suffix`
    #[must_use]
    pub fn join(&self, suffix: &DocumentPath) -> Self {
        let mut segments = self.segments.clone();
        segments.extend(suffix.segments.iter().cloned());
        Self { segments }
    }

    #[must_use]
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    #[must_use]
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Whether `self` equals `other` or lies underneath it
    #[must_use]
    pub fn starts_with(&self, other: &DocumentPath) -> bool {
        self.segments.starts_with(&other.segments)
    }
}

impl fmt::Display for DocumentPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.segments {
            write!(f, "/{segment}")?;
        }
        Ok(())
    }
}
