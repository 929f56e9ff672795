//! Glob based directory exclusion.
//!
//! Patterns use doublestar semantics: `**` spans any number of path segments,
//! `*` and `?` never cross a separator. Directory paths are matched with a
//! trailing separator, so `**/node_modules/` prunes every `node_modules`
//! directory at any depth.

use globset::{Glob, GlobBuilder, GlobMatcher};

/// An ordered list of compiled exclusion patterns
#[derive(Debug, Clone, Default)]
pub struct ExclusionMatcher {
    patterns: Vec<(String, GlobMatcher)>,
}

impl ExclusionMatcher {
    /// Matcher that excludes nothing
    pub fn new() -> Self {
        Self::default()
    }

    /// Compile patterns in order. The first invalid pattern is returned as an error.
    pub fn from_patterns<S: AsRef<str>>(patterns: &[S]) -> Result<Self, globset::Error> {
        let mut compiled = Vec::with_capacity(patterns.len());

        for pattern in patterns {
            let pattern = pattern.as_ref();
            compiled.push((pattern.to_string(), compile(pattern)?.compile_matcher()));
        }

        Ok(Self { patterns: compiled })
    }

    /// True when any pattern matches the already separator-terminated path
    pub fn is_excluded(&self, path: &str) -> bool {
        self.matching_pattern(path).is_some()
    }

    /// The first pattern, in declaration order, that matches `path`
    pub fn matching_pattern(&self, path: &str) -> Option<&str> {
        self.patterns
            .iter()
            .find(|(_, matcher)| matcher.is_match(path))
            .map(|(pattern, _)| pattern.as_str())
    }
}

fn compile(pattern: &str) -> Result<Glob, globset::Error> {
    GlobBuilder::new(pattern).literal_separator(true).build()
}

/// Check a pattern without keeping the compiled form
pub fn validate_pattern(pattern: &str) -> Result<(), globset::Error> {
    compile(pattern).map(|_| ())
}
