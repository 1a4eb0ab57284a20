//! Path pattern matching
//!
//! One matcher mode is chosen per deployment, not per call: either patterns
//! are compared byte-for-byte, or they are regular expressions that must
//! match the entire request path.

use crate::error::Result;
use dashmap::DashMap;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// How candidate patterns are compared against request paths
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatternMode {
    /// `pattern == path`
    #[default]
    Exact,

    /// Pattern is a regular expression matched against the whole path
    Regex,
}

/// Tests request paths against candidate patterns.
///
/// Regex-mode patterns are anchored before compilation, so
/// `/covered_route/\d+` matches `/covered_route/1` and rejects
/// `/covered_route/1/extra`. Compiled programs are cached in a [`DashMap`],
/// letting store-supplied patterns compile once and serve every later call
/// lock-free.
pub struct RuleMatcher {
    mode: PatternMode,
    programs: DashMap<String, Regex>,
}

impl RuleMatcher {
    pub fn new(mode: PatternMode) -> Self {
        Self {
            mode,
            programs: DashMap::new(),
        }
    }

    pub fn mode(&self) -> PatternMode {
        self.mode
    }

    /// Compile every pattern up front so an invalid expression surfaces as a
    /// configuration error at load time, never during a request.
    ///
    /// A no-op in exact mode.
    pub fn precompile<'a, I>(&self, patterns: I) -> Result<()>
    where
        I: IntoIterator<Item = &'a str>,
    {
        if self.mode == PatternMode::Regex {
            for pattern in patterns {
                self.program(pattern)?;
            }
        }
        Ok(())
    }

    /// Does `pattern` cover `path`?
    pub fn matches(&self, pattern: &str, path: &str) -> Result<bool> {
        match self.mode {
            PatternMode::Exact => Ok(pattern == path),
            PatternMode::Regex => Ok(self.program(pattern)?.is_match(path)),
        }
    }

    fn program(&self, pattern: &str) -> Result<Regex> {
        if let Some(compiled) = self.programs.get(pattern) {
            return Ok(compiled.value().clone());
        }
        // Non-capturing anchor: a match must consume the whole path
        let compiled = Regex::new(&format!("^(?:{})$", pattern))?;
        self.programs.insert(pattern.to_string(), compiled.clone());
        Ok(compiled)
    }
}
