use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use regex::Regex;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use super::error::{DiscoveryError, Result};
use super::resolver::normalize_lexically;

/// One include/exclude pattern: a glob string or a `{ "regex": ... }` object.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Pattern {
    Glob(String),
    Regex { regex: String },
}

/// A single pattern or a list of patterns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "OneOrMany")]
pub struct PatternConfig {
    pub patterns: Vec<Pattern>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(Pattern),
    Many(Vec<Pattern>),
}

impl From<OneOrMany> for PatternConfig {
    fn from(value: OneOrMany) -> Self {
        match value {
            OneOrMany::One(pattern) => Self {
                patterns: vec![pattern],
            },
            OneOrMany::Many(patterns) => Self { patterns },
        }
    }
}

impl From<Vec<Pattern>> for PatternConfig {
    fn from(patterns: Vec<Pattern>) -> Self {
        Self { patterns }
    }
}

impl PatternConfig {
    pub fn glob(pattern: impl Into<String>) -> Self {
        Self {
            patterns: vec![Pattern::Glob(pattern.into())],
        }
    }

    pub fn regex(pattern: impl Into<String>) -> Self {
        Self {
            patterns: vec![Pattern::Regex {
                regex: pattern.into(),
            }],
        }
    }

    pub fn with(mut self, pattern: Pattern) -> Self {
        self.patterns.push(pattern);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

struct Matcher {
    globs: GlobSet,
    regexes: Vec<Regex>,
}

impl Matcher {
    fn compile(config: &PatternConfig, base_dir: &Path) -> Result<Option<Self>> {
        if config.is_empty() {
            return Ok(None);
        }

        let mut globs = GlobSetBuilder::new();
        let mut regexes = Vec::new();
        for pattern in &config.patterns {
            match pattern {
                Pattern::Glob(glob) => {
                    let anchored = anchor_glob(glob, base_dir);
                    let compiled = GlobBuilder::new(&anchored)
                        .literal_separator(true)
                        .build()
                        .map_err(|e| invalid(glob, e))?;
                    globs.add(compiled);
                }
                Pattern::Regex { regex } => {
                    regexes.push(Regex::new(regex).map_err(|e| invalid(regex, e))?);
                }
            }
        }

        let globs = globs.build().map_err(|e| invalid("<glob set>", e))?;
        Ok(Some(Self { globs, regexes }))
    }

    fn is_match(&self, id: &str) -> bool {
        self.globs.is_match(id) || self.regexes.iter().any(|re| re.is_match(id))
    }
}

fn invalid(pattern: &str, err: impl std::fmt::Display) -> DiscoveryError {
    DiscoveryError::InvalidPattern {
        pattern: pattern.to_string(),
        message: err.to_string(),
    }
}

/// Relative globs are anchored at `base_dir` unless they start with `**`.
fn anchor_glob(glob: &str, base_dir: &Path) -> String {
    if glob.starts_with("**") || Path::new(glob).is_absolute() {
        return to_slash(Path::new(glob));
    }
    let base = to_slash(&normalize_lexically(base_dir));
    let base = escape_glob(base.trim_end_matches('/'));
    let glob = glob.trim_start_matches("./");
    format!("{base}/{glob}")
}

fn escape_glob(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '*' | '?' | '[' | ']' | '{' | '}' => {
                escaped.push('[');
                escaped.push(c);
                escaped.push(']');
            }
            _ => escaped.push(c),
        }
    }
    escaped
}

fn to_slash(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Include/exclude predicate applied to every crawled path before it is read.
///
/// Exclusion wins over inclusion; an absent or empty include list admits
/// everything. Paths are matched in `/`-separated form.
pub struct SourceFilter {
    include: Option<Matcher>,
    exclude: Option<Matcher>,
}

impl SourceFilter {
    pub fn new(
        include: Option<&PatternConfig>,
        exclude: Option<&PatternConfig>,
        base_dir: &Path,
    ) -> Result<Self> {
        let include = match include {
            Some(config) => Matcher::compile(config, base_dir)?,
            None => None,
        };
        let exclude = match exclude {
            Some(config) => Matcher::compile(config, base_dir)?,
            None => None,
        };
        Ok(Self { include, exclude })
    }

    /// A filter that admits every path.
    pub fn match_all() -> Self {
        Self {
            include: None,
            exclude: None,
        }
    }

    pub fn includes(&self, path: &Path) -> bool {
        let id = to_slash(path);
        if id.contains('\0') {
            return false;
        }
        if self.exclude.as_ref().is_some_and(|m| m.is_match(&id)) {
            return false;
        }
        match &self.include {
            Some(matcher) => matcher.is_match(&id),
            None => true,
        }
    }
}

/// Base directory used to anchor relative globs when none is configured.
pub fn default_base_dir() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("/"))
}
