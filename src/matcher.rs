use std::ffi::OsString;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use regex::Regex;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MatcherError {
    #[error("invalid entry pattern `{pattern}`: {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// Which kinds of entries a matcher accepts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EntryKind {
    #[default]
    Any,
    File,
    Dir,
}

impl EntryKind {
    fn accepts(self, path: &Path) -> bool {
        match self {
            Self::Any => true,
            Self::File => path.is_file(),
            Self::Dir => path.is_dir(),
        }
    }
}

impl FromStr for EntryKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "any" => Ok(Self::Any),
            "file" | "f" => Ok(Self::File),
            "dir" | "d" => Ok(Self::Dir),
            other => Err(format!("unknown entry type `{}` (expected any, file or dir)", other)),
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Any => "any",
            Self::File => "file",
            Self::Dir => "dir",
        })
    }
}

#[derive(Debug, Clone)]
enum Rule {
    Names(Vec<OsString>),
    Pattern(Regex),
}

/// Entry visitor for a walk: tests the file name of each visited path.
#[derive(Debug, Clone)]
pub struct EntryMatcher {
    rule: Rule,
    kind: EntryKind,
    include_hidden: bool,
}

impl EntryMatcher {
    pub fn names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        Self::with_rule(Rule::Names(names.into_iter().map(Into::into).collect()))
    }

    /// Unanchored: `conf` matches `app.conf`. Use `^...$` for whole names.
    pub fn pattern(pattern: &str) -> Result<Self, MatcherError> {
        let re = Regex::new(pattern).map_err(|source| MatcherError::Pattern {
            pattern: pattern.to_string(),
            source,
        })?;
        Ok(Self::with_rule(Rule::Pattern(re)))
    }

    fn with_rule(rule: Rule) -> Self {
        Self {
            rule,
            kind: EntryKind::Any,
            include_hidden: true,
        }
    }

    pub fn with_kind(mut self, kind: EntryKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_hidden(mut self, include: bool) -> Self {
        self.include_hidden = include;
        self
    }

    pub fn matches(&self, path: &Path) -> bool {
        let Some(name) = path.file_name() else {
            return false;
        };
        if !self.include_hidden && name.as_encoded_bytes().first() == Some(&b'.') {
            return false;
        }
        let hit = match &self.rule {
            Rule::Names(names) => names.iter().any(|n| n == name),
            Rule::Pattern(re) => re.is_match(&name.to_string_lossy()),
        };
        hit && self.kind.accepts(path)
    }
}
