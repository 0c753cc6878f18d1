//! Opening classification: which named line a game follows and where it leaves it.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::game_data::UNKNOWN_OPENING;
use crate::movetext::{self, ReplayFailure};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BookError {
    #[error("Opening line for {name} has no moves")]
    EmptyLine { name: String },

    #[error("Opening line for {name}: cannot parse {san} at ply {ply}")]
    InvalidSan { name: String, ply: usize, san: String },

    #[error("Opening line for {name}: illegal move {san} at ply {ply}")]
    IllegalMove { name: String, ply: usize, san: String },
}

/// Result of classifying a move sequence against a book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpeningMatch {
    pub name: String,
    /// Number of leading plies still on a known book line; 0 when unknown.
    pub exit_ply: usize,
}

impl OpeningMatch {
    pub fn unknown() -> Self {
        Self {
            name: UNKNOWN_OPENING.to_string(),
            exit_ply: 0,
        }
    }

    pub fn is_known(&self) -> bool {
        self.name != UNKNOWN_OPENING
    }
}

/// Lookup seam between the statistics engine and opening reference data.
///
/// Implementations must be deterministic and must never fail: a sequence
/// that matches nothing yields [`OpeningMatch::unknown`].
pub trait OpeningBook {
    fn classify(&self, sans: &[&str]) -> OpeningMatch;
}

impl<B: OpeningBook + ?Sized> OpeningBook for &B {
    fn classify(&self, sans: &[&str]) -> OpeningMatch {
        (**self).classify(sans)
    }
}

/// A named opening line as stored in reference data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookLine {
    pub name: String,
    /// Movetext, e.g. "1. e4 e5 2. Nf3 Nc6 3. Bb5".
    pub line: String,
}

#[derive(Default)]
struct BookNode {
    name: Option<String>,
    children: HashMap<String, BookNode>,
}

/// In-memory book: a trie over canonical SAN moves, with names on the nodes
/// where a named line ends.
#[derive(Default)]
pub struct OpeningLineBook {
    root: BookNode,
    lines: usize,
}

impl OpeningLineBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a book from reference lines, failing on the first bad one.
    pub fn from_lines<'a, I>(lines: I) -> Result<Self, BookError>
    where
        I: IntoIterator<Item = &'a BookLine>,
    {
        let mut book = Self::new();
        for entry in lines {
            book.insert_line(&entry.name, &entry.line)?;
        }
        Ok(book)
    }

    /// Insert a named line given as movetext.
    pub fn insert_line(&mut self, name: &str, movetext: &str) -> Result<(), BookError> {
        let sans = movetext::extract_sans(movetext);
        self.insert_sans(name, &sans)
    }

    /// Insert a named line given as SAN moves. Moves are validated by replaying
    /// them from the initial position and stored in canonical form.
    pub fn insert_sans<S: AsRef<str>>(&mut self, name: &str, sans: &[S]) -> Result<(), BookError> {
        if sans.is_empty() {
            return Err(BookError::EmptyLine { name: name.to_string() });
        }

        let line = movetext::canonical_line(sans).map_err(|failure| match failure {
            ReplayFailure::Unparseable { ply, san } => BookError::InvalidSan {
                name: name.to_string(),
                ply,
                san,
            },
            ReplayFailure::Illegal { ply, san } => BookError::IllegalMove {
                name: name.to_string(),
                ply,
                san,
            },
        })?;

        let mut current = &mut self.root;
        for san in line {
            current = current.children.entry(san).or_default();
        }
        if current.name.is_none() {
            self.lines += 1;
        }
        current.name = Some(name.to_string());
        Ok(())
    }

    /// Number of distinct named lines.
    pub fn len(&self) -> usize {
        self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines == 0
    }
}

impl OpeningBook for OpeningLineBook {
    fn classify(&self, sans: &[&str]) -> OpeningMatch {
        let mut current = &self.root;
        let mut depth = 0;
        let mut deepest_name: Option<&str> = None;

        for san in sans {
            match current.children.get(movetext::strip_suffix(san)) {
                Some(next) => {
                    current = next;
                    depth += 1;
                    if let Some(name) = current.name.as_deref() {
                        deepest_name = Some(name);
                    }
                }
                None => break,
            }
        }

        match deepest_name {
            Some(name) => OpeningMatch {
                name: name.to_string(),
                exit_ply: depth,
            },
            None => OpeningMatch::unknown(),
        }
    }
}
