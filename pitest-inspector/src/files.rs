use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::Error;

/// A source line ready to be placed inside the source table, together with its 1-based number.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceLine {
    pub number: u32,
    /// Pre-rendered html for the line content.
    pub html: String,
}

/// Produces the rendered lines of a source file.
pub trait SourceProvider {
    fn source_lines(&self, path: &Path) -> Result<Vec<SourceLine>, Error>;
}

/// Reads source files below a root directory and renders them as escaped plain text.
#[derive(Clone, Debug)]
pub struct Files {
    root: PathBuf,
}

impl Files {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Files { root: root.into() }
    }

    /// Resolves a path relative to the root. Paths escaping the root are rejected.
    pub fn resolve(&self, path: &Path) -> Option<PathBuf> {
        if !is_contained(path) {
            return None;
        }
        Some(self.root.join(path))
    }

    pub fn exists(&self, path: &Path) -> bool {
        self.resolve(path).is_some_and(|p| p.is_file())
    }
}

impl SourceProvider for Files {
    fn source_lines(&self, path: &Path) -> Result<Vec<SourceLine>, Error> {
        let full_path = self.resolve(path).ok_or_else(|| Error::NotFound(path.to_owned()))?;
        let data = read_file(&full_path)?;
        Ok(plain_lines(&data))
    }
}

/// Only plain, relative components stay below the root.
pub(crate) fn is_contained(path: &Path) -> bool {
    path.components().all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}

pub(crate) fn read_file(path: &Path) -> Result<String, Error> {
    fs::read_to_string(path).map_err(|source| Error::Io { path: path.to_owned(), source })
}

/// Splits source text into escaped lines numbered from 1.
pub fn plain_lines(data: &str) -> Vec<SourceLine> {
    data.lines()
        .zip(1..)
        .map(|(line, number)| SourceLine { number, html: html_escape::encode_text(line).into_owned() })
        .collect()
}
