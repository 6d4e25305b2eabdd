//! Source positions and the file table.
//!
//! Every AST node carries a [`Pos`]: the file it came from plus a 1-based
//! line and column. The source text itself lives in [`SourceMap`], which
//! diagnostics consult to print the offending line.

use std::fmt;
use std::path::{Path, PathBuf};

/// Index of a file registered in a [`SourceMap`].
#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Debug, Default)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct FileId(u32);

impl FileId {
    #[inline]
    pub const fn new(raw: u32) -> Self {
        FileId(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Source position of a node.
///
/// Lines and columns are 1-based. Synthetic nodes produced while lowering
/// reuse the position of the construct they were lowered from.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Default)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct Pos {
    pub file: FileId,
    pub line: u32,
    pub col: u32,
}

impl Pos {
    #[inline]
    pub const fn new(file: FileId, line: u32, col: u32) -> Self {
        Pos { file, line, col }
    }
}

impl fmt::Debug for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file.0, self.line, self.col)
    }
}

/// A registered source file.
#[derive(Clone, Debug)]
pub struct SourceFile {
    pub path: PathBuf,
    pub text: String,
}

impl SourceFile {
    /// Text of a 1-based line, without its line terminator.
    pub fn line(&self, line: u32) -> Option<&str> {
        let index = usize::try_from(line.checked_sub(1)?).ok()?;
        self.text.lines().nth(index)
    }
}

/// Table of every file seen during a compilation.
#[derive(Clone, Debug, Default)]
pub struct SourceMap {
    files: Vec<SourceFile>,
}

impl SourceMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve an id for `path` before its text is known.
    ///
    /// Loaders need the id up front so that the positions they produce
    /// already point at the right file.
    pub fn reserve(&mut self, path: &Path) -> FileId {
        let id = FileId(u32::try_from(self.files.len()).unwrap_or(u32::MAX));
        self.files.push(SourceFile {
            path: path.to_path_buf(),
            text: String::new(),
        });
        id
    }

    pub fn set_text(&mut self, file: FileId, text: String) {
        if let Some(entry) = self.files.get_mut(file.index()) {
            entry.text = text;
        }
    }

    pub fn get(&self, file: FileId) -> Option<&SourceFile> {
        self.files.get(file.index())
    }

    pub fn path(&self, file: FileId) -> Option<&Path> {
        self.get(file).map(|f| f.path.as_path())
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

#[cfg(test)]
mod tests;
