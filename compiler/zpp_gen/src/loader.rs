//! Module loading seam.
//!
//! Lexing and parsing live outside the generator. Whatever does them
//! implements [`ModuleLoader`]: given a normalized path and the file id the
//! generator reserved for it, produce the file's source text and its items,
//! with every position already pointing at that file id.

use std::io;
use std::path::{Component, Path, PathBuf};

use rustc_hash::FxHashMap;
use zpp_ir::{FileId, Item, StringInterner};

/// A parsed source file.
pub struct LoadedModule {
    pub source: String,
    pub items: Vec<Item>,
}

pub trait ModuleLoader {
    /// Load and parse `path`. `None` means the file does not exist.
    fn load(&mut self, path: &Path, file: FileId, interner: &StringInterner)
        -> Option<LoadedModule>;
}

type BuildItems = Box<dyn Fn(FileId, &StringInterner) -> Vec<Item>>;

/// Loader over modules registered up front, keyed by absolute normalized
/// path.
///
/// Used by tests and by tools that build ASTs programmatically.
#[derive(Default)]
pub struct MemoryLoader {
    modules: FxHashMap<PathBuf, (String, BuildItems)>,
}

impl MemoryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a module. `build` runs once the module is first imported,
    /// with the file id its positions must carry.
    pub fn insert(
        &mut self,
        path: impl AsRef<Path>,
        source: impl Into<String>,
        build: impl Fn(FileId, &StringInterner) -> Vec<Item> + 'static,
    ) {
        let path = path.as_ref();
        let key = absolute_path(path).unwrap_or_else(|_| normalize_path(path));
        self.modules.insert(key, (source.into(), Box::new(build)));
    }

    #[must_use]
    pub fn with_module(
        mut self,
        path: impl AsRef<Path>,
        source: impl Into<String>,
        build: impl Fn(FileId, &StringInterner) -> Vec<Item> + 'static,
    ) -> Self {
        self.insert(path, source, build);
        self
    }
}

impl ModuleLoader for MemoryLoader {
    fn load(
        &mut self,
        path: &Path,
        file: FileId,
        interner: &StringInterner,
    ) -> Option<LoadedModule> {
        let (source, build) = self.modules.get(path)?;
        Some(LoadedModule {
            source: source.clone(),
            items: build(file, interner),
        })
    }
}

/// Resolve `.` and `..` components without touching the filesystem.
///
/// A `..` that would climb above the start of a relative path is kept.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut out: Vec<Component<'_>> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.last() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => out.push(component),
            },
            other => out.push(other),
        }
    }
    out.iter().collect()
}

/// Join a relative `path` onto the working directory, then normalize it.
pub fn absolute_path(path: &Path) -> io::Result<PathBuf> {
    if path.is_absolute() {
        return Ok(normalize_path(path));
    }
    Ok(normalize_path(&std::env::current_dir()?.join(path)))
}

/// Resolve `relative` against the directory containing `sibling`.
pub fn resolve_sibling(sibling: &Path, relative: &str) -> PathBuf {
    let relative = Path::new(relative);
    if relative.is_absolute() {
        return normalize_path(relative);
    }
    let dir = sibling.parent().unwrap_or_else(|| Path::new(""));
    normalize_path(&dir.join(relative))
}

#[cfg(test)]
mod tests;
