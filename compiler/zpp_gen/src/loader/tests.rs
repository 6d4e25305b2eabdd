use std::path::{Path, PathBuf};

use super::{absolute_path, normalize_path, resolve_sibling, MemoryLoader, ModuleLoader};
use pretty_assertions::assert_eq;
use zpp_ir::{FileId, StringInterner};

#[test]
fn normalize_drops_dot_components() {
    assert_eq!(normalize_path(Path::new("a/./b/../c.zpp")), PathBuf::from("a/c.zpp"));
    assert_eq!(normalize_path(Path::new("/x/y/../../z")), PathBuf::from("/z"));
    assert_eq!(normalize_path(Path::new("../lib.zpp")), PathBuf::from("../lib.zpp"));
    assert_eq!(normalize_path(Path::new("/../a")), PathBuf::from("/a"));
}

#[test]
fn sibling_resolution() {
    assert_eq!(
        resolve_sibling(Path::new("src/main.zpp"), "util/io.zpp"),
        PathBuf::from("src/util/io.zpp")
    );
    assert_eq!(
        resolve_sibling(Path::new("src/main.zpp"), "../lib.zpp"),
        PathBuf::from("lib.zpp")
    );
    assert_eq!(
        resolve_sibling(Path::new("main.zpp"), "./b.zpp"),
        PathBuf::from("b.zpp")
    );
    assert_eq!(
        resolve_sibling(Path::new("src/main.zpp"), "/abs/m.zpp"),
        PathBuf::from("/abs/m.zpp")
    );
}

#[test]
fn memory_loader_finds_normalized_paths() {
    let interner = StringInterner::new();
    let mut loader = MemoryLoader::new().with_module("dir/../m.zpp", "pass", |_, _| Vec::new());

    let path = absolute_path(Path::new("m.zpp")).unwrap();
    let loaded = loader.load(&path, FileId::new(0), &interner);
    assert_eq!(loaded.map(|m| m.source), Some("pass".to_string()));
    assert!(loader
        .load(Path::new("m.zpp"), FileId::new(1), &interner)
        .is_none());
}

#[test]
fn relative_paths_resolve_against_the_working_directory() {
    let cwd = std::env::current_dir().unwrap();
    assert_eq!(absolute_path(Path::new("src/./main.zpp")).unwrap(), cwd.join("src/main.zpp"));
    assert_eq!(absolute_path(Path::new("/a/b/../c.zpp")).unwrap(), PathBuf::from("/a/c.zpp"));
}
