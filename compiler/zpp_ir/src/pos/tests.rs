use super::*;
use pretty_assertions::assert_eq;

#[test]
fn reserved_files_get_sequential_ids() {
    let mut map = SourceMap::new();
    let a = map.reserve(Path::new("/src/a.zpp"));
    let b = map.reserve(Path::new("/src/b.zpp"));
    assert_eq!(a.raw(), 0);
    assert_eq!(b.raw(), 1);
    assert_eq!(map.path(b), Some(Path::new("/src/b.zpp")));
    assert_eq!(map.len(), 2);
}

#[test]
fn line_lookup_is_one_based() {
    let mut map = SourceMap::new();
    let id = map.reserve(Path::new("main.zpp"));
    map.set_text(id, "fn main() -> i32:\n  return 0\n".to_string());

    let file = map.get(id);
    assert_eq!(file.and_then(|f| f.line(1)), Some("fn main() -> i32:"));
    assert_eq!(file.and_then(|f| f.line(2)), Some("  return 0"));
    assert_eq!(file.and_then(|f| f.line(0)), None);
    assert_eq!(file.and_then(|f| f.line(3)), None);
}

#[test]
fn pos_debug_is_compact() {
    let pos = Pos::new(FileId::new(2), 10, 4);
    assert_eq!(format!("{pos:?}"), "2:10:4");
}
