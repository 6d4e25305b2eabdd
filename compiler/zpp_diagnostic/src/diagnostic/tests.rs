use super::*;
use pretty_assertions::assert_eq;
use zpp_ir::FileId;

#[test]
fn error_defaults_to_description() {
    let diag = Diagnostic::error(ErrorCode::MissingReturn);
    assert_eq!(diag.message, "not all paths return a value");
    assert!(diag.is_error());
    assert_eq!(diag.pos, None);
}

#[test]
fn builder_sets_fields() {
    let pos = Pos::new(FileId::new(0), 3, 7);
    let diag = Diagnostic::error(ErrorCode::UndeclaredSymbol)
        .with_message("id `x` not declared")
        .at(pos)
        .with_note("declare it before use");
    assert_eq!(diag.pos, Some(pos));
    assert_eq!(diag.notes, vec!["declare it before use".to_string()]);
    assert_eq!(diag.to_string(), "error[E1001]: id `x` not declared");
}
