use super::*;
use pretty_assertions::assert_eq;

const ALL: &[ErrorCode] = &[
    ErrorCode::UndeclaredSymbol,
    ErrorCode::DuplicateDeclaration,
    ErrorCode::ImportConflict,
    ErrorCode::ImportNotFound,
    ErrorCode::NotAFunction,
    ErrorCode::NotAType,
    ErrorCode::NotAVariable,
    ErrorCode::NotAGenericType,
    ErrorCode::TypeMismatch,
    ErrorCode::IncompatibleTypes,
    ErrorCode::ArityMismatch,
    ErrorCode::InvalidCast,
    ErrorCode::RecursiveLayout,
    ErrorCode::DuplicateField,
    ErrorCode::UnknownField,
    ErrorCode::VoidNotAllowed,
    ErrorCode::UnreachableCode,
    ErrorCode::MissingReturn,
    ErrorCode::UndiscardedExpression,
    ErrorCode::InvalidAssignmentTarget,
    ErrorCode::BreakOrContinueOutsideLoop,
    ErrorCode::InvalidMain,
    ErrorCode::NotComptime,
    ErrorCode::DivisionByZero,
    ErrorCode::RecursiveGlobal,
];

#[test]
fn codes_are_unique() {
    let mut seen: Vec<&str> = ALL.iter().map(|c| c.as_str()).collect();
    seen.sort_unstable();
    seen.dedup();
    assert_eq!(seen.len(), ALL.len());
}

#[test]
fn codes_are_well_formed() {
    for code in ALL {
        let s = code.as_str();
        assert_eq!(s.len(), 5, "{code:?}");
        assert!(s.starts_with('E'));
        assert!(s[1..].chars().all(|c| c.is_ascii_digit()));
    }
}

#[test]
fn display_is_the_code() {
    assert_eq!(ErrorCode::MissingReturn.to_string(), "E3002");
}
