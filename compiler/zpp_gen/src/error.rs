//! Generation errors.
//!
//! Generation is fail-fast: the first [`GenError`] propagates with `?` up to
//! the entry point, where the driver renders it through
//! [`zpp_diagnostic::emitter::report_and_exit`]. The constructors below are
//! marked `#[cold]` since each one ends the compilation.

use zpp_diagnostic::{Diagnostic, ErrorCode};
use zpp_ir::Pos;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct GenError {
    pub code: ErrorCode,
    pub message: String,
    /// Absent only when there is no source to point at, such as a missing
    /// entry file.
    pub pos: Option<Pos>,
}

pub type GenResult<T> = Result<T, GenError>;

impl GenError {
    #[cold]
    pub fn new(code: ErrorCode, message: impl Into<String>, pos: Pos) -> Self {
        GenError {
            code,
            message: message.into(),
            pos: Some(pos),
        }
    }

    #[cold]
    pub fn unpositioned(code: ErrorCode, message: impl Into<String>) -> Self {
        GenError {
            code,
            message: message.into(),
            pos: None,
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        let diag = Diagnostic::error(self.code).with_message(self.message.clone());
        match self.pos {
            Some(pos) => diag.at(pos),
            None => diag,
        }
    }
}

// Symbols

#[cold]
pub fn undeclared(name: &str, pos: Pos) -> GenError {
    GenError::new(
        ErrorCode::UndeclaredSymbol,
        format!("id `{name}` not declared"),
        pos,
    )
}

#[cold]
pub fn already_declared(name: &str, pos: Pos) -> GenError {
    GenError::new(
        ErrorCode::DuplicateDeclaration,
        format!("id `{name}` already declared"),
        pos,
    )
}

#[cold]
pub fn declared_by_import(name: &str, import_pos: Pos, pos: Pos) -> GenError {
    GenError::new(
        ErrorCode::DuplicateDeclaration,
        format!(
            "id `{name}` already declared (from import at [line: {}, col: {}])",
            import_pos.line, import_pos.col
        ),
        pos,
    )
}

#[cold]
pub fn not_a(code: ErrorCode, name: &str, what: &str, pos: Pos) -> GenError {
    GenError::new(code, format!("`{name}` is not a {what}"), pos)
}

// Types

#[cold]
pub fn type_mismatch(expected: &str, found: &str, pos: Pos) -> GenError {
    GenError::new(
        ErrorCode::TypeMismatch,
        format!("expected `{expected}`, found `{found}`"),
        pos,
    )
}

#[cold]
pub fn expected_kind(what: &str, found: &str, pos: Pos) -> GenError {
    GenError::new(
        ErrorCode::TypeMismatch,
        format!("expected {what}, got `{found}`"),
        pos,
    )
}

#[cold]
pub fn incompatible(lhs: &str, rhs: &str, pos: Pos) -> GenError {
    GenError::new(
        ErrorCode::IncompatibleTypes,
        format!("types `{lhs}` and `{rhs}` are not compatible"),
        pos,
    )
}

#[cold]
pub fn duplicate_field(name: &str, pos: Pos) -> GenError {
    GenError::new(
        ErrorCode::DuplicateField,
        format!("field `{name}` is duplicate"),
        pos,
    )
}

#[cold]
pub fn unknown_field(ty: &str, field: &str, pos: Pos) -> GenError {
    GenError::new(
        ErrorCode::UnknownField,
        format!("`{ty}` has no field `{field}`"),
        pos,
    )
}

// Arity

#[cold]
pub fn arity(what: &str, expected: usize, got: usize, pos: Pos) -> GenError {
    GenError::new(
        ErrorCode::ArityMismatch,
        format!("expected `{expected}` {what}, got `{got}`"),
        pos,
    )
}

#[cold]
pub fn unexpected_count(what: &str, got: usize, pos: Pos) -> GenError {
    GenError::new(
        ErrorCode::ArityMismatch,
        format!("unexpected `{got}` {what}"),
        pos,
    )
}

// Values

#[cold]
pub fn not_comptime(pos: Pos) -> GenError {
    GenError::new(ErrorCode::NotComptime, "expected comptime expression", pos)
}

#[cold]
pub fn cannot_assign(pos: Pos) -> GenError {
    GenError::new(
        ErrorCode::InvalidAssignmentTarget,
        "cannot assign a value to an expression",
        pos,
    )
}

#[cold]
pub fn expected_literal_str(pos: Pos) -> GenError {
    GenError::new(ErrorCode::TypeMismatch, "expected literal string", pos)
}

#[cold]
pub fn immutable_write(pos: Pos) -> GenError {
    GenError::new(
        ErrorCode::InvalidAssignmentTarget,
        "cannot write to unmutable pointer",
        pos,
    )
}
