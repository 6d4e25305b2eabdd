//! Error codes for all generator diagnostics.
//!
//! Each code renders as `E####`; the first digit is the phase:
//! - E1xxx: symbols and imports
//! - E2xxx: types
//! - E3xxx: statements and control flow
//! - E4xxx: compile-time evaluation and intrinsics

use std::fmt;

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ErrorCode {
    // Symbols and imports (E1xxx)
    /// Identifier not found in any visible scope or import
    UndeclaredSymbol,
    /// Name declared twice, or shadowing a reserved or imported name
    DuplicateDeclaration,
    /// Import list repeats a name, or an import collides with module ids
    ImportConflict,
    /// Imported file does not exist
    ImportNotFound,
    /// Symbol used as a function is not one
    NotAFunction,
    /// Symbol used as a type is not one
    NotAType,
    /// Symbol used as a value is not one
    NotAVariable,
    /// Generic arguments given to a non-generic type
    NotAGenericType,

    // Types (E2xxx)
    /// Value has a different type than the one expected
    TypeMismatch,
    /// Operands of an operator or branches of an inline `if` disagree
    IncompatibleTypes,
    /// Wrong number of arguments or generic arguments
    ArityMismatch,
    /// `as` between types that have no conversion
    InvalidCast,
    /// Struct contains itself by value
    RecursiveLayout,
    /// Struct or union lists a field twice
    DuplicateField,
    /// Field access names a field the type does not have
    UnknownField,
    /// `void` used where a value type is required
    VoidNotAllowed,

    // Statements and control flow (E3xxx)
    /// Statement after a terminator in the same block
    UnreachableCode,
    /// Non-void function can fall off its end
    MissingReturn,
    /// Non-void expression used as a statement
    UndiscardedExpression,
    /// Assignment to something that is not a mutable location
    InvalidAssignmentTarget,
    /// `break` or `continue` outside a loop body
    BreakOrContinueOutsideLoop,
    /// `main` does not have the entry-point signature
    InvalidMain,

    // Compile-time evaluation (E4xxx)
    /// Comptime value required but the expression is only known at runtime
    NotComptime,
    /// Comptime division or remainder by zero
    DivisionByZero,
    /// Global initializer depends on itself
    RecursiveGlobal,
}

impl ErrorCode {
    /// Stable `E####` code.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::UndeclaredSymbol => "E1001",
            ErrorCode::DuplicateDeclaration => "E1002",
            ErrorCode::ImportConflict => "E1003",
            ErrorCode::ImportNotFound => "E1004",
            ErrorCode::NotAFunction => "E1005",
            ErrorCode::NotAType => "E1006",
            ErrorCode::NotAVariable => "E1007",
            ErrorCode::NotAGenericType => "E1008",
            ErrorCode::TypeMismatch => "E2001",
            ErrorCode::IncompatibleTypes => "E2002",
            ErrorCode::ArityMismatch => "E2003",
            ErrorCode::InvalidCast => "E2004",
            ErrorCode::RecursiveLayout => "E2005",
            ErrorCode::DuplicateField => "E2006",
            ErrorCode::UnknownField => "E2007",
            ErrorCode::VoidNotAllowed => "E2008",
            ErrorCode::UnreachableCode => "E3001",
            ErrorCode::MissingReturn => "E3002",
            ErrorCode::UndiscardedExpression => "E3003",
            ErrorCode::InvalidAssignmentTarget => "E3004",
            ErrorCode::BreakOrContinueOutsideLoop => "E3005",
            ErrorCode::InvalidMain => "E3006",
            ErrorCode::NotComptime => "E4001",
            ErrorCode::DivisionByZero => "E4002",
            ErrorCode::RecursiveGlobal => "E4003",
        }
    }

    /// Short description used when no message is attached.
    pub fn description(self) -> &'static str {
        match self {
            ErrorCode::UndeclaredSymbol => "undeclared identifier",
            ErrorCode::DuplicateDeclaration => "duplicate declaration",
            ErrorCode::ImportConflict => "conflicting import",
            ErrorCode::ImportNotFound => "imported file not found",
            ErrorCode::NotAFunction => "not a function",
            ErrorCode::NotAType => "not a type",
            ErrorCode::NotAVariable => "not a variable",
            ErrorCode::NotAGenericType => "not a generic type",
            ErrorCode::TypeMismatch => "mismatched types",
            ErrorCode::IncompatibleTypes => "incompatible types",
            ErrorCode::ArityMismatch => "wrong number of arguments",
            ErrorCode::InvalidCast => "invalid cast",
            ErrorCode::RecursiveLayout => "type has infinite size",
            ErrorCode::DuplicateField => "duplicate field",
            ErrorCode::UnknownField => "unknown field",
            ErrorCode::VoidNotAllowed => "`void` not allowed here",
            ErrorCode::UnreachableCode => "unreachable code",
            ErrorCode::MissingReturn => "not all paths return a value",
            ErrorCode::UndiscardedExpression => "undiscarded expression",
            ErrorCode::InvalidAssignmentTarget => "invalid assignment target",
            ErrorCode::BreakOrContinueOutsideLoop => "loop control outside of loop body",
            ErrorCode::InvalidMain => "invalid `main` prototype",
            ErrorCode::NotComptime => "expected comptime value",
            ErrorCode::DivisionByZero => "division by zero in constant expression",
            ErrorCode::RecursiveGlobal => "global initializer depends on itself",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests;
