//! Human-readable type rendering.
//!
//! Aliased types print their alias, which also stops the walk at named
//! recursive types. Anonymous types print structurally:
//! `*mut i32`, `[4 x u8]`, `(a: i32, b: *u8)`, `union(a: i32)`, `fn(i32) -> void`.

use std::fmt;

use zpp_ir::StringInterner;

use crate::{Field, TypeId, TypeKind, TypePool};

/// Guards display against unaliased cycles.
const MAX_DEPTH: u32 = 16;

pub struct TypeDisplay<'a> {
    pool: &'a TypePool,
    interner: &'a StringInterner,
    id: TypeId,
}

impl TypePool {
    pub fn display<'a>(&'a self, id: TypeId, interner: &'a StringInterner) -> TypeDisplay<'a> {
        TypeDisplay {
            pool: self,
            interner,
            id,
        }
    }

    /// Rendered type list, as used in generic instantiation names.
    pub fn display_list(&self, ids: &[TypeId], interner: &StringInterner) -> String {
        ids.iter()
            .map(|&id| self.display(id, interner).to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl TypeDisplay<'_> {
    fn write(&self, f: &mut fmt::Formatter<'_>, id: TypeId, depth: u32) -> fmt::Result {
        if let Some(alias) = self.pool.alias(id) {
            return f.write_str(alias);
        }
        if depth > MAX_DEPTH {
            return f.write_str("...");
        }

        match self.pool.kind(id) {
            TypeKind::Int { bits, signed } => {
                write!(f, "{}{bits}", if *signed { 'i' } else { 'u' })
            }
            TypeKind::Float { bits } => write!(f, "f{bits}"),
            TypeKind::Void => f.write_str("void"),
            TypeKind::Ptr { mutable, pointee } => {
                f.write_str(if *mutable { "*mut " } else { "*" })?;
                self.write(f, *pointee, depth + 1)
            }
            TypeKind::Array { len, elem } => {
                write!(f, "[{len} x ")?;
                self.write(f, *elem, depth + 1)?;
                f.write_str("]")
            }
            TypeKind::Struct { fields } => self.write_fields(f, "", fields, depth),
            TypeKind::Union { fields } => self.write_fields(f, "union", fields, depth),
            TypeKind::Fn { params, ret } => {
                f.write_str("fn(")?;
                for (i, &param) in params.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    self.write(f, param, depth + 1)?;
                }
                f.write_str(") -> ")?;
                self.write(f, *ret, depth + 1)
            }
            TypeKind::Placeholder => f.write_str("<unresolved>"),
        }
    }

    fn write_fields(
        &self,
        f: &mut fmt::Formatter<'_>,
        prefix: &str,
        fields: &[Field],
        depth: u32,
    ) -> fmt::Result {
        write!(f, "{prefix}(")?;
        for (i, field) in fields.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}: ", self.interner.lookup(field.name))?;
            self.write(f, field.ty, depth + 1)?;
        }
        f.write_str(")")
    }
}

impl fmt::Display for TypeDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write(f, self.id, 0)
    }
}

#[cfg(test)]
mod tests;
