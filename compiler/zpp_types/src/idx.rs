//! Type handle.

use std::fmt;

/// A 32-bit index into the [`TypePool`](crate::TypePool).
///
/// Builtin scalars have fixed indices and exist in every pool. Equality of
/// handles is identity; use the pool for structural comparison.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct TypeId(u32);

impl TypeId {
    pub const I8: Self = Self(0);
    pub const I16: Self = Self(1);
    pub const I32: Self = Self(2);
    pub const I64: Self = Self(3);
    pub const U8: Self = Self(4);
    pub const U16: Self = Self(5);
    pub const U32: Self = Self(6);
    pub const U64: Self = Self(7);
    pub const F32: Self = Self(8);
    pub const F64: Self = Self(9);
    pub const VOID: Self = Self(10);
    /// One-bit integer produced by comparisons before widening.
    pub const BOOL: Self = Self(11);
    /// `*u8`
    pub const CSTRING: Self = Self(12);
    /// `(ptr: *u8, len: u64)`, displayed as `String`.
    pub const STRING: Self = Self(13);

    /// Number of pre-allocated types.
    pub const BUILTIN_COUNT: u32 = 14;

    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub const fn is_builtin(self) -> bool {
        self.0 < Self::BUILTIN_COUNT
    }
}

impl fmt::Debug for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeId({})", self.0)
    }
}
