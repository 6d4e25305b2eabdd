//! The type arena.

use zpp_ir::{Name, StringInterner};

use crate::{Field, TypeId, TypeKind};

#[derive(Clone, Debug)]
struct TypeEntry {
    kind: TypeKind,
    /// Display name; never consulted by equality.
    alias: Option<String>,
}

/// Arena of type descriptors.
#[derive(Clone, Debug)]
pub struct TypePool {
    entries: Vec<TypeEntry>,
    ptr_name: Name,
    len_name: Name,
}

impl TypePool {
    /// Create a pool holding the builtin types.
    ///
    /// The interner is needed for the field names of `String`.
    pub fn new(interner: &StringInterner) -> Self {
        let ptr_name = interner.intern("ptr");
        let len_name = interner.intern("len");
        let mut pool = TypePool {
            entries: Vec::with_capacity(256),
            ptr_name,
            len_name,
        };

        for (bits, signed) in [
            (8, true),
            (16, true),
            (32, true),
            (64, true),
            (8, false),
            (16, false),
            (32, false),
            (64, false),
        ] {
            pool.alloc(TypeKind::Int { bits, signed });
        }
        pool.alloc(TypeKind::Float { bits: 32 });
        pool.alloc(TypeKind::Float { bits: 64 });
        pool.alloc(TypeKind::Void);
        pool.alloc(TypeKind::Int {
            bits: 1,
            signed: false,
        });
        pool.alloc(TypeKind::Ptr {
            mutable: false,
            pointee: TypeId::U8,
        });
        let string = pool.alloc(TypeKind::Struct {
            fields: vec![
                Field::new(ptr_name, TypeId::CSTRING),
                Field::new(len_name, TypeId::U64),
            ],
        });
        pool.set_alias(string, "String");
        debug_assert_eq!(string, TypeId::STRING);
        pool
    }

    #[expect(
        clippy::cast_possible_truncation,
        reason = "a compilation never allocates 4 billion types"
    )]
    fn alloc(&mut self, kind: TypeKind) -> TypeId {
        let id = TypeId::from_raw(self.entries.len() as u32);
        self.entries.push(TypeEntry { kind, alias: None });
        id
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Descriptor of `id`. Ids always come from this pool.
    #[inline]
    pub fn kind(&self, id: TypeId) -> &TypeKind {
        &self.entries[id.index()].kind
    }

    pub fn alias(&self, id: TypeId) -> Option<&str> {
        self.entries[id.index()].alias.as_deref()
    }

    pub fn set_alias(&mut self, id: TypeId, alias: impl Into<String>) {
        self.entries[id.index()].alias = Some(alias.into());
    }

    // Construction

    /// Builtin integer of the given width.
    pub fn int(bits: u8, signed: bool) -> Option<TypeId> {
        match (bits, signed) {
            (8, true) => Some(TypeId::I8),
            (16, true) => Some(TypeId::I16),
            (32, true) => Some(TypeId::I32),
            (64, true) => Some(TypeId::I64),
            (8, false) => Some(TypeId::U8),
            (16, false) => Some(TypeId::U16),
            (32, false) => Some(TypeId::U32),
            (64, false) => Some(TypeId::U64),
            _ => None,
        }
    }

    /// Builtin scalar spelled `name`, if any.
    pub fn builtin(name: &str) -> Option<TypeId> {
        match name {
            "i8" => Some(TypeId::I8),
            "i16" => Some(TypeId::I16),
            "i32" => Some(TypeId::I32),
            "i64" => Some(TypeId::I64),
            "u8" => Some(TypeId::U8),
            "u16" => Some(TypeId::U16),
            "u32" => Some(TypeId::U32),
            "u64" => Some(TypeId::U64),
            "f32" => Some(TypeId::F32),
            "f64" => Some(TypeId::F64),
            "void" => Some(TypeId::VOID),
            _ => None,
        }
    }

    pub fn ptr(&mut self, mutable: bool, pointee: TypeId) -> TypeId {
        if !mutable && pointee == TypeId::U8 {
            return TypeId::CSTRING;
        }
        self.alloc(TypeKind::Ptr { mutable, pointee })
    }

    pub fn array(&mut self, len: u64, elem: TypeId) -> TypeId {
        self.alloc(TypeKind::Array { len, elem })
    }

    pub fn structure(&mut self, fields: Vec<Field>) -> TypeId {
        self.alloc(TypeKind::Struct { fields })
    }

    pub fn union(&mut self, fields: Vec<Field>) -> TypeId {
        self.alloc(TypeKind::Union { fields })
    }

    pub fn function(&mut self, params: Vec<TypeId>, ret: TypeId) -> TypeId {
        self.alloc(TypeKind::Fn { params, ret })
    }

    /// Fat pointer `(ptr: *T, len: u64)` over `elem`.
    pub fn fat_pointer(&mut self, mutable: bool, elem: TypeId) -> TypeId {
        let ptr = self.ptr(mutable, elem);
        let fields = vec![
            Field::new(self.ptr_name, ptr),
            Field::new(self.len_name, TypeId::U64),
        ];
        self.structure(fields)
    }

    /// Fresh slot for a declaration under evaluation.
    pub fn placeholder(&mut self) -> TypeId {
        self.alloc(TypeKind::Placeholder)
    }

    /// Overwrite `slot` with the descriptor of `from`.
    ///
    /// Every id handed out for `slot` while it was a placeholder now refers
    /// to the completed type.
    pub fn complete(&mut self, slot: TypeId, from: TypeId, alias: impl Into<String>) {
        let kind = self.entries[from.index()].kind.clone();
        self.entries[slot.index()] = TypeEntry {
            kind,
            alias: Some(alias.into()),
        };
    }

    // Queries

    pub fn is_int(&self, id: TypeId) -> bool {
        matches!(self.kind(id), TypeKind::Int { .. })
    }

    pub fn is_signed(&self, id: TypeId) -> bool {
        matches!(self.kind(id), TypeKind::Int { signed: true, .. })
    }

    pub fn is_float(&self, id: TypeId) -> bool {
        matches!(self.kind(id), TypeKind::Float { .. })
    }

    pub fn is_numeric(&self, id: TypeId) -> bool {
        self.is_int(id) || self.is_float(id)
    }

    pub fn is_ptr(&self, id: TypeId) -> bool {
        matches!(self.kind(id), TypeKind::Ptr { .. })
    }

    pub fn is_void(&self, id: TypeId) -> bool {
        matches!(self.kind(id), TypeKind::Void)
    }

    pub fn is_placeholder(&self, id: TypeId) -> bool {
        matches!(self.kind(id), TypeKind::Placeholder)
    }

    pub fn is_fn(&self, id: TypeId) -> bool {
        matches!(self.kind(id), TypeKind::Fn { .. })
    }

    pub fn is_array(&self, id: TypeId) -> bool {
        matches!(self.kind(id), TypeKind::Array { .. })
    }

    /// Bit width of an integer or float type.
    pub fn bits(&self, id: TypeId) -> Option<u8> {
        match *self.kind(id) {
            TypeKind::Int { bits, .. } | TypeKind::Float { bits } => Some(bits),
            _ => None,
        }
    }

    /// `(mutable, pointee)` of a pointer type.
    pub fn pointee(&self, id: TypeId) -> Option<(bool, TypeId)> {
        match *self.kind(id) {
            TypeKind::Ptr { mutable, pointee } => Some((mutable, pointee)),
            _ => None,
        }
    }

    /// `(len, elem)` of a static array type.
    pub fn array_parts(&self, id: TypeId) -> Option<(u64, TypeId)> {
        match *self.kind(id) {
            TypeKind::Array { len, elem } => Some((len, elem)),
            _ => None,
        }
    }

    /// Fields of a struct or union.
    pub fn fields(&self, id: TypeId) -> Option<&[Field]> {
        match self.kind(id) {
            TypeKind::Struct { fields } | TypeKind::Union { fields } => Some(fields),
            _ => None,
        }
    }

    /// Position and type of the field called `name`.
    pub fn field(&self, id: TypeId, name: Name) -> Option<(usize, TypeId)> {
        self.fields(id)?
            .iter()
            .enumerate()
            .find(|(_, f)| f.name == name)
            .map(|(i, f)| (i, f.ty))
    }

    /// `(params, ret)` of a fn type.
    pub fn signature(&self, id: TypeId) -> Option<(&[TypeId], TypeId)> {
        match self.kind(id) {
            TypeKind::Fn { params, ret } => Some((params, *ret)),
            _ => None,
        }
    }

    /// Pointer type of a fat pointer: a struct of exactly `ptr: *T` then
    /// `len: u64`.
    pub fn fat_pointer_ptr(&self, id: TypeId) -> Option<TypeId> {
        let TypeKind::Struct { fields } = self.kind(id) else {
            return None;
        };
        match fields.as_slice() {
            [ptr, len]
                if ptr.name == self.ptr_name
                    && len.name == self.len_name
                    && self.is_ptr(ptr.ty)
                    && self.equal(len.ty, TypeId::U64) =>
            {
                Some(ptr.ty)
            }
            _ => None,
        }
    }
}
