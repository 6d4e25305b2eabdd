//! Addresses, fields and indexing.
//!
//! An expression read as a value ends in a `load`. When its address is
//! needed instead, the load is taken back out of the current block and its
//! pointer used; anything else is spilled to a stack slot.

use zpp_diagnostic::ErrorCode;
use zpp_ir::{Expr, Ident, Pos};
use zpp_lir::{Const, Operand};
use zpp_types::{TypeId, TypeKind};

use crate::context::Generator;
use crate::error::{self, GenError, GenResult};
use crate::value::RealData;

impl Generator {
    pub(super) fn eval_addr_of(
        &mut self,
        mutable: bool,
        operand: &Expr,
        expected: Option<TypeId>,
        pos: Pos,
    ) -> GenResult<RealData> {
        let fat = expected.filter(|&ty| self.pool.fat_pointer_ptr(ty).is_some());
        let inner = match expected.and_then(|ty| self.pool.pointee(ty)) {
            Some((_, pointee)) => Some(pointee),
            None => fat.and_then(|ty| self.pool.fat_pointer_ptr(ty)),
        };
        let data = self.eval_expr(operand, inner)?;
        let addr = self.address_of(&data, mutable, pos)?;

        match (fat, self.pool.array_parts(data.ty)) {
            (Some(fat), Some((len, _))) => {
                let len = Const::Int {
                    ty: TypeId::U64,
                    value: i128::from(len),
                };
                let builder = self.builder();
                let undef = Const::Undef { ty: fat };
                let with_ptr = builder.emit_insert_value(fat, undef.into(), addr, 0);
                let value = builder.emit_insert_value(fat, with_ptr.into(), len.into(), 1);
                Ok(RealData::runtime(fat, value))
            }
            _ => {
                let ty = self.pool.ptr(mutable, data.ty);
                Ok(RealData::runtime(ty, addr))
            }
        }
    }

    /// Address holding `data`: the pointer it was loaded from, or a fresh
    /// stack slot when it was never in memory.
    pub(crate) fn address_of(&mut self, data: &RealData, mutable: bool, pos: Pos) -> GenResult<Operand> {
        if let Some(ptr) = self.place_of(data) {
            if mutable && data.readonly {
                return Err(error::immutable_write(pos));
            }
            return Ok(ptr);
        }
        if mutable {
            return Err(GenError::new(
                ErrorCode::InvalidAssignmentTarget,
                "temporary expression allocation address cannot be mutable",
                pos,
            ));
        }
        let slot = self.alloca(data.ty);
        self.builder().emit_store(slot.into(), data.value.clone());
        Ok(slot.into())
    }

    /// Pointer `data` was loaded from, if its load is still in the current
    /// block. The load is removed.
    pub(crate) fn place_of(&mut self, data: &RealData) -> Option<Operand> {
        let value = data.value.as_value()?;
        self.builder().take_load(value)
    }

    pub(super) fn eval_field(&mut self, base: &Expr, field: Ident) -> GenResult<RealData> {
        let data = self.eval_expr(base, None)?;
        let Some((index, ty)) = self.pool.field(data.ty, field.name) else {
            let found = self.ty_name(data.ty);
            if self.pool.fields(data.ty).is_none() {
                return Err(error::expected_kind("struct or union expression", &found, base.pos));
            }
            return Err(error::unknown_field(&found, self.interner.lookup(field.name), field.pos));
        };

        if matches!(self.pool.kind(data.ty), TypeKind::Union { .. }) {
            let ptr = self.address_of(&data, false, base.pos)?;
            let value = self.builder().emit_load(ty, ptr);
            return Ok(RealData::runtime(ty, value).read_only(data.readonly));
        }

        if let Some(ptr) = self.place_of(&data) {
            let field_ptr = self.pool.ptr(true, ty);
            let indices = vec![i32_index(0), i32_index(index)];
            let builder = self.builder();
            let addr = builder.emit_element_ptr(field_ptr, data.ty, ptr, indices);
            let value = builder.emit_load(ty, addr.into());
            return Ok(RealData::runtime(ty, value).read_only(data.readonly));
        }
        if let Operand::Const(Const::Struct { fields, .. }) = &data.value {
            if let Some(value) = fields.get(index) {
                return Ok(RealData::runtime(ty, value.clone()));
            }
        }
        #[expect(
            clippy::cast_possible_truncation,
            reason = "struct field counts fit in u32"
        )]
        let value = self
            .builder()
            .emit_extract_value(ty, data.value, index as u32);
        Ok(RealData::runtime(ty, value))
    }

    pub(super) fn eval_index(&mut self, base: &Expr, index: &Expr) -> GenResult<RealData> {
        let data = self.eval_expr(base, None)?;

        if let Some((_, elem)) = self.pool.array_parts(data.ty) {
            let base_ptr = self.address_of(&data, false, base.pos)?;
            let idx = self.eval_index_value(index)?;
            let elem_ptr = self.pool.ptr(true, elem);
            let zero = Const::Int {
                ty: TypeId::U64,
                value: 0,
            };
            let builder = self.builder();
            let addr = builder.emit_element_ptr(elem_ptr, data.ty, base_ptr, vec![zero.into(), idx]);
            let value = builder.emit_load(elem, addr.into());
            return Ok(RealData::runtime(elem, value).read_only(data.readonly));
        }

        let Some((mutable, elem)) = self.pool.pointee(data.ty) else {
            return Err(error::expected_kind(
                "indexable expression",
                &self.ty_name(data.ty),
                base.pos,
            ));
        };
        let idx = self.eval_index_value(index)?;
        let elem_ptr = self.pool.ptr(mutable, elem);
        let builder = self.builder();
        let addr = builder.emit_element_ptr(elem_ptr, elem, data.value, vec![idx]);
        let value = builder.emit_load(elem, addr.into());
        Ok(RealData::runtime(elem, value).read_only(!mutable))
    }

    fn eval_index_value(&mut self, index: &Expr) -> GenResult<Operand> {
        let idx = self.eval_expr(index, Some(TypeId::U64))?;
        self.expect_int(&idx, index.pos)?;
        Ok(idx.value)
    }
}

fn i32_index(index: usize) -> Operand {
    Const::Int {
        ty: TypeId::I32,
        value: index as i128,
    }
    .into()
}
