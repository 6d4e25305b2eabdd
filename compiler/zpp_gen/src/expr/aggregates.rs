//! Array, struct and union initializers.

use rustc_hash::FxHashSet;
use zpp_diagnostic::ErrorCode;
use zpp_ir::{Expr, FieldInit, Pos};
use zpp_lir::{Const, Operand};
use zpp_types::{Field, TypeId, TypeKind};

use crate::context::Generator;
use crate::error::{self, GenError, GenResult};
use crate::value::RealData;

impl Generator {
    /// `[a, b, ..]`: every element takes the type of the first.
    pub(super) fn eval_array_init(
        &mut self,
        elems: &[Expr],
        expected: Option<TypeId>,
        pos: Pos,
    ) -> GenResult<RealData> {
        let Some((first, rest)) = elems.split_first() else {
            return Err(GenError::new(
                ErrorCode::ArityMismatch,
                "array initializer cannot be empty",
                pos,
            ));
        };
        let elem_expected = expected.and_then(|ty| {
            self.pool
                .array_parts(ty)
                .map(|(_, elem)| elem)
                .or_else(|| self.pool.pointee(ty).map(|(_, elem)| elem))
        });

        let first = self.eval_expr(first, elem_expected)?;
        let elem = first.ty;
        let mut values = Vec::with_capacity(elems.len());
        values.push(first.value);
        for expr in rest {
            let data = self.eval_expr(expr, Some(elem))?;
            self.expect_type(elem, &data, expr.pos)?;
            values.push(data.value);
        }

        let ty = self.pool.array(elems.len() as u64, elem);
        Ok(self.build_aggregate(ty, values))
    }

    /// `(a: x, b: y)`: a fresh struct type; expected field types guide the
    /// values by position.
    pub(super) fn eval_struct_init(
        &mut self,
        inits: &[FieldInit],
        expected: Option<TypeId>,
    ) -> GenResult<RealData> {
        let expected_fields: Vec<TypeId> = match expected.map(|ty| self.pool.kind(ty)) {
            Some(TypeKind::Struct { fields }) => fields.iter().map(|f| f.ty).collect(),
            _ => Vec::new(),
        };

        let mut seen = FxHashSet::default();
        let mut fields = Vec::with_capacity(inits.len());
        let mut values = Vec::with_capacity(inits.len());
        for (i, init) in inits.iter().enumerate() {
            if !seen.insert(init.name.name) {
                return Err(error::duplicate_field(
                    self.interner.lookup(init.name.name),
                    init.name.pos,
                ));
            }
            let data = self.eval_expr(&init.value, expected_fields.get(i).copied())?;
            fields.push(Field::new(init.name.name, data.ty));
            values.push(data.value);
        }

        let ty = self.pool.structure(fields);
        Ok(self.build_aggregate(ty, values))
    }

    /// `(|field: x|)`: writes one field through a slot of the expected union
    /// type.
    pub(super) fn eval_union_init(
        &mut self,
        init: &FieldInit,
        expected: Option<TypeId>,
        pos: Pos,
    ) -> GenResult<RealData> {
        let Some(ty) = expected.filter(|&ty| matches!(self.pool.kind(ty), TypeKind::Union { .. }))
        else {
            return Err(GenError::new(
                ErrorCode::TypeMismatch,
                "union constructor has an unclear type here",
                pos,
            ));
        };
        let Some((_, field_ty)) = self.pool.field(ty, init.name.name) else {
            return Err(error::unknown_field(
                &self.ty_name(ty),
                self.interner.lookup(init.name.name),
                init.name.pos,
            ));
        };

        let data = self.eval_expr(&init.value, Some(field_ty))?;
        self.expect_type(field_ty, &data, init.value.pos)?;
        let slot = self.alloca(ty);
        let builder = self.builder();
        builder.emit_store(slot.into(), data.value);
        let value = builder.emit_load(ty, slot.into());
        Ok(RealData::runtime(ty, value))
    }

    /// Constant aggregate when every element is constant, otherwise a chain
    /// of `insertvalue` on `undef`.
    pub(super) fn build_aggregate(&mut self, ty: TypeId, values: Vec<Operand>) -> RealData {
        if values.iter().all(|v| v.as_const().is_some()) {
            let consts: Vec<Const> = values
                .into_iter()
                .filter_map(|v| match v {
                    Operand::Const(c) => Some(c),
                    _ => None,
                })
                .collect();
            let value = if self.pool.is_array(ty) {
                Const::Array { ty, elems: consts }
            } else {
                Const::Struct { ty, fields: consts }
            };
            return RealData::runtime(ty, value);
        }

        let builder = self.builder();
        let mut agg = Operand::from(Const::Undef { ty });
        for (i, value) in values.into_iter().enumerate() {
            #[expect(
                clippy::cast_possible_truncation,
                reason = "aggregate element counts fit in u32"
            )]
            let index = i as u32;
            agg = builder.emit_insert_value(ty, agg, value, index).into();
        }
        RealData::runtime(ty, agg)
    }
}
