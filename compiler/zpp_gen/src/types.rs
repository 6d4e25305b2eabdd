//! Type evaluation: type expressions to pool ids.
//!
//! Named and generic types are memoized permanently. A declaration under
//! evaluation is represented by a placeholder slot that is overwritten once
//! its body is known, so self references taken meanwhile (through a
//! pointer) see the completed type.

use std::rc::Rc;

use rustc_hash::FxHashSet;
use smallvec::SmallVec;
use tracing::{debug, trace};
use zpp_diagnostic::ErrorCode;
use zpp_ir::{FieldDecl, Ident, Name, Pos, TypeDecl, TypeExpr, TypeExprKind};
use zpp_types::{Field, TypeId, TypePool};

use crate::context::Generator;
use crate::error::{self, GenError, GenResult};
use crate::stack::ensure_sufficient_stack;
use crate::symbol::{SymbolId, SymbolKind};

impl Generator {
    /// Evaluate a value type: `void` is rejected.
    pub(crate) fn eval_type(&mut self, te: &TypeExpr) -> GenResult<TypeId> {
        self.eval_type_with(te, false, false, true)
    }

    /// Evaluate a return type: `void` is accepted.
    pub(crate) fn eval_ret_type(&mut self, te: &TypeExpr) -> GenResult<TypeId> {
        self.eval_type_with(te, true, false, true)
    }

    fn eval_type_with(
        &mut self,
        te: &TypeExpr,
        allow_void: bool,
        allow_fn: bool,
        top: bool,
    ) -> GenResult<TypeId> {
        let ty = ensure_sufficient_stack(|| self.eval_type_kind(te, allow_void, allow_fn))?;
        if top && self.pool.find_recursive_layout(ty).is_some() {
            return Err(GenError::new(
                ErrorCode::RecursiveLayout,
                "type has infinite recursive layout",
                te.pos,
            ));
        }
        Ok(ty)
    }

    fn eval_type_kind(&mut self, te: &TypeExpr, allow_void: bool, allow_fn: bool) -> GenResult<TypeId> {
        match &te.kind {
            TypeExprKind::Named(name) => {
                let ty = self.eval_named_type(*name, te.pos)?;
                if !allow_void && self.pool.is_void(ty) {
                    return Err(GenError::new(
                        ErrorCode::VoidNotAllowed,
                        "type `void` not allowed here",
                        te.pos,
                    ));
                }
                Ok(ty)
            }
            TypeExprKind::Generic { name, args } => self.eval_generic_type(*name, args, te.pos),
            TypeExprKind::Ptr { mutable, pointee } => {
                let pointee = self.eval_type_with(pointee, false, true, false)?;
                Ok(self.pool.ptr(*mutable, pointee))
            }
            TypeExprKind::Array { len, elem } => {
                let len_data = self.eval_expr(len, Some(TypeId::U64))?;
                if !len_data.is_comptime() {
                    return Err(error::not_comptime(len.pos));
                }
                let Some(n) = len_data.as_int() else {
                    let found = self.ty_name(len_data.ty);
                    return Err(error::expected_kind("integer", &found, len.pos));
                };
                let n = u64::try_from(n)
                    .map_err(|_| error::expected_kind("array length", &n.to_string(), len.pos))?;
                let elem = self.eval_type_with(elem, false, false, false)?;
                Ok(self.pool.array(n, elem))
            }
            TypeExprKind::Struct(fields) => {
                let fields = self.eval_fields(fields)?;
                Ok(self.pool.structure(fields))
            }
            TypeExprKind::Union(fields) => {
                let fields = self.eval_fields(fields)?;
                Ok(self.pool.union(fields))
            }
            TypeExprKind::Fn { params, ret } => {
                if !allow_fn {
                    return Err(GenError::new(
                        ErrorCode::TypeMismatch,
                        "fn type only allowed behind a pointer",
                        te.pos,
                    ));
                }
                let params = params
                    .iter()
                    .map(|p| self.eval_type_with(p, false, false, false))
                    .collect::<GenResult<Vec<_>>>()?;
                let ret = self.eval_type_with(ret, true, false, false)?;
                Ok(self.pool.function(params, ret))
            }
        }
    }

    fn eval_fields(&mut self, decls: &[FieldDecl]) -> GenResult<Vec<Field>> {
        let mut seen = FxHashSet::default();
        let mut fields = Vec::with_capacity(decls.len());
        for decl in decls {
            if !seen.insert(decl.name.name) {
                return Err(error::duplicate_field(
                    self.interner.lookup(decl.name.name),
                    decl.name.pos,
                ));
            }
            let ty = self.eval_type_with(&decl.ty, false, false, false)?;
            fields.push(Field::new(decl.name.name, ty));
        }
        Ok(fields)
    }

    fn eval_named_type(&mut self, name: Name, pos: Pos) -> GenResult<TypeId> {
        let text = self.interner.lookup(name);
        if let Some(ty) = TypePool::builtin(text) {
            return Ok(ty);
        }
        let sym = self.lookup(name, pos)?;
        match &self.symbol(sym).kind {
            SymbolKind::TypeAlias(ty) => Ok(*ty),
            SymbolKind::Type(decl) => {
                let decl = Rc::clone(decl);
                self.named_type(sym, &decl)
            }
            SymbolKind::GenericType(decl) => {
                Err(error::arity("generic args", decl.generics.len(), 0, pos))
            }
            _ => Err(error::not_a(ErrorCode::NotAType, text, "type", pos)),
        }
    }

    fn named_type(&mut self, sym: SymbolId, decl: &TypeDecl) -> GenResult<TypeId> {
        if let Some(&ty) = self.named_types.get(&sym) {
            trace!(sym = sym.index(), "named type cache hit");
            return Ok(ty);
        }
        let slot = self.pool.placeholder();
        self.named_types.insert(sym, slot);

        let module = self.symbol(sym).module;
        let ty = self.with_module_scope(module, |g| {
            g.eval_type_with(&decl.ty, false, false, false)
        })?;
        let alias = self.interner.lookup(decl.name.name);
        self.complete_type(slot, ty, alias, decl.name.pos)?;
        debug!(name = alias, "named type evaluated");
        Ok(slot)
    }

    fn eval_generic_type(&mut self, name: Name, args: &[TypeExpr], pos: Pos) -> GenResult<TypeId> {
        let text = self.interner.lookup(name);
        let sym = self.lookup(name, pos)?;
        let SymbolKind::GenericType(decl) = &self.symbol(sym).kind else {
            return Err(error::not_a(
                ErrorCode::NotAGenericType,
                text,
                "generic type",
                pos,
            ));
        };
        let decl = Rc::clone(decl);
        if args.len() != decl.generics.len() {
            return Err(error::arity("generic args", decl.generics.len(), args.len(), pos));
        }
        let args = args
            .iter()
            .map(|a| self.eval_type(a))
            .collect::<GenResult<SmallVec<[TypeId; 4]>>>()?;

        if let Some((&ty, state)) = self.generic_types.get(&self.pool, sym, &args) {
            trace!(name = text, ?state, "generic type cache hit");
            return Ok(ty);
        }
        let slot = self.pool.placeholder();
        self.generic_types.insert(&self.pool, sym, &args, slot);

        let module = self.symbol(sym).module;
        let ty = self.with_module_scope(module, |g| {
            g.declare_generics(&decl.generics, &args)?;
            g.eval_type_with(&decl.ty, false, false, false)
        })?;
        let alias = format!("{text}|{}|", self.pool.display_list(&args, &self.interner));
        self.complete_type(slot, ty, &alias, pos)?;
        self.generic_types.finish(&self.pool, sym, &args);
        debug!(name = %alias, "generic type instantiated");
        Ok(slot)
    }

    fn complete_type(&mut self, slot: TypeId, ty: TypeId, alias: &str, pos: Pos) -> GenResult<()> {
        self.pool.complete(slot, ty, alias);
        self.generic_types.rehash(&self.pool);
        self.fns.rehash(&self.pool);
        if self.pool.is_placeholder(slot) {
            return Err(GenError::new(
                ErrorCode::RecursiveLayout,
                "type has infinite recursive layout",
                pos,
            ));
        }
        Ok(())
    }

    /// Bind generic parameters to concrete types in the current scope.
    pub(crate) fn declare_generics(&mut self, params: &[Ident], args: &[TypeId]) -> GenResult<()> {
        for (param, &ty) in params.iter().zip(args) {
            self.declare(param.name, SymbolKind::TypeAlias(ty), param.pos)?;
        }
        Ok(())
    }

    /// Display form of `ty` for diagnostics and names.
    pub(crate) fn ty_name(&self, ty: TypeId) -> String {
        self.pool.display(ty, &self.interner).to_string()
    }
}
