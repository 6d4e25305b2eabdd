//! Compiler intrinsics: `name!<generics>(args)`.
//!
//! The catalog is closed. Each intrinsic checks its own generic and
//! argument counts before evaluating anything.

use std::ops::RangeInclusive;

use smallvec::SmallVec;
use tracing::trace;
use zpp_diagnostic::ErrorCode;
use zpp_ir::{Call, Expr, ExprKind, Pos, TypeExpr};
use zpp_lir::{Callee, CastOp, Const};
use zpp_types::TypeId;

use crate::context::Generator;
use crate::error::{self, GenError, GenResult};
use crate::loader::resolve_sibling;
use crate::symbol::SymbolKind;
use crate::value::{ConstValue, RealData};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Intrinsic {
    Ptr2Int,
    Int2Ptr,
    Invoke,
    Fn2Ptr,
    Cstr,
    Carr { mutable: bool },
    LibVar { external: bool },
    LibCall { external: bool },
    IsReleaseBuild,
    IsDebugBuild,
    Panic,
    Assert,
    Expect,
    TypeSize,
    Here,
    Fmt,
}

impl Intrinsic {
    fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "ptr2int" => Intrinsic::Ptr2Int,
            "int2ptr" => Intrinsic::Int2Ptr,
            "invoke" => Intrinsic::Invoke,
            "fn2ptr" => Intrinsic::Fn2Ptr,
            "cstr" => Intrinsic::Cstr,
            "carr" => Intrinsic::Carr { mutable: false },
            "carr_mut" => Intrinsic::Carr { mutable: true },
            "internal_var" => Intrinsic::LibVar { external: false },
            "extern_var" => Intrinsic::LibVar { external: true },
            "internal_call" => Intrinsic::LibCall { external: false },
            "extern_call" => Intrinsic::LibCall { external: true },
            "is_release_build" => Intrinsic::IsReleaseBuild,
            "is_debug_build" => Intrinsic::IsDebugBuild,
            "panic" => Intrinsic::Panic,
            "assert" => Intrinsic::Assert,
            "expect" => Intrinsic::Expect,
            "type_size" => Intrinsic::TypeSize,
            "here" => Intrinsic::Here,
            "fmt" => Intrinsic::Fmt,
            _ => return None,
        })
    }
}

/// Accepted generic and argument counts of one intrinsic.
struct Arity {
    generics: RangeInclusive<usize>,
    args: RangeInclusive<usize>,
}

const fn arity(generics: RangeInclusive<usize>, args: RangeInclusive<usize>) -> Arity {
    Arity { generics, args }
}

impl Generator {
    pub(super) fn eval_intrinsic(
        &mut self,
        call: &Call,
        expected: Option<TypeId>,
        pos: Pos,
    ) -> GenResult<RealData> {
        let name = self.interner.lookup(call.callee.name);
        let Some(intrinsic) = Intrinsic::from_name(name) else {
            return Err(GenError::new(
                ErrorCode::UndeclaredSymbol,
                format!("unknown internal function `{name}`"),
                call.callee.pos,
            ));
        };
        trace!(?intrinsic, "intrinsic call");

        let expected_arity = match intrinsic {
            Intrinsic::Ptr2Int | Intrinsic::Int2Ptr => arity(1..=1, 1..=1),
            Intrinsic::Invoke | Intrinsic::Fmt => arity(0..=0, 1..=usize::MAX),
            Intrinsic::Fn2Ptr | Intrinsic::Cstr | Intrinsic::Carr { .. } | Intrinsic::Expect => {
                arity(0..=0, 1..=1)
            }
            Intrinsic::LibVar { external } => {
                let n = 1 + usize::from(external);
                arity(1..=1, n..=n)
            }
            Intrinsic::LibCall { external } => {
                let n = call.generics.len() + usize::from(external);
                arity(1..=usize::MAX, n..=n)
            }
            Intrinsic::IsReleaseBuild | Intrinsic::IsDebugBuild | Intrinsic::Here => {
                arity(0..=0, 0..=0)
            }
            Intrinsic::Panic => arity(0..=0, 0..=1),
            Intrinsic::Assert => arity(0..=0, 1..=2),
            Intrinsic::TypeSize => arity(1..=1, 0..=0),
        };
        // Release builds drop checks without looking at them.
        match intrinsic {
            Intrinsic::Assert if self.config.is_release() => return Ok(RealData::void()),
            Intrinsic::Expect if self.config.is_release() => {
                let zero = Const::Int {
                    ty: TypeId::I32,
                    value: 0,
                };
                return Ok(RealData::runtime(TypeId::I32, zero));
            }
            _ => {}
        }
        check_arity(call, name, &expected_arity, pos)?;

        match intrinsic {
            Intrinsic::Ptr2Int => self.eval_ptr2int(call),
            Intrinsic::Int2Ptr => self.eval_int2ptr(call),
            Intrinsic::Invoke => self.eval_invoke(call),
            Intrinsic::Fn2Ptr => self.eval_fn2ptr(&call.args[0]),
            Intrinsic::Cstr => {
                let text = literal_str(&call.args[0])?;
                Ok(RealData {
                    ty: TypeId::CSTRING,
                    value: self.intern_string(text).into(),
                    comptime: Some(ConstValue::Str(text.to_string())),
                    coerced: true,
                    readonly: false,
                })
            }
            Intrinsic::Carr { mutable } => self.eval_carr(&call.args[0], mutable, expected, pos),
            Intrinsic::LibVar { external } => self.eval_lib_var(call, external),
            Intrinsic::LibCall { external } => self.eval_lib_call(call, external),
            Intrinsic::IsReleaseBuild => Ok(self.eval_bool(self.config.is_release(), expected)),
            Intrinsic::IsDebugBuild => Ok(self.eval_bool(!self.config.is_release(), expected)),
            Intrinsic::Panic => {
                let mut message = format!("reached `panic!()` at {}", self.here_suffix(pos));
                if let Some(arg) = call.args.first() {
                    push_custom_message(&mut message, literal_str(arg)?);
                }
                self.emit_puts(&message);
                self.builder().terminate_unreachable();
                Ok(RealData::void())
            }
            Intrinsic::Assert => self.eval_assert(call, pos),
            Intrinsic::Expect => self.eval_expect(&call.args[0], pos),
            Intrinsic::TypeSize => {
                let ty = self.eval_type(&call.generics[0])?;
                let size = i128::from(self.pool.size_of(ty));
                let target = self.numeric_or(expected, TypeId::U64);
                Ok(RealData::scalar(&self.pool, target, &ConstValue::Int(size)))
            }
            Intrinsic::Here => {
                let message = format!("logged `here!()` at {}", self.here_suffix(pos));
                self.emit_puts(&message);
                Ok(RealData::void())
            }
            Intrinsic::Fmt => self.eval_fmt(call),
        }
    }

    /// `'path' [line: L, col: C], in `fn``
    fn here_suffix(&mut self, pos: Pos) -> String {
        let location = self.location(pos);
        format!("{location}, in `{}`", self.fcx().name)
    }

    fn eval_ptr2int(&mut self, call: &Call) -> GenResult<RealData> {
        let target = self.eval_type(&call.generics[0])?;
        if !self.pool.is_int(target) {
            return Err(error::expected_kind(
                "int generic type",
                &self.ty_name(target),
                call.generics[0].pos,
            ));
        }
        let arg = &call.args[0];
        let data = self.eval_expr(arg, None)?;
        if !self.pool.is_ptr(data.ty) {
            return Err(error::expected_kind("pointer expression", &self.ty_name(data.ty), arg.pos));
        }
        let value = self.builder().emit_cast(CastOp::PtrToInt, data.value, target);
        Ok(RealData::runtime(target, value))
    }

    fn eval_int2ptr(&mut self, call: &Call) -> GenResult<RealData> {
        let target = self.eval_type(&call.generics[0])?;
        if !self.pool.is_ptr(target) {
            return Err(error::expected_kind(
                "ptr generic type",
                &self.ty_name(target),
                call.generics[0].pos,
            ));
        }
        let arg = &call.args[0];
        let data = self.eval_expr(arg, Some(TypeId::U64))?;
        self.expect_int(&data, arg.pos)?;
        let value = self.builder().emit_cast(CastOp::IntToPtr, data.value, target);
        Ok(RealData::runtime(target, value))
    }

    fn eval_invoke(&mut self, call: &Call) -> GenResult<RealData> {
        let (callee, args) = (&call.args[0], &call.args[1..]);
        let f = self.eval_expr(callee, None)?;
        let signature = self.pool.pointee(f.ty).and_then(|(_, fn_ty)| {
            self.pool
                .signature(fn_ty)
                .map(|(params, ret)| (fn_ty, params.to_vec(), ret))
        });
        let Some((fn_ty, params, ret)) = signature else {
            return Err(error::expected_kind("fn expression", &self.ty_name(f.ty), callee.pos));
        };
        if args.len() != params.len() {
            return Err(error::arity("args", params.len(), args.len(), callee.pos));
        }
        let args = self.eval_args(args, &params)?;
        let target = Callee::Indirect { ptr: f.value, fn_ty };
        Ok(self.emit_call_data(ret, target, args))
    }

    fn eval_fn2ptr(&mut self, arg: &Expr) -> GenResult<RealData> {
        let Some(name) = arg.as_ident() else {
            return Err(GenError::new(ErrorCode::TypeMismatch, "expected id", arg.pos));
        };
        let sym = self.lookup(name, arg.pos)?;
        match &self.symbol(sym).kind {
            SymbolKind::Function(decl) if decl.generics.is_empty() => {}
            SymbolKind::Function(_) => {
                return Err(GenError::new(
                    ErrorCode::TypeMismatch,
                    "generic function cannot be addressed",
                    arg.pos,
                ))
            }
            _ => {
                return Err(error::not_a(
                    ErrorCode::NotAFunction,
                    self.interner.lookup(name),
                    "function",
                    arg.pos,
                ))
            }
        }
        let instance = self.gen_function(sym, &[])?;
        let fn_ty = self.pool.function(instance.params, instance.ret);
        let ty = self.pool.ptr(false, fn_ty);
        Ok(RealData::runtime(ty, Const::Func(instance.func)))
    }

    fn eval_carr(
        &mut self,
        arg: &Expr,
        mutable: bool,
        expected: Option<TypeId>,
        pos: Pos,
    ) -> GenResult<RealData> {
        if !matches!(arg.kind, ExprKind::ArrayInit(_)) {
            return Err(GenError::new(
                ErrorCode::TypeMismatch,
                "expected static array initializer",
                arg.pos,
            ));
        }
        let data = self.eval_expr(arg, expected)?;
        let elem = self.pool.array_parts(data.ty).map_or(data.ty, |(_, elem)| elem);
        let addr = self.address_of(&data, false, pos)?;
        let ty = self.pool.ptr(mutable, elem);
        Ok(RealData::runtime(ty, addr))
    }

    fn eval_lib_var(&mut self, call: &Call, external: bool) -> GenResult<RealData> {
        let ty = self.eval_type(&call.generics[0])?;
        let name = literal_str(&call.args[usize::from(external)])?;
        if external {
            self.link_library(&call.args[0])?;
        }
        let global = self.lib_var(name, ty);
        let value = self.builder().emit_load(ty, Const::Global(global).into());
        Ok(RealData::runtime(ty, value))
    }

    fn eval_lib_call(&mut self, call: &Call, external: bool) -> GenResult<RealData> {
        let (ret, params) = match call.generics.split_last() {
            Some(split) => split,
            None => return Err(error::unexpected_count("generic args", 0, call.callee.pos)),
        };
        let ret = self.eval_ret_type(ret)?;
        let params = params
            .iter()
            .map(|p| self.eval_type(p))
            .collect::<GenResult<SmallVec<[TypeId; 4]>>>()?;

        let skip = usize::from(external);
        let name = literal_str(&call.args[skip])?;
        let args = self.eval_args(&call.args[skip + 1..], &params)?;
        if external {
            self.link_library(&call.args[0])?;
        }
        let func = self.lib_fn(name, params.to_vec(), ret);
        Ok(self.emit_call_data(ret, Callee::Direct(func), args))
    }

    /// Record a library, resolved next to the current module, for linking.
    fn link_library(&mut self, arg: &Expr) -> GenResult<()> {
        let lib = literal_str(arg)?;
        let module = self.current_module();
        let path = resolve_sibling(&self.modules[module.index()].path, lib);
        trace!(path = %path.display(), "library linked");
        self.output.libs.insert(path);
        Ok(())
    }

    fn eval_assert(&mut self, call: &Call, pos: Pos) -> GenResult<RealData> {
        let cond = self.eval_condition(&call.args[0])?;
        let mut message = format!("failed `assert!()` at {}", self.here_suffix(pos));
        if let Some(arg) = call.args.get(1) {
            push_custom_message(&mut message, literal_str(arg)?);
        }

        let bit = self.truth(&cond);
        let builder = self.builder();
        let success = builder.new_block("assert.success");
        let failure = builder.new_block("assert.failure");
        builder.terminate_branch(bit, success, failure);

        self.builder().position_at(failure);
        self.emit_puts(&message);
        self.builder().terminate_unreachable();

        self.builder().position_at(success);
        Ok(RealData::void())
    }

    /// `0 as i32 if cond else 1 as i32`
    fn eval_expect(&mut self, cond: &Expr, pos: Pos) -> GenResult<RealData> {
        let i32_name = self.interner.intern("i32");
        let code = |value| {
            Box::new(Expr::new(
                ExprKind::Cast {
                    expr: Box::new(Expr::int(value, pos)),
                    ty: TypeExpr::named(i32_name, pos),
                },
                pos,
            ))
        };
        let lowered = Expr::new(
            ExprKind::InlineIf {
                cond: Box::new(cond.clone()),
                then: code(0),
                otherwise: code(1),
            },
            pos,
        );
        self.eval_expr(&lowered, None)
    }

    /// A fat pointer over `[piece, arg, piece, .., piece]`, all `String`.
    fn eval_fmt(&mut self, call: &Call) -> GenResult<RealData> {
        let (literal, args) = (&call.args[0], &call.args[1..]);
        let pieces = split_fmt(literal_str(literal)?);
        let holes = pieces.len() - 1;
        if holes != args.len() {
            return Err(GenError::new(
                ErrorCode::ArityMismatch,
                format!("fmt literal wants `{holes}` arguments, got `{}`", args.len()),
                literal.pos,
            ));
        }

        let mut values = Vec::with_capacity(pieces.len() + holes);
        for (i, piece) in pieces.iter().enumerate() {
            values.push(self.eval_str(piece).value);
            if let Some(arg) = args.get(i) {
                let data = self.eval_expr(arg, Some(TypeId::STRING))?;
                self.expect_type(TypeId::STRING, &data, arg.pos)?;
                values.push(data.value);
            }
        }

        let len = values.len() as u64;
        let array_ty = self.pool.array(len, TypeId::STRING);
        let array = self.build_aggregate(array_ty, values);
        let slot = self.alloca(array_ty);
        self.builder().emit_store(slot.into(), array.value);

        let ty = self.pool.fat_pointer(false, TypeId::STRING);
        let len = Const::Int {
            ty: TypeId::U64,
            value: i128::from(len),
        };
        let builder = self.builder();
        let with_ptr = builder.emit_insert_value(ty, Const::Undef { ty }.into(), slot.into(), 0);
        let value = builder.emit_insert_value(ty, with_ptr.into(), len.into(), 1);
        Ok(RealData::runtime(ty, value))
    }
}

fn check_arity(call: &Call, name: &str, arity: &Arity, pos: Pos) -> GenResult<()> {
    if !arity.generics.contains(&call.generics.len()) {
        return Err(error::unexpected_count(
            &format!("generic args to `{name}!`"),
            call.generics.len(),
            pos,
        ));
    }
    if !arity.args.contains(&call.args.len()) {
        return Err(error::unexpected_count(
            &format!("args to `{name}!`"),
            call.args.len(),
            pos,
        ));
    }
    Ok(())
}

fn literal_str(expr: &Expr) -> GenResult<&str> {
    match &expr.kind {
        ExprKind::Str(text) => Ok(text),
        _ => Err(error::expected_literal_str(expr.pos)),
    }
}

fn push_custom_message(message: &mut String, custom: &str) {
    message.push_str(": '");
    message.push_str(&custom.replace('\'', "\\'"));
    message.push('\'');
}

/// Split a format literal at each `%`; `%%` stands for a literal `%`.
fn split_fmt(text: &str) -> Vec<String> {
    let mut pieces = vec![String::new()];
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '%' && chars.next_if_eq(&'%').is_none() {
            pieces.push(String::new());
        } else if let Some(last) = pieces.last_mut() {
            last.push(c);
        }
    }
    pieces
}

#[cfg(test)]
mod tests;
