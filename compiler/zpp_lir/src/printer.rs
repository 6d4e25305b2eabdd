//! LLVM-flavoured text rendering of a [`Module`].
//!
//! Pointers print as the opaque `ptr`, unions as a byte array of their
//! size, and floating-point constants in LLVM's hexadecimal double form.

use std::fmt::{self, Write};

use zpp_types::{TypeId, TypeKind, TypePool};

use crate::{
    Block, BlockId, Callee, Const, Function, Global, GlobalInit, Instr, Linkage, Module, Operand,
    Terminator,
};

pub struct ModuleDisplay<'a> {
    module: &'a Module,
    pool: &'a TypePool,
}

impl Module {
    pub fn display<'a>(&'a self, pool: &'a TypePool) -> ModuleDisplay<'a> {
        ModuleDisplay { module: self, pool }
    }
}

impl fmt::Display for ModuleDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "; ModuleID = '{}'", self.module.name)?;
        for lib in &self.module.libs {
            writeln!(f, "; link: {}", lib.display())?;
        }
        for global in &self.module.globals {
            self.global(f, global)?;
        }
        for func in &self.module.functions {
            writeln!(f)?;
            self.function(f, func)?;
        }
        Ok(())
    }
}

impl ModuleDisplay<'_> {
    fn ty(&self, id: TypeId) -> String {
        let mut out = String::new();
        self.write_ty(&mut out, id);
        out
    }

    fn write_ty(&self, out: &mut String, id: TypeId) {
        match self.pool.kind(id) {
            TypeKind::Int { bits, .. } => {
                let _ = write!(out, "i{bits}");
            }
            TypeKind::Float { bits: 32 } => out.push_str("float"),
            TypeKind::Float { .. } => out.push_str("double"),
            TypeKind::Void => out.push_str("void"),
            TypeKind::Ptr { .. } | TypeKind::Fn { .. } => out.push_str("ptr"),
            TypeKind::Array { len, elem } => {
                let _ = write!(out, "[{len} x ");
                self.write_ty(out, *elem);
                out.push(']');
            }
            TypeKind::Struct { fields } => {
                out.push_str("{ ");
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    self.write_ty(out, field.ty);
                }
                out.push_str(" }");
            }
            TypeKind::Union { .. } => {
                let _ = write!(out, "[{} x i8]", self.pool.size_of(id));
            }
            TypeKind::Placeholder => out.push_str("i8"),
        }
    }

    fn constant(&self, c: &Const) -> String {
        match c {
            Const::Int { value, .. } => value.to_string(),
            Const::Float { ty, value } => {
                let widened = if *ty == TypeId::F32 {
                    #[expect(
                        clippy::cast_possible_truncation,
                        reason = "f32 constants are rounded to their storage width"
                    )]
                    let narrowed = *value as f32;
                    f64::from(narrowed)
                } else {
                    *value
                };
                format!("0x{:016X}", widened.to_bits())
            }
            Const::Null { ty } => {
                if self.pool.is_ptr(*ty) {
                    "null".to_string()
                } else if self.pool.is_float(*ty) {
                    "0.0".to_string()
                } else {
                    "0".to_string()
                }
            }
            Const::Undef { .. } => "undef".to_string(),
            Const::Zero { .. } => "zeroinitializer".to_string(),
            Const::Struct { fields, .. } => {
                let parts: Vec<String> = fields.iter().map(|c| self.typed_const(c)).collect();
                format!("{{ {} }}", parts.join(", "))
            }
            Const::Array { elems, .. } => {
                let parts: Vec<String> = elems.iter().map(|c| self.typed_const(c)).collect();
                format!("[{}]", parts.join(", "))
            }
            Const::Global(g) => symbol(&self.module.global(*g).name),
            Const::Func(func) => symbol(&self.module.function(*func).name),
        }
    }

    fn typed_const(&self, c: &Const) -> String {
        format!("{} {}", self.ty(c.ty()), self.constant(c))
    }

    fn operand(&self, op: &Operand) -> String {
        match op {
            Operand::Value(v) => format!("%{}", v.raw()),
            Operand::Const(c) => self.constant(c),
            Operand::Void => "void".to_string(),
        }
    }

    fn typed(&self, func: &Function, op: &Operand) -> String {
        let ty = match op {
            Operand::Value(v) => func.value_type(*v),
            Operand::Const(c) => c.ty(),
            Operand::Void => TypeId::VOID,
        };
        format!("{} {}", self.ty(ty), self.operand(op))
    }

    fn global(&self, f: &mut fmt::Formatter<'_>, global: &Global) -> fmt::Result {
        let name = symbol(&global.name);
        let kind = if global.constant {
            "constant"
        } else {
            "global"
        };
        match &global.init {
            GlobalInit::External => {
                writeln!(f, "{name} = external global {}", self.ty(global.ty))
            }
            GlobalInit::Bytes(bytes) => {
                let mut text = String::new();
                for &b in bytes {
                    if (b.is_ascii_graphic() && b != b'"' && b != b'\\') || b == b' ' {
                        text.push(char::from(b));
                    } else {
                        let _ = write!(text, "\\{b:02X}");
                    }
                }
                writeln!(
                    f,
                    "{name} = private unnamed_addr {kind} [{} x i8] c\"{text}\"",
                    bytes.len()
                )
            }
            GlobalInit::Const(c) => {
                let linkage = linkage_prefix(global.linkage);
                writeln!(
                    f,
                    "{name} = {linkage}{kind} {} {}",
                    self.ty(global.ty),
                    self.constant(c)
                )
            }
        }
    }

    fn function(&self, f: &mut fmt::Formatter<'_>, func: &Function) -> fmt::Result {
        let name = symbol(&func.name);
        let ret = self.ty(func.ret);
        if func.is_declaration() {
            let params: Vec<String> = func.params.iter().map(|&p| self.ty(p)).collect();
            return writeln!(f, "declare {ret} {name}({})", params.join(", "));
        }

        let params: Vec<String> = func
            .params
            .iter()
            .enumerate()
            .map(|(i, &p)| format!("{} %{i}", self.ty(p)))
            .collect();
        writeln!(
            f,
            "define {}{ret} {name}({}) {{",
            linkage_prefix(func.linkage),
            params.join(", ")
        )?;
        for block in &func.blocks {
            self.block(f, func, block)?;
        }
        writeln!(f, "}}")
    }

    fn block(&self, f: &mut fmt::Formatter<'_>, func: &Function, block: &Block) -> fmt::Result {
        writeln!(f, "{}:", block.label)?;
        for instr in &block.instrs {
            writeln!(f, "  {}", self.instr(func, instr))?;
        }
        writeln!(f, "  {}", self.terminator(func, &block.terminator))
    }

    fn label(func: &Function, id: BlockId) -> String {
        func.block(id)
            .map_or_else(|| format!("%bb{}", id.raw()), |b| format!("%{}", b.label))
    }

    fn instr(&self, func: &Function, instr: &Instr) -> String {
        match instr {
            Instr::Alloca { dst, ty } => format!("%{} = alloca {}", dst.raw(), self.ty(*ty)),
            Instr::Load { dst, ty, ptr } => format!(
                "%{} = load {}, {}",
                dst.raw(),
                self.ty(*ty),
                self.typed(func, ptr)
            ),
            Instr::Store { ptr, value } => format!(
                "store {}, {}",
                self.typed(func, value),
                self.typed(func, ptr)
            ),
            Instr::Binary {
                dst,
                op,
                ty,
                lhs,
                rhs,
            } => format!(
                "%{} = {} {} {}, {}",
                dst.raw(),
                op.mnemonic(),
                self.ty(*ty),
                self.operand(lhs),
                self.operand(rhs)
            ),
            Instr::Cmp {
                dst,
                pred,
                lhs,
                rhs,
            } => format!(
                "%{} = {} {} {}, {}",
                dst.raw(),
                if pred.is_float() { "fcmp" } else { "icmp" },
                pred.mnemonic(),
                self.typed(func, lhs),
                self.operand(rhs)
            ),
            Instr::Cast { dst, op, value, to } => format!(
                "%{} = {} {} to {}",
                dst.raw(),
                op.mnemonic(),
                self.typed(func, value),
                self.ty(*to)
            ),
            Instr::ElementPtr {
                dst,
                source_ty,
                base,
                indices,
            } => {
                let mut text = format!(
                    "%{} = getelementptr inbounds {}, {}",
                    dst.raw(),
                    self.ty(*source_ty),
                    self.typed(func, base)
                );
                for index in indices {
                    let _ = write!(text, ", {}", self.typed(func, index));
                }
                text
            }
            Instr::ExtractValue { dst, agg, index } => format!(
                "%{} = extractvalue {}, {index}",
                dst.raw(),
                self.typed(func, agg)
            ),
            Instr::InsertValue {
                dst,
                agg,
                value,
                index,
            } => format!(
                "%{} = insertvalue {}, {}, {index}",
                dst.raw(),
                self.typed(func, agg),
                self.typed(func, value)
            ),
            Instr::Call {
                dst,
                ret,
                callee,
                args,
            } => {
                let args: Vec<String> = args.iter().map(|a| self.typed(func, a)).collect();
                let target = match callee {
                    Callee::Direct(id) => symbol(&self.module.function(*id).name),
                    Callee::Indirect { ptr, .. } => self.operand(ptr),
                };
                let call = format!("call {} {target}({})", self.ty(*ret), args.join(", "));
                match dst {
                    Some(dst) => format!("%{} = {call}", dst.raw()),
                    None => call,
                }
            }
            Instr::Phi { dst, ty, incoming } => {
                let arms: Vec<String> = incoming
                    .iter()
                    .map(|(v, b)| format!("[ {}, {} ]", self.operand(v), Self::label(func, *b)))
                    .collect();
                format!("%{} = phi {} {}", dst.raw(), self.ty(*ty), arms.join(", "))
            }
        }
    }

    fn terminator(&self, func: &Function, term: &Terminator) -> String {
        match term {
            Terminator::Return(None) => "ret void".to_string(),
            Terminator::Return(Some(value)) => format!("ret {}", self.typed(func, value)),
            Terminator::Jump(target) => format!("br label {}", Self::label(func, *target)),
            Terminator::Branch {
                cond,
                then_block,
                else_block,
            } => format!(
                "br {}, label {}, label {}",
                self.typed(func, cond),
                Self::label(func, *then_block),
                Self::label(func, *else_block)
            ),
            Terminator::Unreachable => "unreachable".to_string(),
        }
    }
}

fn symbol(name: &str) -> String {
    if name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.')
    {
        format!("@{name}")
    } else {
        format!("@\"{name}\"")
    }
}

fn linkage_prefix(linkage: Linkage) -> &'static str {
    match linkage {
        Linkage::Private => "private ",
        Linkage::External => "",
    }
}

#[cfg(test)]
mod tests;
