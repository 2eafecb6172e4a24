//! Expression lowering (§4.3, §4.5). Every helper here leaves its result in
//! `%rax`: a raw value for numeric/char/boolean, a pointer for text/array/
//! struct. Binary/concat operators fuse around a single push/pop of the left
//! operand (§9: "the left operand is evaluated first and pushed; the right
//! operand's evaluation can freely clobber `%rax`/`%rbx`/`%rcx`/`%rdx`").

use crate::asm::{InstructionOperand as Op, InstructionSize::*, *};
use crate::ast::{
    ArrayAccess, BinaryOp, BinaryVerb, Expression, FnCall, FormatSpec, Ident, MemberAccess,
    StringConcat, StringInterpolation, StructLiteral, Type, UnaryOp, UnaryVerb,
};

use super::scope::Slot;
use super::CodegenError;

impl<'a> super::Codegen<'a> {
    pub(super) fn gen_expr(&mut self, expr: &Expression) -> Result<Vec<Instruction>, CodegenError> {
        match expr {
            Expression::Numeric(n) => Ok(vec![Instruction::Mov(
                Qword,
                Op::Register(Reg::Rax),
                Op::Immediate(n.value),
            )]),
            Expression::Char(c) => Ok(vec![Instruction::Mov(
                Qword,
                Op::Register(Reg::Rax),
                Op::Immediate(c.value as i64),
            )]),
            Expression::Boolean(b) => Ok(vec![Instruction::Mov(
                Qword,
                Op::Register(Reg::Rax),
                Op::Immediate(if b.value { 1 } else { 0 }),
            )]),
            Expression::Null(_) => Ok(vec![Instruction::Mov(
                Qword,
                Op::Register(Reg::Rax),
                Op::Immediate(0),
            )]),
            Expression::Text(t) => {
                let label = self.pool.intern(&t.value);
                Ok(vec![Instruction::Leaq(
                    Op::Register(Reg::Rax),
                    Op::RipRelative(label),
                )])
            }
            Expression::Ident(ident) => self.gen_ident(ident),
            Expression::Binary(op) => self.gen_binary(op),
            Expression::Unary(op) => self.gen_unary(op),
            Expression::Call(call) => self.gen_call(call),
            Expression::Concat(concat) => self.gen_concat(concat),
            Expression::Interpolation(interp) => self.gen_interpolation(interp),
            Expression::ArrayLiteral(lit) => {
                let base = self.frame.alloc((lit.elements.len() as i64) * 8);
                let mut code = vec![];
                for (i, element) in lit.elements.iter().enumerate() {
                    code.extend(self.gen_expr(element)?);
                    code.push(Instruction::Mov(
                        Qword,
                        Op::Stack(base + (i as i64) * 8),
                        Op::Register(Reg::Rax),
                    ));
                }
                code.push(Instruction::Leaq(Op::Register(Reg::Rax), Op::Stack(base)));
                Ok(code)
            }
            Expression::ArrayAccess(access) => {
                let mut code = self.gen_array_element_address(access)?;
                code.push(Instruction::Mov(Qword, Op::Register(Reg::Rbx), Op::Register(Reg::Rax)));
                code.push(Instruction::Mov(Qword, Op::Register(Reg::Rax), Op::Indirect(Reg::Rbx)));
                Ok(code)
            }
            Expression::MemberAccess(access) => {
                let mut code = self.gen_member_address(access)?;
                code.push(Instruction::Mov(Qword, Op::Register(Reg::Rbx), Op::Register(Reg::Rax)));
                code.push(Instruction::Mov(Qword, Op::Register(Reg::Rax), Op::Indirect(Reg::Rbx)));
                Ok(code)
            }
            Expression::StructLiteral(lit) => self.gen_struct_literal(lit),
        }
    }

    fn gen_ident(&mut self, ident: &Ident) -> Result<Vec<Instruction>, CodegenError> {
        match self.frame.lookup(&ident.name) {
            Some(Slot::Stack { base, size, .. }) => {
                let base = *base;
                Ok(match size {
                    InstructionSize::Byte => vec![Instruction::Movzbq(
                        Op::Register(Reg::Rax),
                        Op::Stack(base),
                    )],
                    InstructionSize::Qword => vec![Instruction::Mov(
                        Qword,
                        Op::Register(Reg::Rax),
                        Op::Stack(base),
                    )],
                })
            }
            Some(Slot::Const(value)) => Ok(self.gen_const_value(value)),
            None => Err(CodegenError::new(format!(
                "undefined variable '{}'",
                ident.name
            ))),
        }
    }

    fn gen_const_value(&mut self, value: &crate::ast::ConstValue) -> Vec<Instruction> {
        use crate::ast::ConstValue;
        match value {
            ConstValue::Numeric(n) => vec![Instruction::Mov(Qword, Op::Register(Reg::Rax), Op::Immediate(*n))],
            ConstValue::Char(c) => vec![Instruction::Mov(
                Qword,
                Op::Register(Reg::Rax),
                Op::Immediate(*c as i64),
            )],
            ConstValue::Boolean(b) => vec![Instruction::Mov(
                Qword,
                Op::Register(Reg::Rax),
                Op::Immediate(if *b { 1 } else { 0 }),
            )],
            ConstValue::Text(s) => {
                let label = self.pool.intern(s);
                vec![Instruction::Leaq(Op::Register(Reg::Rax), Op::RipRelative(label))]
            }
        }
    }

    fn gen_binary(&mut self, op: &BinaryOp) -> Result<Vec<Instruction>, CodegenError> {
        let mut code = self.gen_expr(&op.lhs)?;
        code.push(Instruction::Push(Reg::Rax));
        code.extend(self.gen_expr(&op.rhs)?);
        code.push(Instruction::Pop(Reg::Rbx));
        // Invariant for every arm below: %rbx = lhs, %rax = rhs.
        match op.verb {
            BinaryVerb::Add => code.push(Instruction::Add(Qword, Op::Register(Reg::Rax), Op::Register(Reg::Rbx))),
            BinaryVerb::Sub => {
                code.push(Instruction::Sub(Qword, Op::Register(Reg::Rbx), Op::Register(Reg::Rax)));
                code.push(Instruction::Mov(Qword, Op::Register(Reg::Rax), Op::Register(Reg::Rbx)));
            }
            BinaryVerb::Mul => code.push(Instruction::Imul(Op::Register(Reg::Rax), Op::Register(Reg::Rbx))),
            BinaryVerb::Div | BinaryVerb::Mod => {
                code.push(Instruction::Mov(Qword, Op::Register(Reg::Rcx), Op::Register(Reg::Rax)));
                code.push(Instruction::Mov(Qword, Op::Register(Reg::Rax), Op::Register(Reg::Rbx)));
                code.push(Instruction::Cqto);
                code.push(Instruction::Idiv(Op::Register(Reg::Rcx)));
                if op.verb == BinaryVerb::Mod {
                    code.push(Instruction::Mov(Qword, Op::Register(Reg::Rax), Op::Register(Reg::Rdx)));
                }
            }
            BinaryVerb::Eq | BinaryVerb::Neq | BinaryVerb::Lt | BinaryVerb::Gt | BinaryVerb::Le | BinaryVerb::Ge => {
                code.push(Instruction::Cmp(Qword, Op::Register(Reg::Rbx), Op::Register(Reg::Rax)));
                code.push(match op.verb {
                    BinaryVerb::Eq => Instruction::Sete(Op::RegisterByte(Reg::Rax)),
                    BinaryVerb::Neq => Instruction::Setne(Op::RegisterByte(Reg::Rax)),
                    BinaryVerb::Lt => Instruction::Setl(Op::RegisterByte(Reg::Rax)),
                    BinaryVerb::Gt => Instruction::Setg(Op::RegisterByte(Reg::Rax)),
                    BinaryVerb::Le => Instruction::Setle(Op::RegisterByte(Reg::Rax)),
                    BinaryVerb::Ge => Instruction::Setge(Op::RegisterByte(Reg::Rax)),
                    _ => unreachable!(),
                });
                code.push(Instruction::Movzbq(Op::Register(Reg::Rax), Op::RegisterByte(Reg::Rax)));
            }
            BinaryVerb::And => code.push(Instruction::And(Op::Register(Reg::Rax), Op::Register(Reg::Rbx))),
            BinaryVerb::Or => code.push(Instruction::Or(Op::Register(Reg::Rax), Op::Register(Reg::Rbx))),
        }
        Ok(code)
    }

    fn gen_unary(&mut self, op: &UnaryOp) -> Result<Vec<Instruction>, CodegenError> {
        let mut code = self.gen_expr(&op.operand)?;
        match op.verb {
            UnaryVerb::Neg => code.push(Instruction::Neg(Op::Register(Reg::Rax))),
            UnaryVerb::Pos => {}
            UnaryVerb::Not => code.push(Instruction::Xor(Op::Register(Reg::Rax), Op::Immediate(1))),
        }
        Ok(code)
    }

    /// Converts whatever is currently in `%rax` to a text pointer, per the
    /// static type `ty` (§9: the analyzer's type information replaces the
    /// original `print_value_auto` heuristic at every call site where a type
    /// is actually known).
    fn gen_stringify(&self, ty: Option<&Type>) -> Vec<Instruction> {
        match ty {
            Some(Type::Numeric { .. }) => vec![
                Instruction::Mov(Qword, Op::Register(Reg::Rdi), Op::Register(Reg::Rax)),
                Instruction::Call("num_to_string".to_string()),
            ],
            Some(Type::Char { .. }) => vec![
                Instruction::Mov(Qword, Op::Register(Reg::Rdi), Op::Register(Reg::Rax)),
                Instruction::Call("char_to_string".to_string()),
            ],
            Some(Type::Boolean { .. }) => vec![
                Instruction::Mov(Qword, Op::Register(Reg::Rdi), Op::Register(Reg::Rax)),
                Instruction::Call("bool_to_string".to_string()),
            ],
            // Text is already a pointer; everything else falls back to the
            // heuristic dispatcher.
            Some(Type::Text { .. }) => vec![],
            _ => vec![
                Instruction::Mov(Qword, Op::Register(Reg::Rdi), Op::Register(Reg::Rax)),
                Instruction::Call("print_value_auto".to_string()),
            ],
        }
    }

    /// `print[x]` (§4.5): the emitter already knows `x`'s static type, so it
    /// dispatches to the matching converter directly instead of guessing at
    /// runtime.
    pub(super) fn gen_print(&mut self, arg: &Expression) -> Result<Vec<Instruction>, CodegenError> {
        let mut code = self.gen_expr(arg)?;
        let ty = arg.ty().cloned();
        if matches!(ty, Some(Type::Void) | Some(Type::Null) | Some(Type::Array { .. }) | Some(Type::Struct { .. }) | Some(Type::Function { .. })) {
            code.push(Instruction::Mov(Qword, Op::Register(Reg::Rdi), Op::Register(Reg::Rax)));
            code.push(Instruction::Call("print_value_auto".to_string()));
            return Ok(code);
        }
        code.extend(self.gen_stringify(ty.as_ref()));
        code.push(Instruction::Mov(Qword, Op::Register(Reg::Rdi), Op::Register(Reg::Rax)));
        code.push(Instruction::Call("print_string".to_string()));
        Ok(code)
    }

    fn gen_read(&mut self, prompt: Option<&Expression>) -> Result<Vec<Instruction>, CodegenError> {
        let mut code = vec![];
        if let Some(prompt) = prompt {
            code.extend(self.gen_expr(prompt)?);
            code.push(Instruction::Mov(Qword, Op::Register(Reg::Rdi), Op::Register(Reg::Rax)));
            code.push(Instruction::Call("print_string".to_string()));
        }
        code.push(Instruction::Call("read_string".to_string()));
        Ok(code)
    }

    fn gen_typed_read(
        &mut self,
        prompt: Option<&Expression>,
        converter: &str,
    ) -> Result<Vec<Instruction>, CodegenError> {
        let mut code = self.gen_read(prompt)?;
        code.push(Instruction::Mov(Qword, Op::Register(Reg::Rdi), Op::Register(Reg::Rax)));
        code.push(Instruction::Call(converter.to_string()));
        Ok(code)
    }

    fn gen_call(&mut self, call: &FnCall) -> Result<Vec<Instruction>, CodegenError> {
        match call.callee.as_str() {
            "print" => self.gen_print(&call.args[0]),
            "read" => self.gen_read(call.args.first()),
            "num.read" => self.gen_typed_read(call.args.first(), "string_to_num"),
            "text.read" => self.gen_read(call.args.first()),
            "char.read" => self.gen_typed_read(call.args.first(), "string_to_char"),
            "bool.read" => self.gen_typed_read(call.args.first(), "string_to_bool"),
            other => self.gen_user_call(other, &call.args),
        }
    }

    /// Calling convention (§4.5): the first six arguments go in
    /// `%rdi, %rsi, %rdx, %rcx, %r8, %r9`; any further argument is pushed so
    /// it lands at `16 + (i - 6) * 8` off the callee's `%rbp`. Register
    /// arguments are evaluated into temporary pushes first and popped back
    /// in reverse so evaluating argument `k+1` can never clobber argument
    /// `k`'s already-computed value.
    fn gen_user_call(&mut self, name: &str, args: &[Expression]) -> Result<Vec<Instruction>, CodegenError> {
        let mut code = vec![];
        let register_argc = args.len().min(Reg::ARGS.len());

        for i in (Reg::ARGS.len()..args.len()).rev() {
            code.extend(self.gen_expr(&args[i])?);
            code.push(Instruction::Push(Reg::Rax));
        }

        for arg in &args[..register_argc] {
            code.extend(self.gen_expr(arg)?);
            code.push(Instruction::Push(Reg::Rax));
        }
        for i in (0..register_argc).rev() {
            code.push(Instruction::Pop(Reg::ARGS[i]));
        }

        code.push(Instruction::Call(name.to_string()));
        Ok(code)
    }

    fn gen_concat(&mut self, concat: &StringConcat) -> Result<Vec<Instruction>, CodegenError> {
        let mut code = self.gen_expr(&concat.lhs)?;
        code.extend(self.gen_stringify(concat.lhs.ty()));
        code.push(Instruction::Push(Reg::Rax));
        code.extend(self.gen_expr(&concat.rhs)?);
        code.extend(self.gen_stringify(concat.rhs.ty()));
        code.push(Instruction::Mov(Qword, Op::Register(Reg::Rsi), Op::Register(Reg::Rax)));
        code.push(Instruction::Pop(Reg::Rdi));
        code.push(Instruction::Call("string_concat".to_string()));
        Ok(code)
    }

    /// `${expr:fmt}` interpolation (§4.5): builds the descriptor
    /// `[expr_count, parts_count, parts[..], (value, format)[..]]` in a
    /// scratch stack region and hands its address to `string_interpolate`.
    fn gen_interpolation(&mut self, interp: &StringInterpolation) -> Result<Vec<Instruction>, CodegenError> {
        let k = interp.exprs.len();
        let cell_count = 2 + (k + 1) + 2 * k;
        let base = self.frame.alloc((cell_count as i64) * 8);

        let mut code = vec![
            Instruction::Mov(Qword, Op::Stack(base), Op::Immediate(k as i64)),
            Instruction::Mov(Qword, Op::Stack(base + 8), Op::Immediate((k + 1) as i64)),
        ];

        for (i, part) in interp.parts.iter().enumerate() {
            let label = self.pool.intern(part);
            code.push(Instruction::Leaq(Op::Register(Reg::Rax), Op::RipRelative(label)));
            code.push(Instruction::Mov(
                Qword,
                Op::Stack(base + 16 + (i as i64) * 8),
                Op::Register(Reg::Rax),
            ));
        }

        let pairs_base = base + 16 + ((k + 1) as i64) * 8;
        for (i, (value_expr, format)) in interp.exprs.iter().zip(interp.formats.iter()).enumerate() {
            code.extend(self.gen_expr(value_expr)?);
            code.push(Instruction::Mov(
                Qword,
                Op::Stack(pairs_base + (i as i64) * 16),
                Op::Register(Reg::Rax),
            ));
            let tag = match format {
                FormatSpec::Empty => 0,
                FormatSpec::Decimal => 1,
                FormatSpec::Float => 2,
                FormatSpec::Str => 3,
            };
            code.push(Instruction::Mov(
                Qword,
                Op::Stack(pairs_base + (i as i64) * 16 + 8),
                Op::Immediate(tag),
            ));
        }

        code.push(Instruction::Leaq(Op::Register(Reg::Rdi), Op::Stack(base)));
        code.push(Instruction::Call("string_interpolate".to_string()));
        Ok(code)
    }

    fn gen_struct_literal(&mut self, lit: &StructLiteral) -> Result<Vec<Instruction>, CodegenError> {
        let fields = self
            .registry
            .fields(&lit.type_name)
            .ok_or_else(|| CodegenError::new(format!("unknown struct '{}'", lit.type_name)))?
            .clone();
        let base = self.frame.alloc((fields.len() as i64) * 8);
        let mut code = vec![];
        for field in &fields {
            let (_, value) = lit
                .fields
                .iter()
                .find(|(name, _)| name == &field.name)
                .ok_or_else(|| {
                    CodegenError::new(format!(
                        "struct literal for '{}' is missing field '{}'",
                        lit.type_name, field.name
                    ))
                })?;
            let offset = fields.iter().position(|f| f.name == field.name).unwrap() as i64 * 8;
            code.extend(self.gen_expr(value)?);
            code.push(Instruction::Mov(Qword, Op::Stack(base + offset), Op::Register(Reg::Rax)));
        }
        code.push(Instruction::Leaq(Op::Register(Reg::Rax), Op::Stack(base)));
        Ok(code)
    }

    /// Leaves the absolute address of `access`'s element in `%rax`.
    pub(super) fn gen_array_element_address(
        &mut self,
        access: &ArrayAccess,
    ) -> Result<Vec<Instruction>, CodegenError> {
        let base = match self.frame.lookup(&access.target.name) {
            Some(Slot::Stack { base, .. }) => *base,
            Some(Slot::Const(_)) => {
                return Err(CodegenError::new(format!(
                    "cannot index into compile-time constant '{}'",
                    access.target.name
                )))
            }
            None => {
                return Err(CodegenError::new(format!(
                    "undefined variable '{}'",
                    access.target.name
                )))
            }
        };
        let mut code = self.gen_expr(&access.index)?;
        code.push(Instruction::Imul(Op::Register(Reg::Rax), Op::Immediate(8)));
        code.push(Instruction::Leaq(Op::Register(Reg::Rbx), Op::Stack(base)));
        code.push(Instruction::Add(Qword, Op::Register(Reg::Rax), Op::Register(Reg::Rbx)));
        Ok(code)
    }

    /// Leaves the absolute address of `access`'s field in `%rax`.
    pub(super) fn gen_member_address(&mut self, access: &MemberAccess) -> Result<Vec<Instruction>, CodegenError> {
        let struct_name = match access.target.ty() {
            Some(Type::Struct { name, .. }) => name.clone(),
            other => {
                return Err(CodegenError::new(format!(
                    "member access target has non-struct type {other:?}"
                )))
            }
        };
        let offset = self
            .registry
            .fields(&struct_name)
            .and_then(|fields| fields.iter().position(|f| f.name == access.field))
            .ok_or_else(|| {
                CodegenError::new(format!("struct '{struct_name}' has no field '{}'", access.field))
            })? as i64
            * 8;

        let mut code = self.gen_place_address(&access.target)?;
        code.push(Instruction::Add(Qword, Op::Register(Reg::Rax), Op::Immediate(offset)));
        Ok(code)
    }

    /// Leaves the absolute address of the place `expr` denotes in `%rax`.
    /// Used when a struct/array lives nested inside another place, e.g.
    /// `a->b->c` or `a[i]->x`.
    pub(super) fn gen_place_address(&mut self, expr: &Expression) -> Result<Vec<Instruction>, CodegenError> {
        match expr {
            Expression::Ident(ident) => match self.frame.lookup(&ident.name) {
                Some(Slot::Stack { base, .. }) => Ok(vec![Instruction::Leaq(Op::Register(Reg::Rax), Op::Stack(*base))]),
                Some(Slot::Const(_)) => Err(CodegenError::new(format!(
                    "cannot take the address of compile-time constant '{}'",
                    ident.name
                ))),
                None => Err(CodegenError::new(format!("undefined variable '{}'", ident.name))),
            },
            Expression::MemberAccess(access) => self.gen_member_address(access),
            Expression::ArrayAccess(access) => self.gen_array_element_address(access),
            other => Err(CodegenError::new(format!(
                "expression {other:?} does not denote an addressable place"
            ))),
        }
    }
}
