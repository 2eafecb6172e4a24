//! Statement and control-flow lowering (§4.4, §4.5, §9).
//!
//! Every `if` arm, including `else if` arms, is lowered into a chain of
//! conditional branches that always terminates at one shared end label, so
//! every arm is reachable.

use crate::asm::{InstructionOperand as Op, InstructionSize::*, *};
use crate::ast::{
    ArrayAssignment, ArrayLiteral, Assignment, Block, Declaration, Expression, ForStatement,
    IfStatement, MemberAssignment, RepeatStatement, ReturnStatement, Statement, StructLiteral,
    TryStatement, Type,
};

use super::CodegenError;

impl<'a> super::Codegen<'a> {
    pub(super) fn gen_block(&mut self, block: &Block) -> Result<Vec<Instruction>, CodegenError> {
        let mut code = vec![];
        for stmt in &block.statements {
            code.extend(self.gen_statement(stmt)?);
        }
        Ok(code)
    }

    fn gen_statement(&mut self, stmt: &Statement) -> Result<Vec<Instruction>, CodegenError> {
        match stmt {
            Statement::Declaration(decl) => self.gen_declaration(decl),
            Statement::Assignment(assign) => self.gen_assignment(assign),
            Statement::ArrayAssignment(assign) => self.gen_array_assignment(assign),
            Statement::MemberAssignment(assign) => self.gen_member_assignment(assign),
            Statement::If(s) => self.gen_if(s),
            Statement::For(s) => self.gen_for(s),
            Statement::Try(s) => self.gen_try(s),
            Statement::Repeat(s) => self.gen_repeat(s),
            Statement::Return(s) => self.gen_return(s),
            Statement::Expression(expr) => self.gen_expr(expr),
            Statement::Block(block) => {
                self.frame.push_scope();
                let code = self.gen_block(block);
                self.frame.pop_scope();
                code
            }
        }
    }

    /// `Type name = value;` (§4.3): a compile-time-constant `val` never
    /// touches the stack — it is referenced as an immediate/label at every
    /// use site instead (§9). Everything else, including a non-foldable
    /// `val`, gets a stack slot so it has somewhere to live.
    fn gen_declaration(&mut self, decl: &Declaration) -> Result<Vec<Instruction>, CodegenError> {
        if let Some(value) = &decl.folded_value {
            self.frame.declare_const(decl.name.clone(), value.clone());
            return Ok(vec![]);
        }

        match (&decl.type_annotation, &decl.initializer) {
            (Type::Array { .. }, Some(Expression::ArrayLiteral(lit))) => {
                self.gen_array_declaration(decl, lit)
            }
            (Type::Struct { .. }, Some(Expression::StructLiteral(lit))) => {
                self.gen_struct_declaration(decl, lit)
            }
            _ => {
                let base = self.frame.alloc(8);
                let size = InstructionSize::from(&decl.type_annotation);
                let mut code = vec![];
                if let Some(init) = &decl.initializer {
                    code.extend(self.gen_expr(init)?);
                    code.push(match size {
                        InstructionSize::Byte => {
                            Instruction::Mov(Byte, Op::Stack(base), Op::RegisterByte(Reg::Rax))
                        }
                        InstructionSize::Qword => {
                            Instruction::Mov(Qword, Op::Stack(base), Op::Register(Reg::Rax))
                        }
                    });
                }
                self.frame
                    .declare_stack(decl.name.clone(), base, decl.type_annotation.clone());
                Ok(code)
            }
        }
    }

    fn gen_array_declaration(
        &mut self,
        decl: &Declaration,
        lit: &ArrayLiteral,
    ) -> Result<Vec<Instruction>, CodegenError> {
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
        self.frame
            .declare_stack(decl.name.clone(), base, decl.type_annotation.clone());
        Ok(code)
    }

    fn gen_struct_declaration(
        &mut self,
        decl: &Declaration,
        lit: &StructLiteral,
    ) -> Result<Vec<Instruction>, CodegenError> {
        let fields = self
            .registry
            .fields(&lit.type_name)
            .ok_or_else(|| CodegenError::new(format!("unknown struct '{}'", lit.type_name)))?
            .clone();
        let base = self.frame.alloc((fields.len() as i64) * 8);
        let mut code = vec![];
        for (i, field) in fields.iter().enumerate() {
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
            code.extend(self.gen_expr(value)?);
            code.push(Instruction::Mov(
                Qword,
                Op::Stack(base + (i as i64) * 8),
                Op::Register(Reg::Rax),
            ));
        }
        self.frame
            .declare_stack(decl.name.clone(), base, decl.type_annotation.clone());
        Ok(code)
    }

    fn gen_assignment(&mut self, assign: &Assignment) -> Result<Vec<Instruction>, CodegenError> {
        let (base, size) = match self.frame.lookup(&assign.name) {
            Some(super::scope::Slot::Stack { base, size, .. }) => (*base, *size),
            Some(super::scope::Slot::Const(_)) => {
                return Err(CodegenError::new(format!(
                    "cannot assign to compile-time constant '{}'",
                    assign.name
                )))
            }
            None => return Err(CodegenError::new(format!("undefined variable '{}'", assign.name))),
        };
        let mut code = self.gen_expr(&assign.value)?;
        code.push(match size {
            InstructionSize::Byte => Instruction::Mov(Byte, Op::Stack(base), Op::RegisterByte(Reg::Rax)),
            InstructionSize::Qword => Instruction::Mov(Qword, Op::Stack(base), Op::Register(Reg::Rax)),
        });
        Ok(code)
    }

    fn gen_array_assignment(&mut self, assign: &ArrayAssignment) -> Result<Vec<Instruction>, CodegenError> {
        let access = crate::ast::ArrayAccess::new(
            assign.target.clone(),
            assign.index.clone(),
            assign.position,
        );
        let mut code = self.gen_array_element_address(&access)?;
        code.push(Instruction::Push(Reg::Rax));
        code.extend(self.gen_expr(&assign.value)?);
        code.push(Instruction::Pop(Reg::Rbx));
        code.push(Instruction::Mov(Qword, Op::Indirect(Reg::Rbx), Op::Register(Reg::Rax)));
        Ok(code)
    }

    fn gen_member_assignment(&mut self, assign: &MemberAssignment) -> Result<Vec<Instruction>, CodegenError> {
        let access = crate::ast::MemberAccess::new(
            assign.object.clone(),
            assign.field.clone(),
            assign.position,
        );
        let mut code = self.gen_member_address(&access)?;
        code.push(Instruction::Push(Reg::Rax));
        code.extend(self.gen_expr(&assign.value)?);
        code.push(Instruction::Pop(Reg::Rbx));
        code.push(Instruction::Mov(Qword, Op::Indirect(Reg::Rbx), Op::Register(Reg::Rax)));
        Ok(code)
    }

    /// `if [cond] {...} or [cond] {...} ... else {...}` (§9 redesign): each
    /// arm tests its condition, falls through to the next arm's label on
    /// false, and jumps to the shared end label after running its body.
    fn gen_if(&mut self, stmt: &IfStatement) -> Result<Vec<Instruction>, CodegenError> {
        let end_label = self.fresh_label("if_end");
        let mut code = vec![];

        let mut arms = vec![(&stmt.condition, &stmt.then_block)];
        for (cond, block) in &stmt.else_ifs {
            arms.push((cond, block));
        }
        let last_arm = arms.len() - 1;

        for (i, (cond, block)) in arms.into_iter().enumerate() {
            let next_label = if i < last_arm || stmt.else_block.is_some() {
                self.fresh_label("if_next")
            } else {
                end_label.clone()
            };
            code.extend(self.gen_expr(cond)?);
            code.push(Instruction::Cmp(Qword, Op::Register(Reg::Rax), Op::Immediate(0)));
            code.push(Instruction::Je(next_label.clone()));

            self.frame.push_scope();
            code.extend(self.gen_block(block)?);
            self.frame.pop_scope();
            code.push(Instruction::Jmp(end_label.clone()));

            if next_label != end_label {
                code.push(Instruction::Label(next_label));
            }
        }

        if let Some(else_block) = &stmt.else_block {
            self.frame.push_scope();
            code.extend(self.gen_block(else_block)?);
            self.frame.pop_scope();
        }

        code.push(Instruction::Label(end_label));
        Ok(code)
    }

    fn gen_for(&mut self, stmt: &ForStatement) -> Result<Vec<Instruction>, CodegenError> {
        self.frame.push_scope();
        let top = self.fresh_label("for_top");
        let end = self.fresh_label("for_end");

        let mut code = self.gen_statement(&stmt.init)?;
        code.push(Instruction::Label(top.clone()));
        code.extend(self.gen_expr(&stmt.condition)?);
        code.push(Instruction::Cmp(Qword, Op::Register(Reg::Rax), Op::Immediate(0)));
        code.push(Instruction::Je(end.clone()));
        code.extend(self.gen_block(&stmt.body)?);
        code.extend(self.gen_statement(&stmt.increment)?);
        code.push(Instruction::Jmp(top));
        code.push(Instruction::Label(end));

        self.frame.pop_scope();
        Ok(code)
    }

    /// `repeat [subject] { when [v] {...} ... fixed {...} }` (§4.4): no
    /// fallthrough between cases. The subject is evaluated once and held in
    /// `%rdx` across every `when` comparison.
    fn gen_repeat(&mut self, stmt: &RepeatStatement) -> Result<Vec<Instruction>, CodegenError> {
        let end = self.fresh_label("repeat_end");
        let mut code = self.gen_expr(&stmt.subject)?;
        code.push(Instruction::Mov(Qword, Op::Register(Reg::Rdx), Op::Register(Reg::Rax)));

        let case_labels: Vec<String> = stmt
            .cases
            .iter()
            .enumerate()
            .map(|(i, _)| self.fresh_label(&format!("when_{i}")))
            .collect();
        let fixed_label = stmt.fixed.as_ref().map(|_| self.fresh_label("fixed"));

        for (case, label) in stmt.cases.iter().zip(case_labels.iter()) {
            code.extend(self.gen_expr(&case.value)?);
            code.push(Instruction::Cmp(Qword, Op::Register(Reg::Rdx), Op::Register(Reg::Rax)));
            code.push(Instruction::Je(label.clone()));
        }
        match &fixed_label {
            Some(label) => code.push(Instruction::Jmp(label.clone())),
            None => code.push(Instruction::Jmp(end.clone())),
        }

        for (case, label) in stmt.cases.iter().zip(case_labels.iter()) {
            code.push(Instruction::Label(label.clone()));
            self.frame.push_scope();
            code.extend(self.gen_block(&case.body)?);
            self.frame.pop_scope();
            code.push(Instruction::Jmp(end.clone()));
        }

        if let (Some(fixed_block), Some(label)) = (&stmt.fixed, &fixed_label) {
            code.push(Instruction::Label(label.clone()));
            self.frame.push_scope();
            code.extend(self.gen_block(fixed_block)?);
            self.frame.pop_scope();
            code.push(Instruction::Jmp(end.clone()));
        }

        code.push(Instruction::Label(end));
        Ok(code)
    }

    /// `try {...} catch[err] {...} finally {...}` (§4.4, §9): there is no
    /// unwinding runtime, so `try_block` always runs, `catch_block` never
    /// runs, and `finally_block` always runs immediately after.
    fn gen_try(&mut self, stmt: &TryStatement) -> Result<Vec<Instruction>, CodegenError> {
        let mut code = vec![];
        self.frame.push_scope();
        code.extend(self.gen_block(&stmt.try_block)?);
        self.frame.pop_scope();

        if let Some(finally) = &stmt.finally_block {
            self.frame.push_scope();
            code.extend(self.gen_block(finally)?);
            self.frame.pop_scope();
        }
        Ok(code)
    }

    /// `return [value];`: inside a function this is the normal
    /// prologue-matched epilogue; inside the run block there is no caller to
    /// return to, so it exits the same way falling off the end of the block
    /// does (§4.5).
    fn gen_return(&mut self, stmt: &ReturnStatement) -> Result<Vec<Instruction>, CodegenError> {
        let mut code = vec![];
        if let Some(value) = &stmt.value {
            code.extend(self.gen_expr(value)?);
        }
        if self.in_run {
            code.extend(self.exit_sequence());
        } else {
            code.extend(self.epilogue());
        }
        Ok(code)
    }
}
