//! x86-64 backend: the runtime-bearing core (§4.5).
//!
//! Walks a semantically validated [`Program`] and emits GNU-assembler (AT&T)
//! text in three sections: `.data` (literal pool plus the shared scratch
//! buffers), and `.text` (`_start`, each user function, then the runtime
//! routines in [`runtime`]). There is no `.bss`; scratch buffers are
//! zero-initialized `.space` entries in `.data` instead (§4.5).

mod expr;
mod literals;
mod scope;
mod stmt;

pub(super) mod runtime;

use std::collections::HashMap;

use crate::asm::*;
use crate::ast::{FunctionDecl, Program, Type};
use crate::typechecker::StructRegistry;

use literals::LiteralPool;
use scope::Frame;

use super::CodegenError;

/// Shared state threaded through expression/statement lowering for one
/// compilation (§9: registry is an explicit context value, not a global).
pub(super) struct Codegen<'a> {
    registry: &'a StructRegistry,
    functions: HashMap<String, (Vec<Type>, Type)>,
    pool: LiteralPool,
    frame: Frame,
    label_id: usize,
    true_label: String,
    false_label: String,
    /// Set while lowering the run block (§9): a `return` there falls off the
    /// same way the block's end does, rather than emitting `ret`.
    in_run: bool,
}

impl<'a> Codegen<'a> {
    fn new(registry: &'a StructRegistry, functions: HashMap<String, (Vec<Type>, Type)>) -> Self {
        let mut pool = LiteralPool::new();
        let (true_label, false_label) = runtime::intern_bool_literals(&mut pool);
        Self {
            registry,
            functions,
            pool,
            frame: Frame::new(),
            label_id: 0,
            true_label,
            false_label,
            in_run: false,
        }
    }

    /// A fresh, program-unique local label, e.g. `.Lif_3`.
    fn fresh_label(&mut self, tag: &str) -> String {
        let id = self.label_id;
        self.label_id += 1;
        format!(".L{tag}_{id}")
    }
}

pub fn generate(program: &Program, registry: &StructRegistry) -> Result<String, CodegenError> {
    let mut functions = HashMap::new();
    for f in &program.functions {
        functions.insert(f.name.clone(), (f.param_types(), f.return_type.clone()));
    }
    let mut cg = Codegen::new(registry, functions);

    let mut function_bodies = vec![];
    for f in &program.functions {
        function_bodies.push(cg.gen_function(f)?);
    }

    let run_body = cg.gen_run(&program.run)?;

    let mut out = vec![];
    out.push(Instruction::Directive(".data".to_string()));
    out.extend(runtime::data_buffers());
    out.extend(cg.pool.emit());

    out.push(Instruction::Directive(".text".to_string()));
    out.push(Instruction::Global("_start".to_string()));
    out.push(Instruction::Label("_start".to_string()));
    out.extend(run_body);

    for body in function_bodies {
        out.extend(body);
    }

    out.extend(runtime::emit(&cg.true_label, &cg.false_label));

    Ok(render(&out))
}

fn render(instructions: &[Instruction]) -> String {
    let mut text = String::new();
    for instr in instructions {
        text.push_str(&instr.to_string());
        text.push('\n');
    }
    text
}

impl<'a> Codegen<'a> {
    fn prologue(&self, name: &str) -> Vec<Instruction> {
        vec![
            Instruction::Label(name.to_string()),
            Instruction::Push(Reg::Rbp),
            Instruction::Mov(
                InstructionSize::Qword,
                InstructionOperand::Register(Reg::Rbp),
                InstructionOperand::Register(Reg::Rsp),
            ),
        ]
    }

    fn epilogue(&self) -> Vec<Instruction> {
        vec![
            Instruction::Mov(
                InstructionSize::Qword,
                InstructionOperand::Register(Reg::Rsp),
                InstructionOperand::Register(Reg::Rbp),
            ),
            Instruction::Pop(Reg::Rbp),
            Instruction::Ret,
        ]
    }

    /// The run block's `exit(0)` (§4.5), shared by both its fall-off-the-end
    /// path and an explicit `return;` inside it.
    fn exit_sequence(&self) -> Vec<Instruction> {
        vec![
            Instruction::Mov(
                InstructionSize::Qword,
                InstructionOperand::Register(Reg::Rax),
                InstructionOperand::Immediate(EXIT_SYSCALL),
            ),
            Instruction::Xor(
                InstructionOperand::Register(Reg::Rdi),
                InstructionOperand::Register(Reg::Rdi),
            ),
            Instruction::Syscall,
        ]
    }

    /// Every user function: prologue, register/stack parameter spilling
    /// (§4.5: args beyond the sixth are stack-resident already), body,
    /// then a fallback epilogue for a body that falls off the end instead
    /// of hitting an explicit `return`.
    fn gen_function(&mut self, f: &FunctionDecl) -> Result<Vec<Instruction>, CodegenError> {
        self.frame = Frame::new();
        self.in_run = false;
        let mut body = self.prologue(&f.name);

        for (i, param) in f.params.iter().enumerate() {
            if i < Reg::ARGS.len() {
                let offset = self.frame.alloc(8);
                self.frame
                    .declare_stack(param.name.clone(), offset, param.type_annotation.clone());
                body.push(Instruction::Mov(
                    InstructionSize::from(&param.type_annotation),
                    InstructionOperand::Stack(offset),
                    InstructionOperand::Register(Reg::ARGS[i]),
                ));
            } else {
                let offset = 16 + ((i - Reg::ARGS.len()) as i64) * 8;
                self.frame
                    .declare_stack(param.name.clone(), offset, param.type_annotation.clone());
            }
        }

        body.extend(self.gen_block(&f.body)?);
        body.extend(self.epilogue());
        Ok(body)
    }

    /// The run block (§4.5): same stack discipline as a function, but it
    /// finishes with the `exit(0)` syscall rather than a `ret`, and needs no
    /// saved-`%rbp` restoration since `_start` never returns to a caller.
    fn gen_run(&mut self, run: &crate::ast::RunBlock) -> Result<Vec<Instruction>, CodegenError> {
        self.frame = Frame::new();
        self.in_run = true;
        let mut body = vec![Instruction::Mov(
            InstructionSize::Qword,
            InstructionOperand::Register(Reg::Rbp),
            InstructionOperand::Register(Reg::Rsp),
        )];
        body.extend(self.gen_block(&run.body)?);
        body.extend(self.exit_sequence());
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Lexer;
    use crate::parser;

    fn compile(src: &str) -> String {
        let tokens = Lexer::tokenize(src);
        let mut program = parser::parse(tokens).expect("parse");
        let registry = crate::typechecker::analyze(&mut program).expect("typecheck");
        generate(&program, &registry).expect("codegen")
    }

    #[test]
    fn emits_single_start_label() {
        let asm = compile(r#"run { @print["Hello"]; };"#);
        assert_eq!(asm.matches("_start:").count(), 1);
    }

    #[test]
    fn interns_hello_literal() {
        let asm = compile(r#"run { @print["Hello"]; };"#);
        assert!(asm.contains(".asciz \"Hello\""));
    }

    #[test]
    fn constant_folded_print_emits_an_immediate() {
        let asm = compile(r#"run { val num X = 2 + 3 * 4; @print[X]; };"#);
        // X folds to 14 and is referenced as an immediate, never spilled to a stack slot.
        assert!(asm.contains("$14"));
    }

    #[test]
    fn function_gets_its_own_label_and_epilogue() {
        let asm = compile(
            r#"fnc add[num a, num b]:num { return a + b; } run { num r = @add[5, 3]; @print[r]; };"#,
        );
        assert!(asm.contains("add:"));
        assert!(asm.contains("\tret"));
    }

    #[test]
    fn exit_syscall_is_used_instead_of_ret_in_run_block() {
        let asm = compile(r#"run { @print["hi"]; };"#);
        assert!(asm.contains("$60"));
    }
}
