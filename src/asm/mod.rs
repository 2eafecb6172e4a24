//! A small instruction-set model for the x86-64 backend (§4.5), emitted as
//! GNU-assembler (AT&T) syntax text.
//!
//! Each [`Instruction`] variant takes its operands in `(destination, source)`
//! order for call-site readability, mirroring how the rest of this codebase
//! writes `mov dst, src`; [`Display`] flips them to AT&T's `src, dst` order
//! when rendering.

mod instructionsize;
mod reg;

use std::fmt::Display;

pub use self::instructionsize::InstructionSize;
pub use self::reg::*;

/// Raw syscall number for `exit` on Linux x86-64 (§4.5: "raw number 60").
pub const EXIT_SYSCALL: i64 = 60;
/// Raw syscall number for `read`.
pub const READ_SYSCALL: i64 = 0;
/// Raw syscall number for `write`.
pub const WRITE_SYSCALL: i64 = 1;

#[derive(Debug, Clone)]
pub enum InstructionOperand {
    Register(Reg),
    /// The 8-bit sub-register a `setCC`/`movzbq` pair reads or writes.
    RegisterByte(Reg),
    Immediate(i64),
    /// `offset(%rbp)` — a stack slot at a signed byte offset from the frame
    /// pointer. Negative for locals and parameters (§4.5).
    Stack(i64),
    /// A bare data-segment label used as an immediate address, e.g. the
    /// argument to `call`.
    Label(String),
    /// `label(%rip)` — position-independent load of a label's address.
    RipRelative(String),
    /// `(%reg)` — register-indirect memory access, used for array element
    /// addresses computed into a register.
    Indirect(Reg),
}

impl Display for InstructionOperand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InstructionOperand::Register(reg) => write!(f, "{reg}"),
            InstructionOperand::RegisterByte(reg) => write!(f, "{}", reg.byte()),
            InstructionOperand::Immediate(val) => write!(f, "${val}"),
            InstructionOperand::Stack(offset) => write!(f, "{offset}(%rbp)"),
            InstructionOperand::Label(name) => write!(f, "{name}"),
            InstructionOperand::RipRelative(name) => write!(f, "{name}(%rip)"),
            InstructionOperand::Indirect(reg) => write!(f, "({reg})"),
        }
    }
}

#[derive(Debug, Clone)]
pub enum Instruction {
    Comment(String),
    Label(String),
    /// `.globl name` — only `_start` needs this, but kept general.
    Global(String),
    Directive(String),
    /// `name: .asciz "..."` — a NUL-terminated interned string literal.
    Asciz(String, String),
    /// `name: .space n` — a zero-initialized scratch buffer.
    Space(String, usize),
    Leaq(InstructionOperand, InstructionOperand),
    Mov(InstructionSize, InstructionOperand, InstructionOperand),
    Movzbq(InstructionOperand, InstructionOperand),
    Add(InstructionSize, InstructionOperand, InstructionOperand),
    Sub(InstructionSize, InstructionOperand, InstructionOperand),
    Imul(InstructionOperand, InstructionOperand),
    Cqto,
    Idiv(InstructionOperand),
    Xor(InstructionOperand, InstructionOperand),
    And(InstructionOperand, InstructionOperand),
    Or(InstructionOperand, InstructionOperand),
    Neg(InstructionOperand),
    Cmp(InstructionSize, InstructionOperand, InstructionOperand),
    Sete(InstructionOperand),
    Setne(InstructionOperand),
    Setl(InstructionOperand),
    Setg(InstructionOperand),
    Setle(InstructionOperand),
    Setge(InstructionOperand),
    Je(String),
    Jne(String),
    Jmp(String),
    Inc(InstructionOperand),
    Syscall,
    Ret,
    Call(String),
    Push(Reg),
    Pop(Reg),
    /// An already-formatted line, for the handful of spots (the `.data`
    /// preamble, raw byte tables) where modeling a dedicated variant isn't
    /// worth it.
    Raw(String),
}

impl Display for Instruction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let value = match self {
            Instruction::Comment(comment) => format!("\t# {comment}"),
            Instruction::Label(label) => format!("{label}:"),
            Instruction::Global(name) => format!("\t.globl {name}"),
            Instruction::Directive(dir) => format!("\t{dir}"),
            Instruction::Asciz(name, escaped) => format!("{name}:\n\t.asciz \"{escaped}\""),
            Instruction::Space(name, len) => format!("{name}:\n\t.space {len}"),
            Instruction::Leaq(dst, src) => format!("\tleaq\t{src}, {dst}"),
            Instruction::Mov(size, dst, src) => format!("\tmov{size}\t{src}, {dst}"),
            Instruction::Movzbq(dst, src) => format!("\tmovzbq\t{src}, {dst}"),
            Instruction::Add(size, dst, src) => format!("\tadd{size}\t{src}, {dst}"),
            Instruction::Sub(size, dst, src) => format!("\tsub{size}\t{src}, {dst}"),
            Instruction::Imul(dst, src) => format!("\timulq\t{src}, {dst}"),
            Instruction::Cqto => "\tcqto".to_string(),
            Instruction::Idiv(src) => format!("\tidivq\t{src}"),
            Instruction::Xor(dst, src) => format!("\txorq\t{src}, {dst}"),
            Instruction::And(dst, src) => format!("\tandq\t{src}, {dst}"),
            Instruction::Or(dst, src) => format!("\torq\t{src}, {dst}"),
            Instruction::Neg(dst) => format!("\tnegq\t{dst}"),
            Instruction::Cmp(size, lhs, rhs) => format!("\tcmp{size}\t{rhs}, {lhs}"),
            Instruction::Sete(dst) => format!("\tsete\t{dst}"),
            Instruction::Setne(dst) => format!("\tsetne\t{dst}"),
            Instruction::Setl(dst) => format!("\tsetl\t{dst}"),
            Instruction::Setg(dst) => format!("\tsetg\t{dst}"),
            Instruction::Setle(dst) => format!("\tsetle\t{dst}"),
            Instruction::Setge(dst) => format!("\tsetge\t{dst}"),
            Instruction::Je(label) => format!("\tje\t{label}"),
            Instruction::Jne(label) => format!("\tjne\t{label}"),
            Instruction::Jmp(label) => format!("\tjmp\t{label}"),
            Instruction::Inc(dst) => format!("\tincq\t{dst}"),
            Instruction::Syscall => "\tsyscall".to_string(),
            Instruction::Ret => "\tret".to_string(),
            Instruction::Call(name) => format!("\tcall\t{name}"),
            Instruction::Push(reg) => format!("\tpushq\t{reg}"),
            Instruction::Pop(reg) => format!("\tpopq\t{reg}"),
            Instruction::Raw(text) => text.to_owned(),
        };
        f.write_str(&value)
    }
}
