use std::fmt::Display;

/// The 64-bit general-purpose registers used by the x86-64 backend (§4.5).
///
/// Only the subset the calling convention and stack-machine discipline
/// actually touch is modeled: the six argument registers, the two
/// frame-management registers, and one scratch pair (`Rax`/`Rbx`) used to
/// fuse binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reg {
    Rax,
    Rbx,
    Rcx,
    Rdx,
    Rsi,
    Rdi,
    Rbp,
    Rsp,
    R8,
    R9,
    R10,
}

impl Reg {
    /// The argument-passing registers in calling-convention order (§4.5):
    /// `%rdi, %rsi, %rdx, %rcx, %r8, %r9`.
    pub const ARGS: [Reg; 6] = [Reg::Rdi, Reg::Rsi, Reg::Rdx, Reg::Rcx, Reg::R8, Reg::R9];

    /// The 8-bit sub-register `setCC` instructions write into, e.g. `%al` for
    /// `%rax`. Only registers that `setCC`/`movzbq` pairs in this backend
    /// actually target need a mapping.
    pub fn byte(self) -> &'static str {
        match self {
            Reg::Rax => "%al",
            Reg::Rbx => "%bl",
            Reg::Rcx => "%cl",
            Reg::Rdx => "%dl",
            _ => unreachable!("setCC never targets {self} in this backend"),
        }
    }
}

impl Display for Reg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Reg::Rax => "%rax",
            Reg::Rbx => "%rbx",
            Reg::Rcx => "%rcx",
            Reg::Rdx => "%rdx",
            Reg::Rsi => "%rsi",
            Reg::Rdi => "%rdi",
            Reg::Rbp => "%rbp",
            Reg::Rsp => "%rsp",
            Reg::R8 => "%r8",
            Reg::R9 => "%r9",
            Reg::R10 => "%r10",
        })
    }
}
