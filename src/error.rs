//! Top-level error aggregation (§7, §10.3).
//!
//! Each pipeline phase keeps its own `Display`-only error type — [`ParseError`],
//! [`TypeError`], [`CodegenError`] — exactly as the rest of this codebase does,
//! with no `anyhow`/`thiserror` blanket wrapping. [`CompileError`] is the one
//! place they are folded into a single type so [`crate::driver`] can match on
//! it once to print a phase-tagged line and pick an exit code. Lexical errors
//! (§4.1) have no variant here: the lexer never fails, so they only ever
//! surface indirectly as a [`CompileError::Parse`].

use std::fmt::Display;
use std::io;

use crate::codegen::CodegenError;
use crate::parser::ParseError;
use crate::typechecker::TypeError;

/// A failure invoking or running the external assembler or linker (§6, §7).
/// Its stdout/stderr is forwarded verbatim.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolchainError {
    pub tool: String,
    pub output: String,
}

impl ToolchainError {
    pub fn new(tool: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            tool: tool.into(),
            output: output.into(),
        }
    }
}

impl Display for ToolchainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} failed: {}", self.tool, self.output.trim())
    }
}

impl std::error::Error for ToolchainError {}

/// The one error type the driver ever has to match on. Each variant names
/// the phase that failed (§7: "prefixed by a phase tag").
#[derive(Debug)]
pub enum CompileError {
    Parse(ParseError),
    Type(TypeError),
    Codegen(CodegenError),
    Toolchain(ToolchainError),
    Io(io::Error),
}

impl CompileError {
    /// The phase tag this error is printed with (§7, §10.1).
    pub fn phase(&self) -> &'static str {
        match self {
            CompileError::Parse(_) => "parse",
            CompileError::Type(_) => "semantic",
            CompileError::Codegen(_) => "codegen",
            CompileError::Toolchain(_) => "toolchain",
            CompileError::Io(_) => "io",
        }
    }
}

impl Display for CompileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CompileError::Parse(e) => write!(f, "{e}"),
            CompileError::Type(e) => write!(f, "{e}"),
            CompileError::Codegen(e) => write!(f, "{e}"),
            CompileError::Toolchain(e) => write!(f, "{e}"),
            CompileError::Io(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for CompileError {}

impl From<ParseError> for CompileError {
    fn from(e: ParseError) -> Self {
        CompileError::Parse(e)
    }
}

impl From<TypeError> for CompileError {
    fn from(e: TypeError) -> Self {
        CompileError::Type(e)
    }
}

impl From<CodegenError> for CompileError {
    fn from(e: CodegenError) -> Self {
        CompileError::Codegen(e)
    }
}

impl From<ToolchainError> for CompileError {
    fn from(e: ToolchainError) -> Self {
        CompileError::Toolchain(e)
    }
}

impl From<io::Error> for CompileError {
    fn from(e: io::Error) -> Self {
        CompileError::Io(e)
    }
}
