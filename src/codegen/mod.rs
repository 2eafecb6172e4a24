//! Assembly codegen (§4.5, §4.6).
//!
//! [`Target`] picks which backend lowers a validated [`crate::ast::Program`]
//! to assembly text. The x86-64 backend is the only one with full runtime
//! parity (§4.5); [`aarch64`] and [`arm32`] are stubs that only support
//! `run { @print["literal"]; }`-shaped programs (§4.6).

mod aarch64;
mod arm32;
mod error;
mod x86_64;

use std::fmt::Display;
use std::str::FromStr;

pub use error::CodegenError;

use crate::ast::Program;
use crate::typechecker::StructRegistry;

/// The assembler/linker ABI a program is lowered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    X86_64,
    Arm64,
    Arm32,
}

impl Target {
    /// The `as`-family assembler binary for this target (§6).
    pub fn assembler(&self) -> &'static str {
        match self {
            Target::X86_64 => "as",
            Target::Arm64 => "aarch64-linux-gnu-as",
            Target::Arm32 => "arm-linux-gnueabihf-as",
        }
    }

    /// The `ld`-family linker binary for this target (§6).
    pub fn linker(&self) -> &'static str {
        match self {
            Target::X86_64 => "ld",
            Target::Arm64 => "aarch64-linux-gnu-ld",
            Target::Arm32 => "arm-linux-gnueabihf-ld",
        }
    }

    /// Extra flags the assembler needs for this target. Only x86-64 needs
    /// `--64` to disambiguate from 32-bit mode (§6).
    pub fn assembler_flags(&self) -> &'static [&'static str] {
        match self {
            Target::X86_64 => &["--64"],
            Target::Arm64 | Target::Arm32 => &[],
        }
    }

    /// Maps the raw `uname -m` string to a target, for auto-detection when
    /// `--target` is not given (§6).
    pub fn from_uname(machine: &str) -> Option<Target> {
        match machine.trim() {
            "x86_64" => Some(Target::X86_64),
            "aarch64" | "arm64" => Some(Target::Arm64),
            m if m.starts_with("arm") => Some(Target::Arm32),
            _ => None,
        }
    }
}

impl Display for Target {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Target::X86_64 => "x86_64",
            Target::Arm64 => "arm64",
            Target::Arm32 => "arm32",
        })
    }
}

impl FromStr for Target {
    type Err = String;

    /// Accepts the canonical name and the aliases listed in §6:
    /// `x86_64 x86-64 amd64`, `arm64 aarch64`, `arm32 arm armv7`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "x86_64" | "x86-64" | "amd64" => Ok(Target::X86_64),
            "arm64" | "aarch64" => Ok(Target::Arm64),
            "arm32" | "arm" | "armv7" => Ok(Target::Arm32),
            other => Err(format!(
                "unknown target '{other}' (expected x86_64, arm64, or arm32)"
            )),
        }
    }
}

/// Lowers a semantically validated program to assembly text for `target`
/// (§4.5, §4.6). `registry` resolves struct field layouts.
pub fn generate(
    program: &Program,
    registry: &StructRegistry,
    target: Target,
) -> Result<String, CodegenError> {
    match target {
        Target::X86_64 => x86_64::generate(program, registry),
        Target::Arm64 => aarch64::generate(program, registry),
        Target::Arm32 => arm32::generate(program, registry),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_target_aliases() {
        assert_eq!("x86_64".parse(), Ok(Target::X86_64));
        assert_eq!("x86-64".parse(), Ok(Target::X86_64));
        assert_eq!("amd64".parse(), Ok(Target::X86_64));
        assert_eq!("arm64".parse(), Ok(Target::Arm64));
        assert_eq!("aarch64".parse(), Ok(Target::Arm64));
        assert_eq!("arm32".parse(), Ok(Target::Arm32));
        assert_eq!("arm".parse(), Ok(Target::Arm32));
        assert_eq!("armv7".parse(), Ok(Target::Arm32));
    }

    #[test]
    fn rejects_unknown_target() {
        assert!("riscv".parse::<Target>().is_err());
    }

    #[test]
    fn detects_target_from_uname() {
        assert_eq!(Target::from_uname("x86_64"), Some(Target::X86_64));
        assert_eq!(Target::from_uname("aarch64"), Some(Target::Arm64));
        assert_eq!(Target::from_uname("armv7l"), Some(Target::Arm32));
        assert_eq!(Target::from_uname("sparc"), None);
    }
}
