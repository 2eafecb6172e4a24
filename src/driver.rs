//! Ties the pipeline together with the external assembler and linker (§6,
//! §7, §10.1).
//!
//! [`compile`] is the single entry point [`crate::bin`] and tests call: lex,
//! parse, typecheck, lower to assembly, write it next to the requested
//! output path, then shell out to the target's `as`/`ld` pair. Every phase
//! logs an `info!` line on entry so `-v` gives a legible trace of where time
//! (or a failure) went; a failure anywhere logs one phase-tagged `error!`
//! line and returns before the next phase runs.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use log::{error, info};

use crate::codegen::{self, Target};
use crate::error::{CompileError, ToolchainError};
use crate::lexer::Lexer;
use crate::parser;
use crate::typechecker;

/// Options controlling one compilation, already resolved from the CLI
/// arguments (or a test's literal construction) — no `clap` types leak in
/// here (§9: the driver is reusable from tests without a CLI).
pub struct CompileOptions {
    pub input: PathBuf,
    pub output: PathBuf,
    pub target: Target,
    pub keep_asm: bool,
}

/// Runs the whole pipeline for `opts`, logging each phase, and returns the
/// first [`CompileError`] encountered. On success `opts.output` is a linked
/// executable; the intermediate `.s` is kept only if `opts.keep_asm`, and
/// the intermediate `.o` is always removed.
pub fn compile(opts: &CompileOptions) -> Result<(), CompileError> {
    info!("reading {}", opts.input.display());
    let source = fs::read_to_string(&opts.input).map_err(|e| {
        error!("io: failed to read {}: {e}", opts.input.display());
        CompileError::from(e)
    })?;

    info!("lexing");
    let tokens = Lexer::tokenize(&source);

    info!("parsing");
    let mut program = parser::parse(tokens).map_err(|e| {
        error!("parse: {e}");
        CompileError::from(e)
    })?;

    info!("running semantic analysis");
    let registry = typechecker::analyze(&mut program).map_err(|e| {
        error!("semantic: {e}");
        CompileError::from(e)
    })?;

    info!("generating {} assembly", opts.target);
    let asm = codegen::generate(&program, &registry, opts.target).map_err(|e| {
        error!("codegen: {e}");
        CompileError::from(e)
    })?;

    let asm_path = opts.output.with_extension("s");
    let obj_path = opts.output.with_extension("o");
    fs::write(&asm_path, asm)?;

    let assemble_result = assemble(opts.target, &asm_path, &obj_path);
    let link_result = assemble_result.and_then(|_| link(opts.target, &obj_path, &opts.output));

    if !opts.keep_asm {
        let _ = fs::remove_file(&asm_path);
    }
    let _ = fs::remove_file(&obj_path);

    link_result
}

fn assemble(target: Target, asm_path: &Path, obj_path: &Path) -> Result<(), CompileError> {
    info!("assembling with {}", target.assembler());
    run_tool(
        target.assembler(),
        target
            .assembler_flags()
            .iter()
            .map(|f| f.to_string())
            .chain([
                "-o".to_string(),
                obj_path.display().to_string(),
                asm_path.display().to_string(),
            ])
            .collect(),
    )
}

fn link(target: Target, obj_path: &Path, output_path: &Path) -> Result<(), CompileError> {
    info!("linking with {}", target.linker());
    run_tool(
        target.linker(),
        vec![
            "-o".to_string(),
            output_path.display().to_string(),
            obj_path.display().to_string(),
        ],
    )
}

fn run_tool(tool: &str, args: Vec<String>) -> Result<(), CompileError> {
    let output = Command::new(tool).args(&args).output().map_err(|e| {
        error!("toolchain: failed to launch {tool}: {e}");
        CompileError::from(ToolchainError::new(tool, e.to_string()))
    })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        error!("toolchain: {tool} failed: {stderr}");
        return Err(CompileError::from(ToolchainError::new(tool, stderr)));
    }

    Ok(())
}

/// Runs `uname -m` and maps the result through [`Target::from_uname`], for
/// when `--target` is not given on the CLI (§6).
pub fn detect_host_target() -> Result<Target, CompileError> {
    let output = Command::new("uname").arg("-m").output().map_err(|e| {
        error!("toolchain: failed to run uname: {e}");
        CompileError::from(ToolchainError::new("uname", e.to_string()))
    })?;

    let machine = String::from_utf8_lossy(&output.stdout).into_owned();
    Target::from_uname(&machine).ok_or_else(|| {
        let msg = format!("unrecognized host architecture '{}'", machine.trim());
        error!("toolchain: {msg}");
        CompileError::from(ToolchainError::new("uname", msg))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_source(dir: &tempfile::TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        let mut f = fs::File::create(&path).expect("create source");
        f.write_all(content.as_bytes()).expect("write source");
        path
    }

    #[test]
    fn propagates_parse_errors_without_touching_the_filesystem() {
        let dir = tempfile::tempdir().expect("tempdir");
        let input = write_source(&dir, "broken.lc", "run { @print[ };");
        let opts = CompileOptions {
            input,
            output: dir.path().join("broken"),
            target: Target::X86_64,
            keep_asm: false,
        };

        let err = compile(&opts).unwrap_err();
        assert_eq!(err.phase(), "parse");
        assert!(!dir.path().join("broken.s").exists());
    }

    #[test]
    fn propagates_semantic_errors() {
        let dir = tempfile::tempdir().expect("tempdir");
        let input = write_source(&dir, "bad_type.lc", r#"run { num x = "nope"; };"#);
        let opts = CompileOptions {
            input,
            output: dir.path().join("bad_type"),
            target: Target::X86_64,
            keep_asm: false,
        };

        let err = compile(&opts).unwrap_err();
        assert_eq!(err.phase(), "semantic");
    }

    #[test]
    fn missing_input_file_is_an_io_error() {
        let opts = CompileOptions {
            input: PathBuf::from("/no/such/file.lc"),
            output: PathBuf::from("/tmp/does-not-matter"),
            target: Target::X86_64,
            keep_asm: false,
        };

        let err = compile(&opts).unwrap_err();
        assert_eq!(err.phase(), "io");
    }

    #[test]
    fn detect_host_target_recognizes_a_linux_uname_string() {
        assert_eq!(Target::from_uname("x86_64\n"), Some(Target::X86_64));
    }
}
