//! End-to-end and negative pipeline scenarios (§8, §10.4).
//!
//! Each test drives lex -> parse -> typecheck -> codegen in-process against a
//! fixture under `tests/fixtures/` and asserts on the shape of the emitted
//! assembly text (or, for the negative cases, on which phase rejects it) —
//! this environment never shells out to a real assembler or linker.

use std::fs;
use std::path::Path;

use lcc::codegen::{self, Target};
use lcc::lexer::Lexer;
use lcc::parser;
use lcc::typechecker;

fn fixture(name: &str) -> String {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name);
    fs::read_to_string(&path).unwrap_or_else(|e| panic!("reading {}: {e}", path.display()))
}

fn compile(src: &str) -> Result<String, String> {
    let tokens = Lexer::tokenize(src);
    let mut program = parser::parse(tokens).map_err(|e| format!("parse: {e}"))?;
    let registry = typechecker::analyze(&mut program).map_err(|e| format!("semantic: {e}"))?;
    codegen::generate(&program, &registry, Target::X86_64).map_err(|e| format!("codegen: {e}"))
}

#[test]
fn hello_world_print_interns_the_literal_and_emits_one_entry_point() {
    let asm = compile(&fixture("hello.lc")).expect("hello world should compile");
    assert_eq!(asm.matches("_start:").count(), 1);
    assert!(asm.contains(".asciz \"Hello, world!\""));
}

#[test]
fn constant_folded_arithmetic_is_emitted_as_an_immediate() {
    let asm = compile(&fixture("folded_arithmetic.lc")).expect("should compile");
    // 2 + 3 * 4 folds to 14 at compile time; no stack slot is allocated for it.
    assert!(asm.contains("$14"));
}

#[test]
fn function_call_emits_a_callable_label_with_its_own_epilogue() {
    let asm = compile(&fixture("function_call.lc")).expect("should compile");
    assert!(asm.contains("add:"));
    assert!(asm.contains("call\tadd") || asm.contains("call add"));
    assert!(asm.contains("\tret"));
}

#[test]
fn repeat_when_fixed_emits_a_case_label_per_arm_and_a_fixed_fallback() {
    let asm = compile(&fixture("repeat_when_fixed.lc")).expect("should compile");
    assert!(asm.contains(".asciz \"Monday\""));
    assert!(asm.contains(".asciz \"Tuesday\""));
    assert!(asm.contains(".asciz \"Some other day\""));
}

#[test]
fn num_read_pulls_in_the_stdin_reader_and_the_text_to_num_converter() {
    let asm = compile(&fixture("num_read.lc")).expect("should compile");
    assert!(asm.contains("read_string:"));
    assert!(asm.contains("string_to_num:"));
    assert!(asm.contains(".asciz \"Enter a number: \""));
}

#[test]
fn string_concat_pulls_in_the_runtime_concat_routine() {
    let asm = compile(&fixture("string_concat.lc")).expect("should compile");
    assert!(asm.contains("string_concat:"));
    assert!(asm.contains(".asciz \"Hello, \""));
    assert!(asm.contains(".asciz \"world!\""));
}

#[test]
fn reassigning_a_constant_is_a_semantic_error() {
    let err = compile(&fixture("reassign_constant.lc")).unwrap_err();
    assert!(err.starts_with("semantic:"), "got: {err}");
    assert!(err.contains("constant"));
}

#[test]
fn assigning_null_to_a_non_nullable_type_is_a_semantic_error() {
    let err = compile(&fixture("null_to_non_nullable.lc")).unwrap_err();
    assert!(err.starts_with("semantic:"), "got: {err}");
}

#[test]
fn assigning_text_to_a_numeric_declaration_is_a_semantic_error() {
    let err = compile(&fixture("type_mismatch.lc")).unwrap_err();
    assert!(err.starts_with("semantic:"), "got: {err}");
    assert!(err.contains("num"));
}

#[test]
fn a_program_without_a_run_block_fails_to_parse() {
    let err = compile(&fixture("missing_run_block.lc")).unwrap_err();
    assert!(err.starts_with("parse:"), "got: {err}");
    assert!(err.contains("run"));
}
