//! AArch64 stub backend (§4.6).
//!
//! Full runtime parity with [`super::x86_64`] is out of scope here; this
//! backend only accepts `run { @print["literal"]; ... };`-shaped programs —
//! no functions, no structs, and every run-block statement a `print` call on
//! a text literal — and returns a clear [`CodegenError`] for anything else,
//! so `--target arm64` fails loudly instead of emitting silently-wrong code.
//!
//! Stack frame: `sp`/`x29`/`x30`, paired 16 bytes per §9's ABI note. Syscalls
//! go through `svc #0` with the number in `x8` (`write` = 64, `exit` = 93).

use crate::ast::{Expression, FnCall, Program, Statement};

use super::CodegenError;

fn raw(text: impl Into<String>) -> String {
    format!("\t{}\n", text.into())
}

/// Walks the run block, requiring every statement to be `@print["..."]`, and
/// returns the interned (label, unescaped content) pairs in source order.
fn collect_print_literals(program: &Program) -> Result<Vec<(String, String)>, CodegenError> {
    if !program.structs.is_empty() || !program.functions.is_empty() {
        return Err(CodegenError::new(
            "unsupported construct for the arm64 stub backend: only a bare run block is supported (no functions or structs)",
        ));
    }

    let mut literals = vec![];
    for (i, stmt) in program.run.body.statements.iter().enumerate() {
        let Statement::Expression(Expression::Call(FnCall { callee, args, .. })) = stmt else {
            return Err(CodegenError::new(format!(
                "unsupported construct for the arm64 stub backend: only `print[\"literal\"]` statements are supported (statement {i} is not a call)"
            )));
        };
        if callee != "print" {
            return Err(CodegenError::new(format!(
                "unsupported construct for the arm64 stub backend: only `print` calls are supported, found `{callee}`"
            )));
        }
        let [Expression::Text(text)] = args.as_slice() else {
            return Err(CodegenError::new(
                "unsupported construct for the arm64 stub backend: `print` must take a single text literal",
            ));
        };
        literals.push((format!("str_{i}"), text.value.clone()));
    }
    Ok(literals)
}

fn escape(content: &str) -> String {
    let mut out = String::with_capacity(content.len());
    for c in content.chars() {
        match c {
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            other => out.push(other),
        }
    }
    out
}

pub fn generate(program: &Program, _registry: &crate::typechecker::StructRegistry) -> Result<String, CodegenError> {
    let literals = collect_print_literals(program)?;

    let mut out = String::new();
    out.push_str("\t.data\n");
    for (label, content) in &literals {
        out.push_str(&format!("{label}:\n\t.asciz \"{}\"\n", escape(content)));
    }

    out.push_str("\t.text\n");
    out.push_str("\t.globl _start\n");
    out.push_str("_start:\n");
    out.push_str(&raw("stp x29, x30, [sp, #-16]!"));
    out.push_str(&raw("mov x29, sp"));

    for (label, content) in &literals {
        out.push_str(&raw(format!("adr x0, {label}")));
        out.push_str(&raw(format!("mov x1, #{}", content.len())));
        out.push_str(&raw("bl print_string"));
    }

    out.push_str(&raw("mov x8, #93"));
    out.push_str(&raw("mov x0, #0"));
    out.push_str(&raw("svc #0"));

    out.push_str("print_string:\n");
    out.push_str("\t# x0 = pointer, x1 = length\n");
    out.push_str(&raw("mov x2, x1"));
    out.push_str(&raw("mov x1, x0"));
    out.push_str(&raw("mov x0, #1"));
    out.push_str(&raw("mov x8, #64"));
    out.push_str(&raw("svc #0"));
    out.push_str(&raw("ret"));

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Lexer;
    use crate::parser;

    fn compile(src: &str) -> Result<String, CodegenError> {
        let tokens = Lexer::tokenize(src);
        let mut program = parser::parse(tokens).expect("parse");
        let registry = crate::typechecker::analyze(&mut program).expect("typecheck");
        generate(&program, &registry)
    }

    #[test]
    fn accepts_literal_only_print() {
        let asm = compile(r#"run { @print["hi"]; };"#).expect("codegen");
        assert!(asm.contains("_start:"));
        assert!(asm.contains("svc #0"));
        assert!(asm.contains(".asciz \"hi\""));
    }

    #[test]
    fn rejects_functions() {
        let err = compile(r#"fnc f[]:void {} run { @print["hi"]; };"#).unwrap_err();
        assert!(err.message.contains("unsupported construct"));
    }

    #[test]
    fn rejects_non_literal_print_argument() {
        let err = compile(r#"run { num x = 1; @print[x]; };"#).unwrap_err();
        assert!(err.message.contains("unsupported construct"));
    }
}
