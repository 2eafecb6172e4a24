//! ARMv7 (32-bit, hard-float ABI) stub backend (§4.6).
//!
//! Same scope restriction as [`super::aarch64`]: only `run { @print["literal"];
//! ... };`-shaped programs, everything else is a [`CodegenError`]. Stack
//! frame uses `fp`/`lr` pushes; syscalls go through `svc #0` with the number
//! in `r7` (`write` = 4, `exit` = 1).

use crate::ast::{Expression, FnCall, Program, Statement};

use super::CodegenError;

fn raw(text: impl Into<String>) -> String {
    format!("\t{}\n", text.into())
}

fn collect_print_literals(program: &Program) -> Result<Vec<(String, String)>, CodegenError> {
    if !program.structs.is_empty() || !program.functions.is_empty() {
        return Err(CodegenError::new(
            "unsupported construct for the arm32 stub backend: only a bare run block is supported (no functions or structs)",
        ));
    }

    let mut literals = vec![];
    for (i, stmt) in program.run.body.statements.iter().enumerate() {
        let Statement::Expression(Expression::Call(FnCall { callee, args, .. })) = stmt else {
            return Err(CodegenError::new(format!(
                "unsupported construct for the arm32 stub backend: only `print[\"literal\"]` statements are supported (statement {i} is not a call)"
            )));
        };
        if callee != "print" {
            return Err(CodegenError::new(format!(
                "unsupported construct for the arm32 stub backend: only `print` calls are supported, found `{callee}`"
            )));
        }
        let [Expression::Text(text)] = args.as_slice() else {
            return Err(CodegenError::new(
                "unsupported construct for the arm32 stub backend: `print` must take a single text literal",
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
    out.push_str(&raw("push {fp, lr}"));
    out.push_str(&raw("mov fp, sp"));

    for (label, content) in &literals {
        out.push_str(&raw(format!("ldr r0, ={label}")));
        out.push_str(&raw(format!("mov r1, #{}", content.len())));
        out.push_str(&raw("bl print_string"));
    }

    out.push_str(&raw("mov r7, #1"));
    out.push_str(&raw("mov r0, #0"));
    out.push_str(&raw("svc #0"));

    out.push_str("print_string:\n");
    out.push_str("\t@ r0 = pointer, r1 = length\n");
    out.push_str(&raw("mov r2, r1"));
    out.push_str(&raw("mov r1, r0"));
    out.push_str(&raw("mov r0, #1"));
    out.push_str(&raw("mov r7, #4"));
    out.push_str(&raw("svc #0"));
    out.push_str(&raw("mov pc, lr"));

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
    fn rejects_structs() {
        let err = compile(r#"struct S { num x; }; run { @print["hi"]; };"#).unwrap_err();
        assert!(err.message.contains("unsupported construct"));
    }
}
