//! Semantic analysis: name resolution, type checking, null-safety and
//! immutability enforcement, and compile-time constant folding (§4.3, §4.4).
//!
//! Two forward passes: pass 1 registers every struct and function signature
//! (duplicates fail immediately); pass 2 walks each function body and the
//! run block with a fresh scope stack, checking and annotating every node in
//! place. The tree is mutated (types and folded constants attached) but its
//! shape never changes.

mod error;
mod registry;

pub use error::TypeError;
pub use registry::StructRegistry;

use std::collections::HashMap;

use crate::ast::{
    ArrayAssignment, ArrayLength, Assignment, BinaryVerb, Block, ConstValue, Declaration,
    Expression, FnCall, ForStatement, FunctionDecl, IfStatement, MemberAssignment, Program,
    RepeatStatement, ReturnStatement, RunBlock, Statement, TryStatement, Type,
};

/// A name bound in some scope: its type and whether it was declared `val`.
#[derive(Debug, Clone)]
struct Binding {
    ty: Type,
    is_constant: bool,
}

/// The four type-qualified built-in readers (§4.2, §4.5). Each prints an
/// optional prompt argument, reads a line, and converts it.
const DOTTED_READERS: [(&str, fn() -> Type); 4] = [
    ("num.read", Type::numeric as fn() -> Type),
    ("text.read", Type::text as fn() -> Type),
    ("char.read", Type::char as fn() -> Type),
    ("bool.read", Type::boolean as fn() -> Type),
];

/// Run semantic analysis over a freshly parsed [`Program`], mutating it in
/// place with computed types and folded constants, and returning the struct
/// registry the backend will also need.
pub fn analyze(program: &mut Program) -> Result<StructRegistry, TypeError> {
    Analyzer::new().run(program)
}

struct Analyzer {
    structs: StructRegistry,
    functions: HashMap<String, (Vec<Type>, Type)>,
    scopes: Vec<HashMap<String, Binding>>,
    const_table: HashMap<String, ConstValue>,
    current_return_type: Option<Type>,
}

impl Analyzer {
    fn new() -> Self {
        Self {
            structs: StructRegistry::new(),
            functions: HashMap::new(),
            scopes: vec![],
            const_table: HashMap::new(),
            current_return_type: None,
        }
    }

    fn run(mut self, program: &mut Program) -> Result<StructRegistry, TypeError> {
        for decl in &program.structs {
            self.structs.register(decl)?;
        }
        for function in &program.functions {
            if self.functions.contains_key(&function.name) {
                return Err(TypeError::new(
                    format!("function '{}' is already defined", function.name),
                    function.position,
                ));
            }
            self.functions.insert(
                function.name.clone(),
                (function.param_types(), function.return_type.clone()),
            );
        }

        for function in program.functions.iter_mut() {
            self.check_function(function)?;
        }
        self.check_run(&mut program.run)?;

        Ok(self.structs)
    }

    // -- scope stack ---------------------------------------------------------

    fn push_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    fn pop_scope(&mut self) {
        self.scopes.pop();
    }

    fn scope_contains(&self, name: &str) -> bool {
        self.scopes
            .last()
            .map(|scope| scope.contains_key(name))
            .unwrap_or(false)
    }

    fn declare(&mut self, name: &str, ty: Type, is_constant: bool) {
        self.scopes
            .last_mut()
            .expect("a scope is always pushed before declare")
            .insert(name.to_string(), Binding { ty, is_constant });
    }

    fn lookup(&self, name: &str) -> Option<&Binding> {
        self.scopes.iter().rev().find_map(|scope| scope.get(name))
    }

    // -- top-level bodies -----------------------------------------------------

    fn check_function(&mut self, function: &mut FunctionDecl) -> Result<(), TypeError> {
        self.push_scope();
        self.const_table.clear();
        for param in &function.params {
            self.declare(&param.name, param.type_annotation.clone(), param.is_constant);
        }
        self.current_return_type = Some(function.return_type.clone());
        for statement in function.body.statements.iter_mut() {
            self.check_statement(statement)?;
        }
        self.current_return_type = None;
        self.pop_scope();
        Ok(())
    }

    fn check_run(&mut self, run: &mut RunBlock) -> Result<(), TypeError> {
        self.push_scope();
        self.const_table.clear();
        self.current_return_type = Some(Type::Void);
        for statement in run.body.statements.iter_mut() {
            self.check_statement(statement)?;
        }
        self.current_return_type = None;
        self.pop_scope();
        Ok(())
    }

    fn check_block_scoped(&mut self, block: &mut Block) -> Result<(), TypeError> {
        self.push_scope();
        for statement in block.statements.iter_mut() {
            self.check_statement(statement)?;
        }
        self.pop_scope();
        Ok(())
    }

    // -- statements -------------------------------------------------------

    fn check_statement(&mut self, statement: &mut Statement) -> Result<(), TypeError> {
        match statement {
            Statement::Declaration(d) => self.check_declaration(d),
            Statement::Assignment(a) => self.check_assignment(a),
            Statement::ArrayAssignment(a) => self.check_array_assignment(a),
            Statement::MemberAssignment(a) => self.check_member_assignment(a),
            Statement::If(s) => self.check_if(s),
            Statement::For(s) => self.check_for(s),
            Statement::Try(s) => self.check_try(s),
            Statement::Repeat(s) => self.check_repeat(s),
            Statement::Return(s) => self.check_return(s),
            Statement::Expression(e) => self.check_expression(e).map(|_| ()),
            Statement::Block(b) => self.check_block_scoped(b),
        }
    }

    fn check_declaration(&mut self, decl: &mut Declaration) -> Result<(), TypeError> {
        if self.scope_contains(&decl.name) {
            return Err(TypeError::new(
                format!("'{}' is already declared in this scope", decl.name),
                decl.position,
            ));
        }
        if decl.is_constant && decl.initializer.is_none() {
            return Err(TypeError::new(
                format!("constant '{}' must have an initializer", decl.name),
                decl.position,
            ));
        }

        if let Some(initializer) = decl.initializer.as_mut() {
            let found = self.check_expression(initializer)?;
            if !found.is_assignable_to(&decl.type_annotation) {
                return Err(TypeError::new(
                    format!(
                        "cannot initialize '{}' of type {} with a value of type {found}",
                        decl.name, decl.type_annotation
                    ),
                    decl.position,
                ));
            }
        }

        self.declare(&decl.name, decl.type_annotation.clone(), decl.is_constant);

        if decl.is_constant {
            if let Some(initializer) = &decl.initializer {
                if let Some(value) = self.fold_const(initializer)? {
                    self.const_table.insert(decl.name.clone(), value.clone());
                    decl.is_compile_time_constant = true;
                    decl.folded_value = Some(value);
                }
            }
        }

        Ok(())
    }

    fn check_assignment(&mut self, assignment: &mut Assignment) -> Result<(), TypeError> {
        let binding = self
            .lookup(&assignment.name)
            .cloned()
            .ok_or_else(|| undefined_variable(&assignment.name, assignment.position))?;
        if binding.is_constant {
            return Err(TypeError::new(
                format!("cannot assign to constant '{}'", assignment.name),
                assignment.position,
            ));
        }
        let value_ty = self.check_expression(&mut assignment.value)?;
        if !value_ty.is_assignable_to(&binding.ty) {
            return Err(TypeError::new(
                format!(
                    "cannot assign a value of type {value_ty} to '{}' of type {}",
                    assignment.name, binding.ty
                ),
                assignment.position,
            ));
        }
        Ok(())
    }

    fn check_array_assignment(&mut self, assignment: &mut ArrayAssignment) -> Result<(), TypeError> {
        let binding = self
            .lookup(&assignment.target.name)
            .cloned()
            .ok_or_else(|| undefined_variable(&assignment.target.name, assignment.position))?;
        if binding.is_constant {
            return Err(TypeError::new(
                format!("cannot assign to constant '{}'", assignment.target.name),
                assignment.position,
            ));
        }
        let Type::Array { element, .. } = &binding.ty else {
            return Err(TypeError::new(
                format!("'{}' is not an array", assignment.target.name),
                assignment.position,
            ));
        };
        let element = element.as_ref().clone();

        let index_ty = self.check_expression(&mut assignment.index)?;
        if !index_ty.is_numeric() {
            return Err(TypeError::new("array index must be numeric", assignment.position));
        }

        let value_ty = self.check_expression(&mut assignment.value)?;
        if !value_ty.is_assignable_to(&element) {
            return Err(TypeError::new(
                format!("cannot assign a value of type {value_ty} to an element of type {element}"),
                assignment.position,
            ));
        }
        Ok(())
    }

    fn check_member_assignment(&mut self, assignment: &mut MemberAssignment) -> Result<(), TypeError> {
        let object_ty = self.check_expression(&mut assignment.object)?;
        let Type::Struct { name, .. } = &object_ty else {
            return Err(TypeError::new(
                format!("cannot access field '{}' on non-struct type {object_ty}", assignment.field),
                assignment.position,
            ));
        };
        let field_ty = self
            .structs
            .field_type(name, &assignment.field)
            .cloned()
            .ok_or_else(|| {
                TypeError::new(
                    format!("struct '{name}' has no field '{}'", assignment.field),
                    assignment.position,
                )
            })?;
        let value_ty = self.check_expression(&mut assignment.value)?;
        if !value_ty.is_assignable_to(&field_ty) {
            return Err(TypeError::new(
                format!("cannot assign a value of type {value_ty} to field '{}' of type {field_ty}", assignment.field),
                assignment.position,
            ));
        }
        Ok(())
    }

    fn check_if(&mut self, stmt: &mut IfStatement) -> Result<(), TypeError> {
        let cond_ty = self.check_expression(&mut stmt.condition)?;
        if !cond_ty.is_boolean() {
            return Err(TypeError::new("if condition must be boolean", stmt.position));
        }
        self.check_block_scoped(&mut stmt.then_block)?;
        for (cond, block) in stmt.else_ifs.iter_mut() {
            let cond_ty = self.check_expression(cond)?;
            if !cond_ty.is_boolean() {
                return Err(TypeError::new("'or' condition must be boolean", block.position));
            }
            self.check_block_scoped(block)?;
        }
        if let Some(else_block) = stmt.else_block.as_mut() {
            self.check_block_scoped(else_block)?;
        }
        Ok(())
    }

    fn check_for(&mut self, stmt: &mut ForStatement) -> Result<(), TypeError> {
        self.push_scope();
        self.check_statement(&mut stmt.init)?;
        let cond_ty = self.check_expression(&mut stmt.condition)?;
        if !cond_ty.is_boolean() {
            self.pop_scope();
            return Err(TypeError::new("for condition must be boolean", stmt.position));
        }
        self.check_statement(&mut stmt.increment)?;
        self.check_block_scoped(&mut stmt.body)?;
        self.pop_scope();
        Ok(())
    }

    fn check_try(&mut self, stmt: &mut TryStatement) -> Result<(), TypeError> {
        self.check_block_scoped(&mut stmt.try_block)?;

        self.push_scope();
        self.declare(&stmt.catch_var, Type::text(), false);
        for statement in stmt.catch_block.statements.iter_mut() {
            self.check_statement(statement)?;
        }
        self.pop_scope();

        if let Some(finally_block) = stmt.finally_block.as_mut() {
            self.check_block_scoped(finally_block)?;
        }
        Ok(())
    }

    fn check_repeat(&mut self, stmt: &mut RepeatStatement) -> Result<(), TypeError> {
        let subject_ty = self.check_expression(&mut stmt.subject)?;
        for case in stmt.cases.iter_mut() {
            let case_ty = self.check_expression(&mut case.value)?;
            if case_ty != subject_ty {
                return Err(TypeError::new(
                    format!("'when' value of type {case_ty} does not match switched type {subject_ty}"),
                    case.body.position,
                ));
            }
            self.check_block_scoped(&mut case.body)?;
        }
        if let Some(fixed) = stmt.fixed.as_mut() {
            self.check_block_scoped(fixed)?;
        }
        Ok(())
    }

    fn check_return(&mut self, stmt: &mut ReturnStatement) -> Result<(), TypeError> {
        let expected = self
            .current_return_type
            .clone()
            .expect("return only reachable inside a function or run body");
        match (stmt.value.as_mut(), &expected) {
            (None, Type::Void) => Ok(()),
            (None, other) => Err(TypeError::new(
                format!("missing return value, expected {other}"),
                stmt.position,
            )),
            (Some(_), Type::Void) => Err(TypeError::new(
                "void context does not accept a return value",
                stmt.position,
            )),
            (Some(value), expected) => {
                let found = self.check_expression(value)?;
                if !found.is_assignable_to(expected) {
                    return Err(TypeError::new(
                        format!("cannot return a value of type {found}, expected {expected}"),
                        stmt.position,
                    ));
                }
                Ok(())
            }
        }
    }

    // -- expressions --------------------------------------------------------

    fn check_expression(&mut self, expr: &mut Expression) -> Result<Type, TypeError> {
        let ty = match expr {
            Expression::Numeric(_) => Type::numeric(),
            Expression::Text(_) => Type::text(),
            Expression::Char(_) => Type::char(),
            Expression::Boolean(_) => Type::boolean(),
            Expression::Null(_) => Type::Null,
            Expression::Ident(ident) => self
                .lookup(&ident.name)
                .map(|b| b.ty.clone())
                .ok_or_else(|| undefined_variable(&ident.name, ident.position))?,
            Expression::Binary(op) => {
                let lhs = self.check_expression(&mut op.lhs)?;
                let rhs = self.check_expression(&mut op.rhs)?;
                self.check_binary(op.verb, &lhs, &rhs, op.position)?
            }
            Expression::Unary(op) => {
                let operand = self.check_expression(&mut op.operand)?;
                use crate::ast::UnaryVerb::*;
                match op.verb {
                    Neg | Pos => {
                        if !operand.is_numeric() {
                            return Err(TypeError::new(
                                format!("unary '{}' requires a numeric operand, found {operand}", op.verb),
                                op.position,
                            ));
                        }
                        Type::numeric()
                    }
                    Not => {
                        if !operand.is_boolean() {
                            return Err(TypeError::new(
                                format!("unary '!!' requires a boolean operand, found {operand}"),
                                op.position,
                            ));
                        }
                        Type::boolean()
                    }
                }
            }
            Expression::Call(call) => self.check_call(call)?,
            Expression::Interpolation(interp) => {
                for sub in interp.exprs.iter_mut() {
                    self.check_expression(sub)?;
                }
                Type::text()
            }
            Expression::Concat(concat) => {
                let lhs = self.check_expression(&mut concat.lhs)?;
                let rhs = self.check_expression(&mut concat.rhs)?;
                for (side, ty) in [("left", &lhs), ("right", &rhs)] {
                    if !(ty.is_numeric() || ty.is_text() || matches!(ty, Type::Char { .. }) || ty.is_boolean()) {
                        return Err(TypeError::new(
                            format!("{side} operand of '+>>' must be numeric, text, char, or boolean, found {ty}"),
                            concat.position,
                        ));
                    }
                }
                Type::text()
            }
            Expression::ArrayLiteral(lit) => {
                if lit.elements.is_empty() {
                    return Err(TypeError::new(
                        "an array literal must have at least one element",
                        lit.position,
                    ));
                }
                let element_ty = self.check_expression(&mut lit.elements[0])?;
                for element in lit.elements.iter_mut().skip(1) {
                    let found = self.check_expression(element)?;
                    if found != element_ty {
                        return Err(TypeError::new(
                            format!("array literal elements must share one type: expected {element_ty}, found {found}"),
                            element.position(),
                        ));
                    }
                }
                Type::array(element_ty, ArrayLength::Fixed(lit.elements.len()))
            }
            Expression::ArrayAccess(access) => {
                let binding = self
                    .lookup(&access.target.name)
                    .cloned()
                    .ok_or_else(|| undefined_variable(&access.target.name, access.position))?;
                let Type::Array { element, .. } = &binding.ty else {
                    return Err(TypeError::new(
                        format!("'{}' is not an array", access.target.name),
                        access.position,
                    ));
                };
                let element = element.as_ref().clone();
                let index_ty = self.check_expression(&mut access.index)?;
                if !index_ty.is_numeric() {
                    return Err(TypeError::new("array index must be numeric", access.position));
                }
                element
            }
            Expression::MemberAccess(access) => {
                let target_ty = self.check_expression(&mut access.target)?;
                let Type::Struct { name, .. } = &target_ty else {
                    return Err(TypeError::new(
                        format!("cannot access field '{}' on non-struct type {target_ty}", access.field),
                        access.position,
                    ));
                };
                self.structs
                    .field_type(name, &access.field)
                    .cloned()
                    .ok_or_else(|| {
                        TypeError::new(
                            format!("struct '{name}' has no field '{}'", access.field),
                            access.position,
                        )
                    })?
            }
            Expression::StructLiteral(lit) => {
                if !self.structs.contains(&lit.type_name) {
                    return Err(TypeError::new(
                        format!("unknown struct '{}'", lit.type_name),
                        lit.position,
                    ));
                }
                let fields = self.structs.fields(&lit.type_name).cloned().unwrap_or_default();
                if lit.fields.len() != fields.len() {
                    return Err(TypeError::new(
                        format!(
                            "struct literal for '{}' must supply exactly its {} field(s)",
                            lit.type_name,
                            fields.len()
                        ),
                        lit.position,
                    ));
                }
                for (field_name, value) in lit.fields.iter_mut() {
                    let declared = fields
                        .iter()
                        .find(|f| &f.name == field_name)
                        .ok_or_else(|| {
                            TypeError::new(
                                format!("struct '{}' has no field '{field_name}'", lit.type_name),
                                value.position(),
                            )
                        })?
                        .type_annotation
                        .clone();
                    let found = self.check_expression(value)?;
                    if !found.is_assignable_to(&declared) {
                        return Err(TypeError::new(
                            format!("field '{field_name}' expects {declared}, found {found}"),
                            value.position(),
                        ));
                    }
                }
                Type::strukt(lit.type_name.clone())
            }
        };
        expr.set_ty(ty.clone());
        Ok(ty)
    }

    fn check_binary(&self, verb: BinaryVerb, lhs: &Type, rhs: &Type, position: crate::ast::Position) -> Result<Type, TypeError> {
        if verb.is_arithmetic() {
            if !lhs.is_numeric() || !rhs.is_numeric() {
                return Err(TypeError::new(
                    format!("'{verb}' requires numeric operands, found {lhs} and {rhs}"),
                    position,
                ));
            }
            return Ok(Type::numeric());
        }
        if verb.is_comparison() {
            if lhs != rhs {
                return Err(TypeError::new(
                    format!("'{verb}' requires equal operand types, found {lhs} and {rhs}"),
                    position,
                ));
            }
            return Ok(Type::boolean());
        }
        if verb.is_logical() {
            if !lhs.is_boolean() || !rhs.is_boolean() {
                return Err(TypeError::new(
                    format!("'{verb}' requires boolean operands, found {lhs} and {rhs}"),
                    position,
                ));
            }
            return Ok(Type::boolean());
        }
        unreachable!("BinaryVerb is exhaustively arithmetic, comparison, or logical")
    }

    fn check_call(&mut self, call: &mut FnCall) -> Result<Type, TypeError> {
        match call.callee.as_str() {
            "print" => {
                if call.args.len() != 1 {
                    return Err(arity_error("print", 1, call.args.len(), call.position));
                }
                self.check_expression(&mut call.args[0])?;
                Ok(Type::Void)
            }
            "read" => {
                if call.args.len() > 1 {
                    return Err(arity_error("read", 1, call.args.len(), call.position));
                }
                if let Some(arg) = call.args.first_mut() {
                    let found = self.check_expression(arg)?;
                    if !found.is_text() {
                        return Err(TypeError::new(
                            format!("'read' prompt must be text, found {found}"),
                            call.position,
                        ));
                    }
                }
                Ok(Type::text())
            }
            name if DOTTED_READERS.iter().any(|(n, _)| *n == name) => {
                if call.args.len() > 1 {
                    return Err(arity_error(name, 1, call.args.len(), call.position));
                }
                if let Some(arg) = call.args.first_mut() {
                    let found = self.check_expression(arg)?;
                    if !found.is_text() {
                        return Err(TypeError::new(
                            format!("'{name}' prompt must be text, found {found}"),
                            call.position,
                        ));
                    }
                }
                let (_, result) = DOTTED_READERS.iter().find(|(n, _)| *n == name).unwrap();
                Ok(result())
            }
            other => {
                let Some((params, return_type)) = self.functions.get(other).cloned() else {
                    return Err(TypeError::new(format!("call to undefined function '{other}'"), call.position));
                };
                if params.len() != call.args.len() {
                    return Err(arity_error(other, params.len(), call.args.len(), call.position));
                }
                for (expected, arg) in params.iter().zip(call.args.iter_mut()) {
                    let found = self.check_expression(arg)?;
                    if !found.is_assignable_to(expected) {
                        return Err(TypeError::new(
                            format!("argument to '{other}' expects {expected}, found {found}"),
                            arg.position(),
                        ));
                    }
                }
                Ok(return_type)
            }
        }
    }

    // -- compile-time constant folding (§4.3) --------------------------------

    fn fold_const(&self, expr: &Expression) -> Result<Option<ConstValue>, TypeError> {
        match expr {
            Expression::Numeric(n) => Ok(Some(ConstValue::Numeric(n.value))),
            Expression::Text(t) => Ok(Some(ConstValue::Text(t.value.clone()))),
            Expression::Char(c) => Ok(Some(ConstValue::Char(c.value))),
            Expression::Boolean(b) => Ok(Some(ConstValue::Boolean(b.value))),
            Expression::Ident(id) => Ok(self.const_table.get(&id.name).cloned()),
            Expression::Binary(op) if op.verb.is_arithmetic() && op.verb != BinaryVerb::Mod => {
                let lhs = self.fold_const(&op.lhs)?;
                let rhs = self.fold_const(&op.rhs)?;
                let (Some(ConstValue::Numeric(l)), Some(ConstValue::Numeric(r))) = (lhs, rhs) else {
                    return Ok(None);
                };
                let value = match op.verb {
                    BinaryVerb::Add => l.wrapping_add(r),
                    BinaryVerb::Sub => l.wrapping_sub(r),
                    BinaryVerb::Mul => l.wrapping_mul(r),
                    BinaryVerb::Div => {
                        if r == 0 {
                            return Err(TypeError::new(
                                "division by zero in constant expression",
                                op.position,
                            ));
                        }
                        l.wrapping_div(r)
                    }
                    _ => unreachable!(),
                };
                Ok(Some(ConstValue::Numeric(value)))
            }
            _ => Ok(None),
        }
    }
}

fn undefined_variable(name: &str, position: crate::ast::Position) -> TypeError {
    TypeError::new(format!("undefined variable '{name}'"), position)
}

fn arity_error(name: &str, expected: usize, found: usize, position: crate::ast::Position) -> TypeError {
    TypeError::new(
        format!("'{name}' expects {expected} argument(s), found {found}"),
        position,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Lexer;
    use crate::parser;

    fn analyze_src(src: &str) -> Result<StructRegistry, TypeError> {
        let mut program = parser::parse(Lexer::tokenize(src)).expect("parses");
        analyze(&mut program)
    }

    #[test]
    fn accepts_well_typed_program() {
        assert!(analyze_src("run { num x = 1 + 2; @print[x]; };").is_ok());
    }

    #[test]
    fn rejects_undefined_variable() {
        let err = analyze_src("run { @print[missing]; };").unwrap_err();
        assert!(err.message.contains("undefined variable"));
    }

    #[test]
    fn rejects_type_mismatched_declaration() {
        let err = analyze_src(r#"run { num x = "hi"; };"#).unwrap_err();
        assert!(err.message.contains("cannot initialize"));
    }

    #[test]
    fn rejects_reassigning_a_constant() {
        let err = analyze_src("run { val num x = 1; x = 2; };").unwrap_err();
        assert!(err.message.contains("cannot assign to constant"));
    }

    #[test]
    fn rejects_constant_without_initializer() {
        let err = analyze_src("run { val num x; };").unwrap_err();
        assert!(err.message.contains("must have an initializer"));
    }

    #[test]
    fn folds_constant_arithmetic() {
        let mut program = parser::parse(Lexer::tokenize("run { val num x = 2 + 3 * 4; };")).unwrap();
        analyze(&mut program).unwrap();
        match &program.run.body.statements[0] {
            Statement::Declaration(d) => {
                assert!(d.is_compile_time_constant);
                assert_eq!(d.folded_value, Some(ConstValue::Numeric(14)));
            }
            other => panic!("expected declaration, got {other:?}"),
        }
    }

    #[test]
    fn rejects_division_by_zero_in_constant() {
        let err = analyze_src("run { val num x = 1 / 0; };").unwrap_err();
        assert!(err.message.contains("division by zero"));
    }

    #[test]
    fn rejects_duplicate_struct() {
        let src = "struct A { num x; }; struct A { num y; }; run { };";
        let err = analyze_src(src).unwrap_err();
        assert!(err.message.contains("already defined"));
    }

    #[test]
    fn struct_literal_requires_every_field() {
        let src = r#"
            struct Point { num x; num y; };
            run { Point p = Point { x: 1 }; };
        "#;
        let err = analyze_src(src).unwrap_err();
        assert!(err.message.contains("exactly its 2 field"));
    }

    #[test]
    fn array_access_requires_numeric_index() {
        let src = r#"run { num[3] xs = [1, 2, 3]; num y = xs["no"]; };"#;
        let err = analyze_src(src).unwrap_err();
        assert!(err.message.contains("array index must be numeric"));
    }

    #[test]
    fn accepts_null_assigned_to_nullable_declaration() {
        let src = "run { num? x = null; };";
        assert!(analyze_src(src).is_ok());
    }

    #[test]
    fn function_call_checks_arity_and_types() {
        let src = r#"
            fnc add[num a, num b]:num { return a + b; }
            run { num x = @add[1, 2]; };
        "#;
        assert!(analyze_src(src).is_ok());
    }

    #[test]
    fn rejects_wrong_arity_call() {
        let src = r#"
            fnc add[num a, num b]:num { return a + b; }
            run { num x = @add[1]; };
        "#;
        let err = analyze_src(src).unwrap_err();
        assert!(err.message.contains("expects 2 argument"));
    }
}
