use crate::ast::{Expression, Position, Type};

/// A call `@name[args...]`. Built-ins (`print`, `read`, `num.read`, ...) are
/// recognized by name at typecheck/codegen time; there is no separate AST
/// variant for them.
#[derive(Debug, Clone, PartialEq)]
pub struct FnCall {
    pub callee: String,
    pub args: Vec<Expression>,
    pub position: Position,
    pub ty: Option<Type>,
}

impl FnCall {
    pub fn new(callee: impl Into<String>, args: Vec<Expression>, position: Position) -> Self {
        Self {
            callee: callee.into(),
            args,
            position,
            ty: None,
        }
    }
}
