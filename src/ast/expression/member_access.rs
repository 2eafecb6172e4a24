use crate::ast::{Expression, Position, Type};

/// `target->field` — struct field access.
#[derive(Debug, Clone, PartialEq)]
pub struct MemberAccess {
    pub target: Box<Expression>,
    pub field: String,
    pub position: Position,
    pub ty: Option<Type>,
}

impl MemberAccess {
    pub fn new(target: Expression, field: impl Into<String>, position: Position) -> Self {
        Self {
            target: Box::new(target),
            field: field.into(),
            position,
            ty: None,
        }
    }
}
