use crate::ast::{Expression, Position, Type};

/// `StructName { field: value, ... }` in source order.
#[derive(Debug, Clone, PartialEq)]
pub struct StructLiteral {
    pub type_name: String,
    pub fields: Vec<(String, Expression)>,
    pub position: Position,
    pub ty: Option<Type>,
}

impl StructLiteral {
    pub fn new(type_name: impl Into<String>, fields: Vec<(String, Expression)>, position: Position) -> Self {
        Self {
            type_name: type_name.into(),
            fields,
            position,
            ty: None,
        }
    }
}
