use crate::ast::{Expression, Position, Type};

#[derive(Debug, Clone, PartialEq)]
pub struct ArrayLiteral {
    pub elements: Vec<Expression>,
    pub position: Position,
    pub ty: Option<Type>,
}

impl ArrayLiteral {
    pub fn new(elements: Vec<Expression>, position: Position) -> Self {
        Self {
            elements,
            position,
            ty: None,
        }
    }
}
