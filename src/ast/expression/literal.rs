use crate::ast::{Position, Type};

#[derive(Debug, Clone, PartialEq)]
pub struct NumericLiteral {
    pub value: i64,
    pub is_integer: bool,
    pub position: Position,
    pub ty: Option<Type>,
}

impl NumericLiteral {
    pub fn new(value: i64, is_integer: bool, position: Position) -> Self {
        Self {
            value,
            is_integer,
            position,
            ty: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextLiteral {
    pub value: String,
    pub position: Position,
    pub ty: Option<Type>,
}

impl TextLiteral {
    pub fn new(value: impl Into<String>, position: Position) -> Self {
        Self {
            value: value.into(),
            position,
            ty: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CharLiteral {
    pub value: u8,
    pub position: Position,
    pub ty: Option<Type>,
}

impl CharLiteral {
    pub fn new(value: u8, position: Position) -> Self {
        Self {
            value,
            position,
            ty: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BooleanLiteral {
    pub value: bool,
    pub position: Position,
    pub ty: Option<Type>,
}

impl BooleanLiteral {
    pub fn new(value: bool, position: Position) -> Self {
        Self {
            value,
            position,
            ty: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NullLiteral {
    pub position: Position,
    pub ty: Option<Type>,
}

impl NullLiteral {
    pub fn new(position: Position) -> Self {
        Self { position, ty: None }
    }
}
