use crate::ast::{Block, Position, Type};

#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub type_annotation: Type,
    pub name: String,
    pub is_constant: bool,
}

/// `fnc Name [ (val? Type paramName),* ] : ReturnType { body }`
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDecl {
    pub name: String,
    pub params: Vec<Param>,
    pub return_type: Type,
    pub body: Block,
    pub position: Position,
}

impl FunctionDecl {
    pub fn new(
        name: impl Into<String>,
        params: Vec<Param>,
        return_type: Type,
        body: Block,
        position: Position,
    ) -> Self {
        Self {
            name: name.into(),
            params,
            return_type,
            body,
            position,
        }
    }

    pub fn param_types(&self) -> Vec<Type> {
        self.params.iter().map(|p| p.type_annotation.clone()).collect()
    }
}
