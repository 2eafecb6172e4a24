use crate::ast::{Position, Type};

#[derive(Debug, Clone, PartialEq)]
pub struct StructField {
    pub name: String,
    pub type_annotation: Type,
}

/// `struct Name { Type field; ... };`
#[derive(Debug, Clone, PartialEq)]
pub struct StructDecl {
    pub name: String,
    pub fields: Vec<StructField>,
    pub position: Position,
}

impl StructDecl {
    pub fn new(name: impl Into<String>, fields: Vec<StructField>, position: Position) -> Self {
        Self {
            name: name.into(),
            fields,
            position,
        }
    }

    pub fn field(&self, name: &str) -> Option<&StructField> {
        self.fields.iter().find(|f| f.name == name)
    }
}
