use std::collections::HashMap;

use crate::ast::{StructDecl, StructField, Type};

use super::error::TypeError;

/// Maps a registered struct name to its ordered field list (§3.1).
///
/// Built in semantic pass 1 and threaded through the rest of analysis and
/// the backend as an explicit value — its lifetime is exactly one `analyze`
/// call, never a process-wide global.
#[derive(Debug, Clone, Default)]
pub struct StructRegistry {
    structs: HashMap<String, Vec<StructField>>,
}

impl StructRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, decl: &StructDecl) -> Result<(), TypeError> {
        if self.structs.contains_key(&decl.name) {
            return Err(TypeError::new(
                format!("struct '{}' is already defined", decl.name),
                decl.position,
            ));
        }
        self.structs.insert(decl.name.clone(), decl.fields.clone());
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.structs.contains_key(name)
    }

    pub fn fields(&self, name: &str) -> Option<&Vec<StructField>> {
        self.structs.get(name)
    }

    pub fn field_type(&self, name: &str, field: &str) -> Option<&Type> {
        self.fields(name)?
            .iter()
            .find(|f| f.name == field)
            .map(|f| &f.type_annotation)
    }
}
