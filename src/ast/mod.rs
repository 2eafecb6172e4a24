//! Abstract syntax tree for the lite source language.
//!
//! Every node carries a source [`Position`]; expression nodes additionally carry
//! a [`Type`] once the typechecker has run (`None` beforehand). The tree is
//! built once by the parser, mutated only by the typechecker (to fill in types
//! and fold constants), then read-only for codegen.

mod const_value;
mod expression;
mod item;
mod position;
mod statement;
mod types;

pub use const_value::ConstValue;
pub use expression::*;
pub use item::*;
pub use position::Position;
pub use statement::*;
pub use types::{ArrayLength, Type};

/// Root of a parsed program: zero or more struct declarations, zero or more
/// function declarations, and exactly one run block.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub structs: Vec<StructDecl>,
    pub functions: Vec<FunctionDecl>,
    pub run: RunBlock,
}

impl Program {
    pub fn new(structs: Vec<StructDecl>, functions: Vec<FunctionDecl>, run: RunBlock) -> Self {
        Self {
            structs,
            functions,
            run,
        }
    }
}
