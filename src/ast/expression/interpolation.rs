use crate::ast::{Expression, Position, Type};

/// A format specifier inside `${expr:fmt}`. An empty specifier (no `:fmt` at
/// all) defaults to `Decimal` at codegen time (see §4.5's `value_to_string_formatted`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatSpec {
    Empty,
    Decimal,
    Float,
    Str,
}

/// A text literal containing `$ident` or `${expr:fmt}` interpolations, parsed
/// by re-scanning the literal's lexeme (§4.2). `parts.len() == exprs.len() + 1`
/// and `formats.len() == exprs.len()`.
#[derive(Debug, Clone, PartialEq)]
pub struct StringInterpolation {
    pub parts: Vec<String>,
    pub exprs: Vec<Expression>,
    pub formats: Vec<FormatSpec>,
    pub position: Position,
    pub ty: Option<Type>,
}

impl StringInterpolation {
    pub fn new(
        parts: Vec<String>,
        exprs: Vec<Expression>,
        formats: Vec<FormatSpec>,
        position: Position,
    ) -> Self {
        debug_assert_eq!(parts.len(), exprs.len() + 1);
        debug_assert_eq!(formats.len(), exprs.len());
        Self {
            parts,
            exprs,
            formats,
            position,
            ty: None,
        }
    }
}
