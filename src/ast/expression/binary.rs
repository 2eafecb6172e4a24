use std::fmt::Display;

use crate::ast::{Expression, Position, Type};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryVerb {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Eq,
    Neq,
    Lt,
    Gt,
    Le,
    Ge,
    And,
    Or,
}

impl BinaryVerb {
    pub fn is_arithmetic(&self) -> bool {
        matches!(
            self,
            BinaryVerb::Add
                | BinaryVerb::Sub
                | BinaryVerb::Mul
                | BinaryVerb::Div
                | BinaryVerb::Mod
        )
    }

    pub fn is_comparison(&self) -> bool {
        matches!(
            self,
            BinaryVerb::Eq
                | BinaryVerb::Neq
                | BinaryVerb::Lt
                | BinaryVerb::Gt
                | BinaryVerb::Le
                | BinaryVerb::Ge
        )
    }

    pub fn is_logical(&self) -> bool {
        matches!(self, BinaryVerb::And | BinaryVerb::Or)
    }
}

impl Display for BinaryVerb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            BinaryVerb::Add => "+",
            BinaryVerb::Sub => "-",
            BinaryVerb::Mul => "*",
            BinaryVerb::Div => "/",
            BinaryVerb::Mod => "%",
            BinaryVerb::Eq => "==",
            BinaryVerb::Neq => "!=",
            BinaryVerb::Lt => "<",
            BinaryVerb::Gt => ">",
            BinaryVerb::Le => "<=",
            BinaryVerb::Ge => ">=",
            BinaryVerb::And => "&&",
            BinaryVerb::Or => "||",
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BinaryOp {
    pub lhs: Box<Expression>,
    pub verb: BinaryVerb,
    pub rhs: Box<Expression>,
    pub position: Position,
    pub ty: Option<Type>,
}

impl BinaryOp {
    pub fn new(lhs: Expression, verb: BinaryVerb, rhs: Expression, position: Position) -> Self {
        Self {
            lhs: Box::new(lhs),
            verb,
            rhs: Box::new(rhs),
            position,
            ty: None,
        }
    }
}
