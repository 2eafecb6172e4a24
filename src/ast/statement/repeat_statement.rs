use crate::ast::{Block, Expression, Position};

/// One `when [value] {...}` arm of a [`RepeatStatement`].
#[derive(Debug, Clone, PartialEq)]
pub struct WhenCase {
    pub value: Expression,
    pub body: Block,
}

/// `repeat [expr] { when [v] {...} ... fixed {...} }` — a switch with no
/// fallthrough between cases; `fixed` is the optional default arm.
#[derive(Debug, Clone, PartialEq)]
pub struct RepeatStatement {
    pub subject: Expression,
    pub cases: Vec<WhenCase>,
    pub fixed: Option<Block>,
    pub position: Position,
}

impl RepeatStatement {
    pub fn new(
        subject: Expression,
        cases: Vec<WhenCase>,
        fixed: Option<Block>,
        position: Position,
    ) -> Self {
        Self {
            subject,
            cases,
            fixed,
            position,
        }
    }
}
