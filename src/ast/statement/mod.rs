mod array_assignment;
mod assignment;
mod block;
mod declaration;
mod for_statement;
mod if_statement;
mod member_assignment;
mod repeat_statement;
mod return_statement;
mod try_statement;

pub use array_assignment::ArrayAssignment;
pub use assignment::Assignment;
pub use block::Block;
pub use declaration::Declaration;
pub use for_statement::ForStatement;
pub use if_statement::IfStatement;
pub use member_assignment::MemberAssignment;
pub use repeat_statement::{RepeatStatement, WhenCase};
pub use return_statement::ReturnStatement;
pub use try_statement::TryStatement;

use super::{Expression, Position};

/// A statement node. Every variant carries its own [`Position`].
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Declaration(Declaration),
    Assignment(Assignment),
    ArrayAssignment(ArrayAssignment),
    MemberAssignment(MemberAssignment),
    If(IfStatement),
    For(ForStatement),
    Try(TryStatement),
    Repeat(RepeatStatement),
    Return(ReturnStatement),
    Expression(Expression),
    Block(Block),
}

impl Statement {
    pub fn position(&self) -> Position {
        match self {
            Statement::Declaration(s) => s.position,
            Statement::Assignment(s) => s.position,
            Statement::ArrayAssignment(s) => s.position,
            Statement::MemberAssignment(s) => s.position,
            Statement::If(s) => s.position,
            Statement::For(s) => s.position,
            Statement::Try(s) => s.position,
            Statement::Repeat(s) => s.position,
            Statement::Return(s) => s.position,
            Statement::Expression(e) => e.position(),
            Statement::Block(s) => s.position,
        }
    }
}
