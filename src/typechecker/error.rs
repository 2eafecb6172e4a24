use std::fmt::Display;

use crate::ast::Position;

/// A semantic failure. Analysis halts on the first one (§4.3: "the first
/// semantic failure halts analysis"); there is no error recovery.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeError {
    pub message: String,
    pub position: Position,
}

impl TypeError {
    pub fn new(message: impl Into<String>, position: Position) -> Self {
        Self {
            message: message.into(),
            position,
        }
    }
}

impl Display for TypeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.position, self.message)
    }
}

impl std::error::Error for TypeError {}
