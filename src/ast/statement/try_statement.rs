use crate::ast::{Block, Position};

/// `try {...} catch[err] {...} finally {...}`.
///
/// There is no unwinding runtime (§4.5, §9): codegen always emits `try_block`,
/// never emits `catch_block`, and always emits `finally_block` after. This
/// node still parses `catch_var`/`catch_block` so the source grammar round-trips;
/// nothing in the backend ever jumps to the catch body.
#[derive(Debug, Clone, PartialEq)]
pub struct TryStatement {
    pub try_block: Block,
    pub catch_var: String,
    pub catch_block: Block,
    pub finally_block: Option<Block>,
    pub position: Position,
}

impl TryStatement {
    pub fn new(
        try_block: Block,
        catch_var: impl Into<String>,
        catch_block: Block,
        finally_block: Option<Block>,
        position: Position,
    ) -> Self {
        Self {
            try_block,
            catch_var: catch_var.into(),
            catch_block,
            finally_block,
            position,
        }
    }
}
