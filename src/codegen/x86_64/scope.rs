//! Stack-slot and constant-binding tracking for one function/run body (§9:
//! "a stack-of-scopes ... Vec<HashMap<String, i64>>, push on entry, pop on
//! exit").

use std::collections::HashMap;

use crate::ast::{ConstValue, Type};
use crate::asm::InstructionSize;

/// Where a name's value lives once resolved.
#[derive(Debug, Clone)]
pub enum Slot {
    /// A value spilled to `offset(%rbp)`. `base` is the lowest (most
    /// negative) byte offset the binding occupies; arrays and structs span
    /// more than one 8-byte slot starting there.
    Stack {
        base: i64,
        size: InstructionSize,
        ty: Type,
    },
    /// A compile-time constant (§4.5, §8): no stack slot, referenced as an
    /// immediate/label directly at every use site.
    Const(ConstValue),
}

/// Per-function frame state: the scope stack of name bindings and the next
/// free stack offset.
#[derive(Debug)]
pub struct Frame {
    scopes: Vec<HashMap<String, Slot>>,
    next_offset: i64,
}

impl Frame {
    pub fn new() -> Self {
        Self {
            scopes: vec![HashMap::new()],
            next_offset: 0,
        }
    }

    pub fn push_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    pub fn pop_scope(&mut self) {
        self.scopes.pop();
    }

    /// Reserves `bytes` of stack space (rounded up to a qword) and returns
    /// the base offset of the reservation.
    pub fn alloc(&mut self, bytes: i64) -> i64 {
        let rounded = ((bytes + 7) / 8) * 8;
        self.next_offset -= rounded.max(8);
        self.next_offset
    }

    /// Total frame size needed for the prologue's `subq $n, %rsp` — unused
    /// here since every slot is addressed directly off `%rbp`, but kept for
    /// callers that want to reserve the whole frame up front.
    pub fn frame_size(&self) -> i64 {
        -self.next_offset
    }

    pub fn declare_stack(&mut self, name: impl Into<String>, base: i64, ty: Type) {
        let size = InstructionSize::from(&ty);
        self.scopes
            .last_mut()
            .expect("frame always has at least one scope")
            .insert(name.into(), Slot::Stack { base, size, ty });
    }

    pub fn declare_const(&mut self, name: impl Into<String>, value: ConstValue) {
        self.scopes
            .last_mut()
            .expect("frame always has at least one scope")
            .insert(name.into(), Slot::Const(value));
    }

    pub fn lookup(&self, name: &str) -> Option<&Slot> {
        self.scopes.iter().rev().find_map(|s| s.get(name))
    }
}

impl Default for Frame {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocations_do_not_overlap() {
        let mut frame = Frame::new();
        let a = frame.alloc(8);
        let b = frame.alloc(8);
        assert_ne!(a, b);
        assert!((a - b).abs() >= 8);
    }

    #[test]
    fn array_allocation_is_contiguous() {
        let mut frame = Frame::new();
        let base = frame.alloc(4 * 8);
        for i in 0..4i64 {
            let elem = base + i * 8;
            assert!(elem <= 0);
        }
    }

    #[test]
    fn inner_scope_shadows_outer() {
        let mut frame = Frame::new();
        frame.declare_const("x", ConstValue::Numeric(1));
        frame.push_scope();
        frame.declare_const("x", ConstValue::Numeric(2));
        match frame.lookup("x") {
            Some(Slot::Const(ConstValue::Numeric(n))) => assert_eq!(*n, 2),
            _ => panic!("expected shadowed const"),
        }
        frame.pop_scope();
        match frame.lookup("x") {
            Some(Slot::Const(ConstValue::Numeric(n))) => assert_eq!(*n, 1),
            _ => panic!("expected outer const after pop"),
        }
    }
}
