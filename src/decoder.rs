//! Turns a byte window into a decoded instruction.
//!
//! The decoder is a pure function of `(buf, pos)`: it never owns a cursor
//! and never blocks. The engine (see [`crate::engine`]) is responsible for
//! re-invoking it as new chunks arrive and for carrying any unconsumed tail
//! byte across a chunk boundary.

use crate::opcode::{Opcode, OperandShape};

/// Result of decoding the byte at `pos`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decoded {
    /// A fully decoded instruction; `consumed` bytes should be skipped
    /// before the next call.
    Op { op: Opcode, consumed: usize },

    /// `buf[pos]` is not a known opcode; skip exactly one byte.
    Skip { consumed: usize },

    /// The opcode at `pos` needs an inline operand byte that is not yet
    /// available in `buf`. The caller should stop decoding this chunk and
    /// retry once more bytes arrive, re-presenting the byte at `pos`.
    NeedMore,
}

/// Decode the instruction starting at `pos` in `buf`.
///
/// Panics if `pos >= buf.len()`; callers must only invoke this while there
/// is at least one byte left to inspect.
pub fn decode(buf: &[u8], pos: usize) -> Decoded {
    let byte = buf[pos];

    let Some(shape) = Opcode::from_wire_byte(byte) else {
        return Decoded::Skip { consumed: 1 };
    };

    match shape {
        OperandShape::None => Decoded::Op {
            op: Opcode::build(byte, None).expect("shape implies a valid opcode"),
            consumed: 1,
        },
        OperandShape::SignedByte | OperandShape::UnsignedByte => {
            if pos + 1 < buf.len() {
                let operand = buf[pos + 1];
                Decoded::Op {
                    op: Opcode::build(byte, Some(operand)).expect("shape implies a valid opcode"),
                    consumed: 2,
                }
            } else {
                Decoded::NeedMore
            }
        }
    }
}
