//! Execution engine: drives the decoder over an incoming byte stream and
//! applies each decoded instruction to the operand stack and variable
//! array.

use std::fmt::{Display, Formatter};
use std::io::{self, Write};

use crate::decoder::{decode, Decoded};
use crate::opcode::Opcode;
use crate::stack::{OperandStack, StackError};
use crate::vararray::{VarArray, VarArrayError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineError {
    Stack(StackError),
    VarArray(VarArrayError),
    /// `idiv`/`irem` with a zero divisor, or with the pair `(i32::MIN, -1)`
    /// which two's-complement division cannot represent.
    DivideByZero,
}

impl Display for EngineError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineError::Stack(err) => write!(f, "{err}"),
            EngineError::VarArray(err) => write!(f, "{err}"),
            EngineError::DivideByZero => write!(f, "division by zero"),
        }
    }
}

impl std::error::Error for EngineError {}

impl From<StackError> for EngineError {
    fn from(err: StackError) -> Self {
        EngineError::Stack(err)
    }
}

impl From<VarArrayError> for EngineError {
    fn from(err: VarArrayError) -> Self {
        EngineError::VarArray(err)
    }
}

/// One successfully decoded-and-executed instruction, recorded for
/// introspection (e.g. in tests). Not part of the wire protocol itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Executed {
    pub mnemonic: &'static str,
    pub offset: usize,
}

/// Owns one operand stack and one variable array per session, and the sink
/// that instruction mnemonics are traced to.
pub struct Engine<W: Write> {
    stack: OperandStack,
    vars: VarArray,
    trace: W,
    /// Bytes left over from the previous `feed` call because the last
    /// opcode in it needed an inline operand that hadn't arrived yet. At
    /// most one byte, since every instruction is at most two bytes long.
    carry: Vec<u8>,
    total_consumed: usize,
    halted: bool,
    first_error: Option<EngineError>,
    executed: Vec<Executed>,
}

impl<W: Write> Engine<W> {
    pub fn new(var_count: i32, trace: W) -> Result<Self, VarArrayError> {
        Ok(Engine {
            stack: OperandStack::new(),
            vars: VarArray::new(var_count)?,
            trace,
            carry: Vec::new(),
            total_consumed: 0,
            halted: false,
            first_error: None,
            executed: Vec::new(),
        })
    }

    /// Feeds one chunk of program bytes to the engine. Decodes and
    /// executes as many instructions as the chunk (plus any carried-over
    /// tail byte) allows; a trailing byte that needs an operand not yet
    /// present is kept for the next call.
    ///
    /// Once an instruction fails, the engine stops decoding — further
    /// calls to `feed` are no-ops — but the variable array is left exactly
    /// as the successful instructions before it left it, ready to be
    /// dumped.
    pub fn feed(&mut self, chunk: &[u8]) -> io::Result<()> {
        if self.halted {
            return Ok(());
        }

        let mut buf = std::mem::take(&mut self.carry);
        buf.extend_from_slice(chunk);

        let mut pos = 0;
        while pos < buf.len() {
            if self.halted {
                break;
            }

            match decode(&buf, pos) {
                Decoded::Op { op, consumed } => {
                    let offset = self.total_consumed + pos;
                    match self.eval(op) {
                        Ok(()) => {
                            if cfg!(feature = "verbose") {
                                eprintln!("[LOG] offset {offset} op {op:?}");
                            }
                            writeln!(self.trace, "{}", op.mnemonic())?;
                            self.executed.push(Executed {
                                mnemonic: op.mnemonic(),
                                offset,
                            });
                        }
                        Err(err) => {
                            self.halted = true;
                            self.first_error = Some(err);
                        }
                    }
                    pos += consumed;
                }
                Decoded::Skip { consumed } => pos += consumed,
                Decoded::NeedMore => break,
            }
        }

        self.total_consumed += pos;
        self.carry = buf[pos..].to_vec();
        Ok(())
    }

    /// Called once the peer has half-closed the connection. Any byte still
    /// carried over (an opcode that never got its operand) is a malformed
    /// tail and is discarded without raising an error — this is the
    /// spec's "truncated program at end of input" case, treated as benign
    /// end-of-stream.
    pub fn finish(&mut self) {
        self.carry.clear();
    }

    fn eval(&mut self, op: Opcode) -> Result<(), EngineError> {
        match op {
            Opcode::Bipush { imm } => self.stack.push(imm as i32)?,
            Opcode::Dup => {
                let top = self.stack.peek()?;
                self.stack.push(top)?;
            }
            Opcode::Iadd => {
                let a = self.stack.pop()?;
                let b = self.stack.pop()?;
                self.stack.push(b.wrapping_add(a))?;
            }
            Opcode::Isub => {
                let a = self.stack.pop()?;
                let b = self.stack.pop()?;
                self.stack.push(b.wrapping_sub(a))?;
            }
            Opcode::Imul => {
                let a = self.stack.pop()?;
                let b = self.stack.pop()?;
                self.stack.push(b.wrapping_mul(a))?;
            }
            Opcode::Idiv => {
                let a = self.stack.pop()?;
                let b = self.stack.pop()?;
                if a == 0 || (a == -1 && b == i32::MIN) {
                    return Err(EngineError::DivideByZero);
                }
                self.stack.push(b.wrapping_div(a))?;
            }
            Opcode::Irem => {
                let a = self.stack.pop()?;
                let b = self.stack.pop()?;
                if a == 0 || (a == -1 && b == i32::MIN) {
                    return Err(EngineError::DivideByZero);
                }
                self.stack.push(b.wrapping_rem(a))?;
            }
            Opcode::Ineg => {
                let a = self.stack.pop()?;
                self.stack.push(a.wrapping_neg())?;
            }
            Opcode::Iand => {
                let a = self.stack.pop()?;
                let b = self.stack.pop()?;
                self.stack.push(b & a)?;
            }
            Opcode::Ior => {
                let a = self.stack.pop()?;
                let b = self.stack.pop()?;
                self.stack.push(b | a)?;
            }
            Opcode::Ixor => {
                let a = self.stack.pop()?;
                let b = self.stack.pop()?;
                self.stack.push(b ^ a)?;
            }
            Opcode::Istore { idx } => {
                let v = self.stack.pop()?;
                self.vars.set(idx, v)?;
            }
            Opcode::Iload { idx } => {
                let v = self.vars.get(idx)?;
                self.stack.push(v)?;
            }
        }
        Ok(())
    }

    pub fn first_error(&self) -> Option<&EngineError> {
        self.first_error.as_ref()
    }

    pub fn executed(&self) -> &[Executed] {
        &self.executed
    }

    pub fn vars(&self) -> &VarArray {
        &self.vars
    }

    pub fn into_vars(self) -> VarArray {
        self.vars
    }
}
