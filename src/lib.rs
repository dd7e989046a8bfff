//! Stack-machine client/server library: opcode table, decoder, execution
//! engine, and the framed wire protocol that couples them to a single TCP
//! connection.

pub mod cli;
pub mod decoder;
pub mod engine;
pub mod opcode;
pub mod stack;
pub mod vararray;
pub mod wire;
