//! Framed wire protocol shared by the client and server endpoints.
//!
//! ```text
//! [count: int32 big-endian] [program: raw bytes ...]  --- write-side FIN ---
//! <- [var_0: int32 big-endian] [var_1: int32 big-endian] ... [var_{N-1}]
//! ```
//!
//! No length prefix is attached to the program (its end is the client's
//! half-close) or to the reply (its length is implicitly `N`, the value
//! the client originally sent).

pub mod client;
pub mod server;

use std::fmt::{Display, Formatter};
use std::io::{self, Read, Write};
use std::net::TcpStream;

/// The chunk size both endpoints stream program bytes in. Chosen to match
/// the reference implementation.
pub const CHUNK_SIZE: usize = 100;

#[derive(Debug)]
pub enum WireError {
    /// connect/bind/accept/send/recv returned an OS error.
    ConnectionFailed(io::Error),
    /// The peer half-closed (or the file ended) before the expected number
    /// of bytes arrived.
    ShortRead,
}

impl Display for WireError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            WireError::ConnectionFailed(err) => write!(f, "connection failed: {err}"),
            WireError::ShortRead => write!(f, "short read: peer closed before expected bytes arrived"),
        }
    }
}

impl std::error::Error for WireError {}

impl From<io::Error> for WireError {
    fn from(err: io::Error) -> Self {
        WireError::ConnectionFailed(err)
    }
}

/// Reads exactly `buf.len()` bytes, mapping a premature EOF to
/// [`WireError::ShortRead`] rather than the generic I/O error `read_exact`
/// would otherwise report.
fn read_exact_or_short(stream: &mut impl Read, buf: &mut [u8]) -> Result<(), WireError> {
    match stream.read_exact(buf) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == io::ErrorKind::UnexpectedEof => Err(WireError::ShortRead),
        Err(err) => Err(WireError::ConnectionFailed(err)),
    }
}

fn read_i32_be(stream: &mut impl Read) -> Result<i32, WireError> {
    let mut buf = [0u8; 4];
    read_exact_or_short(stream, &mut buf)?;
    Ok(i32::from_be_bytes(buf))
}

fn write_i32_be(stream: &mut impl Write, value: i32) -> Result<(), WireError> {
    stream.write_all(&value.to_be_bytes())?;
    Ok(())
}

/// Streams `source` onto `stream` in [`CHUNK_SIZE`]-byte chunks, feeding
/// each chunk to `on_chunk` as it is sent.
fn stream_chunks(
    source: &mut impl Read,
    stream: &mut TcpStream,
    mut on_chunk: impl FnMut(&[u8]),
) -> Result<(), WireError> {
    let mut buffer = [0u8; CHUNK_SIZE];
    loop {
        let bytes_read = source.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        let chunk = &buffer[..bytes_read];
        stream.write_all(chunk)?;
        on_chunk(chunk);
    }
    Ok(())
}

fn print_variables_dump(title: &str, values: impl Iterator<Item = i32>) {
    println!("{title}");
    for value in values {
        println!("{value:08x}");
    }
}
