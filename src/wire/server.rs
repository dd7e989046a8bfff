//! Server endpoint: accept exactly one connection, read the variable
//! count, drive the execution engine over the streamed program, then dump
//! and send back the variable array.

use std::fmt::{Display, Formatter};
use std::io::Read;
use std::net::{TcpListener, TcpStream};

use crate::engine::{Engine, EngineError};
use crate::vararray::VarArrayError;

use super::{print_variables_dump, read_i32_be, write_i32_be, WireError, CHUNK_SIZE};

#[derive(Debug)]
pub enum ServerError {
    Wire(WireError),
    InvalidCount(VarArrayError),
    /// A runtime error occurred while executing the program. The reply was
    /// still sent (see the module-level docs and spec.md's error handling
    /// section); this is only surfaced so `main` can exit 1.
    Runtime(EngineError),
}

impl Display for ServerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ServerError::Wire(err) => write!(f, "{err}"),
            ServerError::InvalidCount(err) => write!(f, "{err}"),
            ServerError::Runtime(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for ServerError {}

impl From<WireError> for ServerError {
    fn from(err: WireError) -> Self {
        ServerError::Wire(err)
    }
}

/// Binds `port`, accepts a single connection, and runs one session to
/// completion.
pub fn run_server(port: &str) -> Result<(), ServerError> {
    let listener = TcpListener::bind(("0.0.0.0", port.parse::<u16>().map_err(|_| {
        WireError::ConnectionFailed(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "invalid port",
        ))
    })?))
    .map_err(WireError::from)?;

    let (mut conn, _) = listener.accept().map_err(WireError::from)?;
    run_session(&mut conn)
}

/// Runs one server session over an already-accepted connection. Split out
/// from [`run_server`] so tests can drive it directly over a loopback
/// socket pair without needing a dedicated listener per test.
pub fn run_session(conn: &mut TcpStream) -> Result<(), ServerError> {
    let var_count = read_i32_be(conn)?;

    let mut engine =
        Engine::new(var_count, std::io::stdout()).map_err(ServerError::InvalidCount)?;

    println!("Bytecode trace");

    let mut buffer = [0u8; CHUNK_SIZE];
    loop {
        let bytes_read = conn.read(&mut buffer).map_err(WireError::from)?;
        if bytes_read == 0 {
            break;
        }
        engine.feed(&buffer[..bytes_read]).map_err(WireError::from)?;
    }
    engine.finish();

    println!();
    print_variables_dump("Variables dump", engine.vars().iter());

    for value in engine.vars().iter() {
        write_i32_be(conn, value)?;
    }

    match engine.first_error() {
        Some(err) => Err(ServerError::Runtime(*err)),
        None => Ok(()),
    }
}
