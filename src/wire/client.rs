//! Client endpoint: connect, announce the variable count, stream a program,
//! half-close, then read back and print the resulting variables.

use std::io::Read;
use std::net::TcpStream;

use super::{print_variables_dump, read_i32_be, stream_chunks, write_i32_be, WireError};

/// Connects to `host:port`, sends `var_count`, streams `source` as the
/// program, half-closes the write side, then prints the `var_count`
/// variables the server sends back.
pub fn run_client(
    host: &str,
    port: &str,
    var_count: i32,
    mut source: impl Read,
) -> Result<(), WireError> {
    let mut stream = TcpStream::connect((host, port.parse::<u16>().map_err(|_| {
        WireError::ConnectionFailed(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "invalid port",
        ))
    })?))?;

    write_i32_be(&mut stream, var_count)?;

    stream_chunks(&mut source, &mut stream, |_chunk| {})?;

    stream.shutdown(std::net::Shutdown::Write)?;

    let mut values = Vec::with_capacity(var_count.max(0) as usize);
    for _ in 0..var_count.max(0) {
        values.push(read_i32_be(&mut stream)?);
    }

    print_variables_dump("Variables dump", values.into_iter());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::net::TcpListener;
    use std::thread;

    #[test]
    fn client_sends_count_then_program_then_reads_reply() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        let server = thread::spawn(move || {
            let (mut conn, _) = listener.accept().unwrap();
            let mut count_buf = [0u8; 4];
            conn.read_exact(&mut count_buf).unwrap();
            assert_eq!(i32::from_be_bytes(count_buf), 1);

            let mut program = Vec::new();
            conn.read_to_end(&mut program).unwrap();
            assert_eq!(program, vec![0x10, 0x05, 0x36, 0x00]);

            conn.write_all(&5i32.to_be_bytes()).unwrap();
        });

        let program: &[u8] = &[0x10, 0x05, 0x36, 0x00];
        run_client("127.0.0.1", &addr.port().to_string(), 1, program).unwrap();

        server.join().unwrap();
    }
}
