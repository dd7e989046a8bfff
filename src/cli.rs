//! Command-line surface: `program server <port>` and
//! `program client <host> <port> <N> [<file>]`.

use clap::{Parser, Subcommand};

/// Stack-machine program evaluator: run as a server that executes a
/// streamed program, or as a client that streams one and prints the
/// result.
#[derive(Parser, Debug)]
#[command(about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run as the server: bind `port`, accept exactly one connection, and
    /// execute the program it streams.
    Server {
        /// TCP port to listen on.
        port: String,
    },

    /// Run as the client: connect to `host:port`, announce `var_count`
    /// variables, then stream the program from `file` (or standard input
    /// if omitted).
    Client {
        /// Server host to connect to.
        host: String,
        /// Server port to connect to.
        port: String,
        /// Number of variables the server should report back.
        var_count: i32,
        /// Binary program file; reads standard input when omitted.
        file: Option<String>,
    },
}
