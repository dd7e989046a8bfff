use clap::Parser;
use stackwire::cli::{Cli, Command};
use stackwire::wire::client::run_client;
use stackwire::wire::server::run_server;
use std::fs::File;
use std::io::{self, Read};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // `Cli::parse()` would exit 2 on a parse failure via clap's own
    // `Error::exit()`; spec.md's `InvalidArgs` taxonomy requires exit 1.
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            eprint!("{err}");
            std::process::exit(1);
        }
    };

    match cli.command {
        Command::Server { port } => run_server(&port).map_err(|err| {
            eprintln!("{}", err);
            err
        })?,
        Command::Client {
            host,
            port,
            var_count,
            file,
        } => {
            let source = open_source(file)?;
            run_client(&host, &port, var_count, source).map_err(|err| {
                eprintln!("{}", err);
                err
            })?
        }
    }

    Ok(())
}

/// Opens the named file, or falls back to standard input when `file` is
/// `None`. Boxed so both branches of the `client` command share one type.
fn open_source(file: Option<String>) -> io::Result<Box<dyn Read>> {
    match file {
        Some(path) => Ok(Box::new(File::open(path)?)),
        None => Ok(Box::new(io::stdin())),
    }
}
