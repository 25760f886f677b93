//! Reference round-trip collaborator.
//!
//! Reads TyTx text on standard input, decodes it into a Bag, and writes the
//! Bag back to standard output as TyTx text in the density the input used.
//! Exits with status 1 and a message on standard error if decoding fails.
//! Logging goes to standard error and is controlled by `RUST_LOG`.

use std::io::{self, Read, Write};
use std::process::ExitCode;
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;
use tytx_bag::{Decoder, Encoder, Error, Result, Transport, TytxOptions};

fn run() -> Result<()> {
    let mut input = Vec::new();
    io::stdin()
        .read_to_end(&mut input)
        .map_err(|e| Error::io(&e.to_string()))?;
    debug!(bytes = input.len(), "read request");

    let (bag, density) = Decoder::new(Transport::Text).decode_with_density(&input)?;
    let reply = Encoder::new(TytxOptions::new().with_density(density)).encode_text(&bag)?;

    let mut stdout = io::stdout().lock();
    stdout
        .write_all(reply.as_bytes())
        .and_then(|_| stdout.flush())
        .map_err(|e| Error::io(&e.to_string()))?;
    debug!(bytes = reply.len(), %density, "wrote reply");
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "round trip failed");
            eprintln!("tytx_echo: {}", e);
            ExitCode::FAILURE
        }
    }
}
