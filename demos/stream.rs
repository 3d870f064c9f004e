//! Stream JSON from stdin to XML on stdout.
//!
//! ```text
//! echo '{"a": [1, 2]}' | RUST_LOG=debug cargo run --example stream
//! ```

use json2xml_rs::{to_writer, ConvertOptions};
use std::io::{self, BufWriter};
use std::process::ExitCode;

fn main() -> ExitCode {
    env_logger::init();

    let stdin = io::stdin().lock();
    let stdout = BufWriter::new(io::stdout().lock());

    match to_writer(stdin, stdout, &ConvertOptions::default()) {
        Ok(()) => {
            println!();
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("\njson2xml: {}", err);
            ExitCode::FAILURE
        }
    }
}
