//! Entry point for the command-line interface.
#![forbid(unsafe_code)]

use skyline_cli::CliError;

fn main() {
    if let Err(err) = skyline_cli::run() {
        match err {
            // Clap owns help, version, and usage output.
            CliError::ArgumentParsing(parse_err) => parse_err.exit(),
            other => {
                eprintln!("error: {other}");
                std::process::exit(1);
            }
        }
    }
}
