// csv2midi CLI entry point.
//
// Parses flags, converts the input file (if any) and exits. Any failure is
// printed to stderr as `error: <cause>` with exit status 1. Running without
// an input file is a successful no-op, but flags are still validated first.
//
// Logging goes to stderr through tracing-subscriber; set RUST_LOG (e.g.
// `RUST_LOG=csv2midi=debug`) to see per-record detail. The default level is
// `warn`, so a clean run prints nothing.
//
// Usage:
//   csv2midi [-d N] [-v N] [--seed N] [--time-division N] [--channel N]
//     [--config PATH] [INPUT]

use csv2midi::cli::{Command, USAGE, parse_args};
use csv2midi::{ConvertError, convert_file};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), ConvertError> {
    let (config, input) = match parse_args(std::env::args().skip(1))? {
        Command::Help => {
            println!("{USAGE}");
            return Ok(());
        }
        Command::Convert { config, input } => (config, input),
    };

    // `convert_file` validates; without an input only the flags are checked.
    let Some(input) = input else {
        config.validate()?;
        return Ok(());
    };

    convert_file(&input, &config)?;
    Ok(())
}
