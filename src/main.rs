//! finddupes - duplicate file finder
//!
//! Entry point for the finddupes CLI application.

use clap::Parser;
use finddupes::{cli::Cli, error::ExitCode, logging::init_logging};

fn main() {
    // Parse errors exit with clap's usage status (2)
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    match finddupes::run_app(cli) {
        Ok(code) => std::process::exit(code.as_i32()),
        Err(err) => {
            let exit_code = ExitCode::for_error(&err);
            eprintln!("Error: {err:#}");
            std::process::exit(exit_code.as_i32());
        }
    }
}
