use utility_core::logging;

mod cli;

use crate::cli::CliCommand;

fn main() {
    // File under the XDG state dir as early as possible, stderr otherwise.
    logging::init();

    if let Err(err) = CliCommand::run_from_args() {
        eprintln!("utility-provider error: {:#}", err);
        std::process::exit(1);
    }
}
