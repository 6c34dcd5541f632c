use std::process::ExitCode;

use typemodel::cli::CommandLineInterface;

fn main() -> ExitCode {
    typemodel::logging::init_tracing();
    let command_line_interface = CommandLineInterface::load();
    match command_line_interface.run() {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(error) => {
            eprintln!("error: {error:#}");
            ExitCode::FAILURE
        }
    }
}
