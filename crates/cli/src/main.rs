use std::process::ExitCode;

fn main() -> ExitCode {
    croprec_cli::run()
}
