use std::process::ExitCode;

fn main() -> ExitCode {
    sitequote_cli::run()
}
