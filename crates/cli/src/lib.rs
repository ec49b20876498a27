pub mod commands;

use clap::{Parser, Subcommand};
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "sitequote",
    about = "Sitequote operator CLI",
    long_about = "Inspect the pricing catalog, compute quotes, and check relay readiness.",
    after_help = "Examples:\n  sitequote doctor --json\n  sitequote catalog\n  sitequote price --bundle simple --client-type student"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Dump the pricing catalog as JSON")]
    Catalog,
    #[command(about = "Compute a quote for a predefined bundle or a calculator selection")]
    Price(commands::price::PriceArgs),
    #[command(
        about = "Inspect effective configuration values with source attribution and redaction"
    )]
    Config,
    #[command(about = "Validate config, mail settings, and SMTP connectivity")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Catalog => {
            commands::CommandResult { exit_code: 0, output: commands::catalog::run() }
        }
        Command::Price(args) => commands::price::run(args),
        Command::Config => {
            commands::CommandResult { exit_code: 0, output: commands::config::run() }
        }
        Command::Doctor { json } => {
            commands::CommandResult { exit_code: 0, output: commands::doctor::run(json) }
        }
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
