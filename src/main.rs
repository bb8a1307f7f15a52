use std::process::ExitCode;

use clap::Parser;
use log::debug;

use bcfreq::command::Commands;
use bcfreq::runtime::{setup_global_logger, LogLevel};

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// trace, debug, info, warn or error. Defaults to RUST_LOG, else info
    #[arg(long = "log-level", global = true)]
    log_level: Option<LogLevel>,

    #[command(subcommand)]
    command: Commands,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    setup_global_logger(cli.log_level);
    debug!("Running {:?}", cli.command);

    let result = match cli.command {
        Commands::Count(mut cmd) => cmd.try_execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
