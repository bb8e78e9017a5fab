//! sfddl - Run DDL statements against Snowflake

use clap::Parser;

mod cli;
mod commands;
mod logging;

use cli::Cli;
use commands::common::{ExitCode, EXIT_FAILURE};
use commands::{check, run};

#[tokio::main(flavor = "current_thread")]
async fn main() -> std::process::ExitCode {
    let cli = Cli::parse();

    let result = match &cli.command {
        cli::Commands::Run(args) => run::execute(args, &cli.global).await,
        cli::Commands::Check(args) => check::execute(args, &cli.global).await,
    };

    match result {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(err) => match err.downcast_ref::<ExitCode>() {
            Some(code) => exit_status(code.0),
            None => {
                eprintln!("Error: {:#}", err);
                exit_status(EXIT_FAILURE)
            }
        },
    }
}

fn exit_status(code: i32) -> std::process::ExitCode {
    std::process::ExitCode::from(u8::try_from(code).unwrap_or(1))
}
