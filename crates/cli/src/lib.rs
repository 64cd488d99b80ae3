pub mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "deckwright",
    about = "Deckwright operator CLI",
    long_about = "Run conversation requests through the document-transformation pipeline and inspect configuration.",
    after_help = "Examples:\n  deckwright process --request request.json --pretty\n  deckwright config"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(
        about = "Run one conversation request through the pipeline and print the response envelope"
    )]
    Process {
        #[arg(long, help = "Path to a request JSON file; stdin is read when omitted")]
        request: Option<PathBuf>,
        #[arg(long, help = "Pretty-print the response envelope")]
        pretty: bool,
    },
    #[command(about = "Inspect effective configuration values with secret redaction")]
    Config,
}

pub async fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Process { request, pretty } => commands::process::run(request, pretty).await,
        Command::Config => commands::config::run(),
    };

    match result {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(error) => {
            eprintln!("error: {error:#}");
            ExitCode::FAILURE
        }
    }
}
