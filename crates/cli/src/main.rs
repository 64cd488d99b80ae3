use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    deckwright_cli::run().await
}
