use apifox_core::logging;

mod cli;
mod server;

use crate::cli::CliCommand;

#[tokio::main]
async fn main() {
    // APIFOX_* values from a local .env, if present; real env wins.
    let _ = dotenvy::dotenv();

    // stdout carries the MCP protocol, so logs go to a file or stderr.
    if let Err(e) = logging::init_logging() {
        logging::init_logging_stderr();
        tracing::warn!("file logging unavailable, using stderr: {:#}", e);
    }

    if let Err(err) = CliCommand::run_from_args().await {
        eprintln!("apifox-mcp error: {:#}", err);
        std::process::exit(1);
    }
}
