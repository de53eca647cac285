//! CLI for the Apifox docs MCP server.

mod commands;

use anyhow::{Context, Result};
use apifox_core::apifox::ApifoxClient;
use apifox_core::config::{self, RequestOverrides};
use apifox_core::fetch::FetchClient;
use clap::{Args, Parser, Subcommand};

use commands::{run_detail, run_health, run_list, run_serve};

/// Top-level CLI for the Apifox docs MCP server.
#[derive(Debug, Parser)]
#[command(name = "apifox-mcp")]
#[command(about = "MCP server for Apifox shared API docs, with a bounded-retry fetch core", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

/// Per-request budget overrides, clamped to the configured ranges.
#[derive(Debug, Clone, Default, Args)]
pub struct BudgetArgs {
    /// Per-attempt timeout in milliseconds.
    #[arg(long, value_name = "MS")]
    pub timeout: Option<u64>,
    /// Retries after the first attempt.
    #[arg(long, value_name = "N")]
    pub retries: Option<u32>,
}

impl From<BudgetArgs> for RequestOverrides {
    fn from(args: BudgetArgs) -> Self {
        RequestOverrides {
            timeout_ms: args.timeout,
            retries: args.retries,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Serve MCP over stdin/stdout.
    Serve,

    /// Print the API list (llms.txt) of a shared doc.
    List {
        /// Shared doc URL or UUID key; defaults to APIFOX_API_KEY.
        #[arg(long)]
        key: Option<String>,
        #[command(flatten)]
        budget: BudgetArgs,
    },

    /// Print the Markdown document of one API.
    Detail {
        /// API id as shown in the API list.
        api_id: String,
        /// Shared doc URL or UUID key; defaults to APIFOX_API_KEY.
        #[arg(long)]
        key: Option<String>,
        #[command(flatten)]
        budget: BudgetArgs,
    },

    /// Show effective configuration.
    Health,
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load().context("load configuration")?;
        let client = ApifoxClient::new(cfg, FetchClient::default());

        match cli.command {
            CliCommand::Serve => run_serve(client).await?,
            CliCommand::List { key, budget } => run_list(client, key, budget.into()).await?,
            CliCommand::Detail {
                api_id,
                key,
                budget,
            } => run_detail(client, api_id, key, budget.into()).await?,
            CliCommand::Health => run_health(&client),
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
