//! `apifox-mcp serve` – MCP server on stdio.

use anyhow::Result;
use apifox_core::apifox::ApifoxClient;

use crate::server;

pub async fn run_serve(client: ApifoxClient) -> Result<()> {
    server::serve_stdio(client).await
}
