//! `apifox-mcp list` – print a shared doc's API list.

use anyhow::Result;
use apifox_core::apifox::ApifoxClient;
use apifox_core::config::RequestOverrides;

use super::fetch_and_print;

pub async fn run_list(
    client: ApifoxClient,
    key: Option<String>,
    overrides: RequestOverrides,
) -> Result<()> {
    fetch_and_print(move |cancel| client.get_api_list(key.as_deref(), overrides, cancel)).await
}
