//! `apifox-mcp detail <API_ID>` – print one API's document.

use anyhow::Result;
use apifox_core::apifox::ApifoxClient;
use apifox_core::config::RequestOverrides;

use super::fetch_and_print;

pub async fn run_detail(
    client: ApifoxClient,
    api_id: String,
    key: Option<String>,
    overrides: RequestOverrides,
) -> Result<()> {
    fetch_and_print(move |cancel| {
        client.get_api_detail(key.as_deref(), &api_id, overrides, cancel)
    })
    .await
}
