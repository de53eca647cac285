//! CLI command handlers. Each command is in its own file.

mod detail;
mod health;
mod list;
mod serve;

use anyhow::{bail, Context, Result};
use apifox_core::cancel::CancelToken;
use apifox_core::response::ApiResult;

pub use detail::run_detail;
pub use health::run_health;
pub use list::run_list;
pub use serve::run_serve;

/// Run a blocking fetch with Ctrl-C wired to its cancel token, then print
/// the document or fail with the envelope's error.
async fn fetch_and_print<F>(fetch: F) -> Result<()>
where
    F: FnOnce(&CancelToken) -> ApiResult + Send + 'static,
{
    let cancel = CancelToken::new();
    let interrupt = tokio::spawn({
        let cancel = cancel.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("interrupted, cancelling fetch");
                cancel.cancel();
            }
        }
    });

    let result = tokio::task::spawn_blocking(move || fetch(&cancel))
        .await
        .context("fetch task join");
    interrupt.abort();

    match result? {
        ApiResult::Success { data } => {
            println!("{}", data);
            Ok(())
        }
        ApiResult::Failure { error } => bail!("{}", error),
    }
}
