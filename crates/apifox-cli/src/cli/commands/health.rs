//! `apifox-mcp health` – show effective configuration.

use apifox_core::apifox::ApifoxClient;
use apifox_core::config::{RETRIES_MAX, RETRIES_MIN, TIMEOUT_MAX_MS, TIMEOUT_MIN_MS};

pub fn run_health(client: &ApifoxClient) {
    let cfg = client.config();
    println!("{:<14} {}", "VERSION", env!("CARGO_PKG_VERSION"));
    println!("{:<14} {}", "BASE URL", cfg.base_url);
    println!(
        "{:<14} {} ms (range {}-{})",
        "TIMEOUT", cfg.timeout_ms, TIMEOUT_MIN_MS, TIMEOUT_MAX_MS
    );
    println!(
        "{:<14} {} (range {}-{})",
        "RETRIES", cfg.retries, RETRIES_MIN, RETRIES_MAX
    );
    println!(
        "{:<14} {}",
        "DEFAULT KEY",
        if cfg.has_default_key() { "configured" } else { "not set" }
    );
}
