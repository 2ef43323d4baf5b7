//! `utility-provider invoke` – run one lifecycle request.
//!
//! Diagnostics are part of the response, so a failed download still exits 0.
//! Only unreadable or malformed requests are process errors.

use anyhow::{Context, Result};
use std::fs;
use std::io::{self, Read};
use std::path::Path;
use utility_core::config::ProviderConfig;
use utility_core::fetch::Fetch;
use utility_core::{Provider, ResourceRequest};

pub fn run_invoke(cfg: ProviderConfig, request_path: Option<&Path>) -> Result<()> {
    let input = match request_path {
        Some(p) => fs::read_to_string(p)
            .with_context(|| format!("failed to read request {}", p.display()))?,
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read request from stdin")?;
            buf
        }
    };

    let provider = Provider::new(env!("CARGO_PKG_VERSION"), cfg);
    println!("{}", invoke_json(&provider, &input)?);
    Ok(())
}

/// Parse `input` as a request, run it and render the response.
pub fn invoke_json<F: Fetch>(provider: &Provider<F>, input: &str) -> Result<String> {
    let request: ResourceRequest =
        serde_json::from_str(input).context("invalid request JSON")?;
    let operation = request.operation();
    let response = provider.handle(request);
    tracing::info!(
        operation,
        removed = response.removed,
        reason = ?response.removal_reason,
        diagnostics = response.diagnostics.len(),
        "request handled"
    );
    Ok(serde_json::to_string_pretty(&response)?)
}
