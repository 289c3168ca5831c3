//! Proxy command implementation.

use allocator_data::{ProviderChain, ProxyRequest};
use allocator_engine::build_chain;
use anyhow::{bail, Result};
use serde_json::json;
use std::collections::HashMap;
use std::path::Path;

use super::common::load;
use crate::cli::ProxyArgs;

pub async fn run(args: ProxyArgs, config_path: &Path, offline: bool) -> Result<()> {
    if offline {
        bail!("The proxy needs network access; drop --offline");
    }
    let config = load(config_path)?;
    let chain = build_chain(&config)?;
    let query: HashMap<String, String> = args.params.into_iter().collect();

    let result = match ProxyRequest::from_query(&query) {
        Ok(request) => chain.passthrough(&request).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(body) => {
            println!("{}", serde_json::to_string_pretty(&body)?);
            Ok(())
        }
        Err(e) => {
            let (status, body) = ProviderChain::error_response(&e);
            println!(
                "{}",
                serde_json::to_string_pretty(&json!({ "status": status, "body": body }))?
            );
            bail!("Request failed with status {status}: {e}")
        }
    }
}
