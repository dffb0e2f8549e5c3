//! Model catalog and backend health commands

use anyhow::Result;
use khata_core::model_catalog::{default_config_path, ModelCatalog};
use khata_core::{LlmBackend, LlmClient};

/// List available models and check backend reachability
pub async fn cmd_models() -> Result<()> {
    let catalog = ModelCatalog::new()?;

    println!("Available Models:\n");
    println!("{:<18} {}", "ALIAS", "IDENTIFIER");
    println!("{}", "-".repeat(60));
    for (alias, model) in catalog.list() {
        let marker = if model == catalog.default_model() {
            " (default)"
        } else {
            ""
        };
        println!("{:<18} {}{}", alias, model, marker);
    }

    println!();
    println!(
        "Config override: {}",
        default_config_path()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(not available)".to_string())
    );

    match LlmClient::from_env() {
        Some(client) => {
            let healthy = client.health_check().await;
            println!();
            println!("Backend: {}", client.host());
            println!(
                "Health:  {}",
                if healthy { "✓ reachable" } else { "✗ unreachable" }
            );
        }
        None => {
            println!();
            println!("Backend: not configured (set OPENROUTER_API_KEY)");
        }
    }

    Ok(())
}
