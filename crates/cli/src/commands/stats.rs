//! Stats command handler.
//!
//! Displays corpus store statistics.

use clap::Args;
use juris_core::{config::AppConfig, AppResult};
use juris_pipeline::store::SqliteStore;
use juris_pipeline::VectorStore;

/// Show corpus statistics
#[derive(Args, Debug)]
pub struct StatsCommand {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl StatsCommand {
    /// Execute the stats command.
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing stats command");

        let store_path = config.store_path();
        let store = SqliteStore::open(&store_path)?;
        let stats = store.stats()?;

        if self.json {
            let output = serde_json::json!({
                "storePath": store_path,
                "documents": stats.documents,
                "sizeBytes": stats.size_bytes,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            println!("Corpus store: {}", store_path.display());
            println!("Documents:    {}", stats.documents);
            println!("Size:         {} bytes", stats.size_bytes);
        }

        Ok(())
    }
}
