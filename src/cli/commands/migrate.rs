use serde_json::json;

use crate::cli::utils::output_success;
use crate::cli::{connect, OutputFormat};
use crate::config::AppConfig;
use crate::database::Database;

pub async fn handle(config: &AppConfig, output_format: OutputFormat) -> anyhow::Result<()> {
    let db = connect(config).await?;
    db.migrate().await?;
    db.close().await;

    output_success(
        output_format,
        "Migrations applied",
        Some(json!({ "database": Database::redacted_url(&config.database.url) })),
    )
}
