use clap::Args;
use std::sync::Arc;

use crate::cli::utils::output_success;
use crate::cli::{connect, OutputFormat};
use crate::config::AppConfig;
use crate::database::UserRepository;
use crate::services::{AccountService, RegisterInput};

#[derive(Args)]
pub struct CreateUserArgs {
    #[arg(help = "Login name (3-30 letters, digits, '_' or '-')")]
    pub username: String,

    #[arg(help = "Email address")]
    pub email: String,

    #[arg(help = "Plain-text password; stored hashed")]
    pub password: String,

    #[arg(long, help = "Display name")]
    pub name: Option<String>,

    #[arg(long, help = "Short bio")]
    pub summary: Option<String>,

    #[arg(long = "social", help = "Social link; repeat for several")]
    pub socials: Vec<String>,
}

/// Same validation and uniqueness rules as `POST /api/auth/register`.
pub async fn create(args: CreateUserArgs, config: AppConfig, output_format: OutputFormat) -> anyhow::Result<()> {
    let db = connect(&config).await?;
    let accounts = AccountService::new(UserRepository::new(db.pool().clone()), Arc::new(config));

    let created = accounts
        .create_user(RegisterInput {
            username: args.username,
            email: args.email,
            password: args.password,
            name: args.name,
            summary: args.summary,
            socials: args.socials,
        })
        .await;
    db.close().await;
    let user = created?;

    output_success(
        output_format,
        &format!("Created user '{}' (id {})", user.username, user.id),
        Some(serde_json::to_value(&user)?),
    )
}
