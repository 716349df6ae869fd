use anyhow::Context;
use clap::Subcommand;
use serde_json::json;
use uuid::Uuid;

use crate::auth::JwtKeys;
use crate::cli::utils::output_success;
use crate::cli::OutputFormat;
use crate::config;

#[derive(Subcommand)]
pub enum TokenCommands {
    #[command(about = "Sign a token for a user id with the configured JWT_SECRET")]
    Issue {
        #[arg(help = "User id")]
        user_id: Uuid,
    },
}

pub async fn handle(cmd: TokenCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        TokenCommands::Issue { user_id } => {
            let keys = JwtKeys::from_config(&config::config().security)
                .context("JWT_SECRET must be set to issue tokens")?;
            let token = keys.issue(user_id)?;

            match output_format {
                OutputFormat::Text => println!("{}", token),
                OutputFormat::Json => output_success(
                    &output_format,
                    &format!("Issued token for {}", user_id),
                    Some(json!({ "user": user_id, "token": token })),
                )?,
            }
            Ok(())
        }
    }
}
