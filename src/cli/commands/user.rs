use anyhow::Context;
use clap::Subcommand;
use serde_json::json;

use crate::auth::JwtKeys;
use crate::cli::utils::output_success;
use crate::cli::OutputFormat;
use crate::config;
use crate::database::models::User;
use crate::database::{DatabaseManager, PgUserRepository, UserRepository};

#[derive(Subcommand)]
pub enum UserCommands {
    #[command(about = "Create a user in the database and print a token for it")]
    Add {
        #[arg(help = "Display name")]
        name: String,
        #[arg(help = "Email address (also used for the Gravatar avatar)")]
        email: String,
    },
}

pub async fn handle(cmd: UserCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        UserCommands::Add { name, email } => {
            let config = config::config();
            let keys = JwtKeys::from_config(&config.security)
                .context("JWT_SECRET must be set to issue tokens")?;

            let pool = DatabaseManager::connect(&config.database).await?;
            DatabaseManager::ensure_schema(&pool).await?;

            let user = PgUserRepository::new(pool)
                .create_user(User::new(&name, &email))
                .await?;
            let token = keys.issue(user.id)?;

            output_success(
                &output_format,
                &format!("Created user {} <{}> with id {}", user.name, user.email, user.id),
                Some(json!({ "user": user, "token": token })),
            )?;
            if let OutputFormat::Text = output_format {
                println!("{}", token);
            }
            Ok(())
        }
    }
}
