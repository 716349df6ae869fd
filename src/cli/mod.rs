pub mod client;
pub mod commands;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

pub const DEFAULT_SERVER_URL: &str = "http://localhost:5000";

#[derive(Parser)]
#[command(name = "devconnector")]
#[command(about = "DevConnector CLI - operator tooling for the DevConnector API")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[arg(long, global = true, help = "API base URL (default: $DEVCONNECTOR_URL or http://localhost:5000)")]
    pub server: Option<String>,

    #[arg(long, global = true, help = "Bearer token (default: $DEVCONNECTOR_TOKEN)")]
    pub token: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Mint access tokens")]
    Token {
        #[command(subcommand)]
        cmd: commands::token::TokenCommands,
    },

    #[command(about = "Manage user records directly in the database")]
    User {
        #[command(subcommand)]
        cmd: commands::user::UserCommands,
    },

    #[command(about = "Posts, likes and comments")]
    Posts {
        #[command(subcommand)]
        cmd: commands::posts::PostCommands,
    },

    #[command(about = "Developer profiles")]
    Profile {
        #[command(subcommand)]
        cmd: commands::profile::ProfileCommands,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

/// Connection settings for commands that talk to the HTTP API
#[derive(Debug, Clone)]
pub struct Remote {
    pub server: String,
    pub token: Option<String>,
}

impl Remote {
    pub fn from_cli(cli: &Cli) -> Self {
        let server = cli
            .server
            .clone()
            .or_else(|| std::env::var("DEVCONNECTOR_URL").ok())
            .unwrap_or_else(|| DEFAULT_SERVER_URL.to_string());
        let token = cli
            .token
            .clone()
            .or_else(|| std::env::var("DEVCONNECTOR_TOKEN").ok());

        Self { server, token }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);
    let remote = Remote::from_cli(&cli);

    match cli.command {
        Commands::Token { cmd } => commands::token::handle(cmd, output_format).await,
        Commands::User { cmd } => commands::user::handle(cmd, output_format).await,
        Commands::Posts { cmd } => commands::posts::handle(cmd, &remote, output_format).await,
        Commands::Profile { cmd } => commands::profile::handle(cmd, &remote, output_format).await,
    }
}
