use clap::Subcommand;

use crate::cli::client::ApiClient;
use crate::cli::utils::output_value;
use crate::cli::{OutputFormat, Remote};

#[derive(Subcommand)]
pub enum ProfileCommands {
    #[command(about = "Show the profile of the token's user")]
    Me,
}

pub async fn handle(cmd: ProfileCommands, remote: &Remote, output_format: OutputFormat) -> anyhow::Result<()> {
    let client = ApiClient::new(remote)?;

    match cmd {
        ProfileCommands::Me => {
            let profile = client.get("/profile/me").await?;
            output_value(&output_format, "Profile", &profile)
        }
    }
}
