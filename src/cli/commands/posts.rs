use clap::Subcommand;
use serde_json::{json, Value};

use crate::cli::client::ApiClient;
use crate::cli::utils::{output_post, output_posts, output_success, output_value};
use crate::cli::{OutputFormat, Remote};

#[derive(Subcommand)]
pub enum PostCommands {
    #[command(about = "List all posts, newest first")]
    List,

    #[command(about = "Show one post")]
    Show {
        #[arg(help = "Post id")]
        id: String,
    },

    #[command(about = "Create a post")]
    Create {
        #[arg(help = "Post text")]
        text: String,
    },

    #[command(about = "Delete one of your posts")]
    Delete {
        #[arg(help = "Post id")]
        id: String,
    },

    #[command(about = "Delete every post")]
    Clear {
        #[arg(long, help = "Required; this removes all posts for all users")]
        yes: bool,
    },

    #[command(about = "Like a post, or remove your like")]
    Like {
        #[arg(help = "Post id")]
        id: String,
    },

    #[command(about = "Comment on a post")]
    Comment {
        #[arg(help = "Post id")]
        id: String,
        #[arg(help = "Comment text")]
        text: String,
    },

    #[command(about = "Remove a comment from one of your posts")]
    Uncomment {
        #[arg(help = "Post id")]
        id: String,
        #[arg(help = "Comment id")]
        comment_id: String,
    },
}

pub async fn handle(cmd: PostCommands, remote: &Remote, output_format: OutputFormat) -> anyhow::Result<()> {
    let client = ApiClient::new(remote)?;

    match cmd {
        PostCommands::List => {
            let posts = client.get("/posts").await?;
            output_posts(&output_format, &posts)
        }
        PostCommands::Show { id } => {
            let post = client.get(&format!("/posts/{}", id)).await?;
            output_post(&output_format, &post)
        }
        PostCommands::Create { text } => {
            let post = client.post("/posts", &json!({ "text": text })).await?;
            output_post(&output_format, &post)
        }
        PostCommands::Delete { id } => {
            let body = client.delete(&format!("/posts/{}", id)).await?;
            output_success(&output_format, message_of(&body, "Post removed"), Some(body.clone()))
        }
        PostCommands::Clear { yes } => {
            if !yes {
                anyhow::bail!("refusing to delete every post without --yes");
            }
            let body = client.delete("/posts").await?;
            output_success(&output_format, message_of(&body, "All posts removed"), Some(body.clone()))
        }
        PostCommands::Like { id } => {
            let body = client.put(&format!("/posts/like/{}", id)).await?;
            // A like returns the bare list; an unlike wraps it with a message
            let (message, likes) = match body.get("likes") {
                Some(likes) => (message_of(&body, "Post unliked"), likes.clone()),
                None => ("Post liked", body.clone()),
            };
            output_success(&output_format, message, Some(json!({ "likes": likes })))
        }
        PostCommands::Comment { id, text } => {
            let comments = client
                .post(&format!("/posts/comment/{}", id), &json!({ "text": text }))
                .await?;
            output_value(&output_format, "Comments", &comments)
        }
        PostCommands::Uncomment { id, comment_id } => {
            let comments = client
                .delete(&format!("/posts/comment/{}/{}", id, comment_id))
                .await?;
            output_value(&output_format, "Comments", &comments)
        }
    }
}

fn message_of<'a>(body: &'a Value, fallback: &'a str) -> &'a str {
    body.get("msg").and_then(Value::as_str).unwrap_or(fallback)
}
