use serde_json::{json, Value};

use crate::cli::OutputFormat;

/// Output a success message in the appropriate format
pub fn output_success(
    output_format: &OutputFormat,
    message: &str,
    data: Option<Value>,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": true,
                "message": message
            });

            if let Some(data_value) = data {
                response["data"] = data_value;
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

/// Print a single post in the appropriate format
pub fn output_post(output_format: &OutputFormat, post: &Value) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(post)?),
        OutputFormat::Text => println!("{}", format_post(post)),
    }
    Ok(())
}

/// Print a list of posts, or a friendly line when there are none
pub fn output_posts(output_format: &OutputFormat, posts: &Value) -> anyhow::Result<()> {
    let items = posts.as_array().map(Vec::as_slice).unwrap_or_default();

    match output_format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(posts)?),
        OutputFormat::Text if items.is_empty() => println!("No posts yet"),
        OutputFormat::Text => {
            for post in items {
                println!("{}", format_post(post));
            }
        }
    }
    Ok(())
}

/// Print any other response body
pub fn output_value(output_format: &OutputFormat, label: &str, value: &Value) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(value)?),
        OutputFormat::Text => {
            println!("{}:", label);
            println!("{}", serde_json::to_string_pretty(value)?);
        }
    }
    Ok(())
}

/// One-line summary: `<id>  <name>: <text>  [likes, comments]`
pub fn format_post(post: &Value) -> String {
    let str_field = |key: &str| post.get(key).and_then(Value::as_str).unwrap_or("").to_string();
    let count = |key: &str| post.get(key).and_then(Value::as_array).map_or(0, Vec::len);

    format!(
        "{}  {}: {}  [{} likes, {} comments]",
        str_field("id"),
        str_field("name"),
        str_field("text"),
        count("likes"),
        count("comments"),
    )
}
