use anyhow::{anyhow, Context};
use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde_json::Value;
use url::Url;

use crate::cli::Remote;

/// Thin JSON client for the DevConnector API
pub struct ApiClient {
    base: Url,
    token: Option<String>,
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new(remote: &Remote) -> anyhow::Result<Self> {
        let base = Url::parse(&remote.server)
            .with_context(|| format!("invalid server URL '{}'", remote.server))?;

        Ok(Self {
            base,
            token: remote.token.clone(),
            http: reqwest::Client::new(),
        })
    }

    pub fn url(&self, path: &str) -> anyhow::Result<Url> {
        self.base
            .join(path.trim_start_matches('/'))
            .with_context(|| format!("invalid path '{}'", path))
    }

    pub async fn get(&self, path: &str) -> anyhow::Result<Value> {
        self.send::<()>(Method::GET, path, None).await
    }

    pub async fn post<B: Serialize>(&self, path: &str, body: &B) -> anyhow::Result<Value> {
        self.send(Method::POST, path, Some(body)).await
    }

    pub async fn put(&self, path: &str) -> anyhow::Result<Value> {
        self.send::<()>(Method::PUT, path, None).await
    }

    pub async fn delete(&self, path: &str) -> anyhow::Result<Value> {
        self.send::<()>(Method::DELETE, path, None).await
    }

    async fn send<B: Serialize>(&self, method: Method, path: &str, body: Option<&B>) -> anyhow::Result<Value> {
        let url = self.url(path)?;
        let mut request = self.http.request(method.clone(), url.clone());

        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .with_context(|| format!("{} {} failed", method, url))?;
        let status = response.status();
        let body: Value = response.json().await.unwrap_or(Value::Null);

        if status.is_success() {
            Ok(body)
        } else {
            Err(anyhow!("{} ({})", error_message(&body, status), status.as_u16()))
        }
    }
}

/// Pull a readable message out of `{ msg }` or `{ errors: [{ msg }] }`
pub fn error_message(body: &Value, status: StatusCode) -> String {
    if let Some(msg) = body.get("msg").and_then(Value::as_str) {
        return msg.to_string();
    }

    if let Some(errors) = body.get("errors").and_then(Value::as_array) {
        let messages: Vec<&str> = errors
            .iter()
            .filter_map(|e| e.get("msg").and_then(Value::as_str))
            .collect();
        if !messages.is_empty() {
            return messages.join("; ");
        }
    }

    status
        .canonical_reason()
        .unwrap_or("request failed")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn joins_paths_onto_base() {
        let client = ApiClient::new(&Remote {
            server: "http://localhost:5000/".into(),
            token: None,
        })
        .unwrap();

        assert_eq!(client.url("/posts/like/abc").unwrap().as_str(), "http://localhost:5000/posts/like/abc");
    }

    #[test]
    fn reads_both_error_shapes() {
        assert_eq!(error_message(&json!({ "msg": "Post not found" }), StatusCode::NOT_FOUND), "Post not found");
        assert_eq!(
            error_message(
                &json!({ "errors": [{ "msg": "Text is required", "param": "text" }] }),
                StatusCode::BAD_REQUEST
            ),
            "Text is required"
        );
        assert_eq!(error_message(&Value::Null, StatusCode::BAD_GATEWAY), "Bad Gateway");
    }
}
