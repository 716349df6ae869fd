#![allow(dead_code)]

use std::net::SocketAddr;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde_json::Value;

use devconnector_api::auth::JwtKeys;
use devconnector_api::config::DatabaseConfig;
use devconnector_api::database::models::User;
use devconnector_api::database::DatabaseManager;
use devconnector_api::{app, AppState};
use tokio::sync::OnceCell;

pub const TEST_SECRET: &str = "integration-test-secret";

/// An API server running in-process on a free port with in-memory repositories.
/// Every test gets its own server, so data never leaks between tests.
pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    pub state: AppState,
    pub client: Client,
}

/// A registered user and a bearer token for them
#[derive(Debug, Clone)]
pub struct TestUser {
    pub user: User,
    pub token: String,
}

impl TestServer {
    pub async fn spawn() -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let keys = JwtKeys::new(TEST_SECRET, 1)?;
        let state = AppState::in_memory(keys);

        let listener = tokio::net::TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], port)))
            .await
            .context("failed to bind test listener")?;
        let router = app(state.clone());
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("test server");
        });

        let server = Self {
            port,
            base_url,
            state,
            client: Client::new(),
        };
        server.wait_ready(Duration::from_secs(10)).await?;
        Ok(server)
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            if let Ok(resp) = self.client.get(self.url("/health")).send().await {
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Insert a user straight into the repository and mint a token for it
    pub async fn register(&self, name: &str) -> Result<TestUser> {
        let email = format!("{}@example.com", name.to_lowercase().replace(' ', "."));
        let user = self.state.users.create_user(User::new(name, &email)).await?;
        let token = self.state.keys.issue(user.id)?;
        Ok(TestUser { user, token })
    }

    pub fn get(&self, who: &TestUser, path: &str) -> RequestBuilder {
        self.client.get(self.url(path)).bearer_auth(&who.token)
    }

    pub fn post(&self, who: &TestUser, path: &str) -> RequestBuilder {
        self.client.post(self.url(path)).bearer_auth(&who.token)
    }

    pub fn put(&self, who: &TestUser, path: &str) -> RequestBuilder {
        self.client.put(self.url(path)).bearer_auth(&who.token)
    }

    pub fn delete(&self, who: &TestUser, path: &str) -> RequestBuilder {
        self.client.delete(self.url(path)).bearer_auth(&who.token)
    }

    /// Create a post through the API and return its JSON
    pub async fn create_post(&self, who: &TestUser, text: &str) -> Result<Value> {
        let res = self
            .post(who, "/posts")
            .json(&serde_json::json!({ "text": text }))
            .send()
            .await?;
        anyhow::ensure!(res.status() == StatusCode::OK, "create post failed: {}", res.status());
        Ok(res.json().await?)
    }
}

pub fn id_of(value: &Value) -> String {
    value["id"].as_str().expect("id field").to_string()
}

static SCHEMA: OnceCell<()> = OnceCell::const_new();

/// A pool on `DATABASE_URL` with the schema applied, or `None` when the
/// variable is unset so database tests can skip.
pub async fn postgres_pool() -> Result<Option<sqlx::PgPool>> {
    let Ok(url) = std::env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL not set; skipping PostgreSQL test");
        return Ok(None);
    };

    let config = DatabaseConfig {
        url: Some(url),
        max_connections: 20,
        connection_timeout: 30,
    };
    let pool = DatabaseManager::connect(&config).await?;
    SCHEMA
        .get_or_try_init(|| DatabaseManager::ensure_schema(&pool))
        .await?;

    Ok(Some(pool))
}
