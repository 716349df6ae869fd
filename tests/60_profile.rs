mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

#[tokio::test]
async fn profile_me_before_and_after_upsert() -> Result<()> {
    let server = common::TestServer::spawn().await?;
    let ada = server.register("Ada").await?;

    let res = server.get(&ada, "/profile/me").send().await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        res.json::<Value>().await?,
        json!({ "msg": "There is no profile for this user" })
    );

    let res = server
        .post(&ada, "/profile")
        .json(&json!({
            "status": "Developer",
            "skills": "rust, sql",
            "company": "Analytical Engines",
            "twitter": "https://twitter.com/ada"
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let saved = res.json::<Value>().await?;

    let res = server.get(&ada, "/profile/me").send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    let profile = res.json::<Value>().await?;

    assert_eq!(profile, saved);
    assert_eq!(profile["user"]["id"], json!(ada.user.id));
    assert_eq!(profile["user"]["name"], "Ada");
    assert_eq!(profile["user"]["avatar"], ada.user.avatar.as_str());
    assert_eq!(profile["skills"], json!(["rust", "sql"]));
    assert_eq!(profile["social"]["twitter"], "https://twitter.com/ada");
    Ok(())
}

#[tokio::test]
async fn profile_update_keeps_identity() -> Result<()> {
    let server = common::TestServer::spawn().await?;
    let ada = server.register("Ada").await?;

    let first = server
        .post(&ada, "/profile")
        .json(&json!({ "status": "Student", "skills": ["math"] }))
        .send()
        .await?
        .json::<Value>()
        .await?;
    let second = server
        .post(&ada, "/profile")
        .json(&json!({ "status": "Developer", "skills": ["rust"] }))
        .send()
        .await?
        .json::<Value>()
        .await?;

    assert_eq!(first["id"], second["id"]);
    assert_eq!(second["status"], "Developer");
    Ok(())
}

#[tokio::test]
async fn profile_requires_status_and_skills() -> Result<()> {
    let server = common::TestServer::spawn().await?;
    let ada = server.register("Ada").await?;

    let res = server.post(&ada, "/profile").json(&json!({})).send().await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body = res.json::<Value>().await?;
    let params: Vec<&str> = body["errors"]
        .as_array()
        .map(|errors| errors.iter().filter_map(|e| e["param"].as_str()).collect())
        .unwrap_or_default();
    assert_eq!(params, vec!["status", "skills"]);
    Ok(())
}
