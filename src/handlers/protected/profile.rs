use axum::{extract::State, Extension, Json};
use serde::Deserialize;

use crate::database::models::profile::parse_skills;
use crate::database::models::{Profile, ProfileFields, Social};
use crate::error::{ApiError, ApiResult};
use crate::middleware::AuthUser;
use crate::state::AppState;
use crate::validation::{JsonBody, Validator};

use super::utils::load_author;

/// Skills may be sent as `"rust, go"` or `["rust", "go"]`
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum SkillsInput {
    List(Vec<String>),
    Csv(String),
}

impl SkillsInput {
    fn into_list(self) -> Vec<String> {
        match self {
            SkillsInput::List(skills) => parse_skills(&skills.join(",")),
            SkillsInput::Csv(raw) => parse_skills(&raw),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ProfileRequest {
    pub company: Option<String>,
    pub website: Option<String>,
    pub location: Option<String>,
    pub bio: Option<String>,
    pub status: Option<String>,
    pub githubusername: Option<String>,
    pub skills: Option<SkillsInput>,
    pub youtube: Option<String>,
    pub twitter: Option<String>,
    pub facebook: Option<String>,
    pub linkedin: Option<String>,
    pub instagram: Option<String>,
}

/// Empty strings clear a field
fn present(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl ProfileRequest {
    fn into_fields(self) -> ApiResult<ProfileFields> {
        let skills = self.skills.map(SkillsInput::into_list).unwrap_or_default();
        let skills_joined = skills.join(",");

        Validator::new()
            .not_empty("status", self.status.as_deref(), "Status is required")
            .not_empty("skills", Some(&skills_joined), "Skills is required")
            .finish()?;

        Ok(ProfileFields {
            company: present(self.company),
            website: present(self.website),
            location: present(self.location),
            status: present(self.status).unwrap_or_default(),
            skills,
            bio: present(self.bio),
            githubusername: present(self.githubusername),
            social: Social {
                youtube: present(self.youtube),
                twitter: present(self.twitter),
                facebook: present(self.facebook),
                linkedin: present(self.linkedin),
                instagram: present(self.instagram),
            },
        })
    }
}

/// GET /profile/me - the requester's profile with name and avatar joined in
pub async fn me(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> ApiResult<Json<Profile>> {
    let profile = state
        .users
        .find_profile(auth.id)
        .await?
        .ok_or_else(|| ApiError::bad_request("There is no profile for this user"))?;

    Ok(Json(profile))
}

/// POST /profile - create or update the requester's profile
pub async fn upsert(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    JsonBody(payload): JsonBody<ProfileRequest>,
) -> ApiResult<Json<Profile>> {
    let fields = payload.into_fields()?;
    let user = load_author(&state, auth.id).await?;

    let profile = state.users.upsert_profile(&user, fields).await?;
    tracing::info!("User {} saved profile {}", auth.id, profile.id);

    Ok(Json(profile))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skills_accept_list_or_csv() {
        let csv: ProfileRequest =
            serde_json::from_str(r#"{"status":"Developer","skills":"rust, sql"}"#).unwrap();
        let list: ProfileRequest =
            serde_json::from_str(r#"{"status":"Developer","skills":["rust"," sql"]}"#).unwrap();

        assert_eq!(csv.into_fields().unwrap().skills, vec!["rust", "sql"]);
        assert_eq!(list.into_fields().unwrap().skills, vec!["rust", "sql"]);
    }

    #[test]
    fn status_and_skills_are_required() {
        let request: ProfileRequest = serde_json::from_str(r#"{"company":"Acme"}"#).unwrap();
        match request.into_fields() {
            Err(ApiError::Validation(errors)) => {
                let params: Vec<&str> = errors.iter().map(|e| e.param.as_str()).collect();
                assert_eq!(params, vec!["status", "skills"]);
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn blank_optional_fields_are_dropped() {
        let request: ProfileRequest = serde_json::from_str(
            r#"{"status":"Developer","skills":"rust","company":" ","twitter":"https://twitter.com/ada"}"#,
        )
        .unwrap();
        let fields = request.into_fields().unwrap();

        assert_eq!(fields.company, None);
        assert_eq!(fields.social.twitter.as_deref(), Some("https://twitter.com/ada"));
    }
}
