// DDL applied at startup. Every statement is idempotent.
//
// Likes and comments stay embedded in the post row as JSONB arrays (newest
// first); they have no life outside their post.

pub const CREATE_USERS: &str = r#"
    CREATE TABLE IF NOT EXISTS users (
        id      UUID PRIMARY KEY,
        name    TEXT NOT NULL,
        email   TEXT NOT NULL UNIQUE,
        avatar  TEXT NOT NULL DEFAULT '',
        date    TIMESTAMPTZ NOT NULL DEFAULT now()
    )
"#;

pub const CREATE_PROFILES: &str = r#"
    CREATE TABLE IF NOT EXISTS profiles (
        id              UUID PRIMARY KEY,
        user_id         UUID NOT NULL UNIQUE REFERENCES users (id) ON DELETE CASCADE,
        company         TEXT,
        website         TEXT,
        location        TEXT,
        status          TEXT NOT NULL,
        skills          TEXT[] NOT NULL DEFAULT '{}',
        bio             TEXT,
        githubusername  TEXT,
        social          JSONB NOT NULL DEFAULT '{}'::jsonb,
        date            TIMESTAMPTZ NOT NULL DEFAULT now()
    )
"#;

pub const CREATE_POSTS: &str = r#"
    CREATE TABLE IF NOT EXISTS posts (
        id        UUID PRIMARY KEY,
        user_id   UUID NOT NULL,
        text      TEXT NOT NULL,
        name      TEXT NOT NULL,
        avatar    TEXT NOT NULL,
        likes     JSONB NOT NULL DEFAULT '[]'::jsonb,
        comments  JSONB NOT NULL DEFAULT '[]'::jsonb,
        date      TIMESTAMPTZ NOT NULL DEFAULT now()
    )
"#;

pub const CREATE_POSTS_DATE_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS posts_date_idx ON posts (date DESC)";

/// In dependency order
pub const STATEMENTS: &[&str] = &[CREATE_USERS, CREATE_PROFILES, CREATE_POSTS, CREATE_POSTS_DATE_INDEX];
