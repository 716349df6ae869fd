use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{types::Json, FromRow, PgPool, Postgres};
use uuid::Uuid;

use crate::database::models::{
    Comment, Like, MutationOutcome, NewPost, Post, PostMutation, Profile, ProfileFields,
    ProfileUser, Social, User,
};
use crate::database::repository::{PostRepository, StoreError, UserRepository};

const POST_COLUMNS: &str = "id, user_id, text, name, avatar, likes, comments, date";

#[derive(Debug, FromRow)]
struct PostRow {
    id: Uuid,
    user_id: Uuid,
    text: String,
    name: String,
    avatar: String,
    likes: Json<Vec<Like>>,
    comments: Json<Vec<Comment>>,
    date: DateTime<Utc>,
}

impl From<PostRow> for Post {
    fn from(row: PostRow) -> Self {
        Post {
            id: row.id,
            user: row.user_id,
            text: row.text,
            name: row.name,
            avatar: row.avatar,
            likes: row.likes.0,
            comments: row.comments.0,
            date: row.date,
        }
    }
}

#[derive(Clone)]
pub struct PgPostRepository {
    pool: PgPool,
}

impl PgPostRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Write the mutable parts of the document on a pool or a transaction.
    /// `user` and `date` never change.
    async fn save_with<'e, E>(executor: E, post: &Post) -> Result<(), StoreError>
    where
        E: sqlx::Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            r#"
            UPDATE posts
            SET text = $2, name = $3, avatar = $4, likes = $5, comments = $6
            WHERE id = $1
            "#,
        )
        .bind(post.id)
        .bind(&post.text)
        .bind(&post.name)
        .bind(&post.avatar)
        .bind(Json(post.likes.clone()))
        .bind(Json(post.comments.clone()))
        .execute(executor)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::PostNotFound(post.id));
        }
        Ok(())
    }
}

#[async_trait]
impl PostRepository for PgPostRepository {
    async fn create(&self, post: NewPost) -> Result<Post, StoreError> {
        let post = post.into_post();
        let sql = format!(
            "INSERT INTO posts ({cols}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING {cols}",
            cols = POST_COLUMNS
        );

        let row = sqlx::query_as::<_, PostRow>(&sql)
            .bind(post.id)
            .bind(post.user)
            .bind(&post.text)
            .bind(&post.name)
            .bind(&post.avatar)
            .bind(Json(post.likes.clone()))
            .bind(Json(post.comments.clone()))
            .bind(post.date)
            .fetch_one(&self.pool)
            .await?;

        Ok(row.into())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Post, StoreError> {
        let sql = format!("SELECT {} FROM posts WHERE id = $1", POST_COLUMNS);
        sqlx::query_as::<_, PostRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(Post::from)
            .ok_or(StoreError::PostNotFound(id))
    }

    async fn find_all(&self) -> Result<Vec<Post>, StoreError> {
        let sql = format!("SELECT {} FROM posts ORDER BY date DESC", POST_COLUMNS);
        let rows = sqlx::query_as::<_, PostRow>(&sql).fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(Post::from).collect())
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::PostNotFound(id));
        }
        Ok(())
    }

    async fn delete_all(&self) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM posts").execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    async fn save(&self, post: &Post) -> Result<(), StoreError> {
        Self::save_with(&self.pool, post).await
    }

    async fn update(
        &self,
        id: Uuid,
        mutation: PostMutation,
    ) -> Result<(Post, MutationOutcome), StoreError> {
        let mut tx = self.pool.begin().await?;

        // Row lock serializes every mutation on this post until commit
        let sql = format!("SELECT {} FROM posts WHERE id = $1 FOR UPDATE", POST_COLUMNS);
        let row = sqlx::query_as::<_, PostRow>(&sql)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(StoreError::PostNotFound(id))?;

        let mut post = Post::from(row);
        // An early return drops `tx`, which rolls back and releases the lock
        let outcome = post.apply(mutation)?;

        Self::save_with(&mut *tx, &post).await?;
        tx.commit().await?;

        Ok((post, outcome))
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

#[derive(Debug, FromRow)]
struct ProfileRow {
    id: Uuid,
    company: Option<String>,
    website: Option<String>,
    location: Option<String>,
    status: String,
    skills: Vec<String>,
    bio: Option<String>,
    githubusername: Option<String>,
    social: Json<Social>,
    date: DateTime<Utc>,
    user_id: Uuid,
    user_name: String,
    user_avatar: String,
}

impl From<ProfileRow> for Profile {
    fn from(row: ProfileRow) -> Self {
        Profile {
            id: row.id,
            user: ProfileUser {
                id: row.user_id,
                name: row.user_name,
                avatar: row.user_avatar,
            },
            company: row.company,
            website: row.website,
            location: row.location,
            status: row.status,
            skills: row.skills,
            bio: row.bio,
            githubusername: row.githubusername,
            social: row.social.0,
            date: row.date,
        }
    }
}

#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_user(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>("SELECT id, name, email, avatar, date FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn create_user(&self, user: User) -> Result<User, StoreError> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, name, email, avatar, date)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, email, avatar, date
            "#,
        )
        .bind(user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.avatar)
        .bind(user.date)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            let duplicate = matches!(&e, sqlx::Error::Database(db_err) if db_err.is_unique_violation());
            if duplicate {
                StoreError::DuplicateEmail(user.email.clone())
            } else {
                StoreError::Database(e)
            }
        })
    }

    async fn find_profile(&self, user_id: Uuid) -> Result<Option<Profile>, StoreError> {
        let row = sqlx::query_as::<_, ProfileRow>(
            r#"
            SELECT p.id, p.company, p.website, p.location, p.status, p.skills,
                   p.bio, p.githubusername, p.social, p.date,
                   u.id AS user_id, u.name AS user_name, u.avatar AS user_avatar
            FROM profiles p
            JOIN users u ON u.id = p.user_id
            WHERE p.user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Profile::from))
    }

    async fn upsert_profile(&self, user: &User, fields: ProfileFields) -> Result<Profile, StoreError> {
        let (id, date): (Uuid, DateTime<Utc>) = sqlx::query_as(
            r#"
            INSERT INTO profiles (id, user_id, company, website, location, status, skills, bio, githubusername, social)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ON CONFLICT (user_id) DO UPDATE SET
                company = EXCLUDED.company,
                website = EXCLUDED.website,
                location = EXCLUDED.location,
                status = EXCLUDED.status,
                skills = EXCLUDED.skills,
                bio = EXCLUDED.bio,
                githubusername = EXCLUDED.githubusername,
                social = EXCLUDED.social
            RETURNING id, date
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user.id)
        .bind(&fields.company)
        .bind(&fields.website)
        .bind(&fields.location)
        .bind(&fields.status)
        .bind(&fields.skills)
        .bind(&fields.bio)
        .bind(&fields.githubusername)
        .bind(Json(fields.social.clone()))
        .fetch_one(&self.pool)
        .await?;

        let owner = ProfileUser {
            id: user.id,
            name: user.name.clone(),
            avatar: user.avatar.clone(),
        };
        Ok(fields.into_profile(id, owner, date))
    }
}
