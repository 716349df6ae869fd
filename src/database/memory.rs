//! In-process repositories backed by `tokio::sync::RwLock`.
//!
//! Used by the test suite and by `devconnector-api --memory`. Mutations hold
//! the write lock for the whole read-modify-write, which gives the same
//! per-post serialization the PostgreSQL repository gets from row locks.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::database::models::{
    MutationOutcome, NewPost, Post, PostMutation, Profile, ProfileFields, ProfileUser, User,
};
use crate::database::repository::{PostRepository, StoreError, UserRepository};

#[derive(Debug, Default)]
pub struct MemoryPostRepository {
    // Newest first, so equal timestamps keep insertion order
    posts: RwLock<Vec<Post>>,
}

impl MemoryPostRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PostRepository for MemoryPostRepository {
    async fn create(&self, post: NewPost) -> Result<Post, StoreError> {
        let post = post.into_post();
        self.posts.write().await.insert(0, post.clone());
        Ok(post)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Post, StoreError> {
        self.posts
            .read()
            .await
            .iter()
            .find(|post| post.id == id)
            .cloned()
            .ok_or(StoreError::PostNotFound(id))
    }

    async fn find_all(&self) -> Result<Vec<Post>, StoreError> {
        let mut posts = self.posts.read().await.clone();
        posts.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(posts)
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<(), StoreError> {
        let mut posts = self.posts.write().await;
        let index = posts
            .iter()
            .position(|post| post.id == id)
            .ok_or(StoreError::PostNotFound(id))?;
        posts.remove(index);
        Ok(())
    }

    async fn delete_all(&self) -> Result<u64, StoreError> {
        let mut posts = self.posts.write().await;
        let count = posts.len() as u64;
        posts.clear();
        Ok(count)
    }

    async fn save(&self, post: &Post) -> Result<(), StoreError> {
        let mut posts = self.posts.write().await;
        replace_post(&mut posts, post)
    }

    async fn update(
        &self,
        id: Uuid,
        mutation: PostMutation,
    ) -> Result<(Post, MutationOutcome), StoreError> {
        let mut posts = self.posts.write().await;

        // Work on a copy so a rejected mutation leaves the document untouched
        let mut post = posts
            .iter()
            .find(|post| post.id == id)
            .cloned()
            .ok_or(StoreError::PostNotFound(id))?;
        let outcome = post.apply(mutation)?;
        replace_post(&mut posts, &post)?;

        Ok((post, outcome))
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

/// Shared by `save` and `update`; the caller holds the write lock
fn replace_post(posts: &mut [Post], post: &Post) -> Result<(), StoreError> {
    let stored = posts
        .iter_mut()
        .find(|stored| stored.id == post.id)
        .ok_or(StoreError::PostNotFound(post.id))?;
    *stored = post.clone();
    Ok(())
}

#[derive(Debug, Clone)]
struct ProfileRecord {
    id: Uuid,
    fields: ProfileFields,
    date: chrono::DateTime<Utc>,
}

#[derive(Debug, Default)]
pub struct MemoryUserRepository {
    users: RwLock<HashMap<Uuid, User>>,
    profiles: RwLock<HashMap<Uuid, ProfileRecord>>,
}

impl MemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn profile_user(user: &User) -> ProfileUser {
    ProfileUser {
        id: user.id,
        name: user.name.clone(),
        avatar: user.avatar.clone(),
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn find_user(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn create_user(&self, user: User) -> Result<User, StoreError> {
        let mut users = self.users.write().await;
        if users.values().any(|existing| existing.email == user.email) {
            return Err(StoreError::DuplicateEmail(user.email));
        }
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_profile(&self, user_id: Uuid) -> Result<Option<Profile>, StoreError> {
        let users = self.users.read().await;
        let profiles = self.profiles.read().await;

        let profile = match (profiles.get(&user_id), users.get(&user_id)) {
            (Some(record), Some(user)) => Some(record.fields.clone().into_profile(
                record.id,
                profile_user(user),
                record.date,
            )),
            _ => None,
        };
        Ok(profile)
    }

    async fn upsert_profile(&self, user: &User, fields: ProfileFields) -> Result<Profile, StoreError> {
        let mut profiles = self.profiles.write().await;
        let record = profiles
            .entry(user.id)
            .and_modify(|record| record.fields = fields.clone())
            .or_insert_with(|| ProfileRecord {
                id: Uuid::new_v4(),
                fields: fields.clone(),
                date: Utc::now(),
            });

        Ok(record.fields.clone().into_profile(record.id, profile_user(user), record.date))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::{Comment, PostError};
    use std::sync::Arc;

    fn author() -> User {
        User::new("Ada", "ada@example.com")
    }

    #[tokio::test]
    async fn find_all_is_newest_first() {
        let repo = MemoryPostRepository::new();
        let user = author();
        let first = repo.create(NewPost::by(&user, "first")).await.unwrap();
        let second = repo.create(NewPost::by(&user, "second")).await.unwrap();

        let ids: Vec<Uuid> = repo.find_all().await.unwrap().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![second.id, first.id]);
    }

    #[tokio::test]
    async fn missing_post_is_reported() {
        let repo = MemoryPostRepository::new();
        let id = Uuid::new_v4();

        assert!(matches!(repo.find_by_id(id).await, Err(StoreError::PostNotFound(missing)) if missing == id));
        assert!(matches!(repo.delete_by_id(id).await, Err(StoreError::PostNotFound(_))));
        assert!(matches!(
            repo.update(id, PostMutation::ToggleLike { user: id }).await,
            Err(StoreError::PostNotFound(_))
        ));
    }

    #[tokio::test]
    async fn save_replaces_document() {
        let repo = MemoryPostRepository::new();
        let user = author();
        let mut post = repo.create(NewPost::by(&user, "hello")).await.unwrap();

        post.add_comment(Comment::by(&user, "saved"));
        repo.save(&post).await.unwrap();

        let stored = repo.find_by_id(post.id).await.unwrap();
        assert_eq!(stored.comments.len(), 1);
        assert_eq!(stored.comments[0].text, "saved");
    }

    #[tokio::test]
    async fn rejected_mutation_leaves_post_untouched() {
        let repo = MemoryPostRepository::new();
        let owner = author();
        let other = User::new("Grace", "grace@example.com");
        let post = repo.create(NewPost::by(&owner, "hello")).await.unwrap();
        let comment = Comment::by(&other, "hi");
        repo.update(post.id, PostMutation::AddComment(comment.clone())).await.unwrap();

        let result = repo
            .update(post.id, PostMutation::RemoveComment { comment_id: comment.id, requester: other.id })
            .await;
        assert!(matches!(result, Err(StoreError::Post(PostError::NotOwner { .. }))));
        assert_eq!(repo.find_by_id(post.id).await.unwrap().comments, vec![comment]);
    }

    #[tokio::test]
    async fn concurrent_toggles_are_not_lost() {
        let repo = Arc::new(MemoryPostRepository::new());
        let post = repo.create(NewPost::by(&author(), "hello")).await.unwrap();

        let mut handles = Vec::new();
        for _ in 0..32 {
            let repo = Arc::clone(&repo);
            handles.push(tokio::spawn(async move {
                repo.update(post.id, PostMutation::ToggleLike { user: Uuid::new_v4() }).await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(repo.find_by_id(post.id).await.unwrap().likes.len(), 32);
    }

    #[tokio::test]
    async fn delete_all_counts_posts() {
        let repo = MemoryPostRepository::new();
        let user = author();
        repo.create(NewPost::by(&user, "a")).await.unwrap();
        repo.create(NewPost::by(&user, "b")).await.unwrap();

        assert_eq!(repo.delete_all().await.unwrap(), 2);
        assert!(repo.find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let repo = MemoryUserRepository::new();
        repo.create_user(author()).await.unwrap();

        let again = repo.create_user(User::new("Ada Again", "ADA@example.com")).await;
        assert!(matches!(again, Err(StoreError::DuplicateEmail(_))));
    }

    #[tokio::test]
    async fn profile_upsert_keeps_identity() {
        let repo = MemoryUserRepository::new();
        let user = repo.create_user(author()).await.unwrap();
        assert!(repo.find_profile(user.id).await.unwrap().is_none());

        let fields = ProfileFields {
            status: "Developer".into(),
            skills: vec!["rust".into()],
            ..Default::default()
        };
        let created = repo.upsert_profile(&user, fields.clone()).await.unwrap();

        let updated = repo
            .upsert_profile(&user, ProfileFields { status: "Senior Developer".into(), ..fields })
            .await
            .unwrap();

        assert_eq!(created.id, updated.id);
        assert_eq!(updated.user.name, "Ada");
        let found = repo.find_profile(user.id).await.unwrap().unwrap();
        assert_eq!(found.status, "Senior Developer");
    }
}
