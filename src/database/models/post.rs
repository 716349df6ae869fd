use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use super::user::User;

/// A user's endorsement of a post. At most one per user per post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Like {
    pub user: Uuid,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub text: String,
    pub user: Uuid,
    pub name: String,
    pub avatar: String,
    pub date: DateTime<Utc>,
}

impl Comment {
    /// Build a comment with the author's display fields copied in
    pub fn by(author: &User, text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: text.into(),
            user: author.id,
            name: author.name.clone(),
            avatar: author.avatar.clone(),
            date: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub user: Uuid,
    pub text: String,
    pub name: String,
    pub avatar: String,
    pub likes: Vec<Like>,
    pub comments: Vec<Comment>,
    pub date: DateTime<Utc>,
}

/// Fields supplied when creating a post; id and date are assigned on insert
#[derive(Debug, Clone)]
pub struct NewPost {
    pub user: Uuid,
    pub text: String,
    pub name: String,
    pub avatar: String,
}

impl NewPost {
    /// Author name and avatar are snapshotted now and never refreshed
    pub fn by(author: &User, text: impl Into<String>) -> Self {
        Self {
            user: author.id,
            text: text.into(),
            name: author.name.clone(),
            avatar: author.avatar.clone(),
        }
    }

    pub fn into_post(self) -> Post {
        Post {
            id: Uuid::new_v4(),
            user: self.user,
            text: self.text,
            name: self.name,
            avatar: self.avatar,
            likes: Vec::new(),
            comments: Vec::new(),
            date: Utc::now(),
        }
    }
}

#[derive(Debug, Error)]
pub enum PostError {
    #[error("comment {0} does not exist")]
    CommentNotFound(String),

    #[error("user {user} does not own post {post}")]
    NotOwner { post: Uuid, user: Uuid },
}

/// A change to a post's embedded lists. Repositories run these one at a
/// time per post so concurrent toggles and comments never overwrite each
/// other.
#[derive(Debug, Clone)]
pub enum PostMutation {
    ToggleLike { user: Uuid },
    AddComment(Comment),
    RemoveComment { comment_id: Uuid, requester: Uuid },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationOutcome {
    Liked,
    Unliked,
    Commented,
    CommentRemoved,
}

impl Post {
    pub fn is_owned_by(&self, user: Uuid) -> bool {
        self.user == user
    }

    pub fn ensure_owner(&self, user: Uuid) -> Result<(), PostError> {
        if self.is_owned_by(user) {
            Ok(())
        } else {
            Err(PostError::NotOwner { post: self.id, user })
        }
    }

    /// Like the post for `user`, or remove their existing like.
    /// Only the first matching entry is removed.
    pub fn toggle_like(&mut self, user: Uuid) -> MutationOutcome {
        match self.likes.iter().position(|like| like.user == user) {
            Some(index) => {
                self.likes.remove(index);
                MutationOutcome::Unliked
            }
            None => {
                self.likes.insert(0, Like { user });
                MutationOutcome::Liked
            }
        }
    }

    pub fn add_comment(&mut self, comment: Comment) {
        self.comments.insert(0, comment);
    }

    /// Only the post owner may remove comments, including other users' ones.
    /// A missing comment is reported before ownership is checked.
    pub fn remove_comment(&mut self, comment_id: Uuid, requester: Uuid) -> Result<Comment, PostError> {
        let index = self
            .comments
            .iter()
            .position(|comment| comment.id == comment_id)
            .ok_or_else(|| PostError::CommentNotFound(comment_id.to_string()))?;

        self.ensure_owner(requester)?;
        Ok(self.comments.remove(index))
    }

    pub fn apply(&mut self, mutation: PostMutation) -> Result<MutationOutcome, PostError> {
        match mutation {
            PostMutation::ToggleLike { user } => Ok(self.toggle_like(user)),
            PostMutation::AddComment(comment) => {
                self.add_comment(comment);
                Ok(MutationOutcome::Commented)
            }
            PostMutation::RemoveComment { comment_id, requester } => {
                self.remove_comment(comment_id, requester)?;
                Ok(MutationOutcome::CommentRemoved)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(name: &str) -> User {
        User::new(name, &format!("{}@example.com", name.to_lowercase()))
    }

    fn post_by(author: &User) -> Post {
        NewPost::by(author, "hello").into_post()
    }

    #[test]
    fn new_post_starts_empty() {
        let author = user("Ada");
        let post = post_by(&author);

        assert_eq!(post.user, author.id);
        assert_eq!(post.name, "Ada");
        assert_eq!(post.avatar, author.avatar);
        assert!(post.likes.is_empty());
        assert!(post.comments.is_empty());
    }

    #[test]
    fn toggling_twice_restores_likes() {
        let author = user("Ada");
        let mut post = post_by(&author);
        let before = post.likes.clone();

        assert_eq!(post.toggle_like(author.id), MutationOutcome::Liked);
        assert_eq!(post.toggle_like(author.id), MutationOutcome::Unliked);
        assert_eq!(post.likes, before);
    }

    #[test]
    fn likes_are_newest_first() {
        let mut post = post_by(&user("Ada"));
        let first = Uuid::new_v4();
        let second = Uuid::new_v4();

        post.toggle_like(first);
        post.toggle_like(second);

        assert_eq!(post.likes, vec![Like { user: second }, Like { user: first }]);
    }

    #[test]
    fn unlike_removes_only_one_entry() {
        let mut post = post_by(&user("Ada"));
        let liker = Uuid::new_v4();
        // Duplicates can only come from legacy data, but must not all vanish
        post.likes = vec![Like { user: liker }, Like { user: liker }];

        post.toggle_like(liker);
        assert_eq!(post.likes, vec![Like { user: liker }]);
    }

    #[test]
    fn comments_are_newest_first() {
        let author = user("Ada");
        let mut post = post_by(&author);

        let first = Comment::by(&author, "first");
        let second = Comment::by(&author, "second");
        post.add_comment(first.clone());
        post.add_comment(second.clone());

        assert_eq!(post.comments, vec![second, first]);
    }

    #[test]
    fn only_owner_removes_comments() {
        let owner = user("Ada");
        let commenter = user("Grace");
        let mut post = post_by(&owner);
        let comment = Comment::by(&commenter, "nice");
        post.add_comment(comment.clone());

        // Writing the comment does not grant the right to delete it
        let err = post.remove_comment(comment.id, commenter.id).unwrap_err();
        assert!(matches!(err, PostError::NotOwner { .. }));
        assert_eq!(post.comments.len(), 1);

        let removed = post.remove_comment(comment.id, owner.id).unwrap();
        assert_eq!(removed, comment);
        assert!(post.comments.is_empty());
    }

    #[test]
    fn missing_comment_wins_over_ownership() {
        let owner = user("Ada");
        let mut post = post_by(&owner);

        let err = post.remove_comment(Uuid::new_v4(), Uuid::new_v4()).unwrap_err();
        assert!(matches!(err, PostError::CommentNotFound(_)));
    }

    #[test]
    fn apply_reports_outcome() {
        let owner = user("Ada");
        let mut post = post_by(&owner);
        let comment = Comment::by(&owner, "mine");

        assert_eq!(
            post.apply(PostMutation::AddComment(comment.clone())).unwrap(),
            MutationOutcome::Commented
        );
        assert_eq!(
            post.apply(PostMutation::RemoveComment { comment_id: comment.id, requester: owner.id })
                .unwrap(),
            MutationOutcome::CommentRemoved
        );
        assert_eq!(
            post.apply(PostMutation::ToggleLike { user: owner.id }).unwrap(),
            MutationOutcome::Liked
        );
    }
}
