pub mod post;
pub mod profile;
pub mod user;

pub use post::{Comment, Like, MutationOutcome, NewPost, Post, PostError, PostMutation};
pub use profile::{Profile, ProfileFields, ProfileUser, Social};
pub use user::User;
