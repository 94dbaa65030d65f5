pub mod credential;
pub mod post;
pub mod profile;

pub use credential::Credential;
pub use post::{AuthorSummary, Comment, Post};
pub use profile::UserProfile;

pub type PostId = u64;
pub type UserId = u64;
