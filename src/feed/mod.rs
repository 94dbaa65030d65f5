//! The feed screen and per-post interactions.

pub mod controller;
pub mod detail;
pub mod reducer;
pub mod view_model;

pub use controller::{
    CommentTicket, FeedController, FeedState, FeedStatus, FollowTicket, LikeTicket, LoadTicket,
};
pub use detail::PostDetail;
pub use reducer::{PostAction, Reconciliation};
pub use view_model::{AuthorRelationship, PostViewModel, RelationshipRegistry};
