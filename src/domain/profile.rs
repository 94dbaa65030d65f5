use serde::{Deserialize, Serialize};

use super::UserId;

/// Read-only profile of a user, as shown on `/profile/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: UserId,
    pub display_name: String,
    pub bio: String,
    pub avatar_uri: Option<String>,
    pub followers_count: Option<u64>,
}
