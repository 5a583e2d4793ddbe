use serde::{Deserialize, Serialize};

/// Caller identity attached to a request once the auth stub lets it through.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    pub user_id: String,
    pub username: String,
    pub groups: Vec<String>,
    pub scopes: Vec<String>,
}

impl AuthenticatedUser {
    /// Placeholder identity used until tokens are verified against the
    /// identity provider.
    pub fn placeholder(scopes: Vec<String>) -> Self {
        Self {
            user_id: "placeholder-user-id".to_string(),
            username: "placeholder-user".to_string(),
            groups: vec!["users".to_string()],
            scopes,
        }
    }
}
