// Authentication data types

use serde::{Deserialize, Serialize};

/// Claims carried by an access token
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct JwtPayload {
    pub sub: String,
    pub exp: i64,
}

/// The caller a mutation is performed for
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Principal {
    pub username: String,
}

/// Outcome of request authentication, stored in the request extensions
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum AuthContext {
    Authenticated(Principal),
    #[default]
    Anonymous,
    /// A token was presented but could not be verified
    Rejected(String),
}

impl AuthContext {
    pub fn authenticated(username: &str) -> Self {
        AuthContext::Authenticated(Principal {
            username: username.to_string(),
        })
    }

    pub fn principal(&self) -> Option<&Principal> {
        match self {
            AuthContext::Authenticated(principal) => Some(principal),
            _ => None,
        }
    }
}
