use std::fmt;

use async_trait::async_trait;

use crate::auth::User;

/// A bearer credential for the itinerary service.
#[derive(Clone, PartialEq)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn authorization_header(&self) -> String {
        format!("Token {}", self.0)
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(..)")
    }
}

/// Supplies the signed-in user and their credential. Absence of either
/// means the session has expired.
#[async_trait]
pub trait SessionProvider: Send + Sync {
    async fn credential(&self) -> Option<Credential>;
    async fn user(&self) -> Option<User>;
}

/// A session fixed at construction time.
#[derive(Debug, Clone, Default)]
pub struct StaticSession {
    user: Option<User>,
    credential: Option<Credential>,
}

impl StaticSession {
    pub fn new(user: User, credential: Credential) -> Self {
        Self {
            user: Some(user),
            credential: Some(credential),
        }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionProvider for StaticSession {
    async fn credential(&self) -> Option<Credential> {
        self.credential.clone()
    }

    async fn user(&self) -> Option<User> {
        self.user.clone()
    }
}
