use bizcard_types::api::Claims;
use uuid::Uuid;

/// Identity of the caller as vouched for by the auth provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Principal {
    pub id: Uuid,
}

impl Principal {
    pub fn new(id: Uuid) -> Self {
        Self { id }
    }
}

impl From<Claims> for Principal {
    fn from(claims: Claims) -> Self {
        Self::new(claims.sub)
    }
}
