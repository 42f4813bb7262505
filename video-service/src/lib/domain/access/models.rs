use crate::domain::user::models::UserId;

/// Route-level access requirement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Any caller with a valid access token whose user still exists.
    Authenticated,
    /// Additionally requires the user to be an admin in the store right now.
    AdminOnly,
}

impl Access {
    pub fn requires_admin(self) -> bool {
        matches!(self, Access::AdminOnly)
    }
}

/// Identity admitted by the gate, scoped to a single request.
///
/// `is_admin` is the token's snapshot, not the store's current value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthContext {
    pub principal_id: UserId,
    pub is_admin: bool,
}
