//! Identity port - resolves a login identity to its capabilities

use uuid::Uuid;

use crate::domain::result::Result;
use crate::domain::Caller;

pub trait IdentityResolver: Send + Sync {
    /// Resolve `user_id` to a role, bound customer and owned accounts
    ///
    /// `Error::NotFound` when the user, or the customer it is bound to, no
    /// longer exists.
    fn resolve_caller(&self, user_id: Uuid) -> Result<Caller>;
}
