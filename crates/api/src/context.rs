//! Per-request context.

use orla_auth::User;
use orla_core::UserId;

/// The authenticated caller, resolved by the auth middleware and injected
/// as a request extension for protected routes.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    user: User,
}

impl CurrentUser {
    pub fn new(user: User) -> Self {
        Self { user }
    }

    pub fn id(&self) -> UserId {
        self.user.id
    }

    pub fn user(&self) -> &User {
        &self.user
    }
}
