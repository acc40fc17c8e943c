// Copyright (C) 2026 CampTrack Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Authentication and role-based authorization for the API boundary.

use crate::error::AuthError;

/// Actor roles for authorization.
///
/// Roles apply to back-office operators, never to providers or clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Admin role: operators with structural and corrective authority.
    ///
    /// Admins may perform:
    /// - campaign creation, date changes, transitions, and deletion
    /// - provider attachment and removal
    /// - campaign renewal
    /// - everything a controller may do
    Admin,
    /// Controller role: field operators recording what they observe.
    ///
    /// Controllers may:
    /// - record, update, and delete material conditions
    /// - record settlement transactions
    /// - confirm de-installations
    /// - upload poster images
    Controller,
}

impl Role {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "Admin",
            Self::Controller => "Controller",
        }
    }
}

/// An authenticated operator with an associated role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedActor {
    /// The unique identifier for this actor.
    pub id: String,
    /// The role assigned to this actor.
    pub role: Role,
}

impl AuthenticatedActor {
    /// Creates a new authenticated actor.
    ///
    /// # Arguments
    ///
    /// * `id` - The unique identifier for this actor
    /// * `role` - The role assigned to this actor
    #[must_use]
    pub const fn new(id: String, role: Role) -> Self {
        Self { id, role }
    }
}

/// Stub authentication function.
///
/// This is a minimal placeholder. It does NOT implement real
/// authentication; in a real deployment this would validate credentials
/// or integrate with an identity provider.
///
/// # Errors
///
/// Returns an error if the actor identifier is empty.
pub fn authenticate_stub(actor_id: String, role: Role) -> Result<AuthenticatedActor, AuthError> {
    if actor_id.is_empty() {
        return Err(AuthError::AuthenticationFailed {
            reason: String::from("Actor ID cannot be empty"),
        });
    }
    Ok(AuthenticatedActor::new(actor_id, role))
}

/// Authorization service for enforcing role-based access control.
pub struct AuthorizationService;

impl AuthorizationService {
    /// Checks that an actor holds the Admin role.
    ///
    /// # Errors
    ///
    /// Returns an error naming the action if the actor is a controller.
    pub fn require_admin(actor: &AuthenticatedActor, action: &str) -> Result<(), AuthError> {
        match actor.role {
            Role::Admin => Ok(()),
            Role::Controller => Err(AuthError::Unauthorized {
                action: String::from(action),
                required_role: String::from("Admin"),
            }),
        }
    }
}
