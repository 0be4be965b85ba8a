/// Role and ownership checks
///
/// TaskDeck has a flat permission model:
///
/// 1. **Roles**: `admin` unlocks the admin console; `customer` and `user`
///    are ordinary accounts.
/// 2. **Ownership**: a task belongs to exactly one user, who holds
///    exclusive mutation and deletion rights.
/// 3. **Assignment**: an assignee gets visibility, nothing more; only the
///    owner (or an admin) may change the assignee.
///
/// # Example
///
/// ```
/// use taskdeck_shared::auth::authorization::require_owner;
/// use taskdeck_shared::auth::middleware::AuthContext;
/// use taskdeck_shared::models::user::UserRole;
/// use uuid::Uuid;
///
/// # fn example(auth: &AuthContext, task_owner: Uuid) -> Result<(), Box<dyn std::error::Error>> {
/// require_owner(auth, task_owner)?;
/// # Ok(())
/// # }
/// ```

use uuid::Uuid;

use super::middleware::AuthContext;

/// Error type for authorization checks
#[derive(Debug, thiserror::Error)]
pub enum AuthzError {
    /// The route requires the admin role
    #[error("Admin role required")]
    NotAdmin,

    /// The resource belongs to another user
    #[error("Not authorized to access this resource")]
    NotOwner,
}

/// Requires the admin role
pub fn require_admin(auth: &AuthContext) -> Result<(), AuthzError> {
    if !auth.role.is_admin() {
        return Err(AuthzError::NotAdmin);
    }

    Ok(())
}

/// Requires that the authenticated user owns the resource
pub fn require_owner(auth: &AuthContext, resource_owner_id: Uuid) -> Result<(), AuthzError> {
    if auth.user_id != resource_owner_id {
        return Err(AuthzError::NotOwner);
    }

    Ok(())
}

/// Requires ownership, or the admin role as an override
///
/// Used where an admin may act on behalf of an owner (task assignment).
pub fn require_owner_or_admin(
    auth: &AuthContext,
    resource_owner_id: Uuid,
) -> Result<(), AuthzError> {
    if auth.user_id == resource_owner_id || auth.role.is_admin() {
        return Ok(());
    }

    Err(AuthzError::NotOwner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::UserRole;

    fn context(role: UserRole) -> AuthContext {
        AuthContext {
            user_id: Uuid::new_v4(),
            username: "test".to_string(),
            role,
        }
    }

    #[test]
    fn test_require_admin() {
        assert!(require_admin(&context(UserRole::Admin)).is_ok());
        assert!(require_admin(&context(UserRole::User)).is_err());
        assert!(require_admin(&context(UserRole::Customer)).is_err());
    }

    #[test]
    fn test_require_owner() {
        let auth = context(UserRole::Customer);

        assert!(require_owner(&auth, auth.user_id).is_ok());
        assert!(require_owner(&auth, Uuid::new_v4()).is_err());
    }

    #[test]
    fn test_admin_does_not_bypass_plain_ownership() {
        let auth = context(UserRole::Admin);
        assert!(require_owner(&auth, Uuid::new_v4()).is_err());
    }

    #[test]
    fn test_require_owner_or_admin() {
        let owner = context(UserRole::Customer);
        assert!(require_owner_or_admin(&owner, owner.user_id).is_ok());
        assert!(require_owner_or_admin(&owner, Uuid::new_v4()).is_err());

        let admin = context(UserRole::Admin);
        assert!(require_owner_or_admin(&admin, Uuid::new_v4()).is_ok());
    }

    #[test]
    fn test_authz_error_messages() {
        assert!(AuthzError::NotAdmin.to_string().contains("Admin"));
        assert!(AuthzError::NotOwner.to_string().contains("Not authorized"));
    }
}
