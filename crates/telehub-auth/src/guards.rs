//! Role and ownership checks shared by the service layer.

use uuid::Uuid;

use telehub_core::error::AppError;
use telehub_entity::user::UserRole;

/// Checks whether the given role is at least the specified minimum role.
///
/// Role hierarchy: Admin > Manager > Employee
pub fn require_minimum_role(actual: UserRole, minimum: UserRole) -> Result<(), AppError> {
    if actual.has_at_least(&minimum) {
        Ok(())
    } else {
        Err(AppError::authorization(format!(
            "Role '{actual}' is insufficient; minimum required: '{minimum}'"
        )))
    }
}

/// Requires an admin role.
pub fn require_admin(role: UserRole) -> Result<(), AppError> {
    require_minimum_role(role, UserRole::Admin)
}

/// Requires a manager role or above.
pub fn require_manager(role: UserRole) -> Result<(), AppError> {
    require_minimum_role(role, UserRole::Manager)
}

/// Allows access when the actor is the subject themselves, or holds at
/// least a manager role.
pub fn require_self_or_manager(
    actor_id: Uuid,
    actor_role: UserRole,
    subject_id: Uuid,
) -> Result<(), AppError> {
    if actor_id == subject_id {
        return Ok(());
    }
    require_minimum_role(actor_role, UserRole::Manager).map_err(|_| {
        AppError::authorization("Only the user themselves or a manager may access this resource")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_passes_all_guards() {
        assert!(require_admin(UserRole::Admin).is_ok());
        assert!(require_manager(UserRole::Admin).is_ok());
        assert!(require_minimum_role(UserRole::Admin, UserRole::Employee).is_ok());
    }

    #[test]
    fn employee_fails_manager_guard() {
        let err = require_manager(UserRole::Employee).unwrap_err();
        assert_eq!(err.kind, telehub_core::error::ErrorKind::Authorization);
    }

    #[test]
    fn self_access_bypasses_role_check() {
        let id = Uuid::new_v4();
        assert!(require_self_or_manager(id, UserRole::Employee, id).is_ok());
    }

    #[test]
    fn peer_access_requires_manager() {
        let actor = Uuid::new_v4();
        let subject = Uuid::new_v4();
        assert!(require_self_or_manager(actor, UserRole::Employee, subject).is_err());
        assert!(require_self_or_manager(actor, UserRole::Manager, subject).is_ok());
    }
}
