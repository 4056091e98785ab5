//! Password policy enforcement for new passwords.

use telehub_core::config::AuthConfig;
use telehub_core::error::AppError;

/// Validates password strength against configured policies.
#[derive(Debug, Clone)]
pub struct PasswordValidator {
    /// Minimum password length.
    min_length: usize,
}

impl PasswordValidator {
    /// Creates a new validator from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            min_length: config.password_min_length as usize,
        }
    }

    /// Validates a password against all configured policies.
    ///
    /// Returns `Ok(())` if the password meets all requirements,
    /// or an error describing the first violation found.
    pub fn validate(&self, password: &str) -> Result<(), AppError> {
        if password.len() < self.min_length {
            return Err(AppError::validation(format!(
                "Password must be at least {} characters long",
                self.min_length
            )));
        }

        if !password.chars().any(|c| c.is_uppercase()) {
            return Err(AppError::validation(
                "Password must contain at least one uppercase letter",
            ));
        }

        if !password.chars().any(|c| c.is_lowercase()) {
            return Err(AppError::validation(
                "Password must contain at least one lowercase letter",
            ));
        }

        if !password.chars().any(|c| c.is_ascii_digit()) {
            return Err(AppError::validation(
                "Password must contain at least one digit",
            ));
        }

        Ok(())
    }

    /// Validates that a new password differs from the old one.
    pub fn validate_not_same(
        &self,
        old_password: &str,
        new_password: &str,
    ) -> Result<(), AppError> {
        if old_password == new_password {
            return Err(AppError::validation(
                "New password must be different from the current password",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validator() -> PasswordValidator {
        PasswordValidator {
            min_length: 8,
        }
    }

    #[test]
    fn accepts_compliant_password() {
        assert!(validator().validate("Sunny-Day-42x").is_ok());
    }

    #[test]
    fn rejects_short_password() {
        let err = validator().validate("Ab1x").unwrap_err();
        assert_eq!(err.kind, telehub_core::error::ErrorKind::Validation);
    }

    #[test]
    fn rejects_missing_digit() {
        assert!(validator().validate("NoDigitsHere").is_err());
    }

    #[test]
    fn rejects_unchanged_password() {
        assert!(validator().validate_not_same("Same-Pass-1", "Same-Pass-1").is_err());
    }
}
