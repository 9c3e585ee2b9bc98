use bcrypt::{hash, verify};
use crate::errors::{AppError, Result};
use crate::models::PASSWORD_MAX_CHARS;

const PASSWORD_MIN_CHARS: usize = 8;

pub struct PasswordService;

impl PasswordService {
    pub fn hash_password(password: &str, cost: u32) -> Result<String> {
        hash(password, cost)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to hash password: {}", e)))
    }

    pub fn verify_password(password: &str, hash: &str) -> Result<bool> {
        verify(password, hash)
            .map_err(|e| AppError::Auth(format!("Failed to verify password: {}", e)))
    }

    pub fn validate_password_strength(password: &str) -> Result<()> {
        let length = password.chars().count();
        if length < PASSWORD_MIN_CHARS {
            return Err(AppError::Validation(format!(
                "Password must be at least {} characters long",
                PASSWORD_MIN_CHARS
            )));
        }

        if length > PASSWORD_MAX_CHARS {
            return Err(AppError::Validation(format!(
                "Password must be at most {} characters long",
                PASSWORD_MAX_CHARS
            )));
        }

        if password.chars().all(|c| c.is_ascii_digit()) {
            return Err(AppError::Validation("Password cannot be entirely numeric".to_string()));
        }

        Ok(())
    }
}
