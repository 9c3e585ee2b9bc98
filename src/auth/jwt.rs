use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use crate::errors::{AppError, Result};

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // User ID
    pub username: String,
    pub exp: i64,
    pub iat: i64,
    pub token_type: TokenType,
}

#[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenType {
    Access,
    EmailVerification,
}

pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_token_duration: Duration,
    email_token_duration: Duration,
}

impl JwtService {
    pub fn new(secret: &str, email_token_ttl_hours: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_ref()),
            decoding_key: DecodingKey::from_secret(secret.as_ref()),
            access_token_duration: Duration::hours(1),
            email_token_duration: Duration::hours(email_token_ttl_hours),
        }
    }

    fn generate(&self, user_id: Uuid, username: &str, token_type: TokenType) -> Result<String> {
        let now = Utc::now();
        let lifetime = match token_type {
            TokenType::Access => self.access_token_duration,
            TokenType::EmailVerification => self.email_token_duration,
        };
        let claims = Claims {
            sub: user_id.to_string(),
            username: username.to_string(),
            exp: (now + lifetime).timestamp(),
            iat: now.timestamp(),
            token_type,
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to sign token: {}", e)))
    }

    pub fn generate_access_token(&self, user_id: Uuid, username: &str) -> Result<String> {
        self.generate(user_id, username, TokenType::Access)
    }

    pub fn generate_email_token(&self, user_id: Uuid, username: &str) -> Result<String> {
        self.generate(user_id, username, TokenType::EmailVerification)
    }

    pub fn verify_token(&self, token: &str) -> Result<Claims> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .map_err(|e| AppError::Auth(format!("Invalid token: {}", e)))?;

        Ok(token_data.claims)
    }

    fn verify_kind(&self, token: &str, expected: TokenType) -> Result<Uuid> {
        let claims = self.verify_token(token)?;
        if claims.token_type != expected {
            return Err(AppError::Auth(format!("Expected {:?} token", expected)));
        }

        Uuid::parse_str(&claims.sub)
            .map_err(|_| AppError::Auth("Invalid user ID in token".to_string()))
    }

    /// Returns the user id carried by a valid access token.
    pub fn verify_access_token(&self, token: &str) -> Result<Uuid> {
        self.verify_kind(token, TokenType::Access)
    }

    pub fn verify_email_token(&self, token: &str) -> Result<Uuid> {
        self.verify_kind(token, TokenType::EmailVerification)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jwt_generation_and_verification() {
        let jwt_service = JwtService::new("test-secret", 24);
        let user_id = Uuid::new_v4();

        let access_token = jwt_service.generate_access_token(user_id, "ada").unwrap();
        let email_token = jwt_service.generate_email_token(user_id, "ada").unwrap();

        assert_eq!(jwt_service.verify_access_token(&access_token).unwrap(), user_id);
        assert_eq!(jwt_service.verify_email_token(&email_token).unwrap(), user_id);
    }

    #[test]
    fn test_token_kinds_are_not_interchangeable() {
        let jwt_service = JwtService::new("test-secret", 24);
        let user_id = Uuid::new_v4();

        let access_token = jwt_service.generate_access_token(user_id, "ada").unwrap();
        let email_token = jwt_service.generate_email_token(user_id, "ada").unwrap();

        assert!(jwt_service.verify_email_token(&access_token).is_err());
        assert!(jwt_service.verify_access_token(&email_token).is_err());
    }

    #[test]
    fn test_expired_and_foreign_tokens_rejected() {
        let expired = JwtService::new("test-secret", -2);
        let token = expired.generate_email_token(Uuid::new_v4(), "ada").unwrap();
        assert!(expired.verify_email_token(&token).is_err());

        let other = JwtService::new("other-secret", 24);
        let token = other.generate_access_token(Uuid::new_v4(), "ada").unwrap();
        assert!(JwtService::new("test-secret", 24).verify_access_token(&token).is_err());
    }
}
