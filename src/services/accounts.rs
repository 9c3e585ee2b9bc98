use std::sync::Arc;
use uuid::Uuid;

use crate::{
    auth::{JwtService, PasswordService},
    database::UserStore,
    errors::{AppError, Result},
    models::{
        AuthResponse, LoginRequest, NewUser, SignupRequest, User, UserResponse, EMAIL_MAX_CHARS,
        NAME_MAX_CHARS, USERNAME_MAX_CHARS,
    },
    services::{mailer::Mailer, metrics::MetricsService},
};

#[derive(Clone)]
pub struct AccountService {
    users: Arc<dyn UserStore>,
    mailer: Arc<dyn Mailer>,
    jwt: Arc<JwtService>,
    metrics: Arc<MetricsService>,
    bcrypt_cost: u32,
    public_base_url: String,
}

impl AccountService {
    pub fn new(
        users: Arc<dyn UserStore>,
        mailer: Arc<dyn Mailer>,
        jwt: Arc<JwtService>,
        metrics: Arc<MetricsService>,
        bcrypt_cost: u32,
        public_base_url: &str,
    ) -> Self {
        Self {
            users,
            mailer,
            jwt,
            metrics,
            bcrypt_cost,
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Creates an inactive account and mails a verification link for it.
    pub async fn register(&self, request: SignupRequest) -> Result<User> {
        let username = required("Username", &request.username, USERNAME_MAX_CHARS)?;
        let email = required("Email", &request.email, EMAIL_MAX_CHARS)?;
        let first_name = required("First name", &request.first_name, NAME_MAX_CHARS)?;
        let last_name = required("Last name", &request.last_name, NAME_MAX_CHARS)?;

        if !email.contains('@') {
            return Err(AppError::Validation("Enter a valid email address".to_string()));
        }

        if request.password1 != request.password2 {
            return Err(AppError::Validation("The two password fields didn't match".to_string()));
        }
        PasswordService::validate_password_strength(&request.password1)?;

        if self.users.find_user_by_email(&email).await?.is_some() {
            return Err(AppError::Validation("Email already exists".to_string()));
        }
        if self.users.find_user_by_username(&username).await?.is_some() {
            return Err(AppError::Validation(
                "A user with that username already exists".to_string(),
            ));
        }

        let password_hash = PasswordService::hash_password(&request.password1, self.bcrypt_cost)?;
        let user = self
            .users
            .create_user(NewUser {
                username,
                email,
                first_name,
                last_name,
                password_hash,
            })
            .await?;

        let token = self.jwt.generate_email_token(user.id, &user.username)?;
        let link = format!("{}/email/{}", self.public_base_url, token);
        self.mailer.send_verification(&user, &link).await?;

        self.metrics.record_signup();
        tracing::info!(user_id = %user.id, username = %user.username, "user registered");
        Ok(user)
    }

    /// The user whose verification is pending, for the confirmation page.
    pub async fn confirm_email_page(&self, user_id: Uuid) -> Result<User> {
        self.users
            .find_user_by_id(user_id)
            .await?
            .ok_or(AppError::NotFound)
    }

    pub async fn verify_email(&self, token: &str) -> Result<User> {
        let user_id = self.jwt.verify_email_token(token)?;
        let user = self
            .users
            .activate_user(user_id)
            .await?
            .ok_or(AppError::NotFound)?;

        tracing::info!(user_id = %user.id, "email verified");
        Ok(user)
    }

    pub async fn login(&self, request: LoginRequest) -> Result<AuthResponse> {
        let invalid = || AppError::Auth("Invalid username or password".to_string());

        let user = self
            .users
            .find_user_by_username(request.username.trim())
            .await?
            .ok_or_else(invalid)?;

        if !PasswordService::verify_password(&request.password, &user.password_hash)? {
            return Err(invalid());
        }

        if !user.is_active {
            return Err(AppError::Auth("Email address not verified".to_string()));
        }

        let access_token = self.jwt.generate_access_token(user.id, &user.username)?;
        Ok(AuthResponse {
            access_token,
            user: UserResponse::from(user),
        })
    }

    /// Resolves a bearer token to an existing, active user.
    pub async fn authenticate(&self, token: &str) -> Result<User> {
        let user_id = self.jwt.verify_access_token(token)?;
        let user = self
            .users
            .find_user_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::Auth("User not found".to_string()))?;

        if !user.is_active {
            return Err(AppError::Auth("Account is inactive".to_string()));
        }
        Ok(user)
    }
}

fn required(field: &str, value: &str, max_chars: usize) -> Result<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::Validation(format!("{} is required", field)));
    }
    if value.chars().count() > max_chars {
        return Err(AppError::Validation(format!(
            "{} must be at most {} characters",
            field, max_chars
        )));
    }
    Ok(value.to_string())
}
