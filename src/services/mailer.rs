use async_trait::async_trait;

use crate::{errors::Result, models::User};

/// Outbound email. Delivery itself is someone else's job.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send_verification(&self, user: &User, link: &str) -> Result<()>;
}

/// Writes the verification link to the log instead of sending mail.
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send_verification(&self, user: &User, link: &str) -> Result<()> {
        tracing::info!(
            user_id = %user.id,
            email = %user.email,
            link,
            "verification email queued"
        );
        Ok(())
    }
}
