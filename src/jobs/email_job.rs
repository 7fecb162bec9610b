//! Email background job.
//!
//! Emails are queued by the API and delivered by the worker. There is no
//! SMTP transport; the worker writes each message to the log.

use serde::{Deserialize, Serialize};
use std::env;

use crate::config::DEFAULT_FROM_EMAIL;
use crate::errors::AppError;

/// Email job payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmailJob {
    pub to: String,
    pub subject: String,
    /// Plain text body
    pub body: String,
}

impl EmailJob {
    pub fn new(to: impl Into<String>, subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            subject: subject.into(),
            body: body.into(),
        }
    }
}

/// Context of a password reset message.
#[derive(Debug, Clone, PartialEq)]
pub struct PasswordResetEmail {
    pub email: String,
    pub site_name: String,
    pub protocol: String,
    pub domain: String,
    pub uid: String,
    /// `{uid}.{timestamped_token}`, the value posted back to reset_password_confirm
    pub token: String,
    /// Frontend path with `{uid}` and `{token}` filled in
    pub url: String,
}

impl PasswordResetEmail {
    /// Build the context, substituting `{uid}` and `{token}` into the url template.
    pub fn new(
        email: impl Into<String>,
        uid: impl Into<String>,
        token: impl Into<String>,
        url_template: &str,
        site_name: impl Into<String>,
        protocol: impl Into<String>,
        domain: impl Into<String>,
    ) -> Self {
        let uid = uid.into();
        let token = token.into();
        let url = url_template.replace("{uid}", &uid).replace("{token}", &token);

        Self {
            email: email.into(),
            site_name: site_name.into(),
            protocol: protocol.into(),
            domain: domain.into(),
            uid,
            token,
            url,
        }
    }

    /// Absolute link to the frontend confirmation page
    pub fn link(&self) -> String {
        format!(
            "{}://{}/{}",
            self.protocol,
            self.domain.trim_end_matches('/'),
            self.url.trim_start_matches('/')
        )
    }

    pub fn into_job(self) -> EmailJob {
        let subject = format!("Password reset on {}", self.site_name);
        let body = format!(
            "You're receiving this email because you requested a password reset \
             for your user account at {site}.\n\n\
             Please go to the following page and choose a new password:\n\n\
             {link}\n\n\
             Your username, in case you've forgotten: {email}\n\n\
             Thanks for using our site!\n\n\
             The {site} team",
            site = self.site_name,
            link = self.link(),
            email = self.email,
        );

        EmailJob::new(self.email, subject, body)
    }
}

/// Email job handler - processes email sending jobs
pub async fn email_job_handler(job: EmailJob) -> Result<(), AppError> {
    let from = env::var("EMAIL_FROM").unwrap_or_else(|_| DEFAULT_FROM_EMAIL.to_string());

    tracing::info!(
        to = %job.to,
        from = %from,
        subject = %job.subject,
        "Processing email job"
    );

    tracing::info!(
        "=== EMAIL ===\n\
         From: {}\n\
         To: {}\n\
         Subject: {}\n\
         Body:\n{}\n\
         =============",
        from,
        job.to,
        job.subject,
        job.body
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reset_email() -> PasswordResetEmail {
        PasswordResetEmail::new(
            "ada@example.com",
            "MTIz",
            "MTIz.c1x2y3-abcdef",
            "password/reset/confirm/{uid}/{token}",
            "Cooling",
            "https",
            "app.example.com",
        )
    }

    #[test]
    fn test_url_substitutes_uid_and_token() {
        let email = reset_email();
        assert_eq!(email.url, "password/reset/confirm/MTIz/MTIz.c1x2y3-abcdef");
        assert_eq!(
            email.link(),
            "https://app.example.com/password/reset/confirm/MTIz/MTIz.c1x2y3-abcdef"
        );
    }

    #[test]
    fn test_into_job_addresses_user() {
        let job = reset_email().into_job();
        assert_eq!(job.to, "ada@example.com");
        assert_eq!(job.subject, "Password reset on Cooling");
        assert!(job.body.contains("https://app.example.com/password/reset/confirm/MTIz/"));
    }

    #[tokio::test]
    async fn test_handler_accepts_job() {
        let job = EmailJob::new("to@example.com", "Hi", "Body");
        assert!(email_job_handler(job).await.is_ok());
    }
}
