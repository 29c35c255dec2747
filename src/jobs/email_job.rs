//! Email background job.
//!
//! Delivers queued emails over SMTP. When `SMTP_HOST` is unset the email
//! is logged instead of sent.

use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use serde::{Deserialize, Serialize};
use std::env;

use crate::errors::{AppError, AppResult};

/// Email job payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailJob {
    pub to: String,
    pub subject: String,
    /// Plain-text body
    pub body: String,
    /// Optional sender override (defaults to EMAIL_FROM)
    #[serde(default)]
    pub from: Option<String>,
}

impl EmailJob {
    pub fn new(to: impl Into<String>, subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            subject: subject.into(),
            body: body.into(),
            from: None,
        }
    }

    pub fn with_from(mut self, from: impl Into<String>) -> Self {
        self.from = Some(from.into());
        self
    }
}

/// SMTP settings read by the worker process.
#[derive(Clone)]
struct EmailConfig {
    smtp_host: Option<String>,
    smtp_port: u16,
    smtp_user: Option<String>,
    smtp_pass: Option<String>,
    email_from: String,
}

impl EmailConfig {
    fn from_env() -> Self {
        Self {
            smtp_host: env::var("SMTP_HOST").ok().filter(|h| !h.is_empty()),
            smtp_port: env::var("SMTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(587),
            smtp_user: env::var("SMTP_USER").ok(),
            smtp_pass: env::var("SMTP_PASS").ok(),
            email_from: env::var("EMAIL_FROM")
                .unwrap_or_else(|_| "Wayfarer <noreply@wayfarer.local>".to_string()),
        }
    }
}

fn build_message(job: &EmailJob, from: &str) -> AppResult<Message> {
    let from: Mailbox = from
        .parse()
        .map_err(|e| AppError::internal(format!("Invalid sender address: {}", e)))?;
    let to: Mailbox = job
        .to
        .parse()
        .map_err(|e| AppError::validation(format!("Invalid recipient address: {}", e)))?;

    Message::builder()
        .from(from)
        .to(to)
        .subject(job.subject.clone())
        .header(ContentType::TEXT_PLAIN)
        .body(job.body.clone())
        .map_err(|e| AppError::internal(format!("Failed to build email: {}", e)))
}

/// Email job handler - processes email sending jobs
pub async fn email_job_handler(job: EmailJob) -> Result<(), AppError> {
    let config = EmailConfig::from_env();
    let from = job.from.as_deref().unwrap_or(&config.email_from);

    tracing::info!(
        to = %job.to,
        from = %from,
        subject = %job.subject,
        "Processing email job"
    );

    let Some(host) = config.smtp_host.as_deref() else {
        tracing::warn!("SMTP not configured - logging email instead of sending");
        tracing::info!(
            "=== EMAIL (not sent) ===\n\
             From: {}\n\
             To: {}\n\
             Subject: {}\n\
             Body:\n{}\n\
             ========================",
            from,
            job.to,
            job.subject,
            job.body
        );
        return Ok(());
    };

    let message = build_message(&job, from)?;

    let mut transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)
        .map_err(|e| AppError::upstream(format!("SMTP relay setup failed: {}", e)))?
        .port(config.smtp_port);
    if let (Some(user), Some(pass)) = (config.smtp_user.clone(), config.smtp_pass.clone()) {
        transport = transport.credentials(Credentials::new(user, pass));
    }

    transport
        .build()
        .send(message)
        .await
        .map_err(|e| AppError::upstream(format!("SMTP send failed: {}", e)))?;

    tracing::info!(to = %job.to, "Email sent");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_builds_for_valid_addresses() {
        let job = EmailJob::new("traveler@example.com", "Your OTP", "Your OTP is: 123456.");
        assert!(build_message(&job, "Wayfarer <noreply@example.com>").is_ok());
    }

    #[test]
    fn test_bad_recipient_is_rejected() {
        let job = EmailJob::new("not an address", "Hi", "Body");
        assert!(matches!(
            build_message(&job, "noreply@example.com"),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_job_payload_defaults_sender() {
        let job: EmailJob =
            serde_json::from_str(r#"{"to":"a@b.com","subject":"s","body":"b"}"#).unwrap();
        assert_eq!(job.from, None);
        assert_eq!(job.with_from("x@y.com").from.as_deref(), Some("x@y.com"));
    }
}
