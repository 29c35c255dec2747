//! One-time passwords for email sign-in, sign-up and password reset.

use rand::Rng;

use crate::config::{OTP_LENGTH, OTP_TTL_SECONDS};
use crate::errors::{AppError, AppResult};

/// A six-digit one-time code.
#[derive(Clone, PartialEq, Eq)]
pub struct Otp(String);

impl std::fmt::Debug for Otp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Otp([REDACTED])")
    }
}

impl Otp {
    /// Generate a fresh code in 100000..=999999.
    pub fn generate() -> Self {
        let code: u32 = rand::thread_rng().gen_range(100_000..=999_999);
        Self(code.to_string())
    }

    /// Accept a user-submitted code.
    pub fn parse(input: &str) -> AppResult<Self> {
        let trimmed = input.trim();
        if trimmed.len() != OTP_LENGTH || !trimmed.chars().all(|c| c.is_ascii_digit()) {
            return Err(AppError::validation(format!(
                "OTP must be {} digits",
                OTP_LENGTH
            )));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Plain-text email body carrying the code.
    pub fn email_body(&self) -> String {
        format!(
            "Your OTP is: {}. It will expire in {} minutes.",
            self.0,
            OTP_TTL_SECONDS / 60
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_code_shape() {
        for _ in 0..100 {
            let otp = Otp::generate();
            assert_eq!(otp.as_str().len(), 6);
            let value: u32 = otp.as_str().parse().unwrap();
            assert!((100_000..=999_999).contains(&value));
        }
    }

    #[test]
    fn test_parse_requires_six_digits() {
        assert!(Otp::parse("123456").is_ok());
        assert!(Otp::parse(" 123456 ").is_ok());
        assert!(Otp::parse("12345").is_err());
        assert!(Otp::parse("1234567").is_err());
        assert!(Otp::parse("12a456").is_err());
    }

    #[test]
    fn test_email_body_mentions_expiry() {
        let otp = Otp::parse("424242").unwrap();
        assert_eq!(
            otp.email_body(),
            "Your OTP is: 424242. It will expire in 10 minutes."
        );
    }

    #[test]
    fn test_debug_hides_code() {
        let otp = Otp::parse("424242").unwrap();
        assert!(!format!("{:?}", otp).contains("424242"));
    }
}
