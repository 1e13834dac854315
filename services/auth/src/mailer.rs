//! SMTP delivery of admin login codes
//!
//! Uses lettre for transport with Askama HTML and plain text templates.

use anyhow::{Result, bail};
use askama::Template;
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{MultiPart, SinglePart, header::ContentType},
    transport::smtp::{Error as SmtpError, authentication::Credentials},
};
use thiserror::Error;
use tracing::info;

#[derive(Template)]
#[template(path = "otp_email.html")]
struct OtpEmailHtml<'a> {
    subject: &'a str,
    name: Option<&'a str>,
    code: &'a str,
    minutes: u64,
}

#[derive(Template)]
#[template(path = "otp_email.txt")]
struct OtpEmailText<'a> {
    name: Option<&'a str>,
    code: &'a str,
    minutes: u64,
}

#[derive(Debug, Error)]
pub enum MailError {
    #[error("SMTP error: {0}")]
    Smtp(#[from] SmtpError),

    #[error("Failed to build message: {0}")]
    MessageBuild(#[from] lettre::error::Error),

    #[error("Invalid email address: {0}")]
    InvalidAddress(String),

    #[error("Template error: {0}")]
    Template(#[from] askama::Error),
}

/// Why a code is being sent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OtpPurpose {
    Login,
    Resend,
}

impl OtpPurpose {
    pub fn subject(&self) -> &'static str {
        match self {
            OtpPurpose::Login => "Your Admin Login Verification Code",
            OtpPurpose::Resend => "Admin Login New Verification Code",
        }
    }
}

#[derive(Debug, Clone)]
pub struct MailConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub pass: String,
    pub from: String,
}

impl MailConfig {
    /// Admin login depends on delivered codes, so the relay settings are required
    ///
    /// # Environment Variables
    /// - `MAIL_HOST`: SMTP relay host (required)
    /// - `MAIL_PORT`: SMTP port (default: 587, STARTTLS)
    /// - `MAIL_USER` / `MAIL_PASS`: SMTP credentials (required)
    /// - `MAIL_FROM`: sender mailbox (default: `Admin Login <MAIL_USER>`)
    pub fn from_env() -> Result<Self> {
        let host = required_env("MAIL_HOST")?;
        let user = required_env("MAIL_USER")?;
        let pass = required_env("MAIL_PASS")?;

        let port = std::env::var("MAIL_PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(587);
        let from = non_blank_env("MAIL_FROM").unwrap_or_else(|| format!("Admin Login <{user}>"));

        Ok(Self {
            host,
            port,
            user,
            pass,
            from,
        })
    }
}

fn non_blank_env(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn required_env(name: &str) -> Result<String> {
    match non_blank_env(name) {
        Some(value) => Ok(value),
        None => bail!("{name} must be set"),
    }
}

#[derive(Clone)]
pub struct Mailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: String,
}

impl Mailer {
    /// Builds the relay transport; no connection is opened until the first send
    pub fn new(config: &MailConfig) -> Result<Self, MailError> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)?
            .port(config.port)
            .credentials(Credentials::new(config.user.clone(), config.pass.clone()))
            .build();

        Ok(Self {
            transport,
            from: config.from.clone(),
        })
    }

    pub async fn send_otp(
        &self,
        to: &str,
        name: Option<&str>,
        code: &str,
        purpose: OtpPurpose,
        ttl_seconds: u64,
    ) -> Result<(), MailError> {
        let subject = purpose.subject();
        let (text, html) = render_otp(name, code, subject, ttl_seconds)?;

        let email = Message::builder()
            .from(
                self.from
                    .parse()
                    .map_err(|_| MailError::InvalidAddress(self.from.clone()))?,
            )
            .to(to
                .parse()
                .map_err(|_| MailError::InvalidAddress(to.to_string()))?)
            .subject(subject)
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(text),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(html),
                    ),
            )?;

        self.transport.send(email).await?;

        info!(to = %to, subject = %subject, "OTP email sent");
        Ok(())
    }
}

/// Plain text and HTML bodies
fn render_otp(
    name: Option<&str>,
    code: &str,
    subject: &str,
    ttl_seconds: u64,
) -> Result<(String, String), MailError> {
    let minutes = ttl_seconds.div_ceil(60);
    let text = OtpEmailText {
        name,
        code,
        minutes,
    }
    .render()?;
    let html = OtpEmailHtml {
        subject,
        name,
        code,
        minutes,
    }
    .render()?;
    Ok((text, html))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_render_otp() {
        let (text, html) =
            render_otp(Some("Sam <root>"), "123456", OtpPurpose::Login.subject(), 300).unwrap();

        assert!(text.starts_with("Hello Sam <root>,"));
        assert!(text.contains("Your verification code is: 123456"));
        assert!(text.contains("5 minutes"));
        assert!(html.contains("123456"));
        assert!(html.contains("Sam &#60;root&#62;") || html.contains("Sam &lt;root&gt;"));
    }

    #[test]
    fn test_render_without_name() {
        let (text, _) = render_otp(None, "654321", OtpPurpose::Resend.subject(), 90).unwrap();
        assert!(text.starts_with("Hello,"));
        assert!(text.contains("2 minutes"));
    }

    #[tokio::test]
    async fn test_invalid_sender_is_reported_before_sending() {
        let mailer = Mailer::new(&MailConfig {
            host: "localhost".to_string(),
            port: 2525,
            user: "user".to_string(),
            pass: "pass".to_string(),
            from: "not a mailbox".to_string(),
        })
        .unwrap();

        let err = mailer
            .send_otp("admin@x.com", None, "123456", OtpPurpose::Login, 300)
            .await
            .unwrap_err();
        assert!(matches!(err, MailError::InvalidAddress(from) if from == "not a mailbox"));
    }

    fn clear_env() {
        unsafe {
            for name in ["MAIL_HOST", "MAIL_PORT", "MAIL_USER", "MAIL_PASS", "MAIL_FROM"] {
                std::env::remove_var(name);
            }
        }
    }

    #[test]
    #[serial]
    fn test_mail_config_requires_relay_settings() {
        clear_env();
        let err = MailConfig::from_env().unwrap_err();
        assert_eq!(err.to_string(), "MAIL_HOST must be set");

        unsafe {
            std::env::set_var("MAIL_HOST", "smtp.example.com");
            std::env::set_var("MAIL_USER", "noreply@example.com");
        }
        let err = MailConfig::from_env().unwrap_err();
        assert_eq!(err.to_string(), "MAIL_PASS must be set");

        unsafe {
            std::env::set_var("MAIL_PASS", "secret");
        }
        let config = MailConfig::from_env().unwrap();
        assert_eq!(config.port, 587);
        assert_eq!(config.from, "Admin Login <noreply@example.com>");

        unsafe {
            std::env::set_var("MAIL_USER", "  ");
        }
        assert!(MailConfig::from_env().is_err());

        clear_env();
    }
}
