//! SMTP email notifier via `lettre` with TLS support.
//!
//! Delivers notifications as single-part plain-text emails through an
//! authenticated SMTP server. Port 465 uses implicit TLS; any other port
//! upgrades with STARTTLS.

use std::time::Duration;

use crate::traits::{Notification, Notifier, NotifyError};
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};

const IMPLICIT_TLS_PORT: u16 = 465;

/// SMTP settings for [`EmailNotifier::from_config`].
#[derive(Debug, Clone)]
pub struct SmtpSettings<'a> {
    pub host: &'a str,
    pub port: u16,
    /// SMTP login; also used as the sender address.
    pub username: &'a str,
    pub password: &'a str,
    pub timeout: Duration,
}

/// Sends notifications as emails via SMTP.
#[derive(Debug)]
pub struct EmailNotifier {
    /// Async SMTP transport for sending emails.
    transport: AsyncSmtpTransport<Tokio1Executor>,
    /// Sender mailbox.
    from: Mailbox,
    /// Recipient mailbox.
    to: Mailbox,
}

impl EmailNotifier {
    /// Build an `EmailNotifier` from SMTP configuration.
    ///
    /// No connection is opened here; the transport connects on first send.
    pub fn from_config(smtp: SmtpSettings<'_>, to: &str) -> Result<Self, NotifyError> {
        let from_mailbox: Mailbox = smtp
            .username
            .parse()
            .map_err(|e: lettre::address::AddressError| {
                NotifyError::Config(format!("invalid sender address: {e}"))
            })?;

        let to_mailbox: Mailbox = to.parse().map_err(|e: lettre::address::AddressError| {
            NotifyError::Config(format!("invalid recipient address: {e}"))
        })?;

        let builder = if smtp.port == IMPLICIT_TLS_PORT {
            AsyncSmtpTransport::<Tokio1Executor>::relay(smtp.host)
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(smtp.host)
        }
        .map_err(|e| NotifyError::Config(e.to_string()))?;

        let transport = builder
            .port(smtp.port)
            .credentials(Credentials::new(
                smtp.username.to_string(),
                smtp.password.to_string(),
            ))
            .timeout(Some(smtp.timeout))
            .build();

        Ok(Self {
            transport,
            from: from_mailbox,
            to: to_mailbox,
        })
    }

    fn build_message(&self, notification: &Notification) -> Result<Message, NotifyError> {
        Message::builder()
            .from(self.from.clone())
            .to(self.to.clone())
            .subject(&notification.subject)
            .header(ContentType::TEXT_PLAIN)
            .body(notification.body.clone())
            .map_err(|e| NotifyError::Smtp(e.to_string()))
    }
}

#[async_trait::async_trait]
impl Notifier for EmailNotifier {
    /// Send a notification email to the configured recipient.
    async fn send(&self, notification: &Notification) -> Result<(), NotifyError> {
        let email = self.build_message(notification)?;

        self.transport
            .send(email)
            .await
            .map_err(|e| NotifyError::Smtp(e.to_string()))?;

        tracing::debug!(
            subject = %notification.subject,
            to = %self.to,
            "email accepted by SMTP relay"
        );

        Ok(())
    }

    /// Returns `"email"`.
    fn channel_name(&self) -> &str {
        "email"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(username: &str) -> SmtpSettings<'_> {
        SmtpSettings {
            host: "smtp.example.com",
            port: 465,
            username,
            password: "app-password",
            timeout: Duration::from_secs(20),
        }
    }

    #[test]
    fn parse_invalid_email_address() {
        let mailbox: Result<Mailbox, _> = "not-an-email".parse();
        assert!(mailbox.is_err());
    }

    #[test]
    fn from_config_invalid_sender() {
        let result = EmailNotifier::from_config(settings("not-valid"), "admin@example.com");
        let err = result.unwrap_err().to_string();
        assert!(err.contains("sender"), "got: {err}");
    }

    #[test]
    fn from_config_invalid_recipient() {
        let result = EmailNotifier::from_config(settings("alerts@example.com"), "nope");
        let err = result.unwrap_err().to_string();
        assert!(err.contains("recipient"), "got: {err}");
    }

    #[test]
    fn channel_name_is_email() {
        let notifier =
            EmailNotifier::from_config(settings("alerts@example.com"), "admin@example.com")
                .unwrap();
        assert_eq!(notifier.channel_name(), "email");
    }

    #[test]
    fn from_config_starttls_port() {
        let mut smtp = settings("alerts@example.com");
        smtp.port = 587;
        assert!(EmailNotifier::from_config(smtp, "admin@example.com").is_ok());
    }

    #[test]
    fn message_is_plain_text_with_headers() {
        let notifier =
            EmailNotifier::from_config(settings("alerts@example.com"), "admin@example.com")
                .unwrap();
        let notification = Notification {
            subject: "Stock alert".to_string(),
            body: "Compra: https://store.example.com/".to_string(),
        };

        let message = notifier.build_message(&notification).unwrap();
        let raw = String::from_utf8(message.formatted()).unwrap();

        assert!(raw.contains("From: alerts@example.com"), "got: {raw}");
        assert!(raw.contains("To: admin@example.com"), "got: {raw}");
        assert!(raw.contains("Subject: Stock alert"), "got: {raw}");
        assert!(raw.contains("Content-Type: text/plain; charset=utf-8"), "got: {raw}");
        assert!(raw.contains("Compra: https://store.example.com/"), "got: {raw}");
    }

    #[tokio::test]
    async fn unreachable_server_is_smtp_error() {
        let smtp = SmtpSettings {
            host: "localhost",
            port: 1,
            username: "alerts@example.com",
            password: "app-password",
            timeout: Duration::from_secs(2),
        };
        let notifier = EmailNotifier::from_config(smtp, "admin@example.com").unwrap();
        let err = notifier.test().await.unwrap_err();
        assert!(matches!(err, NotifyError::Smtp(_)), "got: {err:?}");
    }
}
