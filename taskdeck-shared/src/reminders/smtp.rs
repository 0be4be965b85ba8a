/// SMTP reminder delivery via lettre
///
/// A thin wrapper around a blocking `SmtpTransport`. With credentials the
/// transport negotiates TLS against the relay; without them it falls back
/// to a plain connection for local development relays.
///
/// The blocking send runs on the tokio blocking pool so a slow SMTP
/// server cannot stall task-list requests.

use async_trait::async_trait;
use lettre::{
    message::header::ContentType, transport::smtp::authentication::Credentials, Message,
    SmtpTransport, Transport,
};

use super::{Notifier, NotifyError};

/// SMTP relay configuration
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    /// Relay hostname
    pub host: String,

    /// Relay port
    pub port: u16,

    /// Optional username; credentials are used only when both username
    /// and password are set
    pub username: Option<String>,

    /// Optional password
    pub password: Option<String>,

    /// Sender address for all reminders
    pub from_address: String,
}

/// Reminder delivery over SMTP
pub struct SmtpNotifier {
    config: SmtpConfig,
}

impl SmtpNotifier {
    /// Creates a notifier for the given relay
    pub fn new(config: SmtpConfig) -> Self {
        Self { config }
    }
}

fn send_blocking(
    config: &SmtpConfig,
    recipient: &str,
    subject: &str,
    body: &str,
) -> Result<(), NotifyError> {
    let email = Message::builder()
        .from(
            config
                .from_address
                .parse()
                .map_err(|e| NotifyError::Address(format!("Invalid from address: {}", e)))?,
        )
        .to(recipient
            .parse()
            .map_err(|e| NotifyError::Address(format!("Invalid to address: {}", e)))?)
        .subject(subject)
        .header(ContentType::TEXT_PLAIN)
        .body(body.to_string())
        .map_err(|e| NotifyError::Message(e.to_string()))?;

    let mailer = match (&config.username, &config.password) {
        (Some(username), Some(password)) => {
            let credentials = Credentials::new(username.clone(), password.clone());
            SmtpTransport::relay(&config.host)
                .map_err(|e| NotifyError::Transport(format!("SMTP relay error: {}", e)))?
                .port(config.port)
                .credentials(credentials)
                .build()
        }
        _ => SmtpTransport::builder_dangerous(&config.host)
            .port(config.port)
            .build(),
    };

    mailer
        .send(&email)
        .map_err(|e| NotifyError::Transport(e.to_string()))?;

    Ok(())
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn notify(&self, recipient: &str, subject: &str, body: &str) -> Result<(), NotifyError> {
        let config = self.config.clone();
        let recipient = recipient.to_string();
        let subject = subject.to_string();
        let body = body.to_string();

        tokio::task::spawn_blocking(move || send_blocking(&config, &recipient, &subject, &body))
            .await
            .map_err(|e| NotifyError::Transport(format!("Delivery task failed: {}", e)))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> SmtpConfig {
        SmtpConfig {
            host: "localhost".to_string(),
            port: 2525,
            username: None,
            password: None,
            from_address: "taskdeck@example.com".to_string(),
        }
    }

    #[test]
    fn test_invalid_from_address_is_rejected_before_connecting() {
        let mut bad = config();
        bad.from_address = "not-an-address".to_string();

        let result = send_blocking(&bad, "user@example.com", "s", "b");
        assert!(matches!(result, Err(NotifyError::Address(_))));
    }

    #[test]
    fn test_invalid_recipient_is_rejected_before_connecting() {
        let result = send_blocking(&config(), "garbage recipient", "s", "b");
        assert!(matches!(result, Err(NotifyError::Address(_))));
    }
}
