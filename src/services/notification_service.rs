// ==================== NOTIFICATION GATEWAY ====================
// Outbound email. The core only depends on `NotificationGateway`; delivery
// is delegated to an HTTP mail relay or, in development, to the log.

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NotificationError {
    #[error("mail relay unreachable: {0}")]
    Transport(String),

    #[error("mail relay rejected message with status {0}")]
    Rejected(u16),

    #[error("mail client could not be built: {0}")]
    Client(String),
}

#[async_trait]
pub trait NotificationGateway: Send + Sync {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), NotificationError>;
}

#[derive(Debug, Serialize)]
struct MailPayload<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    text: &'a str,
}

/// Posts messages as JSON to a transactional mail relay.
pub struct HttpMailGateway {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    sender: String,
}

impl HttpMailGateway {
    pub fn new(endpoint: &str, api_key: &str, sender: &str) -> Result<Self, NotificationError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .map_err(|e| NotificationError::Client(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
            api_key: api_key.to_string(),
            sender: sender.to_string(),
        })
    }
}

#[async_trait]
impl NotificationGateway for HttpMailGateway {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), NotificationError> {
        let payload = MailPayload {
            from: &self.sender,
            to,
            subject,
            text: body,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| NotificationError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(NotificationError::Rejected(response.status().as_u16()));
        }

        log::info!("📧 Mail relay accepted message to {}", to);
        Ok(())
    }
}

/// Development gateway: writes the whole message to the log instead of
/// sending it, so recovery mails can be read from the console.
pub struct LogGateway;

#[async_trait]
impl NotificationGateway for LogGateway {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), NotificationError> {
        log::warn!("📧 [log gateway] '{}' to {}:\n{}", subject, to, body);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_gateway_builds_client() {
        let gateway = HttpMailGateway::new("https://relay.example.com/send", "key", "noreply@planetary-api.com").unwrap();
        assert_eq!(gateway.endpoint, "https://relay.example.com/send");
        assert_eq!(gateway.sender, "noreply@planetary-api.com");
    }

    #[tokio::test]
    async fn test_log_gateway_accepts_every_message() {
        assert!(LogGateway.send("a@b.com", "subject", "body").await.is_ok());
    }
}

#[cfg(test)]
pub mod testing {
    use super::*;
    use std::sync::Mutex;

    #[derive(Debug, Clone)]
    pub struct SentMessage {
        pub to: String,
        pub subject: String,
        pub body: String,
    }

    /// Captures every message; optionally fails every send.
    #[derive(Default)]
    pub struct RecordingGateway {
        pub sent: Mutex<Vec<SentMessage>>,
        fail: bool,
    }

    impl RecordingGateway {
        pub fn failing() -> Self {
            Self {
                sent: Mutex::new(Vec::new()),
                fail: true,
            }
        }

        pub fn messages(&self) -> Vec<SentMessage> {
            self.sent.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl NotificationGateway for RecordingGateway {
        async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), NotificationError> {
            if self.fail {
                return Err(NotificationError::Transport("relay offline".to_string()));
            }
            self.sent.lock().unwrap().push(SentMessage {
                to: to.to_string(),
                subject: subject.to_string(),
                body: body.to_string(),
            });
            Ok(())
        }
    }
}
