//! Notification delivery port
//!
//! Notifications are a fire-and-forget side effect (an e-mail/SMS stand-in).
//! No return value is consumed and delivery failures are swallowed after
//! logging, mirroring the audit trail's best-effort discipline.

use async_trait::async_trait;

use crate::identifiers::UserId;
use crate::ports::{DomainPort, PortError};

/// Port for outbound user notifications
#[async_trait]
pub trait Notifier: DomainPort {
    async fn notify(&self, recipient: UserId, message: &str) -> Result<(), PortError>;
}

/// Sends a notification, logging and swallowing any failure
pub async fn notify_or_warn(notifier: &dyn Notifier, recipient: UserId, message: &str) {
    if let Err(err) = notifier.notify(recipient, message).await {
        tracing::warn!(error = %err, %recipient, "notification delivery failed; continuing");
    }
}

/// Recording in-memory notifier for tests
#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use std::sync::Arc;
    use tokio::sync::RwLock;

    #[derive(Debug, Default, Clone)]
    pub struct MemoryNotifier {
        sent: Arc<RwLock<Vec<(UserId, String)>>>,
    }

    impl MemoryNotifier {
        pub fn new() -> Self {
            Self::default()
        }

        pub async fn sent(&self) -> Vec<(UserId, String)> {
            self.sent.read().await.clone()
        }

        pub async fn sent_to(&self, recipient: UserId) -> Vec<String> {
            self.sent
                .read()
                .await
                .iter()
                .filter(|(to, _)| *to == recipient)
                .map(|(_, msg)| msg.clone())
                .collect()
        }
    }

    impl DomainPort for MemoryNotifier {}

    #[async_trait]
    impl Notifier for MemoryNotifier {
        async fn notify(&self, recipient: UserId, message: &str) -> Result<(), PortError> {
            self.sent.write().await.push((recipient, message.to_string()));
            Ok(())
        }
    }
}
