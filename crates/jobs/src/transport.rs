//! Outbound notification delivery.
//!
//! The core records delivery outcomes but never retries in-run; the
//! next dispatch invocation retries anything that has no SENT log.

use async_trait::async_trait;
use medtrack_core::errors::{MedError, MedResult};
use medtrack_core::models::notification::{DeliveryStatus, ReminderPayload};
use medtrack_core::models::settings::NotificationChannel;
use serde_json::json;
use uuid::Uuid;

#[async_trait]
pub trait NotificationTransport: Send + Sync {
    /// Deliver one reminder on one channel. `Ok(Failed)` is a provider
    /// rejection worth recording; `Err(Configuration)` means the
    /// channel is not set up at all and dispatch should count it as
    /// skipped.
    async fn send(
        &self,
        user_id: Uuid,
        channel: NotificationChannel,
        payload: &ReminderPayload,
    ) -> MedResult<DeliveryStatus>;
}

/// Webhook-style HTTP transport: one provider endpoint per channel,
/// authenticated with an optional bearer token.
pub struct HttpTransport {
    client: reqwest::Client,
    push_endpoint: Option<String>,
    email_endpoint: Option<String>,
    token: Option<String>,
}

impl HttpTransport {
    pub fn new(
        push_endpoint: Option<String>,
        email_endpoint: Option<String>,
        token: Option<String>,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            push_endpoint,
            email_endpoint,
            token,
        }
    }

    fn endpoint_for(&self, channel: NotificationChannel) -> MedResult<&str> {
        let endpoint = match channel {
            NotificationChannel::Push => self.push_endpoint.as_deref(),
            NotificationChannel::Email => self.email_endpoint.as_deref(),
        };
        endpoint.ok_or_else(|| {
            MedError::Configuration(format!("No endpoint configured for channel: {}", channel))
        })
    }
}

#[async_trait]
impl NotificationTransport for HttpTransport {
    async fn send(
        &self,
        user_id: Uuid,
        channel: NotificationChannel,
        payload: &ReminderPayload,
    ) -> MedResult<DeliveryStatus> {
        let endpoint = self.endpoint_for(channel)?;

        let body = json!({
            "user_id": user_id,
            "channel": channel,
            "dose_log_id": payload.dose_log_id,
            "medication": payload.medication_name,
            "scheduled_for": payload.scheduled_for,
            "quantity": payload.quantity,
            "unit": payload.unit,
        });

        let mut request = self.client.post(endpoint).json(&body);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| MedError::Database(eyre::eyre!("Notification provider unreachable: {}", e)))?;

        if response.status().is_success() {
            Ok(DeliveryStatus::Sent)
        } else {
            tracing::warn!(
                "Notification provider rejected send: user_id={}, channel={}, status={}",
                user_id,
                channel,
                response.status()
            );
            Ok(DeliveryStatus::Failed)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn payload() -> ReminderPayload {
        ReminderPayload {
            dose_log_id: Uuid::new_v4(),
            medication_name: "Lisinopril".to_string(),
            scheduled_for: Utc::now(),
            quantity: Some(1.0),
            unit: Some("tablet".to_string()),
        }
    }

    #[tokio::test]
    async fn test_missing_endpoint_is_a_configuration_error() {
        let transport = HttpTransport::new(None, None, None);
        let err = transport
            .send(Uuid::new_v4(), NotificationChannel::Push, &payload())
            .await
            .unwrap_err();
        assert!(matches!(err, MedError::Configuration(_)));
    }

    #[test]
    fn test_endpoint_routing_per_channel() {
        let transport = HttpTransport::new(
            Some("https://push.example/send".to_string()),
            None,
            None,
        );
        assert_eq!(
            transport.endpoint_for(NotificationChannel::Push).unwrap(),
            "https://push.example/send"
        );
        assert!(transport.endpoint_for(NotificationChannel::Email).is_err());
    }
}
