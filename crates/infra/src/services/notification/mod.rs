mod bark;
mod telegram;
mod wecom;

use crate::Config;
pub use bark::{BarkChannel, BarkConfig};
use futures::future::join_all;
use reminder_scheduler_domain::ReminderMessage;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
pub use telegram::{TelegramChannel, TelegramConfig};
use thiserror::Error;
use tracing::{error, info};
pub use wecom::{WeComChannel, WeComConfig};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ChannelDeliveryError {
    #[error("Network error: `{0}`")]
    Network(String),
    #[error("Unexpected status code {0}. Response: `{1}`")]
    UnexpectedStatusCode(u16, String),
    #[error("Malformed response: `{0}`")]
    MalformedResponse(String),
    #[error("Rejected by channel: `{0}`")]
    Rejected(String),
}

/// A destination a `ReminderMessage` can be delivered to
#[async_trait::async_trait]
pub trait INotificationChannel: Send + Sync {
    fn name(&self) -> &'static str;

    /// Delivers the message and returns the response of the channel on success
    async fn send(&self, message: &ReminderMessage) -> Result<String, ChannelDeliveryError>;
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChannelOutcome {
    pub channel: String,
    pub success: bool,
    pub detail: String,
}

/// Delivers the message to every channel. Channels are attempted concurrently and
/// independently and the outcomes are returned in the order of `channels` once all
/// attempts have settled. Failed deliveries are not retried.
pub async fn fan_out(
    channels: &[Arc<dyn INotificationChannel>],
    message: &ReminderMessage,
) -> Vec<ChannelOutcome> {
    let deliveries = channels.iter().map(|channel| async move {
        match channel.send(message).await {
            Ok(detail) => {
                info!("Delivered reminder \"{}\" to {}", message.title, channel.name());
                ChannelOutcome {
                    channel: channel.name().to_string(),
                    success: true,
                    detail,
                }
            }
            Err(e) => {
                error!(
                    "Unable to deliver reminder \"{}\" to {}. Error: {}",
                    message.title,
                    channel.name(),
                    e
                );
                ChannelOutcome {
                    channel: channel.name().to_string(),
                    success: false,
                    detail: e.to_string(),
                }
            }
        }
    });

    join_all(deliveries).await
}

/// Creates a channel for every destination present in the `Config`
pub fn create_channels(config: &Config) -> Vec<Arc<dyn INotificationChannel>> {
    let client = Client::new();
    let mut channels: Vec<Arc<dyn INotificationChannel>> = Vec::new();
    if let Some(telegram) = &config.telegram {
        channels.push(Arc::new(TelegramChannel::new(client.clone(), telegram.clone())));
    }
    if let Some(wecom) = &config.wecom {
        channels.push(Arc::new(WeComChannel::new(client.clone(), wecom.clone())));
    }
    if let Some(bark) = &config.bark {
        channels.push(Arc::new(BarkChannel::new(client, bark.clone())));
    }
    channels
}

/// POSTs `body` as JSON and returns the parsed JSON response of a successful request
async fn post_json(
    client: &Client,
    url: &str,
    body: &impl Serialize,
) -> Result<Value, ChannelDeliveryError> {
    let res = client
        .post(url)
        .json(body)
        .send()
        .await
        .map_err(|e| ChannelDeliveryError::Network(e.to_string()))?;
    let status = res.status();
    let text = res
        .text()
        .await
        .map_err(|e| ChannelDeliveryError::Network(e.to_string()))?;
    if !status.is_success() {
        return Err(ChannelDeliveryError::UnexpectedStatusCode(status.as_u16(), text));
    }
    serde_json::from_str(&text).map_err(|_| ChannelDeliveryError::MalformedResponse(text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::prelude::*;
    use reminder_scheduler_domain::{CycleType, Reminder};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FakeChannel {
        name: &'static str,
        fail: bool,
        calls: AtomicUsize,
    }

    #[async_trait::async_trait]
    impl INotificationChannel for FakeChannel {
        fn name(&self) -> &'static str {
            self.name
        }

        async fn send(&self, _message: &ReminderMessage) -> Result<String, ChannelDeliveryError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(ChannelDeliveryError::Network("connection refused".into()))
            } else {
                Ok("sent".into())
            }
        }
    }

    fn message() -> ReminderMessage {
        let reminder = Reminder::new(
            "r1".into(),
            "Pay rent".into(),
            "Transfer".into(),
            Utc.with_ymd_and_hms(2024, 3, 15, 1, 0, 0).unwrap(),
            CycleType::Monthly,
        );
        ReminderMessage::new(&reminder, &chrono_tz::Asia::Shanghai)
    }

    #[tokio::test]
    async fn one_failing_channel_does_not_stop_the_others() {
        let failing = Arc::new(FakeChannel {
            name: "telegram",
            fail: true,
            calls: AtomicUsize::new(0),
        });
        let working = Arc::new(FakeChannel {
            name: "bark",
            fail: false,
            calls: AtomicUsize::new(0),
        });
        let channels: Vec<Arc<dyn INotificationChannel>> = vec![failing.clone(), working.clone()];

        let outcomes = fan_out(&channels, &message()).await;
        assert_eq!(outcomes.len(), 2);
        assert_eq!(outcomes[0].channel, "telegram");
        assert!(!outcomes[0].success);
        assert!(outcomes[0].detail.contains("connection refused"));
        assert_eq!(outcomes[1].channel, "bark");
        assert!(outcomes[1].success);
        assert_eq!(failing.calls.load(Ordering::SeqCst), 1);
        assert_eq!(working.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn no_channels_gives_no_outcomes() {
        let outcomes = fan_out(&[], &message()).await;
        assert!(outcomes.is_empty());
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_network_error() {
        let res = post_json(
            &Client::new(),
            "http://127.0.0.1:1/send",
            &serde_json::json!({ "text": "hello" }),
        )
        .await;
        assert!(matches!(res, Err(ChannelDeliveryError::Network(_))));
    }
}
