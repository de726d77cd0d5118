use super::{post_json, ChannelDeliveryError, INotificationChannel};
use reminder_scheduler_domain::ReminderMessage;
use reqwest::Client;
use serde_json::{json, Value};

#[derive(Debug, Clone)]
pub struct BarkConfig {
    pub device_key: String,
    pub server_url: String,
}

impl BarkConfig {
    pub const DEFAULT_SERVER_URL: &'static str = "https://api.day.app";
}

/// Push notification channel for the Bark iOS app
pub struct BarkChannel {
    client: Client,
    config: BarkConfig,
}

impl BarkChannel {
    pub fn new(client: Client, config: BarkConfig) -> Self {
        Self { client, config }
    }

    fn push_url(&self) -> String {
        format!(
            "{}/{}/",
            self.config.server_url.trim_end_matches('/'),
            self.config.device_key
        )
    }

    fn payload(message: &ReminderMessage) -> Value {
        json!({
            "title": message.headline(),
            "body": message.push_body(),
            "group": "Reminder",
            "icon": "🔔",
            "sound": "alarm",
        })
    }
}

/// Bark reports `code` 200 in the body on success
fn check_response(res: Value) -> Result<String, ChannelDeliveryError> {
    match res.get("code").and_then(Value::as_i64) {
        Some(200) => Ok(res.to_string()),
        Some(_) => Err(ChannelDeliveryError::Rejected(res.to_string())),
        None => Err(ChannelDeliveryError::MalformedResponse(res.to_string())),
    }
}

#[async_trait::async_trait]
impl INotificationChannel for BarkChannel {
    fn name(&self) -> &'static str {
        "bark"
    }

    async fn send(&self, message: &ReminderMessage) -> Result<String, ChannelDeliveryError> {
        let res = post_json(&self.client, &self.push_url(), &Self::payload(message)).await?;
        check_response(res)
    }
}
