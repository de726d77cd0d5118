use super::{post_json, ChannelDeliveryError, INotificationChannel};
use reminder_scheduler_domain::ReminderMessage;
use reqwest::Client;
use serde_json::{json, Value};

#[derive(Debug, Clone)]
pub struct TelegramConfig {
    pub bot_token: String,
    pub chat_id: String,
    pub api_url: String,
}

impl TelegramConfig {
    pub const DEFAULT_API_URL: &'static str = "https://api.telegram.org";
}

/// Chat bot channel sending through the Telegram Bot API
pub struct TelegramChannel {
    client: Client,
    config: TelegramConfig,
}

impl TelegramChannel {
    pub fn new(client: Client, config: TelegramConfig) -> Self {
        Self { client, config }
    }

    fn send_message_url(&self) -> String {
        format!(
            "{}/bot{}/sendMessage",
            self.config.api_url.trim_end_matches('/'),
            self.config.bot_token
        )
    }

    fn payload(&self, message: &ReminderMessage) -> Value {
        json!({
            "chat_id": self.config.chat_id,
            "text": message.text(),
        })
    }
}

/// The Bot API signals success with `"ok": true`
fn check_response(res: Value) -> Result<String, ChannelDeliveryError> {
    if res.get("ok").and_then(Value::as_bool) == Some(true) {
        Ok(res.to_string())
    } else {
        let description = res
            .get("description")
            .and_then(Value::as_str)
            .map(String::from)
            .unwrap_or_else(|| res.to_string());
        Err(ChannelDeliveryError::Rejected(description))
    }
}

#[async_trait::async_trait]
impl INotificationChannel for TelegramChannel {
    fn name(&self) -> &'static str {
        "telegram"
    }

    async fn send(&self, message: &ReminderMessage) -> Result<String, ChannelDeliveryError> {
        let res = post_json(&self.client, &self.send_message_url(), &self.payload(message)).await?;
        check_response(res)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn channel() -> TelegramChannel {
        TelegramChannel::new(
            Client::new(),
            TelegramConfig {
                bot_token: "123:abc".into(),
                chat_id: "-100200".into(),
                api_url: TelegramConfig::DEFAULT_API_URL.to_string(),
            },
        )
    }

    #[test]
    fn it_builds_request() {
        let message = ReminderMessage {
            title: "Pay rent".into(),
            content: "Transfer".into(),
            remind_time: "2024/3/15 09:00:00".into(),
            cycle_label: "每月循环",
        };
        let channel = channel();
        assert_eq!(
            channel.send_message_url(),
            "https://api.telegram.org/bot123:abc/sendMessage"
        );
        let payload = channel.payload(&message);
        assert_eq!(payload["chat_id"], "-100200");
        assert_eq!(payload["text"], message.text());
    }

    #[test]
    fn it_checks_ok_flag() {
        assert!(check_response(json!({ "ok": true, "result": {} })).is_ok());
        assert_eq!(
            check_response(json!({ "ok": false, "description": "chat not found" })),
            Err(ChannelDeliveryError::Rejected("chat not found".into()))
        );
        assert!(check_response(json!({})).is_err());
    }
}
