use super::{post_json, ChannelDeliveryError, INotificationChannel};
use reminder_scheduler_domain::ReminderMessage;
use reqwest::Client;
use serde_json::{json, Value};

const WECOM_WEBHOOK_URL: &str = "https://qyapi.weixin.qq.com/cgi-bin/webhook/send";

#[derive(Debug, Clone)]
pub struct WeComConfig {
    pub webhook_url: String,
}

impl WeComConfig {
    /// Accepts either a complete webhook url or only the key of a group robot
    pub fn from_key(key: &str) -> Self {
        let webhook_url = if key.starts_with("http://") || key.starts_with("https://") {
            key.to_string()
        } else {
            format!("{}?key={}", WECOM_WEBHOOK_URL, key)
        };
        Self { webhook_url }
    }
}

/// Enterprise messaging channel posting to a WeCom group robot webhook
pub struct WeComChannel {
    client: Client,
    config: WeComConfig,
}

impl WeComChannel {
    pub fn new(client: Client, config: WeComConfig) -> Self {
        Self { client, config }
    }

    fn payload(message: &ReminderMessage) -> Value {
        json!({
            "msgtype": "text",
            "text": {
                "content": message.text(),
            }
        })
    }
}

/// WeCom answers with http 200 also on failures, `errcode` 0 means success
fn check_response(res: Value) -> Result<String, ChannelDeliveryError> {
    match res.get("errcode").and_then(Value::as_i64) {
        Some(0) => Ok(res.to_string()),
        Some(_) => Err(ChannelDeliveryError::Rejected(res.to_string())),
        None => Err(ChannelDeliveryError::MalformedResponse(res.to_string())),
    }
}

#[async_trait::async_trait]
impl INotificationChannel for WeComChannel {
    fn name(&self) -> &'static str {
        "wecom"
    }

    async fn send(&self, message: &ReminderMessage) -> Result<String, ChannelDeliveryError> {
        let res = post_json(&self.client, &self.config.webhook_url, &Self::payload(message)).await?;
        check_response(res)
    }
}
