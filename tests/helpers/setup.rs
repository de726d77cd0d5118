use chrono::{DateTime, Utc};
use reminder_scheduler_api::Application;
use reminder_scheduler_domain::ReminderMessage;
use reminder_scheduler_infra::{
    ChannelDeliveryError, INotificationChannel, InMemoryJobScheduler, ReminderContext,
    StaticTimeSys,
};
use reminder_scheduler_sdk::ReminderSDK;
use std::sync::{Arc, Mutex};

/// Channel that records what it was asked to deliver
pub struct RecordingChannel {
    pub messages: Mutex<Vec<ReminderMessage>>,
}

impl RecordingChannel {
    pub fn count(&self) -> usize {
        self.messages.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl INotificationChannel for RecordingChannel {
    fn name(&self) -> &'static str {
        "recording"
    }

    async fn send(&self, message: &ReminderMessage) -> Result<String, ChannelDeliveryError> {
        self.messages.lock().unwrap().push(message.clone());
        Ok("recorded".into())
    }
}

/// Channel whose backend is always down
pub struct BrokenChannel;

#[async_trait::async_trait]
impl INotificationChannel for BrokenChannel {
    fn name(&self) -> &'static str {
        "broken"
    }

    async fn send(&self, _message: &ReminderMessage) -> Result<String, ChannelDeliveryError> {
        Err(ChannelDeliveryError::Network("connection refused".into()))
    }
}

pub struct TestApp {
    pub cron_secret: String,
    pub scheduler: Arc<InMemoryJobScheduler>,
    pub channel: Arc<RecordingChannel>,
}

// Launch the application as a background task with its clock fixed at `now`
pub async fn spawn_app(now: DateTime<Utc>) -> (TestApp, ReminderSDK) {
    let mut ctx = ReminderContext::create_inmemory();
    ctx.config.port = 0; // Random port
    ctx.config.cron_secret = "test-cron-secret".into();
    ctx.config.public_url = Some("https://reminders.example.com".into());
    ctx.config.timezone = chrono_tz::Asia::Shanghai;
    ctx.config.password = Some("open sesame".into());
    ctx.sys = Arc::new(StaticTimeSys::at(now));

    let scheduler = Arc::new(InMemoryJobScheduler::new());
    ctx.job_scheduler = scheduler.clone();
    let channel = Arc::new(RecordingChannel {
        messages: Mutex::new(Vec::new()),
    });
    ctx.channels = vec![Arc::new(BrokenChannel), channel.clone()];

    let cron_secret = ctx.config.cron_secret.clone();
    let application = Application::new(ctx)
        .await
        .expect("Failed to build application.");

    let address = format!("http://localhost:{}/api", application.port());
    let _ = actix_web::rt::spawn(async move {
        application
            .start()
            .await
            .expect("Expected application to start");
    });

    let app = TestApp {
        cron_secret,
        scheduler,
        channel,
    };
    let sdk = ReminderSDK::new(address);
    (app, sdk)
}
