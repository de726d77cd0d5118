//! Context and fakes for exercising the reminder use cases

use chrono::{DateTime, TimeZone, Utc};
use reminder_scheduler_domain::ReminderMessage;
use reminder_scheduler_infra::{
    ChannelDeliveryError, INotificationChannel, InMemoryJobScheduler, ReminderContext,
    StaticTimeSys,
};
use std::sync::{Arc, Mutex};

pub struct FakeChannel {
    name: &'static str,
    fail: bool,
    pub sent: Mutex<Vec<ReminderMessage>>,
}

impl FakeChannel {
    pub fn new(name: &'static str, fail: bool) -> Arc<Self> {
        Arc::new(Self {
            name,
            fail,
            sent: Mutex::new(Vec::new()),
        })
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl INotificationChannel for FakeChannel {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn send(&self, message: &ReminderMessage) -> Result<String, ChannelDeliveryError> {
        self.sent.lock().unwrap().push(message.clone());
        if self.fail {
            Err(ChannelDeliveryError::UnexpectedStatusCode(
                500,
                "bad gateway".into(),
            ))
        } else {
            Ok("delivered".into())
        }
    }
}

pub struct TestContext {
    pub ctx: ReminderContext,
    pub scheduler: Arc<InMemoryJobScheduler>,
    pub working_channel: Arc<FakeChannel>,
    pub failing_channel: Arc<FakeChannel>,
}

impl TestContext {
    /// Moves the clock of the context
    pub fn set_now(&mut self, now: DateTime<Utc>) {
        self.ctx.sys = Arc::new(StaticTimeSys::at(now));
    }
}

/// 2024-03-15 09:00 in Asia/Shanghai
pub fn r1_remind_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 15, 1, 0, 0).unwrap()
}

pub fn setup() -> TestContext {
    let mut ctx = ReminderContext::create_inmemory();
    ctx.config.timezone = chrono_tz::Asia::Shanghai;
    ctx.config.cron_secret = "cron-secret".into();
    ctx.config.public_url = Some("https://reminders.example.com".into());
    ctx.sys = Arc::new(StaticTimeSys::at(r1_remind_time()));

    let scheduler = Arc::new(InMemoryJobScheduler::new());
    ctx.job_scheduler = scheduler.clone();

    let failing_channel = FakeChannel::new("telegram", true);
    let working_channel = FakeChannel::new("bark", false);
    ctx.channels = vec![failing_channel.clone(), working_channel.clone()];

    TestContext {
        ctx,
        scheduler,
        working_channel,
        failing_channel,
    }
}
