use crate::reminder::Reminder;
use chrono_tz::Tz;

/// The human readable content of a notification for a due `Reminder`.
/// Every channel builds its own payload from this.
#[derive(Debug, Clone, PartialEq)]
pub struct ReminderMessage {
    pub title: String,
    pub content: String,
    /// Due time rendered in the reference timezone
    pub remind_time: String,
    pub cycle_label: &'static str,
}

impl ReminderMessage {
    pub fn new(reminder: &Reminder, timezone: &Tz) -> Self {
        Self {
            title: reminder.title.clone(),
            content: reminder.content.clone(),
            remind_time: reminder
                .remind_time
                .with_timezone(timezone)
                .format("%Y/%-m/%-d %H:%M:%S")
                .to_string(),
            cycle_label: reminder.cycle_type.label(),
        }
    }

    pub fn headline(&self) -> String {
        format!("🔔 提醒：{}", self.title)
    }

    /// Full text used by chat style channels
    pub fn text(&self) -> String {
        format!(
            "{}\n\n{}\n\n⏰ 提醒时间：{}\n\n📅 循环类型：{}",
            self.headline(),
            self.content,
            self.remind_time,
            self.cycle_label
        )
    }

    /// Body used by push channels which show `headline` separately
    pub fn push_body(&self) -> String {
        format!(
            "{}\n\n⏰ 提醒时间：{}\n📅 循环类型：{}",
            self.content, self.remind_time, self.cycle_label
        )
    }
}
