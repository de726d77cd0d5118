use chrono::{DateTime, Utc};
use reminder_scheduler_domain::{CycleType, Reminder};
use serde::{Deserialize, Serialize};

/// Stored reminder as presented to clients. Field names follow the
/// storage columns which the frontend reads directly.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ReminderDTO {
    pub id: String,
    pub title: String,
    pub content: String,
    pub remind_time: DateTime<Utc>,
    pub cycle_type: CycleType,
    /// 0 = pending, 1 = fired
    pub status: i16,
    pub cron_job_id: Option<i64>,
    pub last_fired_at: Option<DateTime<Utc>>,
    pub link: Option<String>,
    pub amount: Option<f64>,
    pub currency: Option<String>,
    pub monthly_amount: Option<f64>,
    pub yearly_amount: Option<f64>,
}

impl ReminderDTO {
    pub fn new(reminder: Reminder) -> Self {
        Self {
            status: reminder.status.as_i16(),
            id: reminder.id,
            title: reminder.title,
            content: reminder.content,
            remind_time: reminder.remind_time,
            cycle_type: reminder.cycle_type,
            cron_job_id: reminder.cron_job_id,
            last_fired_at: reminder.last_fired_at,
            link: reminder.link,
            amount: reminder.amount,
            currency: reminder.currency,
            monthly_amount: reminder.monthly_amount,
            yearly_amount: reminder.yearly_amount,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ChannelOutcomeDTO {
    pub channel: String,
    pub success: bool,
    pub detail: String,
}
