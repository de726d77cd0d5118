use super::IReminderRepo;
use crate::repos::shared::inmemory_repo::*;
use chrono::{DateTime, Utc};
use reminder_scheduler_domain::{Reminder, ReminderStatus};
use std::sync::Mutex;

pub struct InMemoryReminderRepo {
    reminders: Mutex<Vec<Reminder>>,
}

impl InMemoryReminderRepo {
    pub fn new() -> Self {
        Self {
            reminders: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait::async_trait]
impl IReminderRepo for InMemoryReminderRepo {
    async fn insert(&self, reminder: &Reminder) -> anyhow::Result<()> {
        insert(reminder, &self.reminders)
    }

    async fn save(&self, reminder: &Reminder) -> anyhow::Result<()> {
        save(reminder, &self.reminders);
        Ok(())
    }

    async fn find(&self, reminder_id: &str) -> anyhow::Result<Option<Reminder>> {
        Ok(find(reminder_id, &self.reminders))
    }

    async fn find_all(&self) -> anyhow::Result<Vec<Reminder>> {
        let mut reminders = find_by(&self.reminders, |_| true);
        reminders.sort_by_key(|r| r.remind_time);
        Ok(reminders)
    }

    async fn find_due(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> anyhow::Result<Vec<Reminder>> {
        Ok(find_by(&self.reminders, |r| {
            r.is_pending() && r.remind_time >= start && r.remind_time <= end
        }))
    }

    async fn update_status(
        &self,
        reminder_id: &str,
        status: ReminderStatus,
    ) -> anyhow::Result<()> {
        update(reminder_id, &self.reminders, |r| r.status = status);
        Ok(())
    }

    async fn update_cron_job_id(
        &self,
        reminder_id: &str,
        cron_job_id: Option<i64>,
    ) -> anyhow::Result<()> {
        update(reminder_id, &self.reminders, |r| r.cron_job_id = cron_job_id);
        Ok(())
    }

    async fn delete(&self, reminder_id: &str) -> anyhow::Result<Option<Reminder>> {
        Ok(delete(reminder_id, &self.reminders))
    }
}
