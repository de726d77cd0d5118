mod inmemory;
mod postgres;

use chrono::{DateTime, Utc};
pub use inmemory::InMemoryReminderRepo;
pub use postgres::PostgresReminderRepo;
use reminder_scheduler_domain::{Reminder, ReminderStatus};

#[async_trait::async_trait]
pub trait IReminderRepo: Send + Sync {
    /// Fails if a `Reminder` with the same id is already stored
    async fn insert(&self, reminder: &Reminder) -> anyhow::Result<()>;
    async fn save(&self, reminder: &Reminder) -> anyhow::Result<()>;
    async fn find(&self, reminder_id: &str) -> anyhow::Result<Option<Reminder>>;
    /// All reminders ordered by `remind_time` ascending
    async fn find_all(&self) -> anyhow::Result<Vec<Reminder>>;
    /// Pending reminders with `start <= remind_time <= end`
    async fn find_due(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> anyhow::Result<Vec<Reminder>>;
    async fn update_status(&self, reminder_id: &str, status: ReminderStatus)
        -> anyhow::Result<()>;
    async fn update_cron_job_id(
        &self,
        reminder_id: &str,
        cron_job_id: Option<i64>,
    ) -> anyhow::Result<()>;
    async fn delete(&self, reminder_id: &str) -> anyhow::Result<Option<Reminder>>;
}

#[cfg(test)]
mod tests {
    use crate::repos::Repos;
    use chrono::{Duration, TimeZone, Utc};
    use reminder_scheduler_domain::{CycleType, Reminder, ReminderStatus};
    use reminder_scheduler_utils::create_random_secret;

    /// In-memory repos always, and postgres repos as well when `DATABASE_URL` is present
    async fn create_repos() -> Vec<Repos> {
        let mut repos = vec![Repos::create_inmemory()];
        if let Ok(url) = std::env::var("DATABASE_URL") {
            repos.push(
                Repos::create_postgres(&url)
                    .await
                    .expect("Postgres credentials must be valid"),
            );
        }
        repos
    }

    fn reminder(remind_time: chrono::DateTime<Utc>) -> Reminder {
        Reminder::new(
            create_random_secret(16),
            "Pay rent".into(),
            "Transfer to landlord".into(),
            remind_time,
            CycleType::Monthly,
        )
    }

    #[tokio::test]
    async fn create_find_and_delete() {
        for repos in create_repos().await {
            let mut reminder = reminder(Utc.with_ymd_and_hms(2024, 3, 15, 1, 0, 0).unwrap());
            reminder.amount = Some(1200.5);
            reminder.currency = Some("CNY".into());

            assert!(repos.reminders.insert(&reminder).await.is_ok());
            // Ids are unique
            assert!(repos.reminders.insert(&reminder).await.is_err());

            let found = repos
                .reminders
                .find(&reminder.id)
                .await
                .unwrap()
                .expect("To find reminder");
            assert_eq!(found, reminder);

            let deleted = repos.reminders.delete(&reminder.id).await.unwrap();
            assert_eq!(deleted, Some(reminder.clone()));
            assert!(repos.reminders.find(&reminder.id).await.unwrap().is_none());
            assert!(repos.reminders.delete(&reminder.id).await.unwrap().is_none());
        }
    }

    #[tokio::test]
    async fn updates() {
        for repos in create_repos().await {
            let mut reminder = reminder(Utc.with_ymd_and_hms(2024, 3, 15, 1, 0, 0).unwrap());
            repos.reminders.insert(&reminder).await.unwrap();

            repos
                .reminders
                .update_cron_job_id(&reminder.id, Some(4242))
                .await
                .unwrap();
            repos
                .reminders
                .update_status(&reminder.id, ReminderStatus::Fired)
                .await
                .unwrap();
            let found = repos.reminders.find(&reminder.id).await.unwrap().unwrap();
            assert_eq!(found.cron_job_id, Some(4242));
            assert_eq!(found.status, ReminderStatus::Fired);

            reminder.title = "Pay rent and water".into();
            reminder.status = ReminderStatus::Pending;
            reminder.last_fired_at = Some(Utc.with_ymd_and_hms(2024, 3, 15, 1, 0, 0).unwrap());
            repos.reminders.save(&reminder).await.unwrap();
            let found = repos.reminders.find(&reminder.id).await.unwrap().unwrap();
            assert_eq!(found.title, "Pay rent and water");
            assert_eq!(found.status, ReminderStatus::Pending);
            assert_eq!(found.cron_job_id, None);
            assert_eq!(found.last_fired_at, reminder.last_fired_at);

            repos.reminders.delete(&reminder.id).await.unwrap();
        }
    }

    #[tokio::test]
    async fn find_due_is_inclusive_and_skips_fired() {
        for repos in create_repos().await {
            let now = Utc.with_ymd_and_hms(2030, 6, 1, 12, 0, 0).unwrap();
            let start = now - Duration::minutes(5);
            let end = now + Duration::minutes(5);

            let at_start = reminder(start);
            let at_end = reminder(end);
            let inside = reminder(now);
            let before = reminder(start - Duration::seconds(1));
            let after = reminder(end + Duration::seconds(1));
            let mut fired = reminder(now);
            fired.status = ReminderStatus::Fired;

            for r in [&at_start, &at_end, &inside, &before, &after, &fired] {
                repos.reminders.insert(r).await.unwrap();
            }

            let due = repos.reminders.find_due(start, end).await.unwrap();
            let ids = due.iter().map(|r| r.id.clone()).collect::<Vec<_>>();
            assert_eq!(ids.len(), 3);
            for r in [&at_start, &at_end, &inside] {
                assert!(ids.contains(&r.id));
            }

            for r in [&at_start, &at_end, &inside, &before, &after, &fired] {
                repos.reminders.delete(&r.id).await.unwrap();
            }
        }
    }

    #[tokio::test]
    async fn find_all_is_ordered_by_remind_time() {
        let repos = Repos::create_inmemory();
        let late = reminder(Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap());
        let early = reminder(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
        repos.reminders.insert(&late).await.unwrap();
        repos.reminders.insert(&early).await.unwrap();

        let all = repos.reminders.find_all().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].id, early.id);
        assert_eq!(all[1].id, late.id);
    }
}
