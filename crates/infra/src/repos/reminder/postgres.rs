use super::IReminderRepo;
use chrono::{DateTime, Utc};
use reminder_scheduler_domain::{CycleType, Reminder, ReminderStatus};
use sqlx::{FromRow, PgPool};
use tracing::warn;

pub struct PostgresReminderRepo {
    pool: PgPool,
}

impl PostgresReminderRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct ReminderRaw {
    id: String,
    title: String,
    content: String,
    remind_time: DateTime<Utc>,
    cycle_type: String,
    status: i16,
    cron_job_id: Option<i64>,
    last_fired_at: Option<DateTime<Utc>>,
    link: Option<String>,
    amount: Option<f64>,
    currency: Option<String>,
    monthly_amount: Option<f64>,
    yearly_amount: Option<f64>,
}

impl From<ReminderRaw> for Reminder {
    fn from(raw: ReminderRaw) -> Self {
        let cycle_type = raw.cycle_type.parse().unwrap_or_else(|_| {
            warn!(
                "Reminder {} has unknown cycle type: {}, treating it as monthly",
                raw.id, raw.cycle_type
            );
            CycleType::Monthly
        });
        Self {
            id: raw.id,
            title: raw.title,
            content: raw.content,
            remind_time: raw.remind_time,
            cycle_type,
            status: ReminderStatus::from_i16(raw.status),
            cron_job_id: raw.cron_job_id,
            last_fired_at: raw.last_fired_at,
            link: raw.link,
            amount: raw.amount,
            currency: raw.currency,
            monthly_amount: raw.monthly_amount,
            yearly_amount: raw.yearly_amount,
        }
    }
}

#[async_trait::async_trait]
impl IReminderRepo for PostgresReminderRepo {
    async fn insert(&self, reminder: &Reminder) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO reminders(id, title, content, remind_time, cycle_type, status, cron_job_id,
                last_fired_at, link, amount, currency, monthly_amount, yearly_amount)
            VALUES($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            "#,
        )
        .bind(&reminder.id)
        .bind(&reminder.title)
        .bind(&reminder.content)
        .bind(reminder.remind_time)
        .bind(reminder.cycle_type.as_str())
        .bind(reminder.status.as_i16())
        .bind(reminder.cron_job_id)
        .bind(reminder.last_fired_at)
        .bind(&reminder.link)
        .bind(reminder.amount)
        .bind(&reminder.currency)
        .bind(reminder.monthly_amount)
        .bind(reminder.yearly_amount)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn save(&self, reminder: &Reminder) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE reminders
            SET title = $2,
            content = $3,
            remind_time = $4,
            cycle_type = $5,
            status = $6,
            cron_job_id = $7,
            last_fired_at = $8,
            link = $9,
            amount = $10,
            currency = $11,
            monthly_amount = $12,
            yearly_amount = $13
            WHERE id = $1
            "#,
        )
        .bind(&reminder.id)
        .bind(&reminder.title)
        .bind(&reminder.content)
        .bind(reminder.remind_time)
        .bind(reminder.cycle_type.as_str())
        .bind(reminder.status.as_i16())
        .bind(reminder.cron_job_id)
        .bind(reminder.last_fired_at)
        .bind(&reminder.link)
        .bind(reminder.amount)
        .bind(&reminder.currency)
        .bind(reminder.monthly_amount)
        .bind(reminder.yearly_amount)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find(&self, reminder_id: &str) -> anyhow::Result<Option<Reminder>> {
        let reminder: Option<ReminderRaw> = sqlx::query_as(
            r#"
            SELECT * FROM reminders
            WHERE id = $1
            "#,
        )
        .bind(reminder_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(reminder.map(|r| r.into()))
    }

    async fn find_all(&self) -> anyhow::Result<Vec<Reminder>> {
        let reminders: Vec<ReminderRaw> = sqlx::query_as(
            r#"
            SELECT * FROM reminders
            ORDER BY remind_time ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(reminders.into_iter().map(|r| r.into()).collect())
    }

    async fn find_due(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> anyhow::Result<Vec<Reminder>> {
        let reminders: Vec<ReminderRaw> = sqlx::query_as(
            r#"
            SELECT * FROM reminders
            WHERE status = $1 AND remind_time >= $2 AND remind_time <= $3
            ORDER BY remind_time ASC
            "#,
        )
        .bind(ReminderStatus::Pending.as_i16())
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        Ok(reminders.into_iter().map(|r| r.into()).collect())
    }

    async fn update_status(
        &self,
        reminder_id: &str,
        status: ReminderStatus,
    ) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE reminders
            SET status = $2
            WHERE id = $1
            "#,
        )
        .bind(reminder_id)
        .bind(status.as_i16())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn update_cron_job_id(
        &self,
        reminder_id: &str,
        cron_job_id: Option<i64>,
    ) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE reminders
            SET cron_job_id = $2
            WHERE id = $1
            "#,
        )
        .bind(reminder_id)
        .bind(cron_job_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete(&self, reminder_id: &str) -> anyhow::Result<Option<Reminder>> {
        let reminder: Option<ReminderRaw> = sqlx::query_as(
            r#"
            DELETE FROM reminders
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(reminder_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(reminder.map(|r| r.into()))
    }
}
