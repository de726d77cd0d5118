use super::dispatch::{channel_outcome_dto, fire_reminder};
use crate::error::ReminderError;
use crate::shared::{
    auth::protect_cron_route,
    usecase::{execute, UseCase},
};
use actix_web::{web, HttpResponse};
use chrono::Duration;
use reminder_scheduler_api_structs::sweep_due_reminders::*;
use reminder_scheduler_infra::{ChannelOutcome, ReminderContext};
use tracing::info;

pub async fn sweep_due_reminders_controller(
    query: web::Query<QueryParams>,
    ctx: web::Data<ReminderContext>,
) -> Result<HttpResponse, ReminderError> {
    protect_cron_route(query.key.as_deref(), &ctx)?;

    let usecase = SweepDueRemindersUseCase {
        tolerance: ctx.config.due_tolerance(),
    };

    execute(usecase, &ctx)
        .await
        .map(|swept| {
            HttpResponse::Ok().json(APIResponse {
                processed: swept.len(),
                reminders: swept
                    .into_iter()
                    .map(|(id, channels)| SweptReminder {
                        id,
                        channels: channels.into_iter().map(channel_outcome_dto).collect(),
                    })
                    .collect(),
            })
        })
        .map_err(ReminderError::from)
}

/// Fires every pending reminder due within `tolerance` of now
#[derive(Debug)]
pub struct SweepDueRemindersUseCase {
    pub tolerance: Duration,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    Storage,
}

impl From<UseCaseError> for ReminderError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::Storage => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for SweepDueRemindersUseCase {
    /// Id and channel outcomes of every fired reminder
    type Response = Vec<(String, Vec<ChannelOutcome>)>;

    type Error = UseCaseError;

    const NAME: &'static str = "SweepDueReminders";

    async fn execute(&mut self, ctx: &ReminderContext) -> Result<Self::Response, Self::Error> {
        let now = ctx.sys.get_datetime();
        let due = ctx
            .repos
            .reminders
            .find_due(now - self.tolerance, now + self.tolerance)
            .await
            .map_err(|_| UseCaseError::Storage)?;

        if due.is_empty() {
            info!("No reminders to process");
        }

        let mut swept = Vec::with_capacity(due.len());
        for reminder in due {
            let id = reminder.id.clone();
            let channels = fire_reminder(reminder, ctx)
                .await
                .map_err(|_| UseCaseError::Storage)?;
            swept.push((id, channels));
        }

        Ok(swept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reminder::testing::{r1_remind_time, setup};
    use chrono::{TimeZone, Utc};
    use reminder_scheduler_domain::{CycleType, Reminder, ReminderStatus};

    fn reminder(id: &str, remind_time: chrono::DateTime<Utc>, cycle_type: CycleType) -> Reminder {
        Reminder::new(
            id.into(),
            format!("Reminder {}", id),
            "Content".into(),
            remind_time,
            cycle_type,
        )
    }

    fn usecase() -> SweepDueRemindersUseCase {
        SweepDueRemindersUseCase {
            tolerance: Duration::minutes(5),
        }
    }

    #[actix_web::main]
    #[test]
    async fn it_fires_r1_inside_window() {
        let ctx = setup();
        let r1 = reminder("r1", r1_remind_time(), CycleType::Monthly);
        ctx.ctx.repos.reminders.insert(&r1).await.unwrap();

        let swept = usecase().execute(&ctx.ctx).await.unwrap();
        assert_eq!(swept.len(), 1);
        assert_eq!(swept[0].0, "r1");
        // One attempt per configured channel, the failing one included
        assert_eq!(swept[0].1.len(), 2);
        assert_eq!(ctx.failing_channel.sent_count(), 1);
        assert_eq!(ctx.working_channel.sent_count(), 1);

        let stored = ctx.ctx.repos.reminders.find("r1").await.unwrap().unwrap();
        assert_eq!(stored.last_fired_at, Some(r1_remind_time()));
        assert_eq!(
            stored.remind_time,
            Utc.with_ymd_and_hms(2024, 4, 15, 1, 0, 0).unwrap()
        );
    }

    #[actix_web::main]
    #[test]
    async fn it_never_double_processes() {
        let ctx = setup();
        let once = reminder("once", r1_remind_time() + Duration::minutes(2), CycleType::Once);
        let mut fired = reminder("fired", r1_remind_time(), CycleType::Once);
        fired.status = ReminderStatus::Fired;
        let outside = reminder(
            "outside",
            r1_remind_time() + Duration::minutes(6),
            CycleType::Once,
        );
        for r in [&once, &fired, &outside] {
            ctx.ctx.repos.reminders.insert(r).await.unwrap();
        }

        let swept = usecase().execute(&ctx.ctx).await.unwrap();
        assert_eq!(
            swept.iter().map(|(id, _)| id.as_str()).collect::<Vec<_>>(),
            vec!["once"]
        );
        let stored = ctx.ctx.repos.reminders.find("once").await.unwrap().unwrap();
        assert_eq!(stored.status, ReminderStatus::Fired);

        // Second sweep in the same window has nothing left to do
        assert!(usecase().execute(&ctx.ctx).await.unwrap().is_empty());
        assert_eq!(ctx.working_channel.sent_count(), 1);
    }
}
