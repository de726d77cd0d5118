use super::dispatch::{channel_outcome_dto, fire_reminder};
use crate::error::ReminderError;
use crate::shared::{
    auth::protect_cron_route,
    usecase::{execute, UseCase},
};
use actix_web::{web, HttpResponse};
use reminder_scheduler_api_structs::fire_reminder::*;
use reminder_scheduler_api_structs::get_service_health;
use reminder_scheduler_infra::{ChannelOutcome, ReminderContext};
use tracing::info;

/// Called back by the external job scheduler when a reminder is due.
/// Without an `id` it only answers as a health check.
pub async fn fire_reminder_controller(
    query: web::Query<QueryParams>,
    ctx: web::Data<ReminderContext>,
) -> Result<HttpResponse, ReminderError> {
    let query = query.into_inner();
    let reminder_id = match query.id {
        Some(id) if !id.is_empty() => id,
        _ => {
            return Ok(HttpResponse::Ok().json(get_service_health::APIResponse {
                message: "Notification endpoint is working".into(),
            }))
        }
    };
    protect_cron_route(query.key.as_deref(), &ctx)?;

    let usecase = FireReminderUseCase { reminder_id };

    execute(usecase, &ctx)
        .await
        .map(|res| {
            HttpResponse::Ok().json(APIResponse {
                outcome: res.outcome,
                channels: res.channels.into_iter().map(channel_outcome_dto).collect(),
            })
        })
        .map_err(ReminderError::from)
}

#[derive(Debug)]
pub struct FireReminderUseCase {
    pub reminder_id: String,
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

#[derive(Debug)]
pub struct UseCaseRes {
    pub outcome: FireOutcome,
    pub channels: Vec<ChannelOutcome>,
}

impl UseCaseRes {
    fn skipped(outcome: FireOutcome) -> Self {
        Self {
            outcome,
            channels: Vec::new(),
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for FireReminderUseCase {
    type Response = UseCaseRes;

    type Error = UseCaseError;

    const NAME: &'static str = "FireReminder";

    async fn execute(&mut self, ctx: &ReminderContext) -> Result<Self::Response, Self::Error> {
        let reminder = match ctx.repos.reminders.find(&self.reminder_id).await {
            Ok(Some(reminder)) => reminder,
            Ok(None) => {
                info!("Reminder {} to fire was not found", self.reminder_id);
                return Ok(UseCaseRes::skipped(FireOutcome::NotFound));
            }
            Err(_) => return Err(UseCaseError::Storage),
        };

        if !reminder.is_pending() {
            info!("Reminder {} has already fired", self.reminder_id);
            return Ok(UseCaseRes::skipped(FireOutcome::AlreadyFired));
        }
        // Either a duplicate callback after re-arming, or the trigger pattern
        // matching a cycle before the first occurrence
        let now = ctx.sys.get_datetime();
        if reminder.is_ahead_of(now, ctx.config.due_tolerance()) {
            info!(
                "Reminder {} is not due before {}, skipping callback",
                self.reminder_id, reminder.remind_time
            );
            return Ok(UseCaseRes::skipped(FireOutcome::AlreadyFired));
        }

        let channels = fire_reminder(reminder, ctx)
            .await
            .map_err(|_| UseCaseError::Storage)?;

        Ok(UseCaseRes {
            outcome: FireOutcome::Fired,
            channels,
        })
    }
}
