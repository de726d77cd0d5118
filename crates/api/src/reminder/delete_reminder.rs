use crate::error::ReminderError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use reminder_scheduler_api_structs::delete_reminder::*;
use reminder_scheduler_infra::{DeregisterOutcome, JobSchedulerError, ReminderContext};
use tracing::{info, warn};

pub async fn delete_reminder_controller(
    path: web::Path<PathParams>,
    body: Option<web::Json<RequestBody>>,
    ctx: web::Data<ReminderContext>,
) -> Result<HttpResponse, ReminderError> {
    let usecase = DeleteReminderUseCase {
        reminder_id: path.into_inner().reminder_id,
        cron_job_id: body.and_then(|body| body.0.cron_job_id),
    };

    execute(usecase, &ctx)
        .await
        .map(|_| {
            HttpResponse::Ok().json(APIResponse {
                success: true,
                message: "Reminder and cron job deleted successfully".into(),
            })
        })
        .map_err(ReminderError::from)
}

#[derive(Debug)]
pub struct DeleteReminderUseCase {
    pub reminder_id: String,
    /// Job id known to the client, used when the record has none stored
    pub cron_job_id: Option<i64>,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    NotFound(String),
    Deregister(i64, JobSchedulerError),
    Storage,
}

impl From<UseCaseError> for ReminderError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::NotFound(id) => {
                Self::NotFound(format!("The reminder with id: {}, was not found.", id))
            }
            UseCaseError::Deregister(job_id, e) => Self::BadGateway(format!(
                "Failed to delete cron job {}: {}. The reminder was kept, please retry.",
                job_id, e
            )),
            UseCaseError::Storage => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for DeleteReminderUseCase {
    type Response = ();

    type Error = UseCaseError;

    const NAME: &'static str = "DeleteReminder";

    /// Deregisters the trigger before the record is deleted so that a failure
    /// never leaves a live trigger behind without a record to retry from
    async fn execute(&mut self, ctx: &ReminderContext) -> Result<Self::Response, Self::Error> {
        let reminder = ctx
            .repos
            .reminders
            .find(&self.reminder_id)
            .await
            .map_err(|_| UseCaseError::Storage)?;

        let reminder = match reminder {
            Some(reminder) => reminder,
            None => return Err(UseCaseError::NotFound(self.reminder_id.clone())),
        };

        // The stored job id is authoritative. The client id is only used for
        // records that never stored one, and never when another record owns it.
        let job_id = match (reminder.cron_job_id, self.cron_job_id) {
            (Some(stored), Some(given)) if stored != given => {
                warn!(
                    "Ignoring cron job {} given for reminder {} which owns cron job {}",
                    given, reminder.id, stored
                );
                Some(stored)
            }
            (None, Some(given)) => {
                let owned_by_other = ctx
                    .repos
                    .reminders
                    .find_all()
                    .await
                    .map_err(|_| UseCaseError::Storage)?
                    .iter()
                    .any(|other| other.id != reminder.id && other.cron_job_id == Some(given));
                if owned_by_other {
                    warn!(
                        "Ignoring cron job {} given for reminder {}, it belongs to another reminder",
                        given, reminder.id
                    );
                    None
                } else {
                    Some(given)
                }
            }
            (stored, _) => stored,
        };

        if let Some(job_id) = job_id {
            match ctx.job_scheduler.deregister(job_id).await {
                Ok(DeregisterOutcome::Deleted) => info!("Deleted cron job {}", job_id),
                Ok(DeregisterOutcome::NotFound) => {
                    info!("Cron job {} was already gone", job_id)
                }
                Err(e) => return Err(UseCaseError::Deregister(job_id, e)),
            }
        }

        ctx.repos
            .reminders
            .delete(&self.reminder_id)
            .await
            .map_err(|_| UseCaseError::Storage)?;

        Ok(())
    }
}
