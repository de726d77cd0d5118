use crate::error::ReminderError;
use crate::shared::{
    auth::protect_cron_route,
    usecase::{execute, UseCase},
};
use actix_web::{web, HttpResponse};
use reminder_scheduler_api_structs::delete_job::*;
use reminder_scheduler_infra::{DeregisterOutcome, JobSchedulerError, ReminderContext};

/// Removes a trigger at the external job scheduler directly, for cleaning up
/// triggers that outlived their reminder
pub async fn delete_job_controller(
    query: web::Query<QueryParams>,
    ctx: web::Data<ReminderContext>,
) -> Result<HttpResponse, ReminderError> {
    protect_cron_route(query.key.as_deref(), &ctx)?;
    let job_id = query
        .job_id
        .ok_or_else(|| ReminderError::BadClientData("Expected the `jobId` query parameter".into()))?;

    execute(DeleteJobUseCase { job_id }, &ctx)
        .await
        .map(|outcome| {
            HttpResponse::Ok().json(APIResponse {
                success: true,
                existed: outcome == DeregisterOutcome::Deleted,
            })
        })
        .map_err(ReminderError::from)
}

#[derive(Debug)]
pub struct DeleteJobUseCase {
    pub job_id: i64,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    Scheduler(JobSchedulerError),
}

impl From<UseCaseError> for ReminderError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::Scheduler(e) => Self::BadGateway(format!("Failed to delete job: {}", e)),
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for DeleteJobUseCase {
    type Response = DeregisterOutcome;

    type Error = UseCaseError;

    const NAME: &'static str = "DeleteJob";

    async fn execute(&mut self, ctx: &ReminderContext) -> Result<Self::Response, Self::Error> {
        ctx.job_scheduler
            .deregister(self.job_id)
            .await
            .map_err(UseCaseError::Scheduler)
    }
}
