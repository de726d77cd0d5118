use crate::error::ReminderError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use reminder_scheduler_api_structs::dtos::ReminderDTO;
use reminder_scheduler_api_structs::get_reminders::*;
use reminder_scheduler_domain::Reminder;
use reminder_scheduler_infra::ReminderContext;

pub async fn get_reminders_controller(
    ctx: web::Data<ReminderContext>,
) -> Result<HttpResponse, ReminderError> {
    execute(GetRemindersUseCase {}, &ctx)
        .await
        .map(|reminders| {
            let res: APIResponse = reminders.into_iter().map(ReminderDTO::new).collect();
            HttpResponse::Ok().json(res)
        })
        .map_err(ReminderError::from)
}

#[derive(Debug)]
pub struct GetRemindersUseCase {}

#[derive(Debug)]
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
impl UseCase for GetRemindersUseCase {
    type Response = Vec<Reminder>;

    type Error = UseCaseError;

    const NAME: &'static str = "GetReminders";

    async fn execute(&mut self, ctx: &ReminderContext) -> Result<Self::Response, Self::Error> {
        ctx.repos
            .reminders
            .find_all()
            .await
            .map_err(|_| UseCaseError::Storage)
    }
}
