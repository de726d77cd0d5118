use crate::error::ReminderError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use reminder_scheduler_api_structs::verify_password::*;
use reminder_scheduler_infra::ReminderContext;
use reminder_scheduler_utils::secrets_match;

pub async fn verify_password_controller(
    body: web::Json<RequestBody>,
    ctx: web::Data<ReminderContext>,
) -> Result<HttpResponse, ReminderError> {
    let usecase = VerifyPasswordUseCase {
        password: body.0.password,
    };

    execute(usecase, &ctx)
        .await
        .map(|_| HttpResponse::Ok().json(APIResponse { success: true }))
        .map_err(ReminderError::from)
}

#[derive(Debug)]
pub struct VerifyPasswordUseCase {
    pub password: Option<String>,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    WrongPassword,
}

impl From<UseCaseError> for ReminderError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::WrongPassword => Self::Unauthorized("Wrong password".into()),
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for VerifyPasswordUseCase {
    type Response = ();

    type Error = UseCaseError;

    const NAME: &'static str = "VerifyPassword";

    /// Without a configured password access is open
    async fn execute(&mut self, ctx: &ReminderContext) -> Result<Self::Response, Self::Error> {
        match &ctx.config.password {
            None => Ok(()),
            Some(password)
                if self
                    .password
                    .as_deref()
                    .map_or(false, |given| secrets_match(given, password)) =>
            {
                Ok(())
            }
            Some(_) => Err(UseCaseError::WrongPassword),
        }
    }
}
