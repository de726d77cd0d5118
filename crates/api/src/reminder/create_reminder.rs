use crate::error::ReminderError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpRequest, HttpResponse};
use reminder_scheduler_api_structs::create_reminder::*;
use reminder_scheduler_domain::{parse_remind_time, CycleType, Reminder, TriggerPattern};
use reminder_scheduler_infra::{ReminderContext, TriggerJob};
use reminder_scheduler_utils::create_random_secret;
use tracing::{error, info, warn};
use url::Url;

pub async fn create_reminder_controller(
    http_req: HttpRequest,
    body: web::Json<RequestBody>,
    ctx: web::Data<ReminderContext>,
) -> Result<HttpResponse, ReminderError> {
    let origin = match &ctx.config.public_url {
        Some(public_url) => public_url.clone(),
        None => {
            let conn = http_req.connection_info();
            format!("{}://{}", conn.scheme(), conn.host())
        }
    };

    let usecase = CreateReminderUseCase {
        body: body.0,
        origin,
    };

    execute(usecase, &ctx)
        .await
        .map(|res| {
            HttpResponse::Created().json(APIResponse {
                success: true,
                id: res.reminder.id,
                trigger_registered: res.trigger_registered,
            })
        })
        .map_err(ReminderError::from)
}

#[derive(Debug)]
pub struct CreateReminderUseCase {
    pub body: RequestBody,
    /// Origin the external job scheduler reaches this server on
    pub origin: String,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    MissingFields(Vec<&'static str>),
    InvalidRemindTime(String),
    IdTaken(String),
    Storage,
}

impl From<UseCaseError> for ReminderError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::MissingFields(fields) => Self::BadClientData(format!(
                "Missing required fields: {}",
                fields.join(", ")
            )),
            UseCaseError::InvalidRemindTime(input) => Self::BadClientData(format!(
                "Invalid remind_time: {}. Expected an RFC 3339 timestamp or a local time like 2024-03-15T09:00.",
                input
            )),
            UseCaseError::IdTaken(id) => {
                Self::Conflict(format!("A reminder with id: {}, already exists.", id))
            }
            UseCaseError::Storage => Self::InternalError,
        }
    }
}

#[derive(Debug)]
pub struct UseCaseRes {
    pub reminder: Reminder,
    pub trigger_registered: bool,
}

fn required(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Url the external job scheduler calls when the reminder is due
pub fn callback_url(origin: &str, secret: &str, reminder_id: &str) -> Result<Url, url::ParseError> {
    let mut url = Url::parse(origin)?.join("/api/notify")?;
    url.query_pairs_mut()
        .append_pair("key", secret)
        .append_pair("id", reminder_id);
    Ok(url)
}

#[async_trait::async_trait(?Send)]
impl UseCase for CreateReminderUseCase {
    type Response = UseCaseRes;

    type Error = UseCaseError;

    const NAME: &'static str = "CreateReminder";

    async fn execute(&mut self, ctx: &ReminderContext) -> Result<Self::Response, Self::Error> {
        let title = required(&self.body.title);
        let content = required(&self.body.content);
        let remind_time = required(&self.body.remind_time);
        let cycle_type = required(&self.body.cycle_type);
        let (title, content, remind_time, cycle_type) =
            match (title, content, remind_time, cycle_type) {
                (Some(title), Some(content), Some(remind_time), Some(cycle_type)) => {
                    (title, content, remind_time, cycle_type)
                }
                _ => {
                    let missing = [
                        ("title", title),
                        ("content", content),
                        ("remind_time", remind_time),
                        ("cycle_type", cycle_type),
                    ]
                    .iter()
                    .filter(|(_, value)| value.is_none())
                    .map(|(name, _)| *name)
                    .collect();
                    return Err(UseCaseError::MissingFields(missing));
                }
            };

        let remind_time = parse_remind_time(remind_time, &ctx.config.timezone)
            .map_err(|e| UseCaseError::InvalidRemindTime(e.0))?;
        let cycle_type = cycle_type.parse::<CycleType>().unwrap_or_else(|e| {
            warn!("Unknown cycle type: {}, falling back to monthly", e.0);
            CycleType::Monthly
        });
        let id = match required(&self.body.id) {
            Some(id) => id.to_string(),
            None => create_random_secret(16),
        };

        match ctx.repos.reminders.find(&id).await {
            Ok(Some(_)) => return Err(UseCaseError::IdTaken(id)),
            Ok(None) => (),
            Err(_) => return Err(UseCaseError::Storage),
        }

        let mut reminder = Reminder::new(
            id,
            title.to_string(),
            content.to_string(),
            remind_time,
            cycle_type,
        );
        reminder.link = self.body.link.clone();
        reminder.amount = self.body.amount;
        reminder.currency = self.body.currency.clone();
        reminder.monthly_amount = self.body.monthly_amount;
        reminder.yearly_amount = self.body.yearly_amount;

        if ctx.repos.reminders.insert(&reminder).await.is_err() {
            return Err(UseCaseError::Storage);
        }

        let callback_url = match callback_url(&self.origin, &ctx.config.cron_secret, &reminder.id)
        {
            Ok(url) => url,
            Err(e) => {
                error!(
                    "Unable to build callback url from origin: {}. Error: {}",
                    self.origin, e
                );
                return Ok(UseCaseRes {
                    reminder,
                    trigger_registered: false,
                });
            }
        };
        let job = TriggerJob {
            pattern: TriggerPattern::plan(reminder.remind_time, cycle_type, ctx.config.timezone),
            callback_url: callback_url.to_string(),
            title: format!("Reminder: {} ({})", reminder.title, cycle_type),
        };

        // The reminder is kept even when the trigger could not be registered
        let trigger_registered = match ctx.job_scheduler.register(&job).await {
            Ok(job_id) => {
                info!("Registered job {} for reminder {}", job_id, reminder.id);
                if ctx
                    .repos
                    .reminders
                    .update_cron_job_id(&reminder.id, Some(job_id))
                    .await
                    .is_err()
                {
                    return Err(UseCaseError::Storage);
                }
                reminder.cron_job_id = Some(job_id);
                true
            }
            Err(e) => {
                error!(
                    "Unable to register job for reminder {}. Error: {}",
                    reminder.id, e
                );
                false
            }
        };

        Ok(UseCaseRes {
            reminder,
            trigger_registered,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reminder::testing::{r1_remind_time, setup};
    use reminder_scheduler_domain::ReminderStatus;

    fn r1_body() -> RequestBody {
        RequestBody {
            id: Some("r1".into()),
            title: Some("Pay rent".into()),
            content: Some("Transfer to landlord".into()),
            remind_time: Some("2024-03-15T09:00".into()),
            cycle_type: Some("monthly".into()),
            ..Default::default()
        }
    }

    fn usecase(body: RequestBody) -> CreateReminderUseCase {
        CreateReminderUseCase {
            body,
            origin: "https://reminders.example.com".into(),
        }
    }

    #[actix_web::main]
    #[test]
    async fn it_stores_reminder_and_registers_monthly_trigger() {
        let ctx = setup();
        let res = usecase(r1_body()).execute(&ctx.ctx).await.unwrap();
        assert!(res.trigger_registered);

        let stored = ctx.ctx.repos.reminders.find("r1").await.unwrap().unwrap();
        assert_eq!(stored.status, ReminderStatus::Pending);
        assert_eq!(stored.remind_time, r1_remind_time());
        assert_eq!(stored.cycle_type, CycleType::Monthly);

        let jobs = ctx.scheduler.jobs();
        assert_eq!(jobs.len(), 1);
        assert_eq!(stored.cron_job_id, Some(jobs[0].job_id));

        let job = &jobs[0].job;
        assert_eq!(job.pattern.hours, vec![9]);
        assert_eq!(job.pattern.minutes, vec![0]);
        assert_eq!(job.pattern.mdays, vec![15]);
        assert_eq!(job.pattern.months, (1..=12).collect::<Vec<_>>());
        assert_eq!(job.pattern.expires_at, None);
        assert_eq!(job.title, "Reminder: Pay rent (monthly)");
        assert_eq!(
            job.callback_url,
            "https://reminders.example.com/api/notify?key=cron-secret&id=r1"
        );
    }

    #[actix_web::main]
    #[test]
    async fn it_keeps_reminder_when_trigger_registration_fails() {
        let ctx = setup();
        ctx.scheduler.set_available(false);

        let res = usecase(r1_body()).execute(&ctx.ctx).await.unwrap();
        assert!(!res.trigger_registered);

        let stored = ctx.ctx.repos.reminders.find("r1").await.unwrap().unwrap();
        assert_eq!(stored.cron_job_id, None);
        assert!(ctx.scheduler.jobs().is_empty());
    }

    #[actix_web::main]
    #[test]
    async fn it_rejects_missing_fields() {
        let ctx = setup();
        let body = RequestBody {
            title: Some("Pay rent".into()),
            content: Some("  ".into()),
            ..Default::default()
        };
        let res = usecase(body).execute(&ctx.ctx).await;
        assert_eq!(
            res.unwrap_err(),
            UseCaseError::MissingFields(vec!["content", "remind_time", "cycle_type"])
        );
        assert!(ctx.ctx.repos.reminders.find_all().await.unwrap().is_empty());
    }

    #[actix_web::main]
    #[test]
    async fn it_rejects_invalid_remind_time() {
        let ctx = setup();
        let mut body = r1_body();
        body.remind_time = Some("next tuesday".into());
        let res = usecase(body).execute(&ctx.ctx).await;
        assert!(matches!(res, Err(UseCaseError::InvalidRemindTime(_))));
    }

    #[actix_web::main]
    #[test]
    async fn it_rejects_duplicate_id() {
        let ctx = setup();
        usecase(r1_body()).execute(&ctx.ctx).await.unwrap();
        let res = usecase(r1_body()).execute(&ctx.ctx).await;
        assert_eq!(res.unwrap_err(), UseCaseError::IdTaken("r1".into()));
        assert_eq!(ctx.scheduler.jobs().len(), 1);
    }

    #[actix_web::main]
    #[test]
    async fn unknown_cycle_type_is_stored_as_monthly() {
        let ctx = setup();
        let mut body = r1_body();
        body.cycle_type = Some("fortnightly".into());
        let res = usecase(body).execute(&ctx.ctx).await.unwrap();
        assert_eq!(res.reminder.cycle_type, CycleType::Monthly);
    }

    #[actix_web::main]
    #[test]
    async fn once_trigger_expires_after_remind_time() {
        let ctx = setup();
        let mut body = r1_body();
        body.cycle_type = Some("once".into());
        usecase(body).execute(&ctx.ctx).await.unwrap();

        let job = &ctx.scheduler.jobs()[0].job;
        assert_eq!(job.pattern.mdays, vec![15]);
        assert_eq!(job.pattern.months, vec![3]);
        assert_eq!(job.pattern.wdays, vec![5]);
        assert_eq!(job.pattern.expires_at_number(), 20240315090500);
    }

    #[actix_web::main]
    #[test]
    async fn it_generates_id_when_missing() {
        let ctx = setup();
        let mut body = r1_body();
        body.id = None;
        let res = usecase(body).execute(&ctx.ctx).await.unwrap();
        assert!(!res.reminder.id.is_empty());
        assert!(ctx
            .ctx
            .repos
            .reminders
            .find(&res.reminder.id)
            .await
            .unwrap()
            .is_some());
    }

    #[test]
    fn it_builds_callback_url() {
        assert_eq!(
            callback_url("http://localhost:5000", "a b&c", "r/1")
                .unwrap()
                .as_str(),
            "http://localhost:5000/api/notify?key=a+b%26c&id=r%2F1"
        );
        assert!(callback_url("not a url", "s", "r1").is_err());
    }
}
