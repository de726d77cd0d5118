use crate::base::{APIResponse, BaseClient};
use reminder_scheduler_api_structs::*;
use reqwest::StatusCode;
use std::sync::Arc;

#[derive(Clone)]
pub struct ReminderClient {
    base: Arc<BaseClient>,
}

pub type CreateReminderInput = create_reminder::RequestBody;

pub struct DeleteReminderInput {
    pub reminder_id: String,
    pub cron_job_id: Option<i64>,
}

impl ReminderClient {
    pub(crate) fn new(base: Arc<BaseClient>) -> Self {
        Self { base }
    }

    pub async fn create(&self, input: CreateReminderInput) -> APIResponse<create_reminder::APIResponse> {
        self.base
            .post(input, "reminders", StatusCode::CREATED)
            .await
    }

    pub async fn get_all(&self) -> APIResponse<get_reminders::APIResponse> {
        self.base.get("reminders", StatusCode::OK).await
    }

    pub async fn delete(&self, input: DeleteReminderInput) -> APIResponse<delete_reminder::APIResponse> {
        let body = delete_reminder::RequestBody {
            cron_job_id: input.cron_job_id,
        };
        self.base
            .delete(
                body,
                &format!("reminders/{}", input.reminder_id),
                StatusCode::OK,
            )
            .await
    }

    /// Performs the callback the external job scheduler makes when a reminder is due
    pub async fn fire(&self, key: &str, reminder_id: &str) -> APIResponse<fire_reminder::APIResponse> {
        let query = fire_reminder::QueryParams {
            key: Some(key.to_string()),
            id: Some(reminder_id.to_string()),
        };
        self.base
            .get_with_query("notify", &query, StatusCode::OK)
            .await
    }

    pub async fn sweep_due(&self, key: &str) -> APIResponse<sweep_due_reminders::APIResponse> {
        let query = sweep_due_reminders::QueryParams {
            key: Some(key.to_string()),
        };
        self.base
            .get_with_query("cron", &query, StatusCode::OK)
            .await
    }

    pub async fn delete_job(&self, key: &str, job_id: i64) -> APIResponse<delete_job::APIResponse> {
        let query = delete_job::QueryParams {
            key: Some(key.to_string()),
            job_id: Some(job_id),
        };
        self.base
            .get_with_query("delete-job", &query, StatusCode::OK)
            .await
    }
}
