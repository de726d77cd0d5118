use crate::base::{APIResponse, BaseClient};
use reminder_scheduler_api_structs::get_service_health;
use reqwest::StatusCode;
use std::sync::Arc;

#[derive(Clone)]
pub struct StatusClient {
    base: Arc<BaseClient>,
}

impl StatusClient {
    pub(crate) fn new(base: Arc<BaseClient>) -> Self {
        Self { base }
    }

    pub async fn check_health(&self) -> APIResponse<get_service_health::APIResponse> {
        self.base.get("", StatusCode::OK).await
    }

    /// The scheduler callback route answers as a health check when called
    /// without a reminder id
    pub async fn check_notify_health(&self) -> APIResponse<get_service_health::APIResponse> {
        self.base.get("notify", StatusCode::OK).await
    }
}
