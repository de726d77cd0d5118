use crate::base::{APIResponse, BaseClient};
use reminder_scheduler_api_structs::verify_password;
use reqwest::StatusCode;
use std::sync::Arc;

#[derive(Clone)]
pub struct AccessClient {
    base: Arc<BaseClient>,
}

impl AccessClient {
    pub(crate) fn new(base: Arc<BaseClient>) -> Self {
        Self { base }
    }

    pub async fn verify_password(
        &self,
        password: Option<String>,
    ) -> APIResponse<verify_password::APIResponse> {
        self.base
            .post(
                verify_password::RequestBody { password },
                "verify-password",
                StatusCode::OK,
            )
            .await
    }
}
