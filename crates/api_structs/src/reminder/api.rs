use crate::dtos::{ChannelOutcomeDTO, ReminderDTO};
use serde::{Deserialize, Serialize};

pub mod create_reminder {
    use super::*;

    /// Every field is optional on the wire so that missing values are reported
    /// as validation errors instead of deserialization failures
    #[derive(Serialize, Deserialize, Default, Debug, Clone)]
    pub struct RequestBody {
        #[serde(default)]
        pub id: Option<String>,
        #[serde(default)]
        pub title: Option<String>,
        #[serde(default)]
        pub content: Option<String>,
        /// RFC 3339 timestamp or a local timestamp like `2024-03-15T09:00`
        #[serde(default)]
        pub remind_time: Option<String>,
        #[serde(default)]
        pub cycle_type: Option<String>,
        #[serde(default)]
        pub link: Option<String>,
        #[serde(default)]
        pub amount: Option<f64>,
        #[serde(default)]
        pub currency: Option<String>,
        #[serde(default)]
        pub monthly_amount: Option<f64>,
        #[serde(default)]
        pub yearly_amount: Option<f64>,
    }

    #[derive(Deserialize, Serialize, Debug)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub success: bool,
        pub id: String,
        pub trigger_registered: bool,
    }
}

pub mod get_reminders {
    use super::*;

    pub type APIResponse = Vec<ReminderDTO>;
}

pub mod delete_reminder {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub reminder_id: String,
    }

    #[derive(Serialize, Deserialize, Default)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        #[serde(default)]
        pub cron_job_id: Option<i64>,
    }

    #[derive(Deserialize, Serialize, Debug)]
    pub struct APIResponse {
        pub success: bool,
        pub message: String,
    }
}

pub mod fire_reminder {
    use super::*;

    #[derive(Serialize, Deserialize)]
    pub struct QueryParams {
        #[serde(default)]
        pub key: Option<String>,
        #[serde(default)]
        pub id: Option<String>,
    }

    #[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
    #[serde(rename_all = "camelCase")]
    pub enum FireOutcome {
        Fired,
        AlreadyFired,
        NotFound,
    }

    #[derive(Deserialize, Serialize, Debug)]
    pub struct APIResponse {
        pub outcome: FireOutcome,
        pub channels: Vec<ChannelOutcomeDTO>,
    }
}

pub mod sweep_due_reminders {
    use super::*;

    #[derive(Serialize, Deserialize)]
    pub struct QueryParams {
        #[serde(default)]
        pub key: Option<String>,
    }

    #[derive(Deserialize, Serialize, Debug)]
    pub struct SweptReminder {
        pub id: String,
        pub channels: Vec<ChannelOutcomeDTO>,
    }

    #[derive(Deserialize, Serialize, Debug)]
    pub struct APIResponse {
        pub processed: usize,
        pub reminders: Vec<SweptReminder>,
    }
}

pub mod delete_job {
    use super::*;

    #[derive(Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct QueryParams {
        #[serde(default)]
        pub key: Option<String>,
        #[serde(default)]
        pub job_id: Option<i64>,
    }

    #[derive(Deserialize, Serialize, Debug)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub success: bool,
        /// False when the job was already gone at the scheduler
        pub existed: bool,
    }
}
