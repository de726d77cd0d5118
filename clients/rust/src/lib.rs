mod access;
mod base;
mod reminder;
mod status;

use access::AccessClient;
pub(crate) use base::BaseClient;
pub use base::{APIError, APIResponse};
use reminder::ReminderClient;
pub use reminder::{CreateReminderInput, DeleteReminderInput};
pub use reminder_scheduler_api_structs::dtos::*;
pub use reminder_scheduler_api_structs::fire_reminder::FireOutcome;
pub use reminder_scheduler_api_structs::sweep_due_reminders::SweptReminder;
pub use reminder_scheduler_domain::CycleType;
use status::StatusClient;
use std::sync::Arc;

pub use reminder_scheduler_api_structs::dtos::ReminderDTO as Reminder;

/// Reminder Scheduler Server SDK
///
/// The SDK contains methods for interacting with the Reminder Scheduler
/// server API. `address` is the api root, e.g. `http://localhost:5000/api`.
#[derive(Clone)]
pub struct ReminderSDK {
    pub access: AccessClient,
    pub reminder: ReminderClient,
    pub status: StatusClient,
}

impl ReminderSDK {
    pub fn new<T: Into<String>>(address: T) -> Self {
        let base = Arc::new(BaseClient::new(address.into()));
        let access = AccessClient::new(base.clone());
        let reminder = ReminderClient::new(base.clone());
        let status = StatusClient::new(base);

        Self {
            access,
            reminder,
            status,
        }
    }
}
