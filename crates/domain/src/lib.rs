mod message;
mod reminder;
mod shared;
mod trigger_pattern;

pub use message::ReminderMessage;
pub use reminder::{
    parse_remind_time, CycleType, InvalidCycleTypeError, InvalidRemindTimeError, Reminder,
    ReminderStatus,
};
pub use shared::entity::Entity;
pub use trigger_pattern::{weekday_number, TriggerPattern, ONCE_EXPIRY_DELAY_MINUTES};

pub use chrono_tz::Tz;
