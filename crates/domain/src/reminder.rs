use crate::shared::entity::Entity;
use chrono::prelude::*;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};
use thiserror::Error;

/// How often a `Reminder` should fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CycleType {
    Once,
    Weekly,
    Monthly,
    Yearly,
}

impl CycleType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Once => "once",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
        }
    }

    pub fn is_recurring(&self) -> bool {
        !matches!(self, Self::Once)
    }

    /// Label shown to the receiver of a notification
    pub fn label(&self) -> &'static str {
        match self {
            Self::Once => "单次提醒",
            Self::Weekly => "每周循环",
            Self::Monthly => "每月循环",
            Self::Yearly => "每年循环",
        }
    }
}

impl Display for CycleType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Error, Debug, PartialEq)]
#[error("Unknown cycle type: `{0}`")]
pub struct InvalidCycleTypeError(pub String);

impl FromStr for CycleType {
    type Err = InvalidCycleTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "once" => Ok(Self::Once),
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            "yearly" => Ok(Self::Yearly),
            _ => Err(InvalidCycleTypeError(s.to_string())),
        }
    }
}

/// Whether a `Reminder` has fired for its current occurrence.
/// Stored as `0` (pending) and `1` (fired).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReminderStatus {
    Pending,
    Fired,
}

impl ReminderStatus {
    pub fn as_i16(&self) -> i16 {
        match self {
            Self::Pending => 0,
            Self::Fired => 1,
        }
    }

    /// Any non zero value is treated as fired
    pub fn from_i16(status: i16) -> Self {
        if status == 0 {
            Self::Pending
        } else {
            Self::Fired
        }
    }
}

impl Default for ReminderStatus {
    fn default() -> Self {
        Self::Pending
    }
}

/// A `Reminder` is a user registered notification that should be delivered
/// to all configured channels at `remind_time`, and again every cycle for
/// recurring `CycleType`s.
#[derive(Debug, Clone, PartialEq)]
pub struct Reminder {
    /// Caller supplied identifier, immutable
    pub id: String,
    pub title: String,
    pub content: String,
    /// The instant the current occurrence of this `Reminder` is due
    pub remind_time: DateTime<Utc>,
    pub cycle_type: CycleType,
    pub status: ReminderStatus,
    /// Identifier of the trigger registered at the external job scheduler.
    /// `None` if the registration failed or has not happened yet.
    pub cron_job_id: Option<i64>,
    /// When the `Reminder` last fired. Used to detect duplicate callbacks
    /// for recurring reminders, which go back to pending after firing.
    pub last_fired_at: Option<DateTime<Utc>>,
    pub link: Option<String>,
    pub amount: Option<f64>,
    pub currency: Option<String>,
    pub monthly_amount: Option<f64>,
    pub yearly_amount: Option<f64>,
}

impl Reminder {
    pub fn new(
        id: String,
        title: String,
        content: String,
        remind_time: DateTime<Utc>,
        cycle_type: CycleType,
    ) -> Self {
        Self {
            id,
            title,
            content,
            remind_time,
            cycle_type,
            status: ReminderStatus::Pending,
            cron_job_id: None,
            last_fired_at: None,
            link: None,
            amount: None,
            currency: None,
            monthly_amount: None,
            yearly_amount: None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == ReminderStatus::Pending
    }

    /// The stored occurrence lies beyond `now` plus the tolerance. This holds for a
    /// recurring `Reminder` re-armed after firing, and for one whose first
    /// occurrence is more than a cycle ahead of a matching trigger callback.
    pub fn is_ahead_of(&self, now: DateTime<Utc>, tolerance: chrono::Duration) -> bool {
        self.remind_time > now + tolerance
    }
}

impl Entity for Reminder {
    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Error, Debug, PartialEq)]
#[error("Invalid remind time: `{0}`. Expected RFC 3339 or YYYY-MM-DDTHH:MM[:SS]")]
pub struct InvalidRemindTimeError(pub String);

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parses the remind time given by a client. Timestamps with an offset are absolute,
/// timestamps without one are wall clock times in the given `Tz`.
pub fn parse_remind_time(input: &str, tz: &Tz) -> Result<DateTime<Utc>, InvalidRemindTimeError> {
    let input = input.trim();
    if let Ok(datetime) = DateTime::parse_from_rfc3339(input) {
        return Ok(datetime.with_timezone(&Utc));
    }

    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(input, format).ok())
        .and_then(|naive| tz.from_local_datetime(&naive).earliest())
        .map(|datetime| datetime.with_timezone(&Utc))
        .ok_or_else(|| InvalidRemindTimeError(input.to_string()))
}
