use crate::reminder::CycleType;
use chrono::prelude::*;
use chrono::Duration;
use chrono_tz::Tz;

/// A `once` trigger is disabled by the job scheduler this long after it has fired
pub const ONCE_EXPIRY_DELAY_MINUTES: i64 = 5;

/// Upper bound on how many days `TriggerPattern::next_after` will look ahead.
/// Eight years covers a yearly trigger on the 29th of February.
const MAX_LOOKAHEAD_DAYS: i64 = 366 * 8;

/// Calendar based recurrence rule handed to the external job scheduler.
///
/// Each field is the set of allowed values and a point in time matches when
/// all of the fields match, evaluated in `timezone`. Weekdays are numbered
/// from Sunday = 0 to Saturday = 6.
#[derive(Debug, Clone, PartialEq)]
pub struct TriggerPattern {
    pub timezone: Tz,
    pub hours: Vec<u32>,
    pub minutes: Vec<u32>,
    pub mdays: Vec<u32>,
    pub months: Vec<u32>,
    pub wdays: Vec<u32>,
    /// Wall clock time in `timezone` after which the trigger is disabled
    pub expires_at: Option<NaiveDateTime>,
}

fn all_mdays() -> Vec<u32> {
    (1..=31).collect()
}

fn all_months() -> Vec<u32> {
    (1..=12).collect()
}

fn all_wdays() -> Vec<u32> {
    (0..=6).collect()
}

pub fn weekday_number(weekday: Weekday) -> u32 {
    weekday.num_days_from_sunday()
}

impl TriggerPattern {
    /// Derives the trigger pattern for a `Reminder` due at `remind_time`
    pub fn plan(remind_time: DateTime<Utc>, cycle_type: CycleType, timezone: Tz) -> Self {
        let local = remind_time.with_timezone(&timezone);
        let hours = vec![local.hour()];
        let minutes = vec![local.minute()];
        let mday = vec![local.day()];
        let month = vec![local.month()];
        let wday = vec![weekday_number(local.weekday())];

        match cycle_type {
            CycleType::Once => Self {
                timezone,
                hours,
                minutes,
                mdays: mday,
                months: month,
                wdays: wday,
                expires_at: Some(
                    (local + Duration::minutes(ONCE_EXPIRY_DELAY_MINUTES)).naive_local(),
                ),
            },
            CycleType::Weekly => Self {
                timezone,
                hours,
                minutes,
                mdays: all_mdays(),
                months: all_months(),
                wdays: wday,
                expires_at: None,
            },
            CycleType::Monthly => Self {
                timezone,
                hours,
                minutes,
                mdays: mday,
                months: all_months(),
                wdays: all_wdays(),
                expires_at: None,
            },
            CycleType::Yearly => Self {
                timezone,
                hours,
                minutes,
                mdays: mday,
                months: month,
                wdays: all_wdays(),
                expires_at: None,
            },
        }
    }

    fn matches_date(&self, date: &NaiveDate) -> bool {
        self.mdays.contains(&date.day())
            && self.months.contains(&date.month())
            && self.wdays.contains(&weekday_number(date.weekday()))
    }

    pub fn matches(&self, datetime: &DateTime<Utc>) -> bool {
        let local = datetime.with_timezone(&self.timezone).naive_local();
        if let Some(expires_at) = self.expires_at {
            if local > expires_at {
                return false;
            }
        }
        self.matches_date(&local.date())
            && self.hours.contains(&local.hour())
            && self.minutes.contains(&local.minute())
    }

    /// The first minute strictly after `after` at which the trigger fires
    pub fn next_after(&self, after: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let mut times = self
            .hours
            .iter()
            .flat_map(|h| self.minutes.iter().map(move |m| (*h, *m)))
            .filter_map(|(h, m)| NaiveTime::from_hms_opt(h, m, 0))
            .collect::<Vec<_>>();
        times.sort();

        let start = after.with_timezone(&self.timezone).date_naive();
        (0..=MAX_LOOKAHEAD_DAYS)
            .filter_map(|offset| start.checked_add_signed(Duration::days(offset)))
            .filter(|date| self.matches_date(date))
            .flat_map(|date| times.iter().map(move |time| date.and_time(*time)))
            .take_while(|local| match self.expires_at {
                Some(expires_at) => *local <= expires_at,
                None => true,
            })
            .filter_map(|local| self.timezone.from_local_datetime(&local).earliest())
            .map(|datetime| datetime.with_timezone(&Utc))
            .find(|datetime| *datetime > after)
    }

    /// `expires_at` formatted as `YYYYMMDDhhmmss`, `0` when the trigger never expires
    pub fn expires_at_number(&self) -> i64 {
        self.expires_at
            .and_then(|expires_at| expires_at.format("%Y%m%d%H%M%S").to_string().parse().ok())
            .unwrap_or(0)
    }
}
