mod cron_job_org;
mod disabled;
mod inmemory;

pub use cron_job_org::{CronJobConfig, CronJobOrgScheduler};
pub use disabled::DisabledJobScheduler;
pub use inmemory::{InMemoryJobScheduler, RegisteredJob};
use reminder_scheduler_domain::TriggerPattern;
use thiserror::Error;

/// A recurring trigger to register at the external job scheduler. The job scheduler
/// will perform a GET request to `callback_url` every time `pattern` matches.
#[derive(Debug, Clone, PartialEq)]
pub struct TriggerJob {
    pub pattern: TriggerPattern,
    pub callback_url: String,
    /// Human readable label shown in the job scheduler
    pub title: String,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum JobSchedulerError {
    #[error("Job scheduler is unavailable. Error message: `{0}`")]
    Unavailable(String),
    #[error("Job scheduler responded with an unexpected payload. Error message: `{0}`")]
    Protocol(String),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DeregisterOutcome {
    Deleted,
    /// The job scheduler did not know about the job, which means that
    /// there is no active trigger anymore
    NotFound,
}

/// Client for the external time triggered invocation service.
///
/// Every successful `register` consumes a job slot at the remote side, so
/// callers must not register more than one job per `Reminder`.
#[async_trait::async_trait]
pub trait IJobScheduler: Send + Sync {
    /// Registers the trigger and returns the identifier assigned by the job scheduler
    async fn register(&self, job: &TriggerJob) -> Result<i64, JobSchedulerError>;
    async fn deregister(&self, job_id: i64) -> Result<DeregisterOutcome, JobSchedulerError>;
}
