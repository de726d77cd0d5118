use super::{DeregisterOutcome, IJobScheduler, JobSchedulerError, TriggerJob};

/// Used when no job scheduler credentials are configured.
/// Every call fails, which reminder creation treats as a non fatal error.
pub struct DisabledJobScheduler;

const REASON: &str = "CRONJOB_API_KEY is not configured";

#[async_trait::async_trait]
impl IJobScheduler for DisabledJobScheduler {
    async fn register(&self, _job: &TriggerJob) -> Result<i64, JobSchedulerError> {
        Err(JobSchedulerError::Unavailable(REASON.into()))
    }

    async fn deregister(&self, _job_id: i64) -> Result<DeregisterOutcome, JobSchedulerError> {
        Err(JobSchedulerError::Unavailable(REASON.into()))
    }
}
