use super::{DeregisterOutcome, IJobScheduler, JobSchedulerError, TriggerJob};
use std::sync::{
    atomic::{AtomicBool, AtomicI64, Ordering},
    Mutex,
};

#[derive(Debug, Clone, PartialEq)]
pub struct RegisteredJob {
    pub job_id: i64,
    pub job: TriggerJob,
}

/// Job scheduler that only keeps track of the registered jobs and never
/// calls back. Useful for testing and local development.
pub struct InMemoryJobScheduler {
    jobs: Mutex<Vec<RegisteredJob>>,
    next_job_id: AtomicI64,
    available: AtomicBool,
}

impl InMemoryJobScheduler {
    pub fn new() -> Self {
        Self {
            jobs: Mutex::new(Vec::new()),
            next_job_id: AtomicI64::new(1),
            available: AtomicBool::new(true),
        }
    }

    /// Simulates an outage of the job scheduler
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    pub fn jobs(&self) -> Vec<RegisteredJob> {
        self.jobs.lock().unwrap().clone()
    }

    pub fn find(&self, job_id: i64) -> Option<RegisteredJob> {
        self.jobs
            .lock()
            .unwrap()
            .iter()
            .find(|j| j.job_id == job_id)
            .cloned()
    }

    fn check_available(&self) -> Result<(), JobSchedulerError> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(JobSchedulerError::Unavailable(
                "In-memory job scheduler is switched off".into(),
            ))
        }
    }
}

impl Default for InMemoryJobScheduler {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl IJobScheduler for InMemoryJobScheduler {
    async fn register(&self, job: &TriggerJob) -> Result<i64, JobSchedulerError> {
        self.check_available()?;
        let job_id = self.next_job_id.fetch_add(1, Ordering::SeqCst);
        self.jobs.lock().unwrap().push(RegisteredJob {
            job_id,
            job: job.clone(),
        });
        Ok(job_id)
    }

    async fn deregister(&self, job_id: i64) -> Result<DeregisterOutcome, JobSchedulerError> {
        self.check_available()?;
        let mut jobs = self.jobs.lock().unwrap();
        match jobs.iter().position(|j| j.job_id == job_id) {
            Some(index) => {
                jobs.remove(index);
                Ok(DeregisterOutcome::Deleted)
            }
            None => Ok(DeregisterOutcome::NotFound),
        }
    }
}
