mod config;
mod repos;
mod services;
mod system;

pub use config::Config;
pub use repos::{IReminderRepo, Repos};
pub use services::*;
use std::sync::Arc;
pub use system::{ISys, RealSys, StaticTimeSys};
use tracing::info;

#[derive(Clone)]
pub struct ReminderContext {
    pub repos: Repos,
    pub config: Config,
    pub sys: Arc<dyn ISys>,
    pub job_scheduler: Arc<dyn IJobScheduler>,
    pub channels: Vec<Arc<dyn INotificationChannel>>,
}

impl ReminderContext {
    /// Context backed by in-memory storage and job scheduler and without any
    /// notification channels
    pub fn create_inmemory() -> Self {
        Self {
            repos: Repos::create_inmemory(),
            config: Config::new(),
            sys: Arc::new(RealSys {}),
            job_scheduler: Arc::new(InMemoryJobScheduler::new()),
            channels: Vec::new(),
        }
    }
}

/// Will setup the infrastructure context given the environment
pub async fn setup_context() -> ReminderContext {
    let config = Config::new();

    let repos = match &config.database_url {
        Some(url) => Repos::create_postgres(url)
            .await
            .expect("Postgres credentials must be valid"),
        None => {
            info!("DATABASE_URL is not set, reminders will be stored in memory");
            Repos::create_inmemory()
        }
    };

    let job_scheduler: Arc<dyn IJobScheduler> = match &config.cron_job {
        Some(cron_job) => Arc::new(CronJobOrgScheduler::new(cron_job.clone())),
        None => {
            info!("CRONJOB_API_KEY is not set, reminders will not be registered at cron-job.org");
            Arc::new(DisabledJobScheduler)
        }
    };

    let channels = create_channels(&config);
    if channels.is_empty() {
        info!("No notification channels are configured");
    }

    ReminderContext {
        repos,
        config,
        sys: Arc::new(RealSys {}),
        job_scheduler,
        channels,
    }
}
