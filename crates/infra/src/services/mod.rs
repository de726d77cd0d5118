mod job_scheduler;
mod notification;

pub use job_scheduler::{
    CronJobConfig, CronJobOrgScheduler, DeregisterOutcome, DisabledJobScheduler, IJobScheduler,
    InMemoryJobScheduler, JobSchedulerError, RegisteredJob, TriggerJob,
};
pub use notification::{
    create_channels, fan_out, BarkChannel, BarkConfig, ChannelDeliveryError, ChannelOutcome,
    INotificationChannel, TelegramChannel, TelegramConfig, WeComChannel, WeComConfig,
};
