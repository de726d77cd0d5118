use super::{DeregisterOutcome, IJobScheduler, JobSchedulerError, TriggerJob};
use reqwest::{Client, StatusCode};
use serde::Serialize;
use serde_json::Value;
use tracing::{error, info};

#[derive(Debug, Clone)]
pub struct CronJobConfig {
    pub api_key: String,
    pub api_url: String,
}

impl CronJobConfig {
    pub const DEFAULT_API_URL: &'static str = "https://api.cron-job.org";
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
struct CronJobSchedule {
    timezone: String,
    hours: Vec<u32>,
    minutes: Vec<u32>,
    mdays: Vec<u32>,
    months: Vec<u32>,
    wdays: Vec<u32>,
    expires_at: i64,
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
struct CronJobDetails {
    url: String,
    title: String,
    enabled: bool,
    save_responses: bool,
    /// 0 = GET
    request_method: u8,
    schedule: CronJobSchedule,
}

#[derive(Debug, Serialize, PartialEq)]
struct CreateCronJobRequest {
    job: CronJobDetails,
}

impl From<&TriggerJob> for CreateCronJobRequest {
    fn from(job: &TriggerJob) -> Self {
        let pattern = &job.pattern;
        Self {
            job: CronJobDetails {
                url: job.callback_url.clone(),
                title: job.title.clone(),
                enabled: true,
                save_responses: true,
                request_method: 0,
                schedule: CronJobSchedule {
                    timezone: pattern.timezone.name().to_string(),
                    hours: pattern.hours.clone(),
                    minutes: pattern.minutes.clone(),
                    mdays: pattern.mdays.clone(),
                    months: pattern.months.clone(),
                    wdays: pattern.wdays.clone(),
                    expires_at: pattern.expires_at_number(),
                },
            },
        }
    }
}

/// Reads the `jobId` out of a create job response body
fn parse_job_id(body: &str) -> Result<i64, JobSchedulerError> {
    let value: Value = serde_json::from_str(body)
        .map_err(|e| JobSchedulerError::Protocol(format!("Invalid JSON: {}", e)))?;
    let job_id = match value.get("jobId") {
        Some(Value::Number(n)) => n.as_i64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    };
    job_id.ok_or_else(|| JobSchedulerError::Protocol(format!("No usable jobId in: {}", body)))
}

/// `IJobScheduler` backed by the cron-job.org REST api
pub struct CronJobOrgScheduler {
    client: Client,
    config: CronJobConfig,
}

impl CronJobOrgScheduler {
    pub fn new(config: CronJobConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    fn jobs_url(&self) -> String {
        format!("{}/jobs", self.config.api_url.trim_end_matches('/'))
    }
}

#[async_trait::async_trait]
impl IJobScheduler for CronJobOrgScheduler {
    async fn register(&self, job: &TriggerJob) -> Result<i64, JobSchedulerError> {
        let body = CreateCronJobRequest::from(job);
        let res = self
            .client
            .put(&self.jobs_url())
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                error!("[Network Error] cron-job.org PUT error. Error message: {:?}", e);
                JobSchedulerError::Unavailable(e.to_string())
            })?;

        let status = res.status();
        let text = res.text().await.map_err(|e| {
            error!("[Unexpected Response] cron-job.org PUT error. Error message: {:?}", e);
            JobSchedulerError::Unavailable(e.to_string())
        })?;
        if !status.is_success() {
            error!("cron-job.org rejected job with status {}: {}", status, text);
            return Err(JobSchedulerError::Unavailable(format!(
                "Unexpected status code {}: {}",
                status, text
            )));
        }

        let job_id = parse_job_id(&text)?;
        info!("Registered cron job {} for: {}", job_id, job.title);
        Ok(job_id)
    }

    async fn deregister(&self, job_id: i64) -> Result<DeregisterOutcome, JobSchedulerError> {
        let res = self
            .client
            .delete(&format!("{}/{}", self.jobs_url(), job_id))
            .bearer_auth(&self.config.api_key)
            .send()
            .await
            .map_err(|e| {
                error!("[Network Error] cron-job.org DELETE error. Error message: {:?}", e);
                JobSchedulerError::Unavailable(e.to_string())
            })?;

        match res.status() {
            status if status.is_success() => Ok(DeregisterOutcome::Deleted),
            StatusCode::NOT_FOUND => Ok(DeregisterOutcome::NotFound),
            status => {
                let text = res.text().await.unwrap_or_default();
                error!(
                    "cron-job.org failed to delete job {} with status {}: {}",
                    job_id, status, text
                );
                Err(JobSchedulerError::Unavailable(format!(
                    "Unexpected status code {}: {}",
                    status, text
                )))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::prelude::*;
    use reminder_scheduler_domain::{CycleType, TriggerPattern};

    #[test]
    fn it_builds_create_job_body() {
        let remind_time = chrono_tz::Asia::Shanghai
            .with_ymd_and_hms(2024, 3, 15, 9, 0, 0)
            .unwrap()
            .with_timezone(&Utc);
        let job = TriggerJob {
            pattern: TriggerPattern::plan(remind_time, CycleType::Once, chrono_tz::Asia::Shanghai),
            callback_url: "https://example.com/api/notify?key=s&id=r1".into(),
            title: "Reminder: Pay rent (once)".into(),
        };

        let body = serde_json::to_value(CreateCronJobRequest::from(&job)).unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "job": {
                    "url": "https://example.com/api/notify?key=s&id=r1",
                    "title": "Reminder: Pay rent (once)",
                    "enabled": true,
                    "saveResponses": true,
                    "requestMethod": 0,
                    "schedule": {
                        "timezone": "Asia/Shanghai",
                        "hours": [9],
                        "minutes": [0],
                        "mdays": [15],
                        "months": [3],
                        "wdays": [5],
                        "expiresAt": 20240315090500i64
                    }
                }
            })
        );
    }

    #[test]
    fn it_parses_job_id() {
        assert_eq!(parse_job_id(r#"{"jobId": 4213}"#), Ok(4213));
        assert_eq!(parse_job_id(r#"{"jobId": "77"}"#), Ok(77));
        assert!(matches!(
            parse_job_id(r#"{"jobId": "abc"}"#),
            Err(JobSchedulerError::Protocol(_))
        ));
        assert!(matches!(
            parse_job_id(r#"{}"#),
            Err(JobSchedulerError::Protocol(_))
        ));
        assert!(matches!(
            parse_job_id("<html></html>"),
            Err(JobSchedulerError::Protocol(_))
        ));
    }

    #[test]
    fn it_trims_api_url() {
        let scheduler = CronJobOrgScheduler::new(CronJobConfig {
            api_key: "key".into(),
            api_url: "https://api.cron-job.org/".into(),
        });
        assert_eq!(scheduler.jobs_url(), "https://api.cron-job.org/jobs");
    }
}
