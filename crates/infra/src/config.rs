use crate::services::{BarkConfig, CronJobConfig, TelegramConfig, WeComConfig};
use chrono_tz::Tz;
use reminder_scheduler_utils::create_random_secret;
use tracing::{info, warn};

const DEFAULT_TIMEZONE: Tz = chrono_tz::Asia::Shanghai;

fn env_var(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|val| val.trim().to_string())
        .filter(|val| !val.is_empty())
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Port for the application to run on
    pub port: usize,
    /// Shared secret the external job scheduler has to present when
    /// calling back into the fire and sweep endpoints
    pub cron_secret: String,
    /// Public origin of this server, used to build the callback urls given to
    /// the external job scheduler. Falls back to the origin of the request
    /// that created the reminder.
    pub public_url: Option<String>,
    /// Timezone used to extract calendar fields from remind times and to
    /// render them in notifications
    pub timezone: Tz,
    /// Password protecting the frontend. No password means open access.
    pub password: Option<String>,
    /// Reminders due within this many millis before or after now are
    /// considered due. Absorbs jitter of the external job scheduler.
    pub due_tolerance_millis: i64,
    /// Postgres connection string. In-memory storage is used when not set.
    pub database_url: Option<String>,
    pub cron_job: Option<CronJobConfig>,
    pub telegram: Option<TelegramConfig>,
    pub wecom: Option<WeComConfig>,
    pub bark: Option<BarkConfig>,
}

impl Config {
    pub fn new() -> Self {
        let cron_secret = match env_var("CRON_SECRET") {
            Some(secret) => secret,
            None => {
                info!("Did not find CRON_SECRET environment variable. Going to create one.");
                let secret = create_random_secret(24);
                info!("Secret for job scheduler callbacks was generated and set to: {}", secret);
                secret
            }
        };
        let default_port = 5000;
        let port = match env_var("PORT") {
            Some(port) => match port.parse::<usize>() {
                Ok(port) => port,
                Err(_) => {
                    warn!(
                        "The given PORT: {} is not valid, falling back to the default port: {}.",
                        port, default_port
                    );
                    default_port
                }
            },
            None => default_port,
        };
        let timezone = match env_var("REMINDER_TIMEZONE") {
            Some(tz) => match tz.parse::<Tz>() {
                Ok(tz) => tz,
                Err(_) => {
                    warn!(
                        "The given REMINDER_TIMEZONE: {} is not valid, falling back to {}.",
                        tz,
                        DEFAULT_TIMEZONE.name()
                    );
                    DEFAULT_TIMEZONE
                }
            },
            None => DEFAULT_TIMEZONE,
        };

        let cron_job = env_var("CRONJOB_API_KEY").map(|api_key| CronJobConfig {
            api_key,
            api_url: env_var("CRONJOB_API_URL")
                .unwrap_or_else(|| CronJobConfig::DEFAULT_API_URL.to_string()),
        });
        let telegram = match (env_var("TG_BOT_TOKEN"), env_var("TG_CHAT_ID")) {
            (Some(bot_token), Some(chat_id)) => Some(TelegramConfig {
                bot_token,
                chat_id,
                api_url: TelegramConfig::DEFAULT_API_URL.to_string(),
            }),
            (Some(_), None) | (None, Some(_)) => {
                warn!("Both TG_BOT_TOKEN and TG_CHAT_ID must be set to enable Telegram notifications");
                None
            }
            _ => None,
        };
        let wecom = env_var("WECOM_KEY").map(|key| WeComConfig::from_key(&key));
        let bark = env_var("BARK_KEY").map(|device_key| BarkConfig {
            device_key,
            server_url: env_var("BARK_SERVER_URL")
                .unwrap_or_else(|| BarkConfig::DEFAULT_SERVER_URL.to_string()),
        });

        Self {
            port,
            cron_secret,
            public_url: env_var("PUBLIC_URL"),
            timezone,
            password: env_var("PASSWORD"),
            due_tolerance_millis: 1000 * 60 * 5, // 5 minutes
            database_url: env_var("DATABASE_URL"),
            cron_job,
            telegram,
            wecom,
            bark,
        }
    }

    pub fn due_tolerance(&self) -> chrono::Duration {
        chrono::Duration::milliseconds(self.due_tolerance_millis)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
