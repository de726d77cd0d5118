use crate::error::ReminderError;
use reminder_scheduler_infra::ReminderContext;
use reminder_scheduler_utils::secrets_match;

/// Routes called back by the external job scheduler are reachable from the
/// public network and require the shared secret as the `key` query parameter
pub fn protect_cron_route(key: Option<&str>, ctx: &ReminderContext) -> Result<(), ReminderError> {
    match key {
        Some(key) if secrets_match(key, &ctx.config.cron_secret) => Ok(()),
        Some(_) => Err(ReminderError::Unauthorized(
            "Invalid key provided".to_string(),
        )),
        None => Err(ReminderError::Unauthorized(
            "Expected the `key` query parameter".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_checks_cron_secret() {
        let mut ctx = ReminderContext::create_inmemory();
        ctx.config.cron_secret = "s3cret".into();

        assert!(protect_cron_route(Some("s3cret"), &ctx).is_ok());
        assert!(matches!(
            protect_cron_route(Some("wrong"), &ctx),
            Err(ReminderError::Unauthorized(_))
        ));
        assert!(matches!(
            protect_cron_route(Some("s3cre"), &ctx),
            Err(ReminderError::Unauthorized(_))
        ));
        assert!(matches!(
            protect_cron_route(None, &ctx),
            Err(ReminderError::Unauthorized(_))
        ));
    }
}
