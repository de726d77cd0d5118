use reminder_scheduler_api_structs::dtos::ChannelOutcomeDTO;
use reminder_scheduler_domain::{Reminder, ReminderMessage, ReminderStatus, TriggerPattern};
use reminder_scheduler_infra::{fan_out, ChannelOutcome, ReminderContext};
use tracing::{info, warn};

pub fn channel_outcome_dto(outcome: ChannelOutcome) -> ChannelOutcomeDTO {
    ChannelOutcomeDTO {
        channel: outcome.channel,
        success: outcome.success,
        detail: outcome.detail,
    }
}

/// Delivers a due `Reminder` to every configured channel and then records the
/// firing. Channel failures are reported in the returned outcomes and never
/// prevent the bookkeeping, only storage failures are returned as errors.
pub async fn fire_reminder(
    reminder: Reminder,
    ctx: &ReminderContext,
) -> anyhow::Result<Vec<ChannelOutcome>> {
    let message = ReminderMessage::new(&reminder, &ctx.config.timezone);
    let outcomes = fan_out(&ctx.channels, &message).await;
    info!(
        "Reminder {} fired, {} of {} channels succeeded",
        reminder.id,
        outcomes.iter().filter(|o| o.success).count(),
        outcomes.len()
    );

    record_fired(reminder, ctx).await?;

    Ok(outcomes)
}

/// Recurring reminders are re-armed with their next occurrence. `once` reminders
/// become terminal and their trigger at the job scheduler is retired.
async fn record_fired(mut reminder: Reminder, ctx: &ReminderContext) -> anyhow::Result<()> {
    let now = ctx.sys.get_datetime();
    reminder.last_fired_at = Some(now);

    let next_occurrence = if reminder.cycle_type.is_recurring() {
        TriggerPattern::plan(reminder.remind_time, reminder.cycle_type, ctx.config.timezone)
            .next_after(std::cmp::max(reminder.remind_time, now))
    } else {
        None
    };

    match next_occurrence {
        Some(next) => {
            reminder.remind_time = next;
            reminder.status = ReminderStatus::Pending;
            ctx.repos.reminders.save(&reminder).await?;
        }
        None => {
            reminder.status = ReminderStatus::Fired;
            ctx.repos.reminders.save(&reminder).await?;
            if !reminder.cycle_type.is_recurring() {
                retire_trigger(&reminder, ctx).await?;
            }
        }
    }

    Ok(())
}

async fn retire_trigger(reminder: &Reminder, ctx: &ReminderContext) -> anyhow::Result<()> {
    let job_id = match reminder.cron_job_id {
        Some(job_id) => job_id,
        None => return Ok(()),
    };

    match ctx.job_scheduler.deregister(job_id).await {
        Ok(_) => {
            ctx.repos
                .reminders
                .update_cron_job_id(&reminder.id, None)
                .await?;
        }
        Err(e) => {
            // The trigger expires shortly after the remind time anyway
            warn!(
                "Unable to retire job {} of fired reminder {}. Error: {}",
                job_id, reminder.id, e
            );
        }
    }

    Ok(())
}
