mod create_reminder;
mod delete_job;
mod delete_reminder;
mod dispatch;
mod fire_reminder;
mod get_reminders;
mod sweep_due_reminders;
#[cfg(test)]
mod testing;

use actix_web::web;
use create_reminder::create_reminder_controller;
use delete_job::delete_job_controller;
use delete_reminder::delete_reminder_controller;
use fire_reminder::fire_reminder_controller;
use get_reminders::get_reminders_controller;
use sweep_due_reminders::sweep_due_reminders_controller;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/reminders", web::get().to(get_reminders_controller));
    cfg.route("/reminders", web::post().to(create_reminder_controller));
    cfg.route(
        "/reminders/{reminder_id}",
        web::delete().to(delete_reminder_controller),
    );

    // Entry points for the external job scheduler
    cfg.route("/notify", web::get().to(fire_reminder_controller));
    cfg.route("/cron", web::get().to(sweep_due_reminders_controller));
    cfg.route("/delete-job", web::get().to(delete_job_controller));
}
