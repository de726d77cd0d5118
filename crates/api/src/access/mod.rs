mod verify_password;

use actix_web::web;
use verify_password::verify_password_controller;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/verify-password", web::post().to(verify_password_controller));
}
