use crate::presentation::error::json_error_handler;
use crate::presentation::handlers::{
    create_session, create_task, delete_task, health_check, list_tasks, profile, reflection,
    update_task,
};
use actix_web::{Scope, web};

/// The `/api` scope. The session route is only mounted for development.
pub fn api_scope(dev_sessions: bool) -> Scope {
    let scope = web::scope("/api")
        .app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .route("/health", web::get().to(health_check))
        .route("/reflection", web::post().to(reflection))
        .route("/profile", web::get().to(profile))
        .service(
            web::resource("/tasks")
                .route(web::get().to(list_tasks))
                .route(web::post().to(create_task))
                .route(web::patch().to(update_task))
                .route(web::delete().to(delete_task)),
        );

    if dev_sessions {
        scope.route("/auth/session", web::post().to(create_session))
    } else {
        scope
    }
}
