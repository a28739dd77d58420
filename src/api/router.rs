use axum::{
    body::Body,
    extract::Request,
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;
use std::time::Duration;

use crate::api::handlers::{admin, block, health, schedule, subevent};
use crate::state::AppState;
use tower_http::{classify::ServerErrorsFailureClass, trace::TraceLayer};
use tracing::{error, info, info_span, Span};
use uuid::Uuid;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health_check))

        // Subevent administration
        .route("/api/v1/subevents", get(subevent::list_subevents).post(subevent::create_subevent))
        .route("/api/v1/subevents/options", get(subevent::subevent_options))
        .route("/api/v1/subevents/{id}", get(subevent::get_subevent).put(subevent::update_subevent).delete(subevent::delete_subevent))

        // Structure administration
        .route("/api/v1/blocks", get(block::list_blocks).post(block::create_block))
        .route("/api/v1/exclusion-groups", post(block::create_exclusion_group))
        .route("/api/v1/rooms", post(admin::create_room))
        .route("/api/v1/programs", post(admin::create_program))

        // Users & applications
        .route("/api/v1/users", get(admin::list_users).post(admin::create_user))
        .route("/api/v1/applications", post(admin::create_application))
        .route("/api/v1/applications/{id}/state", put(admin::update_application_state))

        // Settings
        .route("/api/v1/settings/{key}", get(admin::get_setting).put(admin::put_setting))

        // Schedule (per-user view and registration)
        .route("/api/schedule/calendar-config", get(schedule::get_calendar_config))
        .route("/api/schedule/blocks", get(schedule::get_blocks))
        .route("/api/schedule/rooms", get(schedule::get_rooms))
        .route("/api/schedule/programs", get(schedule::get_programs))
        .route("/api/schedule/attend-program/{id}", put(schedule::attend_program))
        .route("/api/schedule/unattend-program/{id}", delete(schedule::unattend_program))

        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = Uuid::new_v4().to_string();
                    info_span!(
                        "http_request",
                        request_id = %request_id,
                        method = ?request.method(),
                        uri = ?request.uri(),
                        version = ?request.version(),
                        user_id = tracing::field::Empty,
                    )
                })
                .on_request(|request: &Request<Body>, _span: &Span| {
                    info!("started processing request: {} {}", request.method(), request.uri().path());
                })
                .on_response(|response: &axum::http::Response<Body>, latency: Duration, _span: &Span| {
                    info!(
                        status = response.status().as_u16(),
                        latency_ms = latency.as_millis(),
                        "finished processing request"
                    );
                })
                .on_failure(|error: ServerErrorsFailureClass, _latency: Duration, _span: &Span| {
                    error!("request failed: {:?}", error);
                })
        )
        .with_state(state)
}
