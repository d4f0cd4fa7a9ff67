use crate::error::RegistrationsError;
use crate::model::{CreatedRegistration, ListParams, NewRegistration, Registration, RegistrationList};
use crate::repository;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;
use tracing::info;
use trailhub_database::Database;
use trailhub_kernel::server::AppState;
use trailhub_mailer::{Mailer, NotifyOutcome};
use utoipa::OpenApi;

pub(crate) const REGISTRATIONS_PATH: &str = "/api/registrations";

/// OpenAPI description of the registrations endpoints, merged into the
/// server-wide document.
#[derive(Debug, OpenApi)]
#[openapi(
    paths(create_registration, list_registrations),
    components(schemas(NewRegistration, CreatedRegistration, Registration, RegistrationList))
)]
pub struct RegistrationsApiDoc;

/// The registrations method router: GET/POST are the real operations,
/// OPTIONS answers preflight without touching the store, and every other
/// method gets the JSON 405 body.
pub fn router() -> Router<AppState> {
    Router::new().route(
        REGISTRATIONS_PATH,
        get(list_registrations)
            .post(create_registration)
            .options(preflight)
            .fallback(method_not_allowed),
    )
}

/// Accepts a sign-up, commits it, then attempts coordinator notification.
///
/// The notification runs strictly after the commit and its outcome is only
/// logged: the 201 stands regardless. Store failures propagate and become a
/// 5xx; a malformed body or one missing required fields is rejected as 400
/// before anything reaches the store.
#[utoipa::path(
    post,
    path = "/api/registrations",
    request_body = NewRegistration,
    responses(
        (status = CREATED, description = "Registration stored", body = CreatedRegistration),
        (status = BAD_REQUEST, description = "Malformed body or missing required field"),
        (status = INTERNAL_SERVER_ERROR, description = "Store failure"),
    ),
    tag = "registrations",
)]
async fn create_registration(
    State(db): State<Database>,
    State(mailer): State<Mailer>,
    payload: Result<Json<NewRegistration>, JsonRejection>,
) -> Result<impl IntoResponse, RegistrationsError> {
    // The default extractor rejection answers data errors with a 422; the
    // contract here is a uniform 400 for every unusable payload.
    let Json(payload) = payload?;

    let created = repository::create(&db, &payload).await?;

    match mailer.notify(&payload.to_notice()).await {
        NotifyOutcome::Sent => info!(id = %created.id, "Coordinator notified"),
        NotifyOutcome::Skipped { reason } => {
            info!(id = %created.id, %reason, "Coordinator notification skipped");
        }
        NotifyOutcome::Failed { reason } => {
            // Already committed; the client still gets its 201.
            info!(id = %created.id, %reason, "Coordinator notification failed");
        }
    }

    Ok((StatusCode::CREATED, Json(created)))
}

/// Lists stored registrations, most recent first, optionally filtered by
/// exact status.
#[utoipa::path(
    get,
    path = "/api/registrations",
    params(ListParams),
    responses(
        (status = OK, description = "Stored registrations", body = RegistrationList),
        (status = INTERNAL_SERVER_ERROR, description = "Store failure"),
    ),
    tag = "registrations",
)]
async fn list_registrations(
    State(db): State<Database>,
    Query(params): Query<ListParams>,
) -> Result<Json<RegistrationList>, RegistrationsError> {
    let registrations = repository::list(&db, &params).await?;
    Ok(Json(RegistrationList { registrations }))
}

/// Cross-origin preflight: 200, empty body, permissive headers, no store access.
async fn preflight() -> impl IntoResponse {
    (
        StatusCode::OK,
        [
            (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
            (header::ACCESS_CONTROL_ALLOW_METHODS, "GET, POST, OPTIONS"),
            (header::ACCESS_CONTROL_ALLOW_HEADERS, "Content-Type"),
        ],
    )
}

/// Any method other than GET/POST/OPTIONS.
async fn method_not_allowed() -> impl IntoResponse {
    (StatusCode::METHOD_NOT_ALLOWED, Json(json!({ "error": "Method not allowed" })))
}
