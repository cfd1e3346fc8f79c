//! Activity roster handlers: list, signup, unregister, create, update.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{delete, get, patch, post};
use axum::{Json, Router};

use crate::api::dto::{
    ActivityResponse, CreateActivityRequest, RosterChangeResponse, SignupParams,
    UpdateActivityRequest,
};
use crate::app_state::AppState;
use crate::error::{ErrorResponse, GatewayError};
use crate::service::ActivityUpdate;

/// `GET /activities` — List all activities with their rosters.
#[utoipa::path(
    get,
    path = "/activities",
    tag = "Activities",
    summary = "List activities",
    description = "Returns every activity keyed by name, with description, schedule, capacity, and enrolled participant emails.",
    responses(
        (status = 200, description = "Activity map", body = serde_json::Value),
    )
)]
pub async fn list_activities(State(state): State<AppState>) -> impl IntoResponse {
    let views = state.roster_service.list_activities().await;
    Json(views)
}

/// `POST /activities/{name}/signup` — Sign a student up for an activity.
///
/// # Errors
///
/// Returns [`GatewayError`] when the activity is unknown, the email is
/// already enrolled, or the roster is full.
#[utoipa::path(
    post,
    path = "/activities/{name}/signup",
    tag = "Activities",
    summary = "Sign up a student",
    description = "Enrolls the student with the given email. Fails when the activity is unknown, the email is already enrolled, or the roster is at capacity.",
    params(
        ("name" = String, Path, description = "Activity name"),
        SignupParams,
    ),
    responses(
        (status = 200, description = "Student signed up", body = RosterChangeResponse),
        (status = 400, description = "Duplicate signup or roster full", body = ErrorResponse),
        (status = 404, description = "Activity not found", body = ErrorResponse),
    )
)]
pub async fn signup(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Query(params): Query<SignupParams>,
) -> Result<impl IntoResponse, GatewayError> {
    let participants_count = state.roster_service.signup(&name, &params.email).await?;
    Ok(Json(RosterChangeResponse {
        message: format!("Signed up {} for {name}", params.email),
        participants_count,
    }))
}

/// `DELETE /activities/{name}/unregister` — Withdraw a student.
///
/// # Errors
///
/// Returns [`GatewayError`] when the activity is unknown or the email is
/// not enrolled.
#[utoipa::path(
    delete,
    path = "/activities/{name}/unregister",
    tag = "Activities",
    summary = "Unregister a student",
    description = "Removes the student with the given email from the roster. Fails when the activity is unknown or the email is not enrolled.",
    params(
        ("name" = String, Path, description = "Activity name"),
        SignupParams,
    ),
    responses(
        (status = 200, description = "Student unregistered", body = RosterChangeResponse),
        (status = 400, description = "Student not enrolled", body = ErrorResponse),
        (status = 404, description = "Activity not found", body = ErrorResponse),
    )
)]
pub async fn unregister(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Query(params): Query<SignupParams>,
) -> Result<impl IntoResponse, GatewayError> {
    let participants_count = state.roster_service.unregister(&name, &params.email).await?;
    Ok(Json(RosterChangeResponse {
        message: format!("Unregistered {} from {name}", params.email),
        participants_count,
    }))
}

/// `POST /activities` — Create a new activity.
///
/// # Errors
///
/// Returns [`GatewayError`] when the name is taken or the capacity is
/// invalid.
#[utoipa::path(
    post,
    path = "/activities",
    tag = "Activities",
    summary = "Create an activity",
    description = "Creates an activity with an empty roster and broadcasts an activity_created event.",
    request_body = CreateActivityRequest,
    responses(
        (status = 201, description = "Activity created", body = ActivityResponse),
        (status = 400, description = "Duplicate name or invalid capacity", body = ErrorResponse),
    )
)]
pub async fn create_activity(
    State(state): State<AppState>,
    Json(req): Json<CreateActivityRequest>,
) -> Result<impl IntoResponse, GatewayError> {
    let details = state
        .roster_service
        .create_activity(&req.name, &req.description, &req.schedule, req.max_participants)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ActivityResponse::from_details(req.name, details)),
    ))
}

/// `PATCH /activities/{name}` — Partially update an activity.
///
/// # Errors
///
/// Returns [`GatewayError`] when the activity is unknown or the new
/// capacity is invalid.
#[utoipa::path(
    patch,
    path = "/activities/{name}",
    tag = "Activities",
    summary = "Update an activity",
    description = "Applies the supplied fields and keeps the rest unchanged, then broadcasts an activity_updated event with the merged details.",
    params(
        ("name" = String, Path, description = "Activity name"),
    ),
    request_body = UpdateActivityRequest,
    responses(
        (status = 200, description = "Activity updated", body = ActivityResponse),
        (status = 400, description = "Invalid capacity", body = ErrorResponse),
        (status = 404, description = "Activity not found", body = ErrorResponse),
    )
)]
pub async fn update_activity(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Json(req): Json<UpdateActivityRequest>,
) -> Result<impl IntoResponse, GatewayError> {
    let update = ActivityUpdate {
        description: req.description,
        schedule: req.schedule,
        max_participants: req.max_participants,
    };
    let details = state.roster_service.update_activity(&name, update).await?;
    Ok(Json(ActivityResponse::from_details(name, details)))
}

/// Activity roster routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/activities", get(list_activities).post(create_activity))
        .route("/activities/{name}", patch(update_activity))
        .route("/activities/{name}/signup", post(signup))
        .route("/activities/{name}/unregister", delete(unregister))
}
