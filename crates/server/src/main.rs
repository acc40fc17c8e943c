// Copyright (C) 2026 CampTrack Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

use axum::{
    Json, Router,
    extract::{Path, State as AxumState},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use time::OffsetDateTime;
use tokio::sync::Mutex;
use tracing::{error, info};

use camptrack_api::{
    ApiError, AuthenticatedActor, Role, authenticate_stub, handlers, jobs,
    request_response::{
        AssignmentResponse, AttachProviderRequest, CampaignResponse, ConditionResponse,
        CreateCampaignRequest, PaymentResponse, PosterImageRequest, ReconcilePreviewResponse,
        RecordConditionRequest, RecordTransactionRequest, RegisterFileRequest,
        RenewCampaignRequest, RenewalResponse, TransitionCampaignRequest,
        UninstallationCandidateInfo, UninstallationResponse, UpdateCampaignDatesRequest,
        UpdateConditionRequest,
    },
};
use camptrack_domain::{Assignment, Campaign, MaterialCondition, Payment};
use camptrack_notify::{LogSink, NotificationSink};
use camptrack_persistence::Persistence;

/// CampTrack Server - HTTP server for the CampTrack back office
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long)]
    database: Option<String>,

    /// Port to bind the server to
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// Bearer secret protecting the scheduled-job endpoints.
    ///
    /// Falls back to the `CAMPTRACK_SWEEP_SECRET` environment variable;
    /// the job endpoints are disabled when neither is set.
    #[arg(long)]
    sweep_secret: Option<String>,
}

/// Application state shared across handlers.
///
/// This contains the persistence layer wrapped in a Mutex to allow
/// safe concurrent access, plus the notification sink and the secret
/// protecting the scheduled-job endpoints.
#[derive(Clone)]
struct AppState {
    /// The persistence layer for campaigns, assignments, and payments.
    persistence: Arc<Mutex<Persistence>>,
    /// The delivery channel for notification events.
    sink: Arc<dyn NotificationSink>,
    /// The bearer secret for the job endpoints, when configured.
    sweep_secret: Option<String>,
}

/// API request for creating a campaign.
///
/// This includes authentication information in addition to the campaign
/// data.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CreateCampaignApiRequest {
    /// The actor ID performing this action.
    actor_id: String,
    /// The role of the actor.
    actor_role: String,
    /// The campaign name.
    name: String,
    /// An optional free-form description.
    description: Option<String>,
    /// An optional campaign objective.
    objective: Option<String>,
    /// The commissioning client.
    client_id: i64,
    /// The location the campaign runs at.
    location_id: i64,
    /// The advertising service booked.
    service_id: i64,
    /// The responsible manager.
    manager: String,
    /// An optional field supervisor.
    supervisor: Option<String>,
    /// The target quantity of material.
    target_quantity: i64,
    /// Optional cap on attached providers.
    target_provider_count: Option<i64>,
    /// Campaign kind wire value (MASS or PROXIMITY).
    kind: String,
    /// Start date (`YYYY-MM-DD`).
    start_date: String,
    /// End date (`YYYY-MM-DD`).
    end_date: String,
}

/// API request for moving a campaign's date window.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct UpdateCampaignDatesApiRequest {
    /// The actor ID performing this action.
    actor_id: String,
    /// The role of the actor.
    actor_role: String,
    /// New start date (`YYYY-MM-DD`).
    start_date: String,
    /// New end date (`YYYY-MM-DD`).
    end_date: String,
}

/// API request for transitioning a campaign's status.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct TransitionCampaignApiRequest {
    /// The actor ID performing this action.
    actor_id: String,
    /// The role of the actor.
    actor_role: String,
    /// Target status wire value (PLANNED, ONGOING, FINISHED, CANCELLED).
    status: String,
}

/// API request carrying only authentication, for endpoints whose target
/// is fully identified by the path.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ActorRequest {
    /// The actor ID performing this action.
    actor_id: String,
    /// The role of the actor.
    actor_role: String,
}

/// API request for registering a file against a campaign.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RegisterFileApiRequest {
    /// The actor ID performing this action.
    actor_id: String,
    /// The role of the actor.
    actor_role: String,
    /// A short label for the document.
    label: String,
    /// The stored document URL.
    url: String,
}

/// API request for attaching a provider to a campaign.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct AttachProviderApiRequest {
    /// The actor ID performing this action.
    actor_id: String,
    /// The role of the actor.
    actor_role: String,
    /// The provider to attach.
    provider_id: i64,
}

/// API request for recording an installed-poster photo.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct PosterImageApiRequest {
    /// The actor ID performing this action.
    actor_id: String,
    /// The role of the actor.
    actor_role: String,
    /// The photo URL.
    url: String,
}

/// API request for recording a material condition.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RecordConditionApiRequest {
    /// The actor ID performing this action.
    actor_id: String,
    /// The role of the actor.
    actor_role: String,
    /// The campaign the condition was observed under, if any.
    campaign_id: Option<i64>,
    /// The provider whose material was inspected, if any.
    provider_id: Option<i64>,
    /// The inspected material.
    material_name: String,
    /// Grade wire value (GOOD, MEDIUM, BAD).
    grade: String,
    /// An optional free-form description.
    description: Option<String>,
    /// Explicit penalty override; omitted means "use the tariff".
    penalty_amount: Option<i64>,
    /// Omitted means "applied iff the grade is BAD".
    penalty_applied: Option<bool>,
    /// An optional photo URL.
    photo_url: Option<String>,
}

/// API request for overriding a condition's penalty.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct UpdateConditionApiRequest {
    /// The actor ID performing this action.
    actor_id: String,
    /// The role of the actor.
    actor_role: String,
    /// The new penalty amount, when overriding it.
    penalty_amount: Option<i64>,
    /// The new applied flag, when overriding it.
    penalty_applied: Option<bool>,
}

/// API request for recording a settlement transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RecordTransactionApiRequest {
    /// The actor ID performing this action.
    actor_id: String,
    /// The role of the actor.
    actor_role: String,
    /// The amount paid, strictly positive.
    amount: i64,
    /// The payment method (cash, mobile money, transfer).
    method: String,
    /// An optional external reference.
    reference: Option<String>,
    /// An optional note.
    note: Option<String>,
}

/// API request for renewing a finished campaign.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RenewCampaignApiRequest {
    /// The actor ID performing this action.
    actor_id: String,
    /// The role of the actor.
    actor_role: String,
    /// Successor start date (`YYYY-MM-DD`).
    start_date: String,
    /// Successor end date (`YYYY-MM-DD`).
    end_date: String,
    /// Optional restriction of the candidate set.
    provider_ids: Option<Vec<i64>>,
}

/// API response for write operations that return no entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct AckResponse {
    /// Success indicator.
    success: bool,
    /// A success message.
    message: String,
}

/// API response for the auto-termination job endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct TerminationSweepApiResponse {
    /// Whether the sweep ran to completion.
    success: bool,
    /// The sweep failure, when `success` is false.
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    /// Campaigns moved to FINISHED.
    campaigns_terminated: i64,
    /// Assignments closed alongside them.
    assignments_closed: i64,
    /// Providers whose availability was recomputed to free.
    providers_released: i64,
}

/// API response for the auto-release job endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ReleaseSweepApiResponse {
    /// Whether the sweep ran to completion.
    success: bool,
    /// The sweep failure, when `success` is false.
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    /// Scheduled-end assignments that were closed.
    assignments_closed: i64,
    /// Providers whose availability was recomputed to free.
    providers_released: i64,
}

/// API response for the expiry-scan job endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ExpiryScanApiResponse {
    /// Assignment warnings emitted by this run.
    assignment_alerts: i64,
    /// Campaign warnings emitted by this run.
    campaign_alerts: i64,
}

/// Error response type.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ErrorResponse {
    /// Error indicator.
    error: bool,
    /// Error message.
    message: String,
}

/// HTTP error wrapper that implements `IntoResponse`.
struct HttpError {
    /// The HTTP status code.
    status: StatusCode,
    /// The error message.
    message: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: true,
            message: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::AuthenticationFailed { .. } => Self {
                status: StatusCode::UNAUTHORIZED,
                message: err.to_string(),
            },
            ApiError::Unauthorized { .. } => Self {
                status: StatusCode::FORBIDDEN,
                message: err.to_string(),
            },
            ApiError::NotFound { .. } => Self {
                status: StatusCode::NOT_FOUND,
                message: err.to_string(),
            },
            ApiError::InvalidInput { .. } => Self {
                status: StatusCode::BAD_REQUEST,
                message: err.to_string(),
            },
            ApiError::InvalidState { .. } => Self {
                status: StatusCode::BAD_REQUEST,
                message: err.to_string(),
            },
            ApiError::Conflict { .. } => Self {
                status: StatusCode::CONFLICT,
                message: err.to_string(),
            },
            ApiError::Internal { .. } => {
                error!(error = %err, "Internal error");
                Self {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    message: err.to_string(),
                }
            }
        }
    }
}

/// Parses a role string into a Role enum.
fn parse_role(role_str: &str) -> Result<Role, HttpError> {
    match role_str.to_lowercase().as_str() {
        "admin" => Ok(Role::Admin),
        "controller" => Ok(Role::Controller),
        _ => Err(HttpError {
            status: StatusCode::BAD_REQUEST,
            message: format!("Invalid role: '{role_str}'. Must be 'admin' or 'controller'"),
        }),
    }
}

/// Parses the role and authenticates the actor.
fn authenticate(actor_id: String, actor_role: &str) -> Result<AuthenticatedActor, HttpError> {
    let role: Role = parse_role(actor_role)?;
    authenticate_stub(actor_id, role).map_err(|e| HttpError {
        status: StatusCode::UNAUTHORIZED,
        message: e.to_string(),
    })
}

/// Checks the bearer secret guarding the job endpoints.
///
/// An unconfigured secret disables the endpoints entirely rather than
/// leaving them open.
fn require_sweep_secret(app_state: &AppState, headers: &HeaderMap) -> Result<(), HttpError> {
    let Some(secret) = app_state.sweep_secret.as_deref() else {
        return Err(HttpError {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: String::from("Sweep secret is not configured; job endpoints are disabled"),
        });
    };

    let presented: Option<&str> = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "));
    if presented == Some(secret) {
        Ok(())
    } else {
        Err(HttpError {
            status: StatusCode::UNAUTHORIZED,
            message: String::from("Missing or invalid sweep secret"),
        })
    }
}

/// Handler for POST `/campaigns` endpoint.
///
/// Creates a new campaign in the PLANNED status.
async fn handle_create_campaign(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<CreateCampaignApiRequest>,
) -> Result<Json<CampaignResponse>, HttpError> {
    info!(
        actor_id = %req.actor_id,
        role = %req.actor_role,
        name = %req.name,
        "Handling create_campaign request"
    );

    let actor: AuthenticatedActor = authenticate(req.actor_id.clone(), &req.actor_role)?;
    let request: CreateCampaignRequest = CreateCampaignRequest {
        name: req.name,
        description: req.description,
        objective: req.objective,
        client_id: req.client_id,
        location_id: req.location_id,
        service_id: req.service_id,
        manager: req.manager,
        supervisor: req.supervisor,
        target_quantity: req.target_quantity,
        target_provider_count: req.target_provider_count,
        kind: req.kind,
        start_date: req.start_date,
        end_date: req.end_date,
    };

    let mut persistence = app_state.persistence.lock().await;
    let response: CampaignResponse = handlers::create_campaign(
        &mut persistence,
        &actor,
        request,
        OffsetDateTime::now_utc(),
    )?;
    drop(persistence);

    info!(
        campaign_id = response.campaign.campaign_id,
        "Successfully created campaign"
    );

    Ok(Json(response))
}

/// Handler for GET `/campaigns` endpoint.
async fn handle_list_campaigns(
    AxumState(app_state): AxumState<AppState>,
) -> Result<Json<Vec<Campaign>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let campaigns: Vec<Campaign> = handlers::list_campaigns(&mut persistence)?;
    drop(persistence);

    Ok(Json(campaigns))
}

/// Handler for GET `/campaigns/{campaign_id}` endpoint.
async fn handle_get_campaign(
    AxumState(app_state): AxumState<AppState>,
    Path(campaign_id): Path<i64>,
) -> Result<Json<Campaign>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let campaign: Campaign = handlers::get_campaign(&mut persistence, campaign_id)?;
    drop(persistence);

    Ok(Json(campaign))
}

/// Handler for POST `/campaigns/{campaign_id}/dates` endpoint.
///
/// Moves the campaign's date window.
async fn handle_update_campaign_dates(
    AxumState(app_state): AxumState<AppState>,
    Path(campaign_id): Path<i64>,
    Json(req): Json<UpdateCampaignDatesApiRequest>,
) -> Result<Json<CampaignResponse>, HttpError> {
    info!(
        actor_id = %req.actor_id,
        campaign_id = campaign_id,
        "Handling update_campaign_dates request"
    );

    let actor: AuthenticatedActor = authenticate(req.actor_id.clone(), &req.actor_role)?;
    let request: UpdateCampaignDatesRequest = UpdateCampaignDatesRequest {
        start_date: req.start_date,
        end_date: req.end_date,
    };

    let mut persistence = app_state.persistence.lock().await;
    let response: CampaignResponse = handlers::update_campaign_dates(
        &mut persistence,
        &actor,
        campaign_id,
        request,
        OffsetDateTime::now_utc(),
    )?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/campaigns/{campaign_id}/transition` endpoint.
///
/// Moves the campaign to a new lifecycle status.
async fn handle_transition_campaign(
    AxumState(app_state): AxumState<AppState>,
    Path(campaign_id): Path<i64>,
    Json(req): Json<TransitionCampaignApiRequest>,
) -> Result<Json<CampaignResponse>, HttpError> {
    info!(
        actor_id = %req.actor_id,
        campaign_id = campaign_id,
        status = %req.status,
        "Handling transition_campaign request"
    );

    let actor: AuthenticatedActor = authenticate(req.actor_id.clone(), &req.actor_role)?;
    let request: TransitionCampaignRequest = TransitionCampaignRequest { status: req.status };

    let mut persistence = app_state.persistence.lock().await;
    let response: CampaignResponse = handlers::transition_campaign(
        &mut persistence,
        &actor,
        app_state.sink.as_ref(),
        campaign_id,
        &request,
        OffsetDateTime::now_utc(),
    )?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/campaigns/{campaign_id}/delete` endpoint.
///
/// Deletes a campaign that has no assignments and no files.
async fn handle_delete_campaign(
    AxumState(app_state): AxumState<AppState>,
    Path(campaign_id): Path<i64>,
    Json(req): Json<ActorRequest>,
) -> Result<Json<AckResponse>, HttpError> {
    info!(
        actor_id = %req.actor_id,
        campaign_id = campaign_id,
        "Handling delete_campaign request"
    );

    let actor: AuthenticatedActor = authenticate(req.actor_id.clone(), &req.actor_role)?;

    let mut persistence = app_state.persistence.lock().await;
    handlers::delete_campaign(&mut persistence, &actor, campaign_id)?;
    drop(persistence);

    Ok(Json(AckResponse {
        success: true,
        message: format!("Successfully deleted campaign {campaign_id}"),
    }))
}

/// Handler for POST `/campaigns/{campaign_id}/files` endpoint.
///
/// Registers a document (contract, brief, artwork) against a campaign.
async fn handle_register_file(
    AxumState(app_state): AxumState<AppState>,
    Path(campaign_id): Path<i64>,
    Json(req): Json<RegisterFileApiRequest>,
) -> Result<Json<AckResponse>, HttpError> {
    info!(
        actor_id = %req.actor_id,
        campaign_id = campaign_id,
        label = %req.label,
        "Handling register_file request"
    );

    let actor: AuthenticatedActor = authenticate(req.actor_id.clone(), &req.actor_role)?;
    let request: RegisterFileRequest = RegisterFileRequest {
        label: req.label,
        url: req.url,
    };

    let mut persistence = app_state.persistence.lock().await;
    handlers::register_campaign_file(
        &mut persistence,
        &actor,
        campaign_id,
        &request,
        OffsetDateTime::now_utc(),
    )?;
    drop(persistence);

    Ok(Json(AckResponse {
        success: true,
        message: String::from("File registered"),
    }))
}

/// Handler for GET `/campaigns/{campaign_id}/assignments` endpoint.
async fn handle_list_assignments(
    AxumState(app_state): AxumState<AppState>,
    Path(campaign_id): Path<i64>,
) -> Result<Json<Vec<Assignment>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let assignments: Vec<Assignment> = handlers::list_assignments(&mut persistence, campaign_id)?;
    drop(persistence);

    Ok(Json(assignments))
}

/// Handler for POST `/campaigns/{campaign_id}/providers` endpoint.
///
/// Attaches a provider after the eligibility checks pass.
async fn handle_attach_provider(
    AxumState(app_state): AxumState<AppState>,
    Path(campaign_id): Path<i64>,
    Json(req): Json<AttachProviderApiRequest>,
) -> Result<Json<AssignmentResponse>, HttpError> {
    info!(
        actor_id = %req.actor_id,
        campaign_id = campaign_id,
        provider_id = req.provider_id,
        "Handling attach_provider request"
    );

    let actor: AuthenticatedActor = authenticate(req.actor_id.clone(), &req.actor_role)?;
    let request: AttachProviderRequest = AttachProviderRequest {
        provider_id: req.provider_id,
    };

    let mut persistence = app_state.persistence.lock().await;
    let response: AssignmentResponse = handlers::attach_provider(
        &mut persistence,
        &actor,
        app_state.sink.as_ref(),
        campaign_id,
        &request,
        OffsetDateTime::now_utc(),
    )?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/campaigns/{campaign_id}/providers/{provider_id}/detach` endpoint.
///
/// Detaches a provider, allowed only before settlement starts.
async fn handle_detach_provider(
    AxumState(app_state): AxumState<AppState>,
    Path((campaign_id, provider_id)): Path<(i64, i64)>,
    Json(req): Json<ActorRequest>,
) -> Result<Json<AckResponse>, HttpError> {
    info!(
        actor_id = %req.actor_id,
        campaign_id = campaign_id,
        provider_id = provider_id,
        "Handling detach_provider request"
    );

    let actor: AuthenticatedActor = authenticate(req.actor_id.clone(), &req.actor_role)?;

    let mut persistence = app_state.persistence.lock().await;
    handlers::detach_provider(
        &mut persistence,
        &actor,
        app_state.sink.as_ref(),
        campaign_id,
        provider_id,
    )?;
    drop(persistence);

    Ok(Json(AckResponse {
        success: true,
        message: String::from("Successfully detached provider"),
    }))
}

/// Handler for POST `/campaigns/{campaign_id}/providers/{provider_id}/poster` endpoint.
///
/// Records the installed-poster photo for an assignment.
async fn handle_set_poster_image(
    AxumState(app_state): AxumState<AppState>,
    Path((campaign_id, provider_id)): Path<(i64, i64)>,
    Json(req): Json<PosterImageApiRequest>,
) -> Result<Json<AssignmentResponse>, HttpError> {
    info!(
        actor_id = %req.actor_id,
        campaign_id = campaign_id,
        provider_id = provider_id,
        "Handling set_poster_image request"
    );

    authenticate(req.actor_id.clone(), &req.actor_role)?;
    let request: PosterImageRequest = PosterImageRequest { url: req.url };

    let mut persistence = app_state.persistence.lock().await;
    let response: AssignmentResponse =
        handlers::set_poster_image(&mut persistence, campaign_id, provider_id, &request)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for GET `/campaigns/{campaign_id}/providers/{provider_id}/conditions` endpoint.
async fn handle_list_conditions(
    AxumState(app_state): AxumState<AppState>,
    Path((campaign_id, provider_id)): Path<(i64, i64)>,
) -> Result<Json<Vec<MaterialCondition>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let conditions: Vec<MaterialCondition> =
        handlers::list_conditions(&mut persistence, campaign_id, provider_id)?;
    drop(persistence);

    Ok(Json(conditions))
}

/// Handler for POST `/conditions` endpoint.
///
/// Records a material condition observed in the field.
async fn handle_record_condition(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<RecordConditionApiRequest>,
) -> Result<Json<ConditionResponse>, HttpError> {
    info!(
        actor_id = %req.actor_id,
        material = %req.material_name,
        grade = %req.grade,
        "Handling record_condition request"
    );

    authenticate(req.actor_id.clone(), &req.actor_role)?;
    let request: RecordConditionRequest = RecordConditionRequest {
        campaign_id: req.campaign_id,
        provider_id: req.provider_id,
        material_name: req.material_name,
        grade: req.grade,
        description: req.description,
        penalty_amount: req.penalty_amount,
        penalty_applied: req.penalty_applied,
        photo_url: req.photo_url,
    };

    let mut persistence = app_state.persistence.lock().await;
    let response: ConditionResponse = handlers::record_condition(
        &mut persistence,
        app_state.sink.as_ref(),
        request,
        OffsetDateTime::now_utc(),
    )?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/conditions/{condition_id}` endpoint.
///
/// Overrides a condition's penalty amount and/or applied flag.
async fn handle_update_condition(
    AxumState(app_state): AxumState<AppState>,
    Path(condition_id): Path<i64>,
    Json(req): Json<UpdateConditionApiRequest>,
) -> Result<Json<ConditionResponse>, HttpError> {
    info!(
        actor_id = %req.actor_id,
        condition_id = condition_id,
        "Handling update_condition request"
    );

    let actor: AuthenticatedActor = authenticate(req.actor_id.clone(), &req.actor_role)?;
    let request: UpdateConditionRequest = UpdateConditionRequest {
        penalty_amount: req.penalty_amount,
        penalty_applied: req.penalty_applied,
    };

    let mut persistence = app_state.persistence.lock().await;
    let response: ConditionResponse = handlers::update_condition(
        &mut persistence,
        &actor,
        condition_id,
        &request,
        OffsetDateTime::now_utc(),
    )?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/conditions/{condition_id}/delete` endpoint.
///
/// Deletes a condition and re-reconciles the pair it belonged to.
async fn handle_delete_condition(
    AxumState(app_state): AxumState<AppState>,
    Path(condition_id): Path<i64>,
    Json(req): Json<ActorRequest>,
) -> Result<Json<AckResponse>, HttpError> {
    info!(
        actor_id = %req.actor_id,
        condition_id = condition_id,
        "Handling delete_condition request"
    );

    let actor: AuthenticatedActor = authenticate(req.actor_id.clone(), &req.actor_role)?;

    let mut persistence = app_state.persistence.lock().await;
    handlers::delete_condition(&mut persistence, &actor, condition_id, OffsetDateTime::now_utc())?;
    drop(persistence);

    Ok(Json(AckResponse {
        success: true,
        message: format!("Material condition {condition_id} deleted"),
    }))
}

/// Handler for POST `/campaigns/{campaign_id}/providers/{provider_id}/reconcile` endpoint.
///
/// Recomputes the pair's BASE payment from its material conditions.
async fn handle_reconcile_payment(
    AxumState(app_state): AxumState<AppState>,
    Path((campaign_id, provider_id)): Path<(i64, i64)>,
    Json(req): Json<ActorRequest>,
) -> Result<Json<PaymentResponse>, HttpError> {
    info!(
        actor_id = %req.actor_id,
        campaign_id = campaign_id,
        provider_id = provider_id,
        "Handling reconcile_payment request"
    );

    authenticate(req.actor_id.clone(), &req.actor_role)?;

    let mut persistence = app_state.persistence.lock().await;
    let response: PaymentResponse = handlers::reconcile_payment(
        &mut persistence,
        campaign_id,
        provider_id,
        OffsetDateTime::now_utc(),
    )?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for GET `/campaigns/{campaign_id}/providers/{provider_id}/reconcile/preview` endpoint.
///
/// Previews what a reconciliation would produce, without writing.
async fn handle_preview_reconciliation(
    AxumState(app_state): AxumState<AppState>,
    Path((campaign_id, provider_id)): Path<(i64, i64)>,
) -> Result<Json<ReconcilePreviewResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: ReconcilePreviewResponse =
        handlers::preview_reconciliation(&mut persistence, campaign_id, provider_id)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for GET `/campaigns/{campaign_id}/providers/{provider_id}/payments` endpoint.
async fn handle_list_payments(
    AxumState(app_state): AxumState<AppState>,
    Path((campaign_id, provider_id)): Path<(i64, i64)>,
) -> Result<Json<Vec<Payment>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let payments: Vec<Payment> = handlers::list_payments(&mut persistence, campaign_id, provider_id)?;
    drop(persistence);

    Ok(Json(payments))
}

/// Handler for POST `/payments/{payment_id}/transactions` endpoint.
///
/// Records a settlement transaction against a payment.
async fn handle_record_transaction(
    AxumState(app_state): AxumState<AppState>,
    Path(payment_id): Path<i64>,
    Json(req): Json<RecordTransactionApiRequest>,
) -> Result<Json<PaymentResponse>, HttpError> {
    info!(
        actor_id = %req.actor_id,
        payment_id = payment_id,
        amount = req.amount,
        "Handling record_transaction request"
    );

    let actor: AuthenticatedActor = authenticate(req.actor_id.clone(), &req.actor_role)?;
    let request: RecordTransactionRequest = RecordTransactionRequest {
        amount: req.amount,
        method: req.method,
        reference: req.reference,
        note: req.note,
    };

    let mut persistence = app_state.persistence.lock().await;
    let response: PaymentResponse = handlers::record_transaction(
        &mut persistence,
        &actor,
        app_state.sink.as_ref(),
        payment_id,
        &request,
        OffsetDateTime::now_utc(),
    )?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/campaigns/{campaign_id}/renew` endpoint.
///
/// Renews a finished campaign into a PLANNED successor.
async fn handle_renew_campaign(
    AxumState(app_state): AxumState<AppState>,
    Path(campaign_id): Path<i64>,
    Json(req): Json<RenewCampaignApiRequest>,
) -> Result<Json<RenewalResponse>, HttpError> {
    info!(
        actor_id = %req.actor_id,
        campaign_id = campaign_id,
        "Handling renew_campaign request"
    );

    let actor: AuthenticatedActor = authenticate(req.actor_id.clone(), &req.actor_role)?;
    let request: RenewCampaignRequest = RenewCampaignRequest {
        start_date: req.start_date,
        end_date: req.end_date,
        provider_ids: req.provider_ids,
    };

    let mut persistence = app_state.persistence.lock().await;
    let response: RenewalResponse = handlers::renew_campaign(
        &mut persistence,
        &actor,
        app_state.sink.as_ref(),
        campaign_id,
        &request,
        OffsetDateTime::now_utc(),
    )?;
    drop(persistence);

    info!(
        new_campaign_id = response.campaign.campaign_id,
        attached = response.attached_count,
        skipped = response.skipped.len(),
        "Successfully renewed campaign"
    );

    Ok(Json(response))
}

/// Handler for POST `/campaigns/{campaign_id}/providers/{provider_id}/uninstallation` endpoint.
///
/// Confirms the provider's de-installation and issues the fixed fee.
async fn handle_confirm_uninstallation(
    AxumState(app_state): AxumState<AppState>,
    Path((campaign_id, provider_id)): Path<(i64, i64)>,
    Json(req): Json<ActorRequest>,
) -> Result<Json<UninstallationResponse>, HttpError> {
    info!(
        actor_id = %req.actor_id,
        campaign_id = campaign_id,
        provider_id = provider_id,
        "Handling confirm_uninstallation request"
    );

    authenticate(req.actor_id.clone(), &req.actor_role)?;

    let mut persistence = app_state.persistence.lock().await;
    let response: UninstallationResponse = handlers::confirm_uninstallation(
        &mut persistence,
        app_state.sink.as_ref(),
        campaign_id,
        provider_id,
        OffsetDateTime::now_utc(),
    )?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for GET `/uninstallations/eligible` endpoint.
///
/// Lists every assignment open for de-installation confirmation.
async fn handle_list_uninstallation_eligible(
    AxumState(app_state): AxumState<AppState>,
) -> Result<Json<Vec<UninstallationCandidateInfo>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let candidates: Vec<UninstallationCandidateInfo> =
        handlers::list_uninstallation_eligible(&mut persistence, OffsetDateTime::now_utc())?;
    drop(persistence);

    Ok(Json(candidates))
}

/// Handler for POST `/jobs/auto_terminate` endpoint.
///
/// Runs the auto-termination sweep. Guarded by the sweep secret.
async fn handle_auto_terminate(
    AxumState(app_state): AxumState<AppState>,
    headers: HeaderMap,
) -> Result<Json<TerminationSweepApiResponse>, HttpError> {
    require_sweep_secret(&app_state, &headers)?;
    info!("Handling auto_terminate job request");

    let mut persistence = app_state.persistence.lock().await;
    let report = jobs::run_auto_termination(
        &mut persistence,
        app_state.sink.as_ref(),
        OffsetDateTime::now_utc(),
    );
    drop(persistence);

    Ok(Json(TerminationSweepApiResponse {
        success: report.success,
        error: report.error,
        campaigns_terminated: report.campaigns_terminated,
        assignments_closed: report.assignments_closed,
        providers_released: report.providers_released,
    }))
}

/// Handler for POST `/jobs/auto_release` endpoint.
///
/// Runs the auto-release sweep. Guarded by the sweep secret.
async fn handle_auto_release(
    AxumState(app_state): AxumState<AppState>,
    headers: HeaderMap,
) -> Result<Json<ReleaseSweepApiResponse>, HttpError> {
    require_sweep_secret(&app_state, &headers)?;
    info!("Handling auto_release job request");

    let mut persistence = app_state.persistence.lock().await;
    let report = jobs::run_auto_release(
        &mut persistence,
        app_state.sink.as_ref(),
        OffsetDateTime::now_utc(),
    );
    drop(persistence);

    Ok(Json(ReleaseSweepApiResponse {
        success: report.success,
        error: report.error,
        assignments_closed: report.assignments_closed,
        providers_released: report.providers_released,
    }))
}

/// Handler for POST `/jobs/expiry_scan` endpoint.
///
/// Emits expiry warnings for approaching end dates. Guarded by the
/// sweep secret.
async fn handle_expiry_scan(
    AxumState(app_state): AxumState<AppState>,
    headers: HeaderMap,
) -> Result<Json<ExpiryScanApiResponse>, HttpError> {
    require_sweep_secret(&app_state, &headers)?;
    info!("Handling expiry_scan job request");

    let mut persistence = app_state.persistence.lock().await;
    let report = jobs::scan_expiry_notifications(
        &mut persistence,
        app_state.sink.as_ref(),
        OffsetDateTime::now_utc(),
    )?;
    drop(persistence);

    Ok(Json(ExpiryScanApiResponse {
        assignment_alerts: report.assignment_alerts,
        campaign_alerts: report.campaign_alerts,
    }))
}

/// Builds the application router with all endpoints.
fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/campaigns", post(handle_create_campaign))
        .route("/campaigns", get(handle_list_campaigns))
        .route("/campaigns/{campaign_id}", get(handle_get_campaign))
        .route("/campaigns/{campaign_id}/dates", post(handle_update_campaign_dates))
        .route(
            "/campaigns/{campaign_id}/transition",
            post(handle_transition_campaign),
        )
        .route("/campaigns/{campaign_id}/delete", post(handle_delete_campaign))
        .route("/campaigns/{campaign_id}/files", post(handle_register_file))
        .route(
            "/campaigns/{campaign_id}/assignments",
            get(handle_list_assignments),
        )
        .route(
            "/campaigns/{campaign_id}/providers",
            post(handle_attach_provider),
        )
        .route(
            "/campaigns/{campaign_id}/providers/{provider_id}/detach",
            post(handle_detach_provider),
        )
        .route(
            "/campaigns/{campaign_id}/providers/{provider_id}/poster",
            post(handle_set_poster_image),
        )
        .route(
            "/campaigns/{campaign_id}/providers/{provider_id}/conditions",
            get(handle_list_conditions),
        )
        .route("/conditions", post(handle_record_condition))
        .route("/conditions/{condition_id}", post(handle_update_condition))
        .route(
            "/conditions/{condition_id}/delete",
            post(handle_delete_condition),
        )
        .route(
            "/campaigns/{campaign_id}/providers/{provider_id}/reconcile",
            post(handle_reconcile_payment),
        )
        .route(
            "/campaigns/{campaign_id}/providers/{provider_id}/reconcile/preview",
            get(handle_preview_reconciliation),
        )
        .route(
            "/campaigns/{campaign_id}/providers/{provider_id}/payments",
            get(handle_list_payments),
        )
        .route(
            "/payments/{payment_id}/transactions",
            post(handle_record_transaction),
        )
        .route("/campaigns/{campaign_id}/renew", post(handle_renew_campaign))
        .route(
            "/campaigns/{campaign_id}/providers/{provider_id}/uninstallation",
            post(handle_confirm_uninstallation),
        )
        .route(
            "/uninstallations/eligible",
            get(handle_list_uninstallation_eligible),
        )
        .route("/jobs/auto_terminate", post(handle_auto_terminate))
        .route("/jobs/auto_release", post(handle_auto_release))
        .route("/jobs/expiry_scan", post(handle_expiry_scan))
        .with_state(app_state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command-line arguments
    let args: Args = Args::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing CampTrack server");

    // Initialize persistence (in-memory or file-based based on CLI argument)
    let persistence: Persistence = if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path);
        Persistence::new_with_file(db_path)?
    } else {
        info!("Using in-memory database");
        Persistence::new_in_memory()?
    };

    let sweep_secret: Option<String> = args
        .sweep_secret
        .or_else(|| std::env::var("CAMPTRACK_SWEEP_SECRET").ok());
    if sweep_secret.is_none() {
        info!("No sweep secret configured; job endpoints are disabled");
    }

    let app_state: AppState = AppState {
        persistence: Arc::new(Mutex::new(persistence)),
        sink: Arc::new(LogSink),
        sweep_secret,
    };

    // Build router
    let app: Router = build_router(app_state);

    // Bind to address
    let addr: std::net::SocketAddr = format!("127.0.0.1:{}", args.port).parse()?;
    info!("Server listening on {}", addr);

    // Run server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode as HttpStatusCode},
    };
    use camptrack_domain::{ClientType, PaymentStatus, PaymentType, VehicleInfo};
    use tower::ServiceExt;

    /// A router over a seeded in-memory database.
    struct TestHarness {
        app: Router,
        client_id: i64,
        service_id: i64,
        location_id: i64,
        provider_id: i64,
    }

    fn harness_with_secret(sweep_secret: Option<String>) -> TestHarness {
        let mut persistence: Persistence =
            Persistence::new_in_memory().expect("Failed to create in-memory persistence");
        let client_id: i64 = persistence
            .create_client("Orange CI", ClientType::External)
            .unwrap();
        let service_id: i64 = persistence.create_service("Mobile billboard").unwrap();
        let location_id: i64 = persistence.create_location("Abidjan - Plateau").unwrap();
        let provider_id: i64 = persistence
            .create_provider(
                "Awa K.",
                "+225-0102030405",
                service_id,
                &VehicleInfo::default(),
                None,
                true,
                false,
            )
            .unwrap();

        let app_state: AppState = AppState {
            persistence: Arc::new(Mutex::new(persistence)),
            sink: Arc::new(LogSink),
            sweep_secret,
        };
        TestHarness {
            app: build_router(app_state),
            client_id,
            service_id,
            location_id,
            provider_id,
        }
    }

    fn harness() -> TestHarness {
        harness_with_secret(None)
    }

    /// A creation request over the harness's seeded references.
    ///
    /// Dates are far in the future so wall-clock time never interferes.
    fn campaign_body(
        harness: &TestHarness,
        actor_role: &str,
        name: &str,
        start: &str,
        end: &str,
    ) -> CreateCampaignApiRequest {
        CreateCampaignApiRequest {
            actor_id: String::from("admin-1"),
            actor_role: String::from(actor_role),
            name: String::from(name),
            description: Some(String::from("poster run")),
            objective: None,
            client_id: harness.client_id,
            location_id: harness.location_id,
            service_id: harness.service_id,
            manager: String::from("mgr-1"),
            supervisor: None,
            target_quantity: 50,
            target_provider_count: None,
            kind: String::from("MASS"),
            start_date: String::from(start),
            end_date: String::from(end),
        }
    }

    fn actor_body() -> ActorRequest {
        ActorRequest {
            actor_id: String::from("admin-1"),
            actor_role: String::from("admin"),
        }
    }

    async fn post_json<B: Serialize>(app: &Router, uri: &str, body: &B) -> Response {
        app.clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header("content-type", "application/json")
                    .body(Body::from(serde_json::to_string(body).unwrap()))
                    .unwrap(),
            )
            .await
            .unwrap()
    }

    async fn get_uri(app: &Router, uri: &str) -> Response {
        app.clone()
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri(uri)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap()
    }

    async fn post_with_bearer(app: &Router, uri: &str, token: Option<&str>) -> Response {
        let mut builder = Request::builder().method("POST").uri(uri);
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {token}"));
        }
        app.clone()
            .oneshot(builder.body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn read_json<T: serde::de::DeserializeOwned>(response: Response) -> T {
        let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body_bytes).unwrap()
    }

    /// Creates a campaign through the endpoint and returns it.
    async fn create_campaign(harness: &TestHarness, name: &str, start: &str, end: &str) -> Campaign {
        let body = campaign_body(harness, "admin", name, start, end);
        let response = post_json(&harness.app, "/campaigns", &body).await;
        assert_eq!(response.status(), HttpStatusCode::OK);
        let created: CampaignResponse = read_json(response).await;
        created.campaign
    }

    /// Attaches the harness's seeded provider to a campaign.
    async fn attach_provider(harness: &TestHarness, campaign_id: i64) {
        let body = AttachProviderApiRequest {
            actor_id: String::from("admin-1"),
            actor_role: String::from("admin"),
            provider_id: harness.provider_id,
        };
        let response = post_json(
            &harness.app,
            &format!("/campaigns/{campaign_id}/providers"),
            &body,
        )
        .await;
        assert_eq!(response.status(), HttpStatusCode::OK);
    }

    /// Transitions a campaign through the endpoint.
    async fn transition(harness: &TestHarness, campaign_id: i64, status: &str) -> Response {
        let body = TransitionCampaignApiRequest {
            actor_id: String::from("admin-1"),
            actor_role: String::from("admin"),
            status: String::from(status),
        };
        post_json(
            &harness.app,
            &format!("/campaigns/{campaign_id}/transition"),
            &body,
        )
        .await
    }

    #[tokio::test]
    async fn test_create_campaign_as_admin_succeeds() {
        let harness: TestHarness = harness();
        let campaign: Campaign =
            create_campaign(&harness, "Summer Posters", "2030-06-01", "2030-06-30").await;
        assert_eq!(campaign.name, "Summer Posters");
        assert!(campaign.campaign_id > 0);
    }

    #[tokio::test]
    async fn test_create_campaign_as_controller_fails() {
        let harness: TestHarness = harness();
        let body = campaign_body(&harness, "controller", "Summer Posters", "2030-06-01", "2030-06-30");
        let response = post_json(&harness.app, "/campaigns", &body).await;
        assert_eq!(response.status(), HttpStatusCode::FORBIDDEN);

        let error_response: ErrorResponse = read_json(response).await;
        assert!(error_response.error);
        assert!(error_response.message.contains("Unauthorized"));
    }

    #[tokio::test]
    async fn test_invalid_role_returns_bad_request() {
        let harness: TestHarness = harness();
        let body = campaign_body(&harness, "intern", "Summer Posters", "2030-06-01", "2030-06-30");
        let response = post_json(&harness.app, "/campaigns", &body).await;
        assert_eq!(response.status(), HttpStatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_malformed_date_returns_bad_request() {
        let harness: TestHarness = harness();
        let body = campaign_body(&harness, "admin", "Summer Posters", "01/06/2030", "2030-06-30");
        let response = post_json(&harness.app, "/campaigns", &body).await;
        assert_eq!(response.status(), HttpStatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_location_overlap_returns_conflict() {
        let harness: TestHarness = harness();
        create_campaign(&harness, "Incumbent", "2030-06-01", "2030-06-30").await;
        let body = campaign_body(&harness, "admin", "Intruder", "2030-06-15", "2030-07-15");
        let response = post_json(&harness.app, "/campaigns", &body).await;
        assert_eq!(response.status(), HttpStatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_missing_campaign_returns_not_found() {
        let harness: TestHarness = harness();
        let response = get_uri(&harness.app, "/campaigns/404").await;
        assert_eq!(response.status(), HttpStatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_invalid_transition_returns_bad_request() {
        let harness: TestHarness = harness();
        let campaign: Campaign =
            create_campaign(&harness, "Planned", "2030-06-01", "2030-06-30").await;
        // PLANNED cannot jump straight to FINISHED; the refusal is a
        // state problem, not a data collision.
        let response = transition(&harness, campaign.campaign_id, "FINISHED").await;
        assert_eq!(response.status(), HttpStatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_attach_and_detach_flow() {
        let harness: TestHarness = harness();
        let campaign: Campaign =
            create_campaign(&harness, "Summer Posters", "2030-06-01", "2030-06-30").await;
        attach_provider(&harness, campaign.campaign_id).await;

        let listed = get_uri(
            &harness.app,
            &format!("/campaigns/{}/assignments", campaign.campaign_id),
        )
        .await;
        let assignments: Vec<Assignment> = read_json(listed).await;
        assert_eq!(assignments.len(), 1);
        assert_eq!(assignments[0].provider_id, harness.provider_id);

        let response = post_json(
            &harness.app,
            &format!(
                "/campaigns/{}/providers/{}/detach",
                campaign.campaign_id, harness.provider_id
            ),
            &actor_body(),
        )
        .await;
        assert_eq!(response.status(), HttpStatusCode::OK);

        let listed = get_uri(
            &harness.app,
            &format!("/campaigns/{}/assignments", campaign.campaign_id),
        )
        .await;
        let assignments: Vec<Assignment> = read_json(listed).await;
        assert!(assignments.is_empty());
    }

    #[tokio::test]
    async fn test_settlement_flow_over_http() {
        let harness: TestHarness = harness();
        let campaign: Campaign =
            create_campaign(&harness, "Summer Posters", "2030-06-01", "2030-06-30").await;
        attach_provider(&harness, campaign.campaign_id).await;

        let pair_uri: String = format!(
            "/campaigns/{}/providers/{}",
            campaign.campaign_id, harness.provider_id
        );
        let response = post_json(&harness.app, &format!("{pair_uri}/reconcile"), &actor_body()).await;
        assert_eq!(response.status(), HttpStatusCode::OK);
        let reconciled: PaymentResponse = read_json(response).await;
        assert_eq!(reconciled.payment.final_amount, 5000);
        assert_eq!(reconciled.payment.status, PaymentStatus::Pending);

        let body = RecordTransactionApiRequest {
            actor_id: String::from("controller-1"),
            actor_role: String::from("controller"),
            amount: 5000,
            method: String::from("mobile_money"),
            reference: Some(String::from("MM-42")),
            note: None,
        };
        let response = post_json(
            &harness.app,
            &format!("/payments/{}/transactions", reconciled.payment.payment_id),
            &body,
        )
        .await;
        assert_eq!(response.status(), HttpStatusCode::OK);
        let settled: PaymentResponse = read_json(response).await;
        assert_eq!(settled.payment.status, PaymentStatus::Paid);

        let listed = get_uri(&harness.app, &format!("{pair_uri}/payments")).await;
        let payments: Vec<Payment> = read_json(listed).await;
        assert_eq!(payments.len(), 1);
    }

    #[tokio::test]
    async fn test_bad_condition_reflects_in_preview() {
        let harness: TestHarness = harness();
        let campaign: Campaign =
            create_campaign(&harness, "Summer Posters", "2030-06-01", "2030-06-30").await;
        attach_provider(&harness, campaign.campaign_id).await;

        let body = RecordConditionApiRequest {
            actor_id: String::from("controller-1"),
            actor_role: String::from("controller"),
            campaign_id: Some(campaign.campaign_id),
            provider_id: Some(harness.provider_id),
            material_name: String::from("Tricycle frame"),
            grade: String::from("BAD"),
            description: None,
            penalty_amount: None,
            penalty_applied: None,
            photo_url: None,
        };
        let response = post_json(&harness.app, "/conditions", &body).await;
        assert_eq!(response.status(), HttpStatusCode::OK);
        let recorded: ConditionResponse = read_json(response).await;
        assert_eq!(recorded.condition.penalty_amount, 2000);

        let preview_uri: String = format!(
            "/campaigns/{}/providers/{}/reconcile/preview",
            campaign.campaign_id, harness.provider_id
        );
        let response = get_uri(&harness.app, &preview_uri).await;
        let preview: ReconcilePreviewResponse = read_json(response).await;
        assert_eq!(preview.sanction_amount, 2000);
        assert_eq!(preview.final_amount, 3000);
    }

    #[tokio::test]
    async fn test_renewal_flow_over_http() {
        let harness: TestHarness = harness();
        let campaign: Campaign =
            create_campaign(&harness, "June Run", "2026-01-01", "2026-02-01").await;
        attach_provider(&harness, campaign.campaign_id).await;
        assert_eq!(
            transition(&harness, campaign.campaign_id, "ONGOING").await.status(),
            HttpStatusCode::OK
        );
        assert_eq!(
            transition(&harness, campaign.campaign_id, "FINISHED").await.status(),
            HttpStatusCode::OK
        );

        let body = RenewCampaignApiRequest {
            actor_id: String::from("admin-1"),
            actor_role: String::from("admin"),
            start_date: String::from("2030-07-05"),
            end_date: String::from("2030-08-05"),
            provider_ids: None,
        };
        let response = post_json(
            &harness.app,
            &format!("/campaigns/{}/renew", campaign.campaign_id),
            &body,
        )
        .await;
        assert_eq!(response.status(), HttpStatusCode::OK);
        let renewal: RenewalResponse = read_json(response).await;
        assert_eq!(renewal.campaign.name, "June Run (Renouvellement)");
        assert_eq!(renewal.attached_count, 1);
        assert!(renewal.skipped.is_empty());
    }

    #[tokio::test]
    async fn test_uninstallation_flow_over_http() {
        let harness: TestHarness = harness();
        let campaign: Campaign =
            create_campaign(&harness, "Past Run", "2026-01-01", "2026-02-01").await;
        attach_provider(&harness, campaign.campaign_id).await;
        transition(&harness, campaign.campaign_id, "ONGOING").await;
        transition(&harness, campaign.campaign_id, "FINISHED").await;

        let response = post_json(
            &harness.app,
            &format!(
                "/campaigns/{}/providers/{}/uninstallation",
                campaign.campaign_id, harness.provider_id
            ),
            &actor_body(),
        )
        .await;
        assert_eq!(response.status(), HttpStatusCode::OK);
        let confirmed: UninstallationResponse = read_json(response).await;
        assert_eq!(confirmed.payment.payment_type, PaymentType::Deinstallation);
        assert_eq!(confirmed.payment.final_amount, 2000);

        let listed = get_uri(&harness.app, "/uninstallations/eligible").await;
        assert_eq!(listed.status(), HttpStatusCode::OK);
        let candidates: Vec<UninstallationCandidateInfo> = read_json(listed).await;
        assert_eq!(candidates.len(), 1);
        assert!(candidates[0].deinstallation_payment.is_some());
    }

    #[tokio::test]
    async fn test_job_endpoint_requires_the_secret() {
        let harness: TestHarness = harness_with_secret(Some(String::from("s3cret")));

        let response = post_with_bearer(&harness.app, "/jobs/auto_terminate", None).await;
        assert_eq!(response.status(), HttpStatusCode::UNAUTHORIZED);

        let response = post_with_bearer(&harness.app, "/jobs/auto_terminate", Some("wrong")).await;
        assert_eq!(response.status(), HttpStatusCode::UNAUTHORIZED);

        let response = post_with_bearer(&harness.app, "/jobs/auto_terminate", Some("s3cret")).await;
        assert_eq!(response.status(), HttpStatusCode::OK);
        let report: TerminationSweepApiResponse = read_json(response).await;
        assert!(report.success);
        assert_eq!(report.campaigns_terminated, 0);
    }

    #[tokio::test]
    async fn test_unconfigured_secret_disables_job_endpoints() {
        let harness: TestHarness = harness();
        let response = post_with_bearer(&harness.app, "/jobs/auto_release", Some("anything")).await;
        assert_eq!(response.status(), HttpStatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_expiry_scan_endpoint_reports_counts() {
        let harness: TestHarness = harness_with_secret(Some(String::from("s3cret")));
        let response = post_with_bearer(&harness.app, "/jobs/expiry_scan", Some("s3cret")).await;
        assert_eq!(response.status(), HttpStatusCode::OK);
        let report: ExpiryScanApiResponse = read_json(response).await;
        assert_eq!(report.assignment_alerts, 0);
        assert_eq!(report.campaign_alerts, 0);
    }
}
