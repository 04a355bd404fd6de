//! Visitor invitation and gate endpoint handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use domain::models::visitor::{
    self, AdmitVisitorRequest, CreateVisitorRequest, DischargeVisitorRequest, ListVisitorsQuery,
    ListVisitorsResponse, Visitor,
};
use domain::models::PortalUser;
use persistence::repositories::VisitorRepository;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::CurrentUser;
use crate::middleware::metrics::record_visitor_event;
use crate::services::authorization::{require_role, require_same_company};

async fn load_visitor(
    repo: &VisitorRepository,
    user: &PortalUser,
    visitor_id: Uuid,
) -> Result<Visitor, ApiError> {
    let visitor: Visitor = repo
        .find_by_id(visitor_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Visitor not found".to_string()))?
        .into();
    require_same_company(user, visitor.company_id, "Visitor")?;
    Ok(visitor)
}

fn gate_conflict() -> ApiError {
    ApiError::Conflict("Visitor status changed concurrently, reload and retry".to_string())
}

/// Invite a visitor.
///
/// POST /api/v1/visitors
pub async fn create_visitor(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(request): Json<CreateVisitorRequest>,
) -> Result<(StatusCode, Json<Visitor>), ApiError> {
    require_role(&user, user.role.can_invite_visitors(), "invite visitors")?;
    request.validate()?;

    let nic = request
        .nic
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty());

    let visitor: Visitor = VisitorRepository::new(state.pool.clone())
        .create(
            user.company_id,
            request.name.trim(),
            nic,
            request.visit_date,
            user.id,
        )
        .await?
        .into();

    record_visitor_event("invited");
    info!(visitor_id = %visitor.id, user_id = %user.id, "Visitor invited");

    Ok((StatusCode::CREATED, Json(visitor)))
}

/// List visitors of the caller's company.
///
/// GET /api/v1/visitors
pub async fn list_visitors(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(query): Query<ListVisitorsQuery>,
) -> Result<Json<ListVisitorsResponse>, ApiError> {
    require_role(
        &user,
        user.role.can_invite_visitors() || user.role.can_operate_gate(),
        "view visitors",
    )?;

    let data = VisitorRepository::new(state.pool.clone())
        .list(user.company_id, query.status.map(Into::into))
        .await?
        .into_iter()
        .map(Visitor::from)
        .collect();

    Ok(Json(ListVisitorsResponse { data }))
}

/// Fetch a visitor.
///
/// GET /api/v1/visitors/:visitor_id
pub async fn get_visitor(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(visitor_id): Path<Uuid>,
) -> Result<Json<Visitor>, ApiError> {
    require_role(
        &user,
        user.role.can_invite_visitors() || user.role.can_operate_gate(),
        "view visitors",
    )?;

    let visitor = load_visitor(&VisitorRepository::new(state.pool.clone()), &user, visitor_id).await?;
    Ok(Json(visitor))
}

/// Admit an invited visitor at the gate.
///
/// POST /api/v1/visitors/:visitor_id/admit
pub async fn admit_visitor(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(visitor_id): Path<Uuid>,
    Json(request): Json<AdmitVisitorRequest>,
) -> Result<Json<Visitor>, ApiError> {
    require_role(&user, user.role.can_operate_gate(), "admit visitors")?;
    request.validate()?;

    let repo = VisitorRepository::new(state.pool.clone());
    let current = load_visitor(&repo, &user, visitor_id).await?;
    let admission = visitor::admit(&current, &request)?;

    let admitted: Visitor = repo
        .admit(visitor_id, &admission)
        .await?
        .ok_or_else(gate_conflict)?
        .into();

    record_visitor_event("admitted");
    info!(visitor_id = %visitor_id, user_id = %user.id, "Visitor admitted");

    Ok(Json(admitted))
}

/// Discharge an admitted visitor.
///
/// POST /api/v1/visitors/:visitor_id/discharge
pub async fn discharge_visitor(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(visitor_id): Path<Uuid>,
    Json(request): Json<DischargeVisitorRequest>,
) -> Result<Json<Visitor>, ApiError> {
    require_role(&user, user.role.can_operate_gate(), "discharge visitors")?;
    request.validate()?;

    let repo = VisitorRepository::new(state.pool.clone());
    let current = load_visitor(&repo, &user, visitor_id).await?;
    let discharge = visitor::discharge(&current, &request)?;

    let discharged: Visitor = repo
        .discharge(visitor_id, &discharge)
        .await?
        .ok_or_else(gate_conflict)?
        .into();

    record_visitor_event("discharged");
    info!(visitor_id = %visitor_id, user_id = %user.id, "Visitor discharged");

    Ok(Json(discharged))
}
