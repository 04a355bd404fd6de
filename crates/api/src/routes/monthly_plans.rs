//! Monthly team plan endpoint handlers, including participation shares
//! and change history.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use domain::models::monthly_plan::{
    normalize_fields, CreateMonthlyPlanRequest, ListMonthlyPlansQuery, ListMonthlyPlansResponse,
    MonthlyPlan, MonthlyPlanHistory, PlanHistoryResponse, UpdateMonthlyPlanRequest,
};
use domain::models::participation::{
    Participation, ParticipationResponse, SaveParticipationRequest,
};
use domain::models::PortalUser;
use domain::services::participation::ParticipationLedger;
use persistence::repositories::{
    MonthlyPlanRepository, NewMonthlyPlan, ParticipationRepository, UserRepository,
};
use std::collections::{HashMap, HashSet};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::CurrentUser;
use crate::middleware::metrics::record_plan_history;
use crate::services::authorization::{require_same_company, require_team_manager, resolve_team};

fn require_plan_reader(user: &PortalUser, plan: &MonthlyPlan) -> Result<(), ApiError> {
    require_same_company(user, plan.company_id, "Monthly plan")?;
    if user.is_admin() || user.team_id == Some(plan.team_id) {
        Ok(())
    } else {
        Err(ApiError::NotFound("Monthly plan not found".to_string()))
    }
}

async fn load_active_plan(
    repo: &MonthlyPlanRepository,
    user: &PortalUser,
    plan_id: Uuid,
) -> Result<MonthlyPlan, ApiError> {
    let plan: MonthlyPlan = repo
        .find_active(plan_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Monthly plan not found".to_string()))?
        .into();
    require_plan_reader(user, &plan)?;
    Ok(plan)
}

/// Builds a ledger whose members all belong to the team.
async fn checked_ledger(
    users: &UserRepository,
    team_id: Uuid,
    shares: HashMap<String, i32>,
) -> Result<ParticipationLedger, ApiError> {
    let ledger = ParticipationLedger::new(shares)?;
    let roster: HashSet<String> = users.team_roster_emails(team_id).await?.into_iter().collect();
    ledger.ensure_members_within(&roster)?;
    Ok(ledger)
}

fn participation_response(plan_id: Uuid, shares: Vec<Participation>) -> ParticipationResponse {
    ParticipationResponse {
        plan_id,
        total: shares.iter().map(|s| s.participation_percentage).sum(),
        shares,
    }
}

/// Create a monthly plan, optionally with participation shares.
///
/// POST /api/v1/monthly-plans
pub async fn create_plan(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(request): Json<CreateMonthlyPlanRequest>,
) -> Result<(StatusCode, Json<MonthlyPlan>), ApiError> {
    request.validate()?;

    let users = UserRepository::new(state.pool.clone());
    let team_id = resolve_team(&users, &user, request.team_id).await?;
    require_team_manager(&user, team_id)?;

    let fields = normalize_fields(request.fields)?;
    let ledger = match request.participation {
        Some(shares) => Some(checked_ledger(&users, team_id, shares).await?),
        None => None,
    };

    let plan: MonthlyPlan = MonthlyPlanRepository::new(state.pool.clone())
        .create(
            NewMonthlyPlan {
                team_id,
                company_id: user.company_id,
                month: request.month,
                year: request.year,
                fields: &fields,
                created_by: user.id,
            },
            ledger.as_ref(),
        )
        .await?
        .into();

    info!(
        plan_id = %plan.id,
        team_id = %team_id,
        user_id = %user.id,
        with_participation = ledger.is_some(),
        "Monthly plan created"
    );

    Ok((StatusCode::CREATED, Json(plan)))
}

/// List active plans of a team.
///
/// GET /api/v1/monthly-plans
pub async fn list_plans(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(query): Query<ListMonthlyPlansQuery>,
) -> Result<Json<ListMonthlyPlansResponse>, ApiError> {
    // Admins may list across teams; everyone else sees their own team.
    let team_id = if user.is_admin() {
        query.team_id
    } else {
        let users = UserRepository::new(state.pool.clone());
        Some(resolve_team(&users, &user, query.team_id).await?)
    };

    let data = MonthlyPlanRepository::new(state.pool.clone())
        .list_active(user.company_id, team_id, query.month, query.year)
        .await?
        .into_iter()
        .map(MonthlyPlan::from)
        .collect();

    Ok(Json(ListMonthlyPlansResponse { data }))
}

/// Fetch an active plan.
///
/// GET /api/v1/monthly-plans/:plan_id
pub async fn get_plan(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(plan_id): Path<Uuid>,
) -> Result<Json<MonthlyPlan>, ApiError> {
    let repo = MonthlyPlanRepository::new(state.pool.clone());
    let plan = load_active_plan(&repo, &user, plan_id).await?;
    Ok(Json(plan))
}

/// Replace a plan's fields, recording the before/after snapshot.
///
/// PUT /api/v1/monthly-plans/:plan_id
pub async fn update_plan(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(plan_id): Path<Uuid>,
    Json(request): Json<UpdateMonthlyPlanRequest>,
) -> Result<Json<MonthlyPlan>, ApiError> {
    request.validate()?;

    let repo = MonthlyPlanRepository::new(state.pool.clone());
    let plan = load_active_plan(&repo, &user, plan_id).await?;
    require_team_manager(&user, plan.team_id)?;

    let fields = normalize_fields(request.fields)?;

    let updated: MonthlyPlan = repo
        .update(plan_id, request.month, request.year, &fields, user.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Monthly plan not found".to_string()))?
        .into();

    record_plan_history("updated");
    info!(plan_id = %plan_id, user_id = %user.id, "Monthly plan updated");

    Ok(Json(updated))
}

/// Soft-delete a plan, recording its last content.
///
/// DELETE /api/v1/monthly-plans/:plan_id
pub async fn delete_plan(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(plan_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let repo = MonthlyPlanRepository::new(state.pool.clone());
    let plan = load_active_plan(&repo, &user, plan_id).await?;
    require_team_manager(&user, plan.team_id)?;

    if !repo.soft_delete(plan_id, user.id).await? {
        return Err(ApiError::NotFound("Monthly plan not found".to_string()));
    }

    record_plan_history("deleted");
    info!(plan_id = %plan_id, user_id = %user.id, "Monthly plan deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// Change history of a plan, newest first. Available after deletion.
///
/// GET /api/v1/monthly-plans/:plan_id/history
pub async fn get_plan_history(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(plan_id): Path<Uuid>,
) -> Result<Json<PlanHistoryResponse>, ApiError> {
    let repo = MonthlyPlanRepository::new(state.pool.clone());
    let plan: MonthlyPlan = repo
        .find_any(plan_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Monthly plan not found".to_string()))?
        .into();
    require_plan_reader(&user, &plan)?;

    let data = repo
        .history(plan_id)
        .await?
        .into_iter()
        .map(MonthlyPlanHistory::from)
        .collect();

    Ok(Json(PlanHistoryResponse { plan_id, data }))
}

/// Replace the participation shares of a plan. Shares must total 100.
///
/// PUT /api/v1/monthly-plans/:plan_id/participation
pub async fn save_participation(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(plan_id): Path<Uuid>,
    Json(request): Json<SaveParticipationRequest>,
) -> Result<Json<ParticipationResponse>, ApiError> {
    let plan = load_active_plan(
        &MonthlyPlanRepository::new(state.pool.clone()),
        &user,
        plan_id,
    )
    .await?;
    require_team_manager(&user, plan.team_id)?;

    let users = UserRepository::new(state.pool.clone());
    let ledger = checked_ledger(&users, plan.team_id, request.shares).await?;

    let shares: Vec<Participation> = ParticipationRepository::new(state.pool.clone())
        .save(plan.id, &ledger)
        .await?
        .ok_or_else(|| ApiError::NotFound("Monthly plan not found".to_string()))?
        .into_iter()
        .map(Participation::from)
        .collect();

    info!(
        plan_id = %plan_id,
        members = ledger.shares().count(),
        user_id = %user.id,
        "Participation saved"
    );

    Ok(Json(participation_response(plan_id, shares)))
}

/// Current participation shares of a plan.
///
/// GET /api/v1/monthly-plans/:plan_id/participation
pub async fn get_participation(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(plan_id): Path<Uuid>,
) -> Result<Json<ParticipationResponse>, ApiError> {
    load_active_plan(
        &MonthlyPlanRepository::new(state.pool.clone()),
        &user,
        plan_id,
    )
    .await?;

    let shares = ParticipationRepository::new(state.pool.clone())
        .list_for_plan(plan_id)
        .await?
        .into_iter()
        .map(Participation::from)
        .collect();

    Ok(Json(participation_response(plan_id, shares)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use domain::models::UserRole;

    fn plan(company_id: Uuid, team_id: Uuid) -> MonthlyPlan {
        MonthlyPlan {
            id: Uuid::new_v4(),
            team_id,
            company_id,
            month: 6,
            year: 2024,
            fields: vec![],
            is_active: true,
            created_by: Uuid::new_v4(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn user(role: UserRole, company_id: Uuid, team_id: Option<Uuid>) -> PortalUser {
        PortalUser {
            id: Uuid::new_v4(),
            email: "someone@example.com".to_string(),
            display_name: "Someone".to_string(),
            company_id,
            team_id,
            role,
            is_active: true,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_plan_readers() {
        let company = Uuid::new_v4();
        let team = Uuid::new_v4();
        let p = plan(company, team);

        assert!(require_plan_reader(&user(UserRole::TeamMember, company, Some(team)), &p).is_ok());
        assert!(require_plan_reader(&user(UserRole::Admin, company, None), &p).is_ok());
        assert!(require_plan_reader(&user(UserRole::TeamMember, company, Some(Uuid::new_v4())), &p).is_err());
        assert!(require_plan_reader(&user(UserRole::Admin, Uuid::new_v4(), None), &p).is_err());
    }

    #[test]
    fn test_participation_response_total() {
        let plan_id = Uuid::new_v4();
        let share = |email: &str, pct: i32| Participation {
            plan_id,
            member_email: email.to_string(),
            participation_percentage: pct,
            month: 6,
            year: 2024,
            updated_at: Utc::now(),
        };

        let response = participation_response(plan_id, vec![share("a@x.io", 70), share("b@x.io", 30)]);
        assert_eq!(response.total, 100);
        assert_eq!(response.shares.len(), 2);

        assert_eq!(participation_response(plan_id, vec![]).total, 0);
    }
}
