//! Caller identity endpoints.

use axum::{extract::State, Json};
use domain::models::user::{PortalUser, TeamMemberSummary, TeamMembersResponse};
use persistence::repositories::UserRepository;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::CurrentUser;

/// Returns the resolved caller.
///
/// GET /api/v1/me
pub async fn get_me(CurrentUser(user): CurrentUser) -> Json<PortalUser> {
    Json(user)
}

/// Lists the active members of the caller's team.
///
/// GET /api/v1/me/team
pub async fn get_my_team(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<TeamMembersResponse>, ApiError> {
    let team_id = user
        .team_id
        .ok_or_else(|| ApiError::NotFound("You are not a member of a team".to_string()))?;

    let members = UserRepository::new(state.pool.clone())
        .list_team_members(team_id)
        .await?
        .into_iter()
        .map(TeamMemberSummary::from)
        .collect();

    Ok(Json(TeamMembersResponse { team_id, members }))
}
