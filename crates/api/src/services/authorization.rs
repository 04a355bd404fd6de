//! Role and tenancy checks shared by the route handlers.
//!
//! Resources of another company are reported as not found so their
//! existence does not leak across tenants.

use domain::models::{PortalUser, UserRole};
use persistence::repositories::UserRepository;
use uuid::Uuid;

use crate::error::ApiError;

pub fn require_same_company(user: &PortalUser, company_id: Uuid, what: &str) -> Result<(), ApiError> {
    if user.company_id == company_id {
        Ok(())
    } else {
        Err(ApiError::NotFound(format!("{} not found", what)))
    }
}

pub fn require_admin(user: &PortalUser) -> Result<(), ApiError> {
    if user.is_admin() {
        Ok(())
    } else {
        Err(ApiError::Forbidden("Admin role required".to_string()))
    }
}

pub fn require_role(user: &PortalUser, allowed: bool, action: &str) -> Result<(), ApiError> {
    if allowed {
        Ok(())
    } else {
        Err(ApiError::Forbidden(format!(
            "Role {} cannot {}",
            user.role, action
        )))
    }
}

/// Checks that the caller may write plans and participation for a team.
pub fn require_team_manager(user: &PortalUser, team_id: Uuid) -> Result<(), ApiError> {
    if user.can_manage_team(team_id) {
        Ok(())
    } else {
        Err(ApiError::Forbidden(
            "Only the team lead or an admin can change this team's plans".to_string(),
        ))
    }
}

/// Resolves which team a request targets.
///
/// Admins must name a team of their own company; everyone else is pinned to
/// their own team and may only name it.
pub async fn resolve_team(
    users: &UserRepository,
    user: &PortalUser,
    requested: Option<Uuid>,
) -> Result<Uuid, ApiError> {
    if user.role == UserRole::Admin {
        let team_id = requested
            .ok_or_else(|| ApiError::Validation("team_id is required".to_string()))?;
        let team = users
            .find_team(team_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("Team not found".to_string()))?;
        require_same_company(user, team.company_id, "Team")?;
        return Ok(team.id);
    }

    let own = user
        .team_id
        .ok_or_else(|| ApiError::Forbidden("You are not a member of a team".to_string()))?;

    match requested {
        Some(team_id) if team_id != own => {
            Err(ApiError::Forbidden("You can only access your own team".to_string()))
        }
        _ => Ok(own),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn user(role: UserRole, team_id: Option<Uuid>) -> PortalUser {
        PortalUser {
            id: Uuid::new_v4(),
            email: "someone@example.com".to_string(),
            display_name: "Someone".to_string(),
            company_id: Uuid::new_v4(),
            team_id,
            role,
            is_active: true,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_other_company_looks_missing() {
        let u = user(UserRole::Admin, None);
        assert!(require_same_company(&u, u.company_id, "Place").is_ok());
        assert!(matches!(
            require_same_company(&u, Uuid::new_v4(), "Place"),
            Err(ApiError::NotFound(msg)) if msg == "Place not found"
        ));
    }

    #[test]
    fn test_require_admin() {
        assert!(require_admin(&user(UserRole::Admin, None)).is_ok());
        assert!(matches!(
            require_admin(&user(UserRole::TeamLead, Some(Uuid::new_v4()))),
            Err(ApiError::Forbidden(_))
        ));
    }

    #[test]
    fn test_require_role_message() {
        let u = user(UserRole::Student, None);
        match require_role(&u, u.role.can_invite_visitors(), "invite visitors") {
            Err(ApiError::Forbidden(msg)) => assert_eq!(msg, "Role student cannot invite visitors"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_require_team_manager() {
        let team = Uuid::new_v4();
        assert!(require_team_manager(&user(UserRole::TeamLead, Some(team)), team).is_ok());
        assert!(require_team_manager(&user(UserRole::TeamMember, Some(team)), team).is_err());
        assert!(require_team_manager(&user(UserRole::TeamLead, Some(Uuid::new_v4())), team).is_err());
    }
}
