//! Portal user and role models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Role a portal user signs in with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Admin,
    TeamLead,
    TeamMember,
    Student,
    /// Reception tablet running in kiosk mode.
    Tablet,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::TeamLead => "team_lead",
            UserRole::TeamMember => "team_member",
            UserRole::Student => "student",
            UserRole::Tablet => "tablet",
        }
    }

    /// Returns true if this role belongs to a team and works on tasks.
    pub fn works_on_tasks(&self) -> bool {
        matches!(self, UserRole::TeamLead | UserRole::TeamMember)
    }

    /// Returns true if this role may create visitor invitations.
    pub fn can_invite_visitors(&self) -> bool {
        matches!(
            self,
            UserRole::Admin | UserRole::TeamLead | UserRole::TeamMember
        )
    }

    /// Returns true if this role operates the admit/discharge gate.
    pub fn can_operate_gate(&self) -> bool {
        matches!(self, UserRole::Admin | UserRole::Tablet)
    }
}

impl FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "admin" => Ok(UserRole::Admin),
            "team_lead" => Ok(UserRole::TeamLead),
            "team_member" => Ok(UserRole::TeamMember),
            "student" => Ok(UserRole::Student),
            "tablet" => Ok(UserRole::Tablet),
            _ => Err(format!("Invalid user role: {}", s)),
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A user resolved from a session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct PortalUser {
    pub id: Uuid,
    pub email: String,
    pub display_name: String,
    pub company_id: Uuid,
    pub team_id: Option<Uuid>,
    pub role: UserRole,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl PortalUser {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    /// Returns true if this user leads the given team.
    pub fn leads_team(&self, team_id: Uuid) -> bool {
        self.role == UserRole::TeamLead && self.team_id == Some(team_id)
    }

    /// Returns true if this user can manage plans and tasks of the given team.
    ///
    /// The caller is responsible for checking that the team belongs to the
    /// user's company when the user is an admin.
    pub fn can_manage_team(&self, team_id: Uuid) -> bool {
        self.is_admin() || self.leads_team(team_id)
    }
}

/// Team member entry for the caller's team listing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct TeamMemberSummary {
    pub id: Uuid,
    pub email: String,
    pub display_name: String,
    pub role: UserRole,
}

/// Response for the team listing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct TeamMembersResponse {
    pub team_id: Uuid,
    pub members: Vec<TeamMemberSummary>,
}
