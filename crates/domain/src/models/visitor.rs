//! Visitor invitation domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

use crate::error::DomainError;

/// Where a visitor is in the gate process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VisitorStatus {
    Invited,
    Admitted,
    Discharged,
}

impl VisitorStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VisitorStatus::Invited => "invited",
            VisitorStatus::Admitted => "admitted",
            VisitorStatus::Discharged => "discharged",
        }
    }
}

impl fmt::Display for VisitorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VisitorStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "invited" => Ok(VisitorStatus::Invited),
            "admitted" => Ok(VisitorStatus::Admitted),
            "discharged" => Ok(VisitorStatus::Discharged),
            _ => Err(format!("Invalid visitor status: {}", s)),
        }
    }
}

/// An invited visitor.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Visitor {
    pub id: Uuid,
    pub company_id: Uuid,
    pub name: String,
    pub nic: Option<String>,
    pub pass_id: Option<String>,
    pub status: VisitorStatus,
    pub invited_by: Uuid,
    pub visit_date: Option<chrono::NaiveDate>,
    pub admit_time: Option<DateTime<Utc>>,
    pub discharged_time: Option<DateTime<Utc>>,
    pub discharge_reason: Option<String>,
    pub comments: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Request payload for inviting a visitor.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateVisitorRequest {
    #[validate(
        length(min = 1, max = 200, message = "Name must be between 1 and 200 characters"),
        custom(function = "shared::validation::validate_not_blank")
    )]
    pub name: String,

    #[validate(length(max = 50, message = "NIC must be at most 50 characters"))]
    pub nic: Option<String>,

    pub visit_date: Option<chrono::NaiveDate>,
}

/// Request payload for admitting a visitor at the gate.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct AdmitVisitorRequest {
    #[validate(length(max = 50, message = "Pass id must be at most 50 characters"))]
    pub pass_id: Option<String>,

    /// Overrides the NIC given at invitation time.
    #[validate(length(max = 50, message = "NIC must be at most 50 characters"))]
    pub nic: Option<String>,
}

/// Request payload for discharging a visitor.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct DischargeVisitorRequest {
    #[validate(length(max = 500, message = "Reason must be at most 500 characters"))]
    pub discharge_reason: Option<String>,

    #[validate(length(max = 2000, message = "Comments must be at most 2000 characters"))]
    pub comments: Option<String>,
}

/// Query parameters for listing visitors.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListVisitorsQuery {
    pub status: Option<VisitorStatus>,
}

/// Response wrapper for visitor listings.
#[derive(Debug, Clone, Serialize)]
pub struct ListVisitorsResponse {
    pub data: Vec<Visitor>,
}

/// Values written when a visitor is admitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Admission {
    pub pass_id: String,
    pub nic: String,
}

/// Values written when a visitor is discharged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Discharge {
    pub discharge_reason: String,
    pub comments: String,
}

fn required(value: Option<&str>, what: &str) -> Result<String, DomainError> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(DomainError::Validation(format!("{} is required", what))),
    }
}

/// Checks the admit gate. An invited visitor needs a pass id and a NIC,
/// taken from the request or from the invitation.
pub fn admit(visitor: &Visitor, req: &AdmitVisitorRequest) -> Result<Admission, DomainError> {
    if visitor.status != VisitorStatus::Invited {
        return Err(DomainError::InvalidTransition {
            from: visitor.status.to_string(),
            to: VisitorStatus::Admitted.to_string(),
        });
    }

    let pass_id = required(req.pass_id.as_deref(), "Pass id")?;
    let nic = required(req.nic.as_deref().or(visitor.nic.as_deref()), "NIC")?;

    Ok(Admission { pass_id, nic })
}

/// Checks the discharge gate. Only admitted visitors leave.
pub fn discharge(
    visitor: &Visitor,
    req: &DischargeVisitorRequest,
) -> Result<Discharge, DomainError> {
    if visitor.status != VisitorStatus::Admitted {
        return Err(DomainError::InvalidTransition {
            from: visitor.status.to_string(),
            to: VisitorStatus::Discharged.to_string(),
        });
    }

    Ok(Discharge {
        discharge_reason: required(req.discharge_reason.as_deref(), "Discharge reason")?,
        comments: required(req.comments.as_deref(), "Comments")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn visitor(status: VisitorStatus, nic: Option<&str>) -> Visitor {
        Visitor {
            id: Uuid::new_v4(),
            company_id: Uuid::new_v4(),
            name: "Dana Guest".to_string(),
            nic: nic.map(str::to_string),
            pass_id: None,
            status,
            invited_by: Uuid::new_v4(),
            visit_date: None,
            admit_time: None,
            discharged_time: None,
            discharge_reason: None,
            comments: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_admit_requires_pass_and_nic() {
        let v = visitor(VisitorStatus::Invited, None);

        let missing_pass = AdmitVisitorRequest {
            pass_id: None,
            nic: Some("901234567V".into()),
        };
        assert!(matches!(admit(&v, &missing_pass), Err(DomainError::Validation(_))));

        let missing_nic = AdmitVisitorRequest {
            pass_id: Some("P-12".into()),
            nic: Some("   ".into()),
        };
        assert!(matches!(admit(&v, &missing_nic), Err(DomainError::Validation(_))));
    }

    #[test]
    fn test_admit_falls_back_to_invitation_nic() {
        let v = visitor(VisitorStatus::Invited, Some("901234567V"));
        let req = AdmitVisitorRequest {
            pass_id: Some(" P-12 ".into()),
            nic: None,
        };

        let admission = admit(&v, &req).unwrap();
        assert_eq!(admission.pass_id, "P-12");
        assert_eq!(admission.nic, "901234567V");
    }

    #[test]
    fn test_admit_only_from_invited() {
        let v = visitor(VisitorStatus::Admitted, Some("X"));
        let req = AdmitVisitorRequest {
            pass_id: Some("P".into()),
            nic: None,
        };
        assert!(matches!(
            admit(&v, &req),
            Err(DomainError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn test_discharge_requires_reason_and_comments() {
        let v = visitor(VisitorStatus::Admitted, Some("X"));

        let req = DischargeVisitorRequest {
            discharge_reason: Some("Meeting over".into()),
            comments: None,
        };
        assert!(matches!(discharge(&v, &req), Err(DomainError::Validation(_))));

        let req = DischargeVisitorRequest {
            discharge_reason: Some("Meeting over".into()),
            comments: Some("Returned pass".into()),
        };
        assert!(discharge(&v, &req).is_ok());
    }

    #[test]
    fn test_discharge_requires_admitted() {
        let req = DischargeVisitorRequest {
            discharge_reason: Some("r".into()),
            comments: Some("c".into()),
        };
        for status in [VisitorStatus::Invited, VisitorStatus::Discharged] {
            let v = visitor(status, None);
            assert!(discharge(&v, &req).is_err());
        }
    }

    #[test]
    fn test_status_round_trip_strings() {
        assert_eq!("admitted".parse::<VisitorStatus>(), Ok(VisitorStatus::Admitted));
        assert!("gone".parse::<VisitorStatus>().is_err());
        assert!(VisitorStatus::Invited < VisitorStatus::Discharged);
    }
}
