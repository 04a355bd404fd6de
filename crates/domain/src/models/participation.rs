//! Participation share models for monthly team plans.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// A stored participation row.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Participation {
    pub plan_id: Uuid,
    pub member_email: String,
    pub participation_percentage: i32,
    pub month: i32,
    pub year: i32,
    pub updated_at: DateTime<Utc>,
}

/// Request payload for saving participation shares.
///
/// Keys are member emails, values whole percentages.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SaveParticipationRequest {
    pub shares: HashMap<String, i32>,
}

/// Response for participation reads and writes.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ParticipationResponse {
    pub plan_id: Uuid,
    pub total: i32,
    pub shares: Vec<Participation>,
}
