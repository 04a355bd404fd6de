//! History entries for monthly plan changes.
//!
//! Every update and soft delete stores full before/after documents.

use crate::models::monthly_plan::{plan_snapshot, MonthlyPlan, PlanField, PlanHistoryAction};

/// A history row waiting to be written.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryDraft {
    pub action: PlanHistoryAction,
    pub old_snapshot: Option<serde_json::Value>,
    pub new_snapshot: Option<serde_json::Value>,
}

/// Entry for replacing a plan's content.
pub fn update_entry(
    before: &MonthlyPlan,
    month: i32,
    year: i32,
    fields: &[PlanField],
) -> HistoryDraft {
    HistoryDraft {
        action: PlanHistoryAction::Updated,
        old_snapshot: Some(before.snapshot()),
        new_snapshot: Some(plan_snapshot(month, year, fields)),
    }
}

/// Entry for soft-deleting a plan.
pub fn delete_entry(before: &MonthlyPlan) -> HistoryDraft {
    HistoryDraft {
        action: PlanHistoryAction::Deleted,
        old_snapshot: Some(before.snapshot()),
        new_snapshot: None,
    }
}

/// Ids of fields that were added, removed, or changed.
pub fn changed_field_ids(before: &[PlanField], after: &[PlanField]) -> Vec<String> {
    let mut changed: Vec<String> = after
        .iter()
        .filter(|field| before.iter().find(|b| b.id == field.id) != Some(*field))
        .map(|field| field.id.clone())
        .collect();

    changed.extend(
        before
            .iter()
            .filter(|b| !after.iter().any(|a| a.id == b.id))
            .map(|b| b.id.clone()),
    );

    changed
}
