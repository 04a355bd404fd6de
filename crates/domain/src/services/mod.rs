//! Domain services for the team portal.
//!
//! Services contain business rules that operate on domain models and
//! never touch storage.

pub mod free_slots;
pub mod lifecycle;
pub mod participation;
pub mod plan_history;

pub use free_slots::{fits_in_free_slot, free_slots, free_slots_for_date};
pub use lifecycle::{check_field_update, ensure_mutable, plan_transition, task_access, StatusChange, TaskAccess};
pub use participation::{ParticipationLedger, REQUIRED_TOTAL};
pub use plan_history::{changed_field_ids, delete_entry, update_entry, HistoryDraft};
