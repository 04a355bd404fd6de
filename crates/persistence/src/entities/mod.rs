//! Database entity definitions.
//!
//! Entities are direct mappings to database rows.

pub mod course;
pub mod monthly_plan;
pub mod place;
pub mod task;
pub mod user;
pub mod visitor;

pub use course::{CourseContentEntity, CourseEntity};
pub use monthly_plan::{
    MonthlyPlanEntity, MonthlyPlanHistoryEntity, ParticipationEntity, PlanHistoryActionDb,
};
pub use place::{BookingEntity, PlaceEntity};
pub use task::{TaskEntity, TaskKindDb, TaskStatusDb};
pub use user::{TeamEntity, UserEntity, UserRoleDb};
pub use visitor::{VisitorEntity, VisitorStatusDb};
