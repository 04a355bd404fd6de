//! Domain models for the team portal.

pub mod course;
pub mod monthly_plan;
pub mod participation;
pub mod place;
pub mod task;
pub mod user;
pub mod visitor;

pub use course::{Course, CourseContent};
pub use monthly_plan::{MonthlyPlan, MonthlyPlanHistory, PlanField, PlanFieldValue};
pub use participation::Participation;
pub use place::{Booking, Place, TimeSlot};
pub use task::{Task, TaskKind, TaskStatus};
pub use user::{PortalUser, UserRole};
pub use visitor::{Visitor, VisitorStatus};
