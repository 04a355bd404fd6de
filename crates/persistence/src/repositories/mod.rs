//! Repository implementations for database operations.
//!
//! Repositories provide a clean interface for data access.

pub mod course;
pub mod monthly_plan;
pub mod participation;
pub mod place;
pub mod task;
pub mod user;
pub mod visitor;

pub use course::CourseRepository;
pub use monthly_plan::{MonthlyPlanRepository, NewMonthlyPlan};
pub use participation::ParticipationRepository;
pub use place::{BookingOutcome, NewBooking, PlaceRepository, PlaceValues};
pub use task::{NewTask, TaskFieldChanges, TaskFilter, TaskRepository, TaskScope};
pub use user::UserRepository;
pub use visitor::VisitorRepository;
