pub mod admin;
pub mod audit;
pub mod goals;
pub mod reminders;
pub mod reviews;
pub mod users;

pub use admin::AdminService;
pub use audit::AuditService;
pub use goals::GoalService;
pub use reminders::ReminderService;
pub use reviews::ReviewService;
pub use users::UserService;
