pub mod attendance;
pub mod auth;
pub mod dashboard;
pub mod feedback;
pub mod materials;
pub mod profiles;
pub mod progress;
pub mod students;
pub mod system;

pub use attendance::AttendanceService;
pub use auth::AuthService;
pub use dashboard::DashboardService;
pub use feedback::FeedbackService;
pub use materials::MaterialService;
pub use profiles::ProfileService;
pub use progress::ProgressService;
pub use students::StudentService;
pub use system::SystemService;
