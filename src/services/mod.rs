pub mod attendance_service;
pub mod auth_service;
pub mod member_service;
pub mod package_service;
pub mod report_service;
pub mod user_service;

pub use attendance_service::*;
pub use auth_service::*;
pub use member_service::*;
pub use package_service::*;
pub use report_service::*;
pub use user_service::*;
