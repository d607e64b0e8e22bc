pub mod attendance;
pub mod packages;
pub mod users;

pub use attendance as attendance_entity;
pub use packages as package_entity;
pub use users as user_entity;
pub use users::{MembershipStatus, Role};
