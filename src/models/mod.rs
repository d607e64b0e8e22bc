pub mod attendance;
pub mod member;
pub mod package;
pub mod pagination;
pub mod report;
pub mod user;

pub use attendance::*;
pub use member::*;
pub use package::*;
pub use pagination::*;
pub use report::*;
pub use user::*;
