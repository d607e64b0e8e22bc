pub mod email;
pub mod jwt;
pub mod password;
pub mod scan;
pub mod subscription;
pub mod upload;

pub use email::*;
pub use jwt::*;
pub use password::*;
pub use scan::*;
pub use subscription::*;
pub use upload::*;
