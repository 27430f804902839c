pub mod permission;
pub mod requests;
pub mod response;
pub mod session;

pub use self::permission::{Permission, PermissionRecord, PermissionSet, Requirement};
pub use self::session::SessionUser;
