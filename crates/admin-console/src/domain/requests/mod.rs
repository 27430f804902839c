mod auth;
mod permission;

pub use self::auth::LoginRequest;
pub use self::permission::CheckPermissionRequest;
