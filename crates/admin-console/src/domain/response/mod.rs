mod api;
mod navigation;
mod permission;
mod session;

pub use self::api::{ApiResponse, LoginData, RolePermissionsData};
pub use self::navigation::{NavigationResponse, PageResponse};
pub use self::permission::{CheckPermissionResponse, PermissionsResponse};
pub use self::session::{SessionError, SessionResponse};
