pub mod auth;
pub mod history;
pub mod navigator;
pub mod permission_cache;
pub mod role;
pub mod session;

pub use self::auth::{AuthApiClientTrait, DynAuthApiClient};
pub use self::history::{DynHistory, HistoryTrait, NavigationMode};
pub use self::navigator::NavigatorTrait;
pub use self::permission_cache::{DynPermissionCache, PermissionCacheTrait};
pub use self::role::{DynRoleApiClient, RoleApiClientTrait};
pub use self::session::{DynSessionSource, SessionSourceTrait};
