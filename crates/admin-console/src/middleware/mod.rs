pub mod route_guard;
pub mod session;
pub mod validate;
