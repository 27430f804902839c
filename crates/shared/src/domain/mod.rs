mod session;

pub use self::session::SessionClaims;
