mod jwt;
mod redis;

pub use self::jwt::JwtConfig;
pub use self::redis::{RedisClient, RedisConfig};
