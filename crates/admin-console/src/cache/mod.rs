mod memory;
mod redis;

pub use self::memory::MemoryPermissionCache;
pub use self::redis::RedisPermissionCache;
