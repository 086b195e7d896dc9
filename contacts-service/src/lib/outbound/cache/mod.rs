pub mod memory_session_cache;
pub mod redis_session_cache;

pub use memory_session_cache::InMemorySessionCache;
pub use redis_session_cache::RedisSessionCache;
