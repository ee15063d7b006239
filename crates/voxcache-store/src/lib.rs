#![doc = include_str!(concat!(env!("OUT_DIR"), "/README_GENERATED.md"))]
#![deny(unused_crate_dependencies)]

pub mod factory;
pub mod memory;
#[cfg(feature = "redis")]
pub mod redis_store;

pub use factory::connect_store;
pub use memory::MemoryAudioStore;
#[cfg(feature = "redis")]
pub use redis_store::RedisAudioStore;
