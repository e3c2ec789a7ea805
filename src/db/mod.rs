use std::sync::Arc;

use thiserror::Error;

use crate::{config::StoreBackend, traits::ThreadStore};

pub mod memory;
pub mod redis_store;

pub enum Keys {}

impl Keys {
    pub const THREADS_KEY: &'static str = "threads";
    /// Ids of reported threads.
    pub const REPORTED_KEY: &'static str = "reported_threads";

    /// Sorted set of a board's thread ids, scored by `bumped_on` in milliseconds.
    pub fn bumped(board: &str) -> String {
        format!("bumped:{board}")
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("redis error: {0}")]
    Redis(#[from] redis::RedisError),
    #[error("corrupt thread document: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("thread {0} not found")]
    ThreadNotFound(String),
    #[error("thread id {0} already exists")]
    DuplicateId(String),
}

/// Opens the process-wide store connection.
pub async fn connect(backend: &StoreBackend) -> Result<Arc<dyn ThreadStore>, StoreError> {
    Ok(match backend {
        StoreBackend::Redis(url) => Arc::new(redis_store::RedisStore::connect(url).await?),
        StoreBackend::Memory => Arc::new(memory::MemoryStore::default()),
    })
}
