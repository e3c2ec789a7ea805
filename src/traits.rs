use async_trait::async_trait;

use crate::{data_types::thread::Thread, db::StoreError};

/// Document store holding one collection of thread documents.
///
/// Every call is a single logical document operation. Read-modify-write
/// sequences built on top of `find` + `replace` are last-writer-wins for the
/// replies they carry.
#[async_trait]
pub trait ThreadStore: Send + Sync {
    /// Fails with [`StoreError::DuplicateId`] if the id is taken.
    async fn insert(&self, thread: &Thread) -> Result<(), StoreError>;

    /// Threads of `board`, most recently bumped first.
    async fn recent(&self, board: &str, limit: usize) -> Result<Vec<Thread>, StoreError>;

    async fn find(&self, id: &str) -> Result<Option<Thread>, StoreError>;

    /// Removes the thread only when both id and password match.
    async fn delete_with_password(&self, id: &str, password: &str) -> Result<bool, StoreError>;

    /// Overwrites the whole document. Fails with [`StoreError::ThreadNotFound`]
    /// if the thread was deleted meanwhile. A thread's report flag is sticky
    /// and survives a write from a copy read before the report.
    async fn replace(&self, thread: &Thread) -> Result<(), StoreError>;

    /// Returns `false` when no thread has this id.
    async fn mark_reported(&self, id: &str) -> Result<bool, StoreError>;
}
