use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{data_types::thread::Thread, traits::ThreadStore};

use super::StoreError;

/// In-process store. Documents are kept in insertion order, which is the
/// tie-breaker when two threads share a `bumped_on`.
#[derive(Default)]
pub struct MemoryStore {
    threads: RwLock<Vec<Thread>>,
}

#[async_trait]
impl ThreadStore for MemoryStore {
    async fn insert(&self, thread: &Thread) -> Result<(), StoreError> {
        let mut threads = self.threads.write().await;
        if threads.iter().any(|t| t.id == thread.id) {
            return Err(StoreError::DuplicateId(thread.id.clone()));
        }
        threads.push(thread.clone());
        Ok(())
    }

    async fn recent(&self, board: &str, limit: usize) -> Result<Vec<Thread>, StoreError> {
        let mut threads = self
            .threads
            .read()
            .await
            .iter()
            .filter(|t| t.board == board)
            .cloned()
            .collect::<Vec<_>>();

        threads.sort_by(|left, right| right.bumped_on.cmp(&left.bumped_on));
        threads.truncate(limit);

        Ok(threads)
    }

    async fn find(&self, id: &str) -> Result<Option<Thread>, StoreError> {
        Ok(self.threads.read().await.iter().find(|t| t.id == id).cloned())
    }

    async fn delete_with_password(&self, id: &str, password: &str) -> Result<bool, StoreError> {
        let mut threads = self.threads.write().await;
        match threads
            .iter()
            .position(|t| t.id == id && t.password_matches(password))
        {
            Some(index) => {
                threads.remove(index);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn replace(&self, thread: &Thread) -> Result<(), StoreError> {
        let mut threads = self.threads.write().await;
        let Some(slot) = threads.iter_mut().find(|t| t.id == thread.id) else {
            return Err(StoreError::ThreadNotFound(thread.id.clone()));
        };
        // a report never goes away, even if the writer read before it
        let reported = slot.reported || thread.reported;
        *slot = thread.clone();
        slot.reported = reported;
        Ok(())
    }

    async fn mark_reported(&self, id: &str) -> Result<bool, StoreError> {
        let mut threads = self.threads.write().await;
        match threads.iter_mut().find(|t| t.id == id) {
            Some(thread) => {
                thread.reported = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use super::*;
    use crate::data_types::thread::{tests::thread_at, Reply};

    #[tokio::test]
    async fn duplicate_id_is_rejected() {
        let store = MemoryStore::default();
        let thread = thread_at("a", "tests", Utc::now());
        store.insert(&thread).await.unwrap();

        let err = store.insert(&thread).await.unwrap_err();
        assert!(matches!(err, StoreError::DuplicateId(id) if id == "a"));
    }

    #[tokio::test]
    async fn recent_is_scoped_sorted_and_limited() {
        let store = MemoryStore::default();
        let start = Utc::now();
        for i in 0..12 {
            let thread = thread_at(&format!("t{i}"), "tests", start + Duration::seconds(i));
            store.insert(&thread).await.unwrap();
        }
        store
            .insert(&thread_at("other", "elsewhere", start + Duration::hours(1)))
            .await
            .unwrap();

        let recent = store.recent("tests", 10).await.unwrap();
        let ids: Vec<_> = recent.iter().map(|t| t.id.clone()).collect();
        let expected: Vec<_> = (2..12).rev().map(|i| format!("t{i}")).collect();
        assert_eq!(ids, expected);
    }

    #[tokio::test]
    async fn equal_bumps_keep_insertion_order() {
        let store = MemoryStore::default();
        let now = Utc::now();
        for id in ["first", "second", "third"] {
            store.insert(&thread_at(id, "tests", now)).await.unwrap();
        }

        let recent = store.recent("tests", 10).await.unwrap();
        let ids: Vec<_> = recent.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, ["first", "second", "third"]);
    }

    #[tokio::test]
    async fn delete_requires_matching_password() {
        let store = MemoryStore::default();
        store
            .insert(&thread_at("a", "tests", Utc::now()))
            .await
            .unwrap();

        assert!(!store.delete_with_password("a", "nope").await.unwrap());
        assert!(store.find("a").await.unwrap().is_some());
        assert!(!store.delete_with_password("b", "password").await.unwrap());

        assert!(store.delete_with_password("a", "password").await.unwrap());
        assert!(store.find("a").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn mark_reported_is_idempotent() {
        let store = MemoryStore::default();
        store
            .insert(&thread_at("a", "tests", Utc::now()))
            .await
            .unwrap();

        assert!(store.mark_reported("a").await.unwrap());
        assert!(store.mark_reported("a").await.unwrap());
        assert!(store.find("a").await.unwrap().unwrap().reported);
        assert!(!store.mark_reported("missing").await.unwrap());
    }

    #[tokio::test]
    async fn concurrent_read_modify_write_is_last_writer_wins() {
        let store = MemoryStore::default();
        let now = Utc::now();
        store.insert(&thread_at("a", "tests", now)).await.unwrap();

        let mut first = store.find("a").await.unwrap().unwrap();
        let mut second = store.find("a").await.unwrap().unwrap();
        first.add_reply(Reply::new("r1".into(), "one".into(), "p".into(), now));
        second.add_reply(Reply::new("r2".into(), "two".into(), "p".into(), now));
        store.replace(&first).await.unwrap();
        store.replace(&second).await.unwrap();

        let stored = store.find("a").await.unwrap().unwrap();
        let ids: Vec<_> = stored.replies.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["r2"]);
    }

    #[tokio::test]
    async fn replace_does_not_resurrect_a_deleted_thread() {
        let store = MemoryStore::default();
        store
            .insert(&thread_at("a", "tests", Utc::now()))
            .await
            .unwrap();
        let loaded = store.find("a").await.unwrap().unwrap();

        assert!(store.delete_with_password("a", "password").await.unwrap());
        let err = store.replace(&loaded).await.unwrap_err();
        assert!(matches!(err, StoreError::ThreadNotFound(id) if id == "a"));
        assert!(store.find("a").await.unwrap().is_none());
        assert!(store.recent("tests", 10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn report_survives_a_write_from_an_older_read() {
        let store = MemoryStore::default();
        let now = Utc::now();
        store.insert(&thread_at("a", "tests", now)).await.unwrap();

        let mut loaded = store.find("a").await.unwrap().unwrap();
        assert!(store.mark_reported("a").await.unwrap());
        loaded.add_reply(Reply::new("r".into(), "late".into(), "p".into(), now));
        store.replace(&loaded).await.unwrap();

        let stored = store.find("a").await.unwrap().unwrap();
        assert!(stored.reported);
        assert_eq!(stored.replies.len(), 1);
    }
}
