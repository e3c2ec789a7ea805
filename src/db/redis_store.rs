use async_trait::async_trait;
use redis::{aio::MultiplexedConnection, AsyncCommands, Script};

use crate::{data_types::thread::Thread, traits::ThreadStore};

use super::{Keys, StoreError};

// KEYS[1] = documents hash, KEYS[2] = board recency index
// ARGV[1] = id, ARGV[2] = document, ARGV[3] = score
const INSERT_SCRIPT: &str = r"
if redis.call('HSETNX', KEYS[1], ARGV[1], ARGV[2]) == 0 then
    return 0
end
redis.call('ZADD', KEYS[2], ARGV[3], ARGV[1])
return 1
";

// KEYS[1] = documents hash, KEYS[2] = board recency index
// ARGV[1] = id, ARGV[2] = document, ARGV[3] = score
const REPLACE_SCRIPT: &str = r"
if redis.call('HEXISTS', KEYS[1], ARGV[1]) == 0 then
    return 0
end
redis.call('HSET', KEYS[1], ARGV[1], ARGV[2])
redis.call('ZADD', KEYS[2], ARGV[3], ARGV[1])
return 1
";

// KEYS[1] = documents hash, KEYS[2] = reported set
// ARGV[1] = id
const REPORT_SCRIPT: &str = r"
if redis.call('HEXISTS', KEYS[1], ARGV[1]) == 0 then
    return 0
end
redis.call('SADD', KEYS[2], ARGV[1])
return 1
";

/// Threads live as JSON documents in one hash; each board keeps a sorted set
/// of its thread ids by bump time so listings never scan the hash. Threads
/// bumped in the same millisecond list in reverse lexicographic id order.
///
/// A thread's report flag lives in its own set rather than in the document,
/// so reporting never rewrites the document and cannot race a reply.
pub struct RedisStore {
    // one multiplexed connection for the whole process, cloned per call
    connection: MultiplexedConnection,
    insert_script: Script,
    replace_script: Script,
    report_script: Script,
}

fn score(thread: &Thread) -> i64 {
    thread.bumped_on.timestamp_millis()
}

fn decode(document: &str, reported: bool) -> Result<Thread, StoreError> {
    let mut thread = serde_json::from_str::<Thread>(document)?;
    thread.reported |= reported;
    Ok(thread)
}

impl RedisStore {
    pub async fn connect(url: &str) -> Result<Self, StoreError> {
        let client = redis::Client::open(url)?;
        let connection = client.get_multiplexed_tokio_connection().await?;

        Ok(Self {
            connection,
            insert_script: Script::new(INSERT_SCRIPT),
            replace_script: Script::new(REPLACE_SCRIPT),
            report_script: Script::new(REPORT_SCRIPT),
        })
    }
}

#[async_trait]
impl ThreadStore for RedisStore {
    async fn insert(&self, thread: &Thread) -> Result<(), StoreError> {
        let mut con = self.connection.clone();
        let document = serde_json::to_string(thread)?;

        let mut invocation = self.insert_script.prepare_invoke();
        invocation
            .key(Keys::THREADS_KEY)
            .key(Keys::bumped(&thread.board))
            .arg(&thread.id)
            .arg(document)
            .arg(score(thread));
        let inserted: bool = invocation.invoke_async(&mut con).await?;

        if inserted {
            Ok(())
        } else {
            Err(StoreError::DuplicateId(thread.id.clone()))
        }
    }

    async fn recent(&self, board: &str, limit: usize) -> Result<Vec<Thread>, StoreError> {
        if limit == 0 {
            return Ok(Vec::new());
        }

        let mut con = self.connection.clone();
        let stop = isize::try_from(limit).unwrap_or(isize::MAX) - 1;
        let ids: Vec<String> = con.zrevrange(Keys::bumped(board), 0, stop).await?;
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut pipe = redis::pipe();
        for id in &ids {
            pipe.hget(Keys::THREADS_KEY, id).sismember(Keys::REPORTED_KEY, id);
        }
        let documents: Vec<(Option<String>, bool)> = pipe.query_async(&mut con).await?;

        // an index entry can outlive its document only across a crash; skip it
        documents
            .into_iter()
            .filter_map(|(doc, reported)| doc.map(|doc| decode(&doc, reported)))
            .collect()
    }

    async fn find(&self, id: &str) -> Result<Option<Thread>, StoreError> {
        let mut con = self.connection.clone();
        let (document, reported): (Option<String>, bool) = redis::pipe()
            .hget(Keys::THREADS_KEY, id)
            .sismember(Keys::REPORTED_KEY, id)
            .query_async(&mut con)
            .await?;

        document.map(|doc| decode(&doc, reported)).transpose()
    }

    async fn delete_with_password(&self, id: &str, password: &str) -> Result<bool, StoreError> {
        let Some(thread) = self.find(id).await? else {
            return Ok(false);
        };
        if !thread.password_matches(password) {
            return Ok(false);
        }

        let mut con = self.connection.clone();
        let (removed, _, _): (u32, u32, u32) = redis::pipe()
            .atomic()
            .hdel(Keys::THREADS_KEY, id)
            .zrem(Keys::bumped(&thread.board), id)
            .srem(Keys::REPORTED_KEY, id)
            .query_async(&mut con)
            .await?;

        Ok(removed > 0)
    }

    async fn replace(&self, thread: &Thread) -> Result<(), StoreError> {
        let mut con = self.connection.clone();
        let document = serde_json::to_string(thread)?;

        let mut invocation = self.replace_script.prepare_invoke();
        invocation
            .key(Keys::THREADS_KEY)
            .key(Keys::bumped(&thread.board))
            .arg(&thread.id)
            .arg(document)
            .arg(score(thread));
        let replaced: bool = invocation.invoke_async(&mut con).await?;

        // a thread deleted since it was read stays deleted
        if replaced {
            Ok(())
        } else {
            Err(StoreError::ThreadNotFound(thread.id.clone()))
        }
    }

    async fn mark_reported(&self, id: &str) -> Result<bool, StoreError> {
        let mut con = self.connection.clone();

        let mut invocation = self.report_script.prepare_invoke();
        invocation
            .key(Keys::THREADS_KEY)
            .key(Keys::REPORTED_KEY)
            .arg(id);
        let reported: bool = invocation.invoke_async(&mut con).await?;

        Ok(reported)
    }
}
