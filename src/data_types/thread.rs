use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Threads returned by a board listing.
pub const THREADS_PER_BOARD_PAGE: usize = 10;
/// Replies previewed under each thread of a board listing.
pub const REPLY_PREVIEW_COUNT: usize = 3;
pub const DELETED_REPLY_TEXT: &str = "[deleted]";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Reply {
    #[serde(rename = "_id")]
    pub id: String,
    pub text: String,
    pub created_on: DateTime<Utc>,
    pub delete_password: String,
    #[serde(default)]
    pub reported: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Thread {
    #[serde(rename = "_id")]
    pub id: String,
    pub board: String,
    pub text: String,
    pub created_on: DateTime<Utc>,
    pub bumped_on: DateTime<Utc>,
    #[serde(default)]
    pub reported: bool,
    pub delete_password: String,
    #[serde(default)]
    pub replies: Vec<Reply>,
}

/// Outcome of a password-gated reply deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyDeletion {
    Tombstoned,
    IncorrectPassword,
    NoSuchReply,
}

/// A reply as readers see it.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ReplyView {
    #[serde(rename = "_id")]
    pub id: String,
    pub text: String,
    pub created_on: DateTime<Utc>,
}

/// A thread as it appears in a board listing: truncated replies plus the real count.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ThreadSummary {
    #[serde(rename = "_id")]
    pub id: String,
    pub board: String,
    pub text: String,
    pub created_on: DateTime<Utc>,
    pub bumped_on: DateTime<Utc>,
    pub replies: Vec<ReplyView>,
    pub replycount: usize,
}

/// A single thread with every reply.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ThreadView {
    #[serde(rename = "_id")]
    pub id: String,
    pub board: String,
    pub text: String,
    pub created_on: DateTime<Utc>,
    pub bumped_on: DateTime<Utc>,
    pub replies: Vec<ReplyView>,
}

impl Reply {
    pub fn new(
        id: String,
        text: String,
        delete_password: String,
        created_on: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            text,
            created_on,
            delete_password,
            reported: false,
        }
    }

    pub fn view(&self) -> ReplyView {
        ReplyView {
            id: self.id.clone(),
            text: self.text.clone(),
            created_on: self.created_on,
        }
    }
}

impl Thread {
    pub fn new(
        id: String,
        board: String,
        text: String,
        delete_password: String,
        created_on: DateTime<Utc>,
        bumped_on: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            board,
            text,
            created_on,
            bumped_on,
            reported: false,
            delete_password,
            replies: Vec::new(),
        }
    }

    /// Plain equality: the stored secret is the plaintext the poster chose.
    pub fn password_matches(&self, candidate: &str) -> bool {
        self.delete_password == candidate
    }

    /// Appends a reply and bumps the thread to the reply's timestamp.
    pub fn add_reply(&mut self, reply: Reply) {
        self.bumped_on = reply.created_on;
        self.replies.push(reply);
    }

    pub fn delete_reply(&mut self, reply_id: &str, password: &str) -> ReplyDeletion {
        match self.replies.iter_mut().find(|reply| reply.id == reply_id) {
            Some(reply) if reply.delete_password == password => {
                reply.text = DELETED_REPLY_TEXT.to_owned();
                ReplyDeletion::Tombstoned
            }
            Some(_) => ReplyDeletion::IncorrectPassword,
            None => ReplyDeletion::NoSuchReply,
        }
    }

    /// Flags a reply regardless of its tombstone state. Returns whether it was found.
    pub fn report_reply(&mut self, reply_id: &str) -> bool {
        match self.replies.iter_mut().find(|reply| reply.id == reply_id) {
            Some(reply) => {
                reply.reported = true;
                true
            }
            None => false,
        }
    }

    pub fn summary(&self) -> ThreadSummary {
        let skip = self.replies.len().saturating_sub(REPLY_PREVIEW_COUNT);

        ThreadSummary {
            id: self.id.clone(),
            board: self.board.clone(),
            text: self.text.clone(),
            created_on: self.created_on,
            bumped_on: self.bumped_on,
            replies: self.replies[skip..].iter().map(Reply::view).collect(),
            replycount: self.replies.len(),
        }
    }

    pub fn view(&self) -> ThreadView {
        ThreadView {
            id: self.id.clone(),
            board: self.board.clone(),
            text: self.text.clone(),
            created_on: self.created_on,
            bumped_on: self.bumped_on,
            replies: self.replies.iter().map(Reply::view).collect(),
        }
    }
}
