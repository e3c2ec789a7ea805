use axum::{
    extract::{Path, Query, State},
    response::Redirect,
    Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::{
    data_types::thread::{Reply, ReplyDeletion, Thread, ThreadView},
    db::StoreError,
    error::{AppError, InputError},
    general_helpers::{current_timestamp, empty_string_as_none, generate_id},
    traits::ThreadStore,
};

use super::{extract::Payload, Ack, AppState};

#[derive(Deserialize)]
pub struct NewReplyBody {
    thread_id: String,
    #[serde(rename = "_id", alias = "id", default, deserialize_with = "empty_string_as_none")]
    id: Option<String>,
    text: String,
    delete_password: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    created_on: Option<DateTime<Utc>>,
}

#[derive(Deserialize)]
pub struct ThreadQuery {
    thread_id: String,
}

#[derive(Deserialize)]
pub struct DeleteReplyBody {
    thread_id: String,
    reply_id: String,
    delete_password: String,
}

#[derive(Deserialize)]
pub struct ReportReplyBody {
    thread_id: String,
    reply_id: String,
}

pub(super) async fn load_thread(store: &dyn ThreadStore, id: &str) -> Result<Thread, StoreError> {
    store
        .find(id)
        .await?
        .ok_or_else(|| StoreError::ThreadNotFound(id.to_owned()))
}

pub async fn create_reply(
    State(state): State<AppState>,
    Path(board): Path<String>,
    Payload(body): Payload<NewReplyBody>,
) -> Result<Redirect, AppError> {
    InputError::require("text", &body.text)?;
    InputError::require("delete_password", &body.delete_password)?;

    let mut thread = load_thread(state.store.as_ref(), &body.thread_id).await?;

    let reply = Reply::new(
        body.id.unwrap_or_else(generate_id),
        body.text,
        body.delete_password,
        body.created_on.unwrap_or_else(current_timestamp),
    );
    let reply_id = reply.id.clone();
    thread.add_reply(reply);

    state.store.replace(&thread).await?;
    tracing::info!(thread_id = %thread.id, %reply_id, %board, "reply created");

    Ok(Redirect::to(&format!("/b/{board}/{}", thread.id)))
}

pub async fn get_thread(
    State(state): State<AppState>,
    Query(query): Query<ThreadQuery>,
) -> Result<Json<ThreadView>, AppError> {
    let thread = load_thread(state.store.as_ref(), &query.thread_id).await?;

    Ok(Json(thread.view()))
}

pub async fn delete_reply(
    State(state): State<AppState>,
    Path(board): Path<String>,
    Payload(body): Payload<DeleteReplyBody>,
) -> Result<Ack, AppError> {
    let mut thread = load_thread(state.store.as_ref(), &body.thread_id).await?;

    match thread.delete_reply(&body.reply_id, &body.delete_password) {
        ReplyDeletion::Tombstoned => {
            state.store.replace(&thread).await?;
            tracing::info!(thread_id = %thread.id, reply_id = %body.reply_id, %board, "reply deleted");
            Ok(Ack::Success)
        }
        ReplyDeletion::IncorrectPassword => Ok(Ack::IncorrectPassword),
        ReplyDeletion::NoSuchReply => {
            tracing::warn!(thread_id = %thread.id, reply_id = %body.reply_id, %board, "delete for unknown reply");
            Ok(Ack::Silent)
        }
    }
}

/// Never fails: lookup and store errors are logged and the caller gets no body.
pub async fn report_reply(
    State(state): State<AppState>,
    Path(board): Path<String>,
    Payload(body): Payload<ReportReplyBody>,
) -> Ack {
    let reported = async {
        let mut thread = load_thread(state.store.as_ref(), &body.thread_id).await?;
        if !thread.report_reply(&body.reply_id) {
            return Ok::<_, StoreError>(false);
        }
        state.store.replace(&thread).await?;
        Ok(true)
    }
    .await;

    match reported {
        Ok(true) => {
            tracing::info!(thread_id = %body.thread_id, reply_id = %body.reply_id, %board, "reply reported");
            Ack::Reported
        }
        Ok(false) => {
            tracing::warn!(thread_id = %body.thread_id, reply_id = %body.reply_id, %board, "report for unknown reply");
            Ack::Silent
        }
        Err(err) => {
            tracing::error!(thread_id = %body.thread_id, reply_id = %body.reply_id, "failed to report reply: {err}");
            Ack::Silent
        }
    }
}
