use axum::{
    extract::{Path, State},
    response::Redirect,
    Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::{
    data_types::thread::{Thread, ThreadSummary, THREADS_PER_BOARD_PAGE},
    error::{AppError, InputError},
    general_helpers::{current_timestamp, empty_string_as_none, generate_id},
};

use super::{extract::Payload, Ack, AppState};

#[derive(Deserialize)]
pub struct NewThreadBody {
    #[serde(rename = "_id", alias = "id", default, deserialize_with = "empty_string_as_none")]
    id: Option<String>,
    text: String,
    delete_password: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    created_on: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    bumped_on: Option<DateTime<Utc>>,
}

#[derive(Deserialize)]
pub struct DeleteThreadBody {
    thread_id: String,
    delete_password: String,
}

#[derive(Deserialize)]
pub struct ReportThreadBody {
    #[serde(alias = "report_id")]
    thread_id: String,
}

pub async fn create_thread(
    State(state): State<AppState>,
    Path(board): Path<String>,
    Payload(body): Payload<NewThreadBody>,
) -> Result<Redirect, AppError> {
    InputError::require("text", &body.text)?;
    InputError::require("delete_password", &body.delete_password)?;

    let now = current_timestamp();
    let thread = Thread::new(
        body.id.unwrap_or_else(generate_id),
        board.clone(),
        body.text,
        body.delete_password,
        body.created_on.unwrap_or(now),
        body.bumped_on.unwrap_or(now),
    );

    state.store.insert(&thread).await?;
    tracing::info!(thread_id = %thread.id, %board, "thread created");

    Ok(Redirect::to(&format!("/b/{board}/")))
}

pub async fn list_threads(
    State(state): State<AppState>,
    Path(board): Path<String>,
) -> Result<Json<Vec<ThreadSummary>>, AppError> {
    let threads = state.store.recent(&board, THREADS_PER_BOARD_PAGE).await?;

    Ok(Json(threads.iter().map(Thread::summary).collect()))
}

pub async fn delete_thread(
    State(state): State<AppState>,
    Path(board): Path<String>,
    Payload(body): Payload<DeleteThreadBody>,
) -> Result<Ack, AppError> {
    let deleted = state
        .store
        .delete_with_password(&body.thread_id, &body.delete_password)
        .await?;

    // a missing thread and a wrong password answer the same way
    if deleted {
        tracing::info!(thread_id = %body.thread_id, %board, "thread deleted");
        Ok(Ack::Success)
    } else {
        Ok(Ack::IncorrectPassword)
    }
}

pub async fn report_thread(
    State(state): State<AppState>,
    Path(board): Path<String>,
    Payload(body): Payload<ReportThreadBody>,
) -> Result<Ack, AppError> {
    if state.store.mark_reported(&body.thread_id).await? {
        tracing::info!(thread_id = %body.thread_id, %board, "thread reported");
        Ok(Ack::Reported)
    } else {
        tracing::warn!(thread_id = %body.thread_id, %board, "report for unknown thread");
        Ok(Ack::Silent)
    }
}
