use axum::{
    extract::{Path, State},
    response::Html,
};

use crate::{
    data_types::thread::{Thread, THREADS_PER_BOARD_PAGE},
    error::HtmlResult,
};

use super::{replies::load_thread, AppState};

pub async fn index(State(state): State<AppState>) -> HtmlResult {
    Ok(Html(
        state.tera.render("index.tera.html", &state.tera_context)?,
    ))
}

pub async fn board(State(state): State<AppState>, Path(board): Path<String>) -> HtmlResult {
    let threads = state.store.recent(&board, THREADS_PER_BOARD_PAGE).await?;
    let threads = threads.iter().map(Thread::summary).collect::<Vec<_>>();

    let mut context = state.tera_context.clone();
    context.insert("board", &board);
    context.insert("threads", &threads);

    let html = state.tera.render("board.tera.html", &context)?;

    Ok(Html(html))
}

pub async fn thread(
    State(state): State<AppState>,
    Path((board, thread_id)): Path<(String, String)>,
) -> HtmlResult {
    let thread = load_thread(state.store.as_ref(), &thread_id).await?;

    let mut context = state.tera_context.clone();
    context.insert("board", &board);
    context.insert("thread", &thread.view());

    let html = state.tera.render("thread.tera.html", &context)?;

    Ok(Html(html))
}
