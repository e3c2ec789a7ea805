use std::sync::Arc;

use axum::{
    handler::HandlerWithoutStateExt,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::traits::ThreadStore;

mod extract;
mod pages;
mod replies;
mod threads;

pub struct AppContext {
    pub tera: tera::Tera,
    pub tera_context: tera::Context,
    pub store: Arc<dyn ThreadStore>,
}

type AppState = &'static AppContext;

/// Plain-text acknowledgements of the moderation endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ack {
    Success,
    IncorrectPassword,
    Reported,
    /// The target was not found: nothing is written back to the caller.
    Silent,
}

impl IntoResponse for Ack {
    fn into_response(self) -> Response {
        match self {
            Ack::Success => "success".into_response(),
            Ack::IncorrectPassword => "incorrect password".into_response(),
            Ack::Reported => "reported".into_response(),
            Ack::Silent => StatusCode::NO_CONTENT.into_response(),
        }
    }
}

/// Builds the template set compiled into the binary.
pub fn load_templates() -> tera::Result<tera::Tera> {
    let mut tera = tera::Tera::default();
    tera.add_raw_templates(vec![
        ("base.tera.html", include_str!("../../views/base.tera.html")),
        ("index.tera.html", include_str!("../../views/index.tera.html")),
        ("board.tera.html", include_str!("../../views/board.tera.html")),
        ("thread.tera.html", include_str!("../../views/thread.tera.html")),
    ])?;
    Ok(tera)
}

pub fn make_routes(state: AppContext) -> Router {
    let handle_404: fn() -> _ = || async { (StatusCode::NOT_FOUND, "Not found") };
    let service = handle_404.into_service();
    let serve_dir = ServeDir::new("public").not_found_service(service);

    // lives for the whole process, like the store connection inside it
    let app_state: AppState = Box::leak(Box::new(state));

    let api = Router::new()
        .route(
            "/api/threads/:board",
            get(threads::list_threads)
                .post(threads::create_thread)
                .delete(threads::delete_thread)
                .put(threads::report_thread),
        )
        .route(
            "/api/replies/:board",
            get(replies::get_thread)
                .post(replies::create_reply)
                .delete(replies::delete_reply)
                .put(replies::report_reply),
        );

    Router::new()
        .route("/", get(pages::index))
        .route("/b/:board", get(pages::board))
        .route("/b/:board/", get(pages::board))
        .route("/b/:board/:thread_id", get(pages::thread))
        .merge(api)
        .with_state(app_state)
        .fallback_service(serve_dir)
        .layer(TraceLayer::new_for_http())
}
