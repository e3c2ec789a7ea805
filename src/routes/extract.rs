use axum::{
    async_trait,
    body::HttpBody,
    extract::FromRequest,
    http::{header::CONTENT_TYPE, Request},
    response::{IntoResponse, Response},
    BoxError, Form, Json,
};
use serde::de::DeserializeOwned;

/// Request body that may arrive as JSON (API clients) or as an urlencoded
/// form (the rendered pages).
pub struct Payload<T>(pub T);

fn is_json<B>(req: &Request<B>) -> bool {
    req.headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map_or(false, |ct| ct.starts_with("application/json"))
}

#[async_trait]
impl<T, S, B> FromRequest<S, B> for Payload<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
    B: HttpBody + Send + 'static,
    B::Data: Send,
    B::Error: Into<BoxError>,
{
    type Rejection = Response;

    async fn from_request(req: Request<B>, state: &S) -> Result<Self, Self::Rejection> {
        let uri = req.uri().clone();
        let parsed = if is_json(&req) {
            Json::<T>::from_request(req, state)
                .await
                .map(|Json(value)| value)
                .map_err(|rejection| {
                    tracing::warn!(%uri, "rejected json body: {rejection}");
                    rejection.into_response()
                })
        } else {
            Form::<T>::from_request(req, state)
                .await
                .map(|Form(value)| value)
                .map_err(|rejection| {
                    tracing::warn!(%uri, "rejected form body: {rejection}");
                    rejection.into_response()
                })
        };

        parsed.map(Self)
    }
}
