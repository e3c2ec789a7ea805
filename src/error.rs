use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;

use crate::db::StoreError;

pub type HtmlResult = Result<Html<String>, AppError>;

/// Anything a handler can fail with. The status is picked from the
/// underlying error when the response is built.
#[derive(Debug)]
pub struct AppError(anyhow::Error);

/// A request body that parsed but carries values the board can't store.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("{0} must not be blank")]
    Blank(&'static str),
}

impl InputError {
    pub fn require(field: &'static str, value: &str) -> Result<(), Self> {
        if value.trim().is_empty() {
            return Err(Self::Blank(field));
        }
        Ok(())
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        if self.0.is::<InputError>() {
            return StatusCode::UNPROCESSABLE_ENTITY;
        }

        match self.0.downcast_ref::<StoreError>() {
            Some(StoreError::ThreadNotFound(_)) => StatusCode::NOT_FOUND,
            Some(StoreError::DuplicateId(_)) => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("request failed: {:#}", self.0);
            return (status, "Something went wrong").into_response();
        }

        tracing::debug!("request rejected: {}", self.0);
        (status, self.0.to_string()).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
