//! HTTP API layer: typed body extraction, endpoint handlers, request/response models.

pub mod handlers;
pub mod models;

use axum::extract::FromRequest;

use crate::errors::Error;

/// JSON body extractor whose rejections surface as [`Error::Validation`] (400).
///
/// The stock `axum::Json` rejection splits malformed bodies between 400 and 422; the
/// gateway contract treats every binding failure as a single validation kind.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(Error))]
pub struct JsonBody<T>(pub T);
