//! The registration relay: gatekeeps a submitted form and hands it to the
//! configured spreadsheet webhook, one outbound call per request.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use reqwest::Client;
use serde_json::{Map, Value};
use shared::{
    error::ValidationError,
    protocol::SubmitResponse,
    validation::{validate_identity, validate_required},
};
use thiserror::Error;
use tracing::{error, info, warn};
use url::Url;

use crate::{app_state::AppState, config::ValidationMode};

pub(crate) const REGISTER_ROUTE: &str = "/.netlify/functions/register";
pub(crate) const API_REGISTER_ROUTE: &str = "/api/register";

const GENERIC_UPSTREAM_ERROR: &str = "Google Script error";

#[derive(Debug, Error)]
pub(crate) enum RelayError {
    #[error("Method Not Allowed")]
    MethodNotAllowed,
    #[error("Request body must be a JSON object")]
    MalformedBody,
    #[error("Request body is too large")]
    PayloadTooLarge,
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Missing GOOGLE_SCRIPT_WEBAPP_URL env var")]
    MissingDestination,
    #[error("{0}")]
    Upstream(String),
    #[error("{0}")]
    Transport(#[from] reqwest::Error),
}

impl RelayError {
    pub(crate) fn status(&self) -> StatusCode {
        match self {
            RelayError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            RelayError::MalformedBody | RelayError::Validation(_) => StatusCode::BAD_REQUEST,
            RelayError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            RelayError::MissingDestination
            | RelayError::Upstream(_)
            | RelayError::Transport(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let status = self.status();
        let mut response =
            (status, Json(SubmitResponse::failure(self.to_string()))).into_response();
        if status == StatusCode::METHOD_NOT_ALLOWED {
            response
                .headers_mut()
                .insert(header::ALLOW, HeaderValue::from_static("POST"));
        }
        response
    }
}

pub(crate) async fn register(
    State(state): State<Arc<AppState>>,
    method: Method,
    body: Bytes,
) -> Result<Json<SubmitResponse>, RelayError> {
    let outcome = relay(&state, &method, &body).await;
    match &outcome {
        Ok(()) => info!("registration forwarded to webhook"),
        Err(error) if error.status().is_server_error() => {
            error!(%error, "registration relay failed")
        }
        Err(error) => warn!(%method, %error, "registration rejected"),
    }
    outcome.map(|()| Json(SubmitResponse::success()))
}

async fn relay(state: &AppState, method: &Method, body: &[u8]) -> Result<(), RelayError> {
    if *method != Method::POST {
        return Err(RelayError::MethodNotAllowed);
    }

    let payload = parse_payload(body)?;
    validate_identity(&payload)?;
    if state.validation_mode == ValidationMode::Full {
        validate_required(&payload)?;
    }

    let destination = state
        .destination_url
        .as_ref()
        .ok_or(RelayError::MissingDestination)?;
    forward(&state.http, destination, &payload).await
}

/// Rewrites body-limit rejections into the same `{ok, error}` reply as every
/// other relay outcome.
pub(crate) async fn json_payload_too_large(response: Response) -> Response {
    if response.status() == StatusCode::PAYLOAD_TOO_LARGE {
        warn!("registration body exceeds the configured limit");
        return RelayError::PayloadTooLarge.into_response();
    }
    response
}

/// An empty body reads as `{}` so it falls through to field validation.
pub(crate) fn parse_payload(body: &[u8]) -> Result<Map<String, Value>, RelayError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Map::new());
    }
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(payload)) => Ok(payload),
        _ => Err(RelayError::MalformedBody),
    }
}

/// Posts the payload as received and interprets the webhook's `{ok, error}` reply.
pub(crate) async fn forward(
    http: &Client,
    destination: &Url,
    payload: &Map<String, Value>,
) -> Result<(), RelayError> {
    let response = http.post(destination.clone()).json(payload).send().await?;
    let status = response.status();
    let body = response.bytes().await?;

    let reply = match serde_json::from_slice::<Value>(&body) {
        Ok(Value::Object(reply)) => reply,
        _ => {
            warn!(
                %status,
                bytes = body.len(),
                "webhook reply is not a JSON object; treating as empty"
            );
            Map::new()
        }
    };

    let reported_failure = reply.get("ok") == Some(&Value::Bool(false));
    if !status.is_success() || reported_failure {
        let message = reply
            .get("error")
            .and_then(Value::as_str)
            .filter(|message| !message.is_empty())
            .unwrap_or(GENERIC_UPSTREAM_ERROR);
        return Err(RelayError::Upstream(message.to_string()));
    }

    Ok(())
}

#[cfg(test)]
#[path = "tests/relay_tests.rs"]
mod tests;
