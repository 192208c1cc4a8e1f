//! `/webhook` handlers.

use {
    axum::{
        body::Bytes,
        extract::{Query, State},
        http::{HeaderMap, StatusCode},
        response::{IntoResponse, Response},
    },
    bistro_messenger::{SIGNATURE_HEADER, WebhookEnvelope, check_request},
    secrecy::ExposeSecret,
    serde::Deserialize,
    tracing::{debug, error, info, warn},
};

use crate::state::AppState;

/// Query of the subscription handshake.
#[derive(Debug, Default, Deserialize)]
pub struct VerifyParams {
    #[serde(rename = "hub.mode")]
    pub mode: Option<String>,
    #[serde(rename = "hub.verify_token")]
    pub verify_token: Option<String>,
    #[serde(rename = "hub.challenge")]
    pub challenge: Option<String>,
}

/// `GET /webhook`: echo `hub.challenge` when the mode is `subscribe` and the
/// token matches; 403 with an empty body otherwise.
pub async fn verify(
    State(state): State<AppState>,
    Query(params): Query<VerifyParams>,
) -> Response {
    let expected = state.config.messenger.verify_token.expose_secret();
    let subscribing = params.mode.as_deref() == Some("subscribe");
    let token_matches = params
        .verify_token
        .as_deref()
        .is_some_and(|token| !expected.is_empty() && token == expected);

    if subscribing && token_matches {
        info!("validating webhook");
        (StatusCode::OK, params.challenge.unwrap_or_default()).into_response()
    } else {
        error!(
            mode = params.mode.as_deref().unwrap_or(""),
            "failed validation, make sure the validation tokens match"
        );
        StatusCode::FORBIDDEN.into_response()
    }
}

/// `POST /webhook`: verify the signature over the raw body, then dispatch.
///
/// Once the signature check passes the answer is always 200, whatever
/// happens to individual events.
pub async fn receive(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> StatusCode {
    let messenger = &state.config.messenger;
    let signature = headers
        .get(SIGNATURE_HEADER)
        .map(|value| value.to_str().unwrap_or_default());

    if let Err(e) = check_request(
        &body,
        signature,
        messenger.app_secret.expose_secret(),
        messenger.missing_signature,
    ) {
        debug!(error = %e, bytes = body.len(), "rejecting webhook");
        return StatusCode::FORBIDDEN;
    }

    let envelope: WebhookEnvelope = match serde_json::from_slice(&body) {
        Ok(envelope) => envelope,
        Err(e) => {
            warn!(error = %e, bytes = body.len(), "webhook body is not a valid envelope");
            return StatusCode::OK;
        },
    };

    let report = state.dispatcher.dispatch(&envelope);
    debug!(
        events = report.events,
        replies = report.replies,
        skipped = report.skipped,
        "webhook acknowledged"
    );
    StatusCode::OK
}
