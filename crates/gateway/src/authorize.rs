//! Account-linking consent page (`GET /authorize`).
//!
//! The platform opens this page with an `account_linking_token` and a
//! `redirect_uri`. Following the success link completes the link with an
//! authorization code.

use {
    askama::Template,
    axum::{
        extract::Query,
        http::StatusCode,
        response::{Html, IntoResponse, Response},
    },
    bistro_auto_reply::content::RESTAURANT_NAME,
    serde::Deserialize,
    tracing::{info, warn},
    url::Url,
};

use crate::error::Result;

/// Authorization code handed back on every link.
///
/// There is no user store behind the bot, so the code does not identify
/// anyone; a deployment with real accounts must mint one per user here.
pub const PLACEHOLDER_AUTH_CODE: &str = "1234567890";

#[derive(Debug, Default, Deserialize)]
pub struct AuthorizeParams {
    pub account_linking_token: Option<String>,
    pub redirect_uri: Option<String>,
}

#[derive(Template)]
#[template(path = "authorize.html", escape = "html")]
struct AuthorizeTemplate<'a> {
    restaurant: &'a str,
    account_linking_token: &'a str,
    redirect_uri: &'a str,
    redirect_uri_success: &'a str,
}

pub async fn authorize(Query(params): Query<AuthorizeParams>) -> Result<Response> {
    let Some(raw) = params.redirect_uri.as_deref().filter(|u| !u.is_empty()) else {
        return Ok((StatusCode::BAD_REQUEST, "missing redirect_uri").into_response());
    };
    let Some(redirect_uri) = web_url(raw) else {
        warn!(redirect_uri = raw, "refusing non-http redirect_uri");
        return Ok((StatusCode::BAD_REQUEST, "redirect_uri must be an http(s) URL").into_response());
    };
    let account_linking_token = params.account_linking_token.as_deref().unwrap_or_default();
    let redirect_uri_success = success_uri(&redirect_uri, PLACEHOLDER_AUTH_CODE);
    info!(account_linking_token, "rendering account linking page");

    let html = AuthorizeTemplate {
        restaurant: RESTAURANT_NAME,
        account_linking_token,
        redirect_uri: redirect_uri.as_str(),
        redirect_uri_success: &redirect_uri_success,
    }
    .render()?;
    Ok(Html(html).into_response())
}

/// `raw` parsed as an absolute `http` or `https` URL.
fn web_url(raw: &str) -> Option<Url> {
    Url::parse(raw)
        .ok()
        .filter(|url| matches!(url.scheme(), "http" | "https"))
}

/// `redirect_uri` with `authorization_code=<code>` appended to its query.
#[must_use]
pub fn success_uri(redirect_uri: &Url, code: &str) -> String {
    let mut url = redirect_uri.clone();
    url.query_pairs_mut().append_pair("authorization_code", code);
    url.into()
}
