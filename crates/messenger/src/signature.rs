//! `X-Hub-Signature` verification.
//!
//! The platform signs every webhook POST with HMAC-SHA1 over the raw body,
//! keyed by the app secret, and sends it as `sha1=<hex>`. Verification must
//! run on the exact bytes received, before any JSON parsing.

use {
    bistro_config::MissingSignaturePolicy,
    hmac::{Hmac, Mac},
    sha1::Sha1,
    tracing::{error, warn},
};

type HmacSha1 = Hmac<Sha1>;

/// Request header carrying the body signature.
pub const SIGNATURE_HEADER: &str = "x-hub-signature";

const ALGORITHM: &str = "sha1";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SignatureError {
    #[error("request carries no X-Hub-Signature header")]
    HeaderMissing,

    #[error("signature header is not of the form <algorithm>=<hex digest>")]
    Malformed,

    #[error("unsupported signature algorithm '{0}'")]
    UnsupportedAlgorithm(String),

    #[error("signature does not match request body")]
    Mismatch,
}

/// Outcome of a request-level signature check that did not reject.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureCheck {
    Verified,
    /// No header was sent and the policy lets the request through.
    Unsigned,
}

/// Compute the header value the platform would send for `body`.
#[must_use]
pub fn sign(body: &[u8], app_secret: &str) -> String {
    format!("{ALGORITHM}={}", hex_digest(body, app_secret))
}

fn hex_digest(body: &[u8], app_secret: &str) -> String {
    // HMAC accepts keys of any length, so this never fails.
    let mut mac = match HmacSha1::new_from_slice(app_secret.as_bytes()) {
        Ok(mac) => mac,
        Err(_) => return String::new(),
    };
    mac.update(body);
    hex::encode(mac.finalize().into_bytes())
}

/// Verify `header` (`sha1=<hex>`) against `body`.
///
/// The hex digest is compared case-sensitively against the lowercase
/// encoding, in constant time.
pub fn verify_signature(
    body: &[u8],
    header: &str,
    app_secret: &str,
) -> Result<(), SignatureError> {
    let (algorithm, digest) = header
        .trim()
        .split_once('=')
        .ok_or(SignatureError::Malformed)?;
    if digest.is_empty() {
        return Err(SignatureError::Malformed);
    }
    if algorithm != ALGORITHM {
        return Err(SignatureError::UnsupportedAlgorithm(algorithm.to_string()));
    }

    let expected = hex_digest(body, app_secret);
    if !expected.is_empty() && constant_time_eq(expected.as_bytes(), digest.as_bytes()) {
        Ok(())
    } else {
        Err(SignatureError::Mismatch)
    }
}

/// Apply signature verification and the missing-header policy to a request.
pub fn check_request(
    body: &[u8],
    header: Option<&str>,
    app_secret: &str,
    policy: MissingSignaturePolicy,
) -> Result<SignatureCheck, SignatureError> {
    match header {
        Some(header) => {
            verify_signature(body, header, app_secret).inspect_err(|e| {
                warn!(error = %e, "webhook signature rejected");
            })?;
            Ok(SignatureCheck::Verified)
        },
        None => match policy {
            MissingSignaturePolicy::Reject => {
                error!("couldn't validate the signature: header missing, rejecting");
                Err(SignatureError::HeaderMissing)
            },
            MissingSignaturePolicy::AllowAndLog => {
                error!("couldn't validate the signature: header missing, processing anyway");
                Ok(SignatureCheck::Unsigned)
            },
        },
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
