//! GitHub webhook signature verification.
//!
//! GitHub signs webhook payloads with an HMAC of the raw body keyed by the
//! shared webhook secret. Current deliveries carry `X-Hub-Signature-256:
//! sha256=<hex>`; older integrations only send `X-Hub-Signature: sha1=<hex>`.
//! Both are accepted, SHA-256 preferred when present.
//!
//! Invalid signatures should be rejected before the payload is parsed.

use hmac::digest::{InvalidLength, KeyInit};
use hmac::{Hmac, Mac};
use sha1::Sha1;
use sha2::Sha256;

type HmacSha1 = Hmac<Sha1>;
type HmacSha256 = Hmac<Sha256>;

/// The HMAC digest named by a signature header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignatureAlgorithm {
    Sha1,
    Sha256,
}

impl SignatureAlgorithm {
    /// Preferred first.
    pub const ALL: [SignatureAlgorithm; 2] = [SignatureAlgorithm::Sha256, SignatureAlgorithm::Sha1];

    /// The request header carrying this kind of signature.
    pub fn header_name(&self) -> &'static str {
        match self {
            SignatureAlgorithm::Sha1 => "x-hub-signature",
            SignatureAlgorithm::Sha256 => "x-hub-signature-256",
        }
    }

    fn prefix(&self) -> &'static str {
        match self {
            SignatureAlgorithm::Sha1 => "sha1=",
            SignatureAlgorithm::Sha256 => "sha256=",
        }
    }
}

/// Parses a signature header value (e.g. `sha256=abc123...`) into raw bytes.
///
/// Returns `None` for malformed headers (missing or mismatched prefix,
/// invalid hex). Never panics.
///
/// # Examples
///
/// ```
/// use ghia::webhooks::{SignatureAlgorithm, parse_signature_header};
///
/// assert!(parse_signature_header(SignatureAlgorithm::Sha256, "sha256=abcd1234").is_some());
/// assert!(parse_signature_header(SignatureAlgorithm::Sha1, "sha1=abcd1234").is_some());
///
/// // Prefix must match the algorithm
/// assert!(parse_signature_header(SignatureAlgorithm::Sha256, "sha1=abcd1234").is_none());
///
/// // Bad hex
/// assert!(parse_signature_header(SignatureAlgorithm::Sha256, "sha256=xyz").is_none());
/// ```
pub fn parse_signature_header(algorithm: SignatureAlgorithm, header: &str) -> Option<Vec<u8>> {
    let hex_sig = header.strip_prefix(algorithm.prefix())?;
    hex::decode(hex_sig).ok()
}

/// Computes the HMAC signature of a payload using the given secret.
///
/// Used in tests to produce expected signatures.
pub fn compute_signature(
    algorithm: SignatureAlgorithm,
    payload: &[u8],
    secret: &[u8],
) -> Result<Vec<u8>, InvalidLength> {
    match algorithm {
        SignatureAlgorithm::Sha1 => sign::<HmacSha1>(payload, secret),
        SignatureAlgorithm::Sha256 => sign::<HmacSha256>(payload, secret),
    }
}

fn keyed<M: Mac + KeyInit>(payload: &[u8], secret: &[u8]) -> Result<M, InvalidLength> {
    let mut mac = <M as KeyInit>::new_from_slice(secret)?;
    mac.update(payload);
    Ok(mac)
}

fn sign<M: Mac + KeyInit>(payload: &[u8], secret: &[u8]) -> Result<Vec<u8>, InvalidLength> {
    Ok(keyed::<M>(payload, secret)?.finalize().into_bytes().to_vec())
}

fn verifies<M: Mac + KeyInit>(payload: &[u8], secret: &[u8], expected: &[u8]) -> bool {
    keyed::<M>(payload, secret).is_ok_and(|mac| mac.verify_slice(expected).is_ok())
}

/// Formats a signature as a GitHub-style header value, e.g. `sha256=<hex>`.
pub fn format_signature_header(algorithm: SignatureAlgorithm, signature: &[u8]) -> String {
    format!("{}{}", algorithm.prefix(), hex::encode(signature))
}

/// Verifies a webhook signature header against the payload and secret.
///
/// Uses constant-time comparison.
///
/// # Examples
///
/// ```
/// use ghia::webhooks::{SignatureAlgorithm, compute_signature, format_signature_header, verify_signature};
///
/// let payload = b"Hello, World!";
/// let secret = b"my-secret-key";
/// let algorithm = SignatureAlgorithm::Sha256;
///
/// let header = format_signature_header(algorithm, &compute_signature(algorithm, payload, secret).unwrap());
///
/// assert!(verify_signature(algorithm, payload, &header, secret));
/// assert!(!verify_signature(algorithm, payload, &header, b"wrong-secret"));
/// ```
pub fn verify_signature(
    algorithm: SignatureAlgorithm,
    payload: &[u8],
    signature_header: &str,
    secret: &[u8],
) -> bool {
    let Some(expected) = parse_signature_header(algorithm, signature_header) else {
        return false;
    };

    // Constant-time comparison via the HMAC library
    match algorithm {
        SignatureAlgorithm::Sha1 => verifies::<HmacSha1>(payload, secret, &expected),
        SignatureAlgorithm::Sha256 => verifies::<HmacSha256>(payload, secret, &expected),
    }
}
