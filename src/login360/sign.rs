//! Request signatures.
//!
//! The platform signs requests with `md5(canonical || secret)` rendered as
//! lowercase hex. Field order and the missing delimiters are part of the
//! contract: the login recipe glues `server_id` straight onto the secret, and
//! the active recipe has no labels at all. Any deviation breaks interop with
//! the platform's signer, so the digest stays MD5.

use md5::{Digest, Md5};
use secrecy::{ExposeSecret, SecretString};

/// Canonical string for `/login`.
fn login_canonical(qid: i64, time: i64, server_id: &str, secret: &str) -> String {
    format!("qid={qid}&time={time}&server_id={server_id}{secret}")
}

/// Canonical string for `/active`.
fn active_canonical(qid: i64, server_id: &str, secret: &str) -> String {
    format!("{qid}{server_id}{secret}")
}

fn digest_hex(canonical: &str) -> String {
    hex::encode(Md5::digest(canonical.as_bytes()))
}

/// Compute the `/login` signature.
#[must_use]
pub fn login_sign(qid: i64, time: i64, server_id: &str, secret: &SecretString) -> String {
    digest_hex(&login_canonical(
        qid,
        time,
        server_id,
        secret.expose_secret(),
    ))
}

/// Compute the `/active` signature.
#[must_use]
pub fn active_sign(qid: i64, server_id: &str, secret: &SecretString) -> String {
    digest_hex(&active_canonical(qid, server_id, secret.expose_secret()))
}

/// Exact, case-sensitive comparison of a computed digest with the caller's `sign`.
#[must_use]
pub fn matches(expected: &str, sign: &str) -> bool {
    expected == sign
}
