//! # Login360 (Third-Party Game Login)
//!
//! `login360` authenticates players arriving from a third-party game platform.
//! The platform signs every request with a shared secret; this service checks
//! the signature, then either issues an opaque session token (`/login`) or
//! reports whether the player has an activation record (`/active`).
//!
//! ## Signatures
//!
//! Signatures are lowercase hex MD5 digests over a fixed concatenation of query
//! parameters and the shared secret. The recipe is dictated by the platform and
//! is reproduced byte for byte, see [`login360::sign`].
//!
//! ## Activation Store
//!
//! Activation records live in a `MongoDB` collection keyed by `"<prefix>_<qid>"`.
//! The service only reads the collection, one point lookup per `/active` call.
//!
//! ## Response Contracts
//!
//! - `/login` always answers `200` with a JSON envelope (`errno`, `errmsg`, `data`).
//! - `/active` always answers `200` with a bare code: `-1`, `0`, `1` or `-2`.

pub mod api;
pub mod cli;
pub mod login360;
pub mod store;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};
