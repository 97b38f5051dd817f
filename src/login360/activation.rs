//! Activation check outcomes.

use crate::store::{activation_key, Activation, ActivationStore};
use std::fmt;
use tracing::{debug, error};

/// Bare-string codes returned by `/active`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActiveCode {
    /// Missing/malformed parameters or a bad signature.
    Rejected,
    NotActivated,
    Activated,
    StoreError,
}

impl ActiveCode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Rejected => "-1",
            Self::NotActivated => "0",
            Self::Activated => "1",
            Self::StoreError => "-2",
        }
    }
}

impl fmt::Display for ActiveCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One lookup of `"<prefix>_<qid>"`; store failures are logged and collapsed to `-2`.
pub async fn check(store: &dyn ActivationStore, prefix: &str, qid: i64) -> ActiveCode {
    let key = activation_key(prefix, qid);

    match store.lookup(&key).await {
        Ok(Activation::Present) => {
            debug!(%key, "activation record found");
            ActiveCode::Activated
        }
        Ok(Activation::Absent) => {
            debug!(%key, "activation record not found");
            ActiveCode::NotActivated
        }
        Err(err) => {
            error!(%key, "Failed to look up activation record: {err}");
            ActiveCode::StoreError
        }
    }
}
