//! Typed request parameters.
//!
//! Both endpoints read their input from the query string. A parameter counts as
//! missing when it is absent or empty; integers are base-10 `i64`. When a name
//! is repeated the first occurrence wins.

use std::borrow::Cow;
use thiserror::Error;
use url::form_urlencoded;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParamError {
    #[error("missing required parameter: {0}")]
    Missing(&'static str),
    #[error("parameter {name} is not an integer: {value:?}")]
    InvalidInt { name: &'static str, value: String },
}

/// Parameters of `GET /<namespace>/login`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginRequest {
    pub qid: i64,
    pub time: i64,
    pub is_adult: i64,
    pub server_id: String,
    pub sign: String,
}

impl LoginRequest {
    /// # Errors
    /// Returns `ParamError` if a required parameter is missing or malformed.
    pub fn from_query(query: Option<&str>) -> Result<Self, ParamError> {
        let params = QueryParams::parse(query);
        Ok(Self {
            qid: params.required_i64("qid")?,
            time: params.required_i64("time")?,
            is_adult: params.required_i64("isAdult")?,
            server_id: params.required_str("server_id")?,
            sign: params.required_str("sign")?,
        })
    }
}

/// Parameters of `GET /<namespace>/active`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveRequest {
    pub qid: i64,
    pub server_id: String,
    pub sign: String,
}

impl ActiveRequest {
    /// # Errors
    /// Returns `ParamError` if a required parameter is missing or malformed.
    pub fn from_query(query: Option<&str>) -> Result<Self, ParamError> {
        let params = QueryParams::parse(query);
        Ok(Self {
            qid: params.required_i64("qid")?,
            server_id: params.required_str("server_id")?,
            sign: params.required_str("sign")?,
        })
    }
}

struct QueryParams<'a> {
    pairs: Vec<(Cow<'a, str>, Cow<'a, str>)>,
}

impl<'a> QueryParams<'a> {
    fn parse(query: Option<&'a str>) -> Self {
        let pairs = query
            .map(|q| form_urlencoded::parse(q.as_bytes()).collect())
            .unwrap_or_default();
        Self { pairs }
    }

    fn first(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_ref())
    }

    fn required_str(&self, name: &'static str) -> Result<String, ParamError> {
        match self.first(name) {
            Some(value) if !value.is_empty() => Ok(value.to_string()),
            _ => Err(ParamError::Missing(name)),
        }
    }

    fn required_i64(&self, name: &'static str) -> Result<i64, ParamError> {
        let value = self.required_str(name)?;
        value
            .parse::<i64>()
            .map_err(|_| ParamError::InvalidInt { name, value })
    }
}
