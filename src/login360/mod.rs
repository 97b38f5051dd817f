//! Login and activation business rules, independent of the HTTP layer.

pub mod activation;
pub mod params;
pub mod session;
pub mod sign;

/// Default route namespace and activation key prefix used by the platform.
pub const DEFAULT_NAMESPACE: &str = "360";
