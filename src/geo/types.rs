//! Visitor location record

use serde::{Deserialize, Serialize};

/// Placeholder used for fields the lookup could not provide
pub const UNKNOWN: &str = "Unknown";

/// Placeholder IP reported when the lookup itself failed
pub const UNAVAILABLE: &str = "Unavailable";

/// Approximate location of a visitor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisitorGeo {
    #[serde(default = "unknown")]
    pub ip: String,
    #[serde(default = "unknown")]
    pub country: String,
    #[serde(default = "unknown")]
    pub city: String,
}

fn unknown() -> String {
    UNKNOWN.to_string()
}

impl VisitorGeo {
    pub fn new(ip: impl Into<String>, country: impl Into<String>, city: impl Into<String>) -> Self {
        Self {
            ip: ip.into(),
            country: country.into(),
            city: city.into(),
        }
    }

    /// Record shown when the lookup failed
    pub fn unavailable() -> Self {
        Self::new(UNAVAILABLE, UNKNOWN, UNKNOWN)
    }

    pub fn is_unavailable(&self) -> bool {
        self.ip == UNAVAILABLE
    }
}
